use std::collections::HashMap;

use crate::render::{render_extraction_row, render_search_block, ExtractionRow, SearchBlock};
use crate::status::{StatusIndicator, StatusPhase};
use crate::view_model::{AppViewModel, ResultsViewModel};
use crate::{ExtractionResult, JobId, SearchHit, SearchTicket, EXTRACTION_COLUMNS};

/// Lifecycle of one extraction job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Channel join requested; nothing submitted yet.
    Binding,
    /// Joined and submitted; `result` notifications append rows.
    AwaitingResults,
    /// A terminal notification arrived and the channel was released.
    Terminal,
    /// Join or submission failed.
    Failed,
}

impl JobPhase {
    pub fn is_open(self) -> bool {
        matches!(self, JobPhase::Binding | JobPhase::AwaitingResults)
    }
}

/// Render target of one extraction job, keyed by its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtractionJob {
    pub(crate) urls: Vec<String>,
    pub(crate) phase: JobPhase,
    pub(crate) rows: Vec<ExtractionRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub(crate) enum ResultsView {
    #[default]
    Empty,
    Extraction(JobId),
    Search(Vec<SearchBlock>),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    url_input: String,
    query_input: String,
    status: StatusIndicator,
    jobs: HashMap<JobId, ExtractionJob>,
    results: ResultsView,
    next_search_ticket: u64,
    pending_search: Option<SearchTicket>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        let results = match &self.results {
            ResultsView::Empty => ResultsViewModel::Empty,
            ResultsView::Extraction(job_id) => match self.jobs.get(job_id) {
                Some(job) => ResultsViewModel::Table {
                    job_id: *job_id,
                    phase: job.phase,
                    columns: EXTRACTION_COLUMNS,
                    pending_urls: job.urls.len(),
                    rows: job.rows.clone(),
                },
                None => ResultsViewModel::Empty,
            },
            ResultsView::Search(blocks) => ResultsViewModel::SearchList {
                blocks: blocks.clone(),
            },
        };

        AppViewModel {
            status: self.status.clone(),
            results,
            open_jobs: self.jobs.values().filter(|job| job.phase.is_open()).count(),
        }
    }

    /// Returns and clears the "needs render" flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// True while the displayed job or search still expects a reply.
    pub fn is_busy(&self) -> bool {
        if self.pending_search.is_some() {
            return true;
        }
        self.active_job()
            .and_then(|job_id| self.jobs.get(&job_id))
            .is_some_and(|job| job.phase.is_open())
    }

    pub fn url_input(&self) -> &str {
        &self.url_input
    }

    pub fn query_input(&self) -> &str {
        &self.query_input
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        self.url_input = text;
    }

    pub(crate) fn set_query_input(&mut self, text: String) {
        self.query_input = text;
    }

    /// The only writer of the status indicator.
    pub(crate) fn set_status(&mut self, phase: StatusPhase, text: impl Into<String>) {
        self.status = StatusIndicator {
            phase,
            text: text.into(),
        };
        self.dirty = true;
    }

    pub(crate) fn active_job(&self) -> Option<JobId> {
        match self.results {
            ResultsView::Extraction(job_id) => Some(job_id),
            _ => None,
        }
    }

    pub(crate) fn is_active(&self, job_id: JobId) -> bool {
        self.active_job() == Some(job_id)
    }

    pub(crate) fn job_phase(&self, job_id: JobId) -> Option<JobPhase> {
        self.jobs.get(&job_id).map(|job| job.phase)
    }

    /// Clears the results container. A displayed job that is still open is
    /// abandoned: its record stays keyed by id so late notifications land on
    /// it instead of on whatever is displayed next.
    pub(crate) fn clear_results(&mut self) {
        if let Some(job_id) = self.active_job() {
            if self.job_phase(job_id).is_some_and(|phase| !phase.is_open()) {
                self.jobs.remove(&job_id);
            }
        }
        self.results = ResultsView::Empty;
        self.pending_search = None;
        self.dirty = true;
    }

    pub(crate) fn begin_extraction(&mut self, job_id: JobId, urls: Vec<String>) {
        self.jobs.insert(
            job_id,
            ExtractionJob {
                urls,
                phase: JobPhase::Binding,
                rows: Vec::new(),
            },
        );
        self.results = ResultsView::Extraction(job_id);
        self.dirty = true;
    }

    pub(crate) fn set_job_phase(&mut self, job_id: JobId, phase: JobPhase) {
        if let Some(job) = self.jobs.get_mut(&job_id) {
            job.phase = phase;
            if self.results == ResultsView::Extraction(job_id) {
                self.dirty = true;
            }
        }
    }

    pub(crate) fn append_row(&mut self, job_id: JobId, result: &ExtractionResult) {
        if let Some(job) = self.jobs.get_mut(&job_id) {
            job.rows.push(render_extraction_row(result));
            if self.results == ResultsView::Extraction(job_id) {
                self.dirty = true;
            }
        }
    }

    /// Drops the record of a closed job that is no longer displayed.
    pub(crate) fn forget_if_abandoned(&mut self, job_id: JobId) {
        if !self.is_active(job_id) {
            self.jobs.remove(&job_id);
        }
    }

    pub(crate) fn begin_search(&mut self) -> SearchTicket {
        self.next_search_ticket += 1;
        let ticket = SearchTicket(self.next_search_ticket);
        self.pending_search = Some(ticket);
        ticket
    }

    /// Consumes the pending ticket if it matches; stale replies return false.
    pub(crate) fn take_pending_search(&mut self, ticket: SearchTicket) -> bool {
        if self.pending_search == Some(ticket) {
            self.pending_search = None;
            true
        } else {
            false
        }
    }

    pub(crate) fn show_search_results(&mut self, hits: &[SearchHit]) {
        self.results = ResultsView::Search(hits.iter().map(render_search_block).collect());
        self.dirty = true;
    }
}
