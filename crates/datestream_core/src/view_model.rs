use crate::{ExtractionRow, JobId, JobPhase, SearchBlock, StatusIndicator};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub status: StatusIndicator,
    pub results: ResultsViewModel,
    /// Jobs still waiting for a terminal notification, displayed or abandoned.
    pub open_jobs: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsViewModel {
    #[default]
    Empty,
    Table {
        job_id: JobId,
        phase: JobPhase,
        columns: [&'static str; 5],
        /// Number of URLs submitted; rows may be fewer and arrive in any order.
        pending_urls: usize,
        rows: Vec<ExtractionRow>,
    },
    SearchList {
        blocks: Vec<SearchBlock>,
    },
}

impl ResultsViewModel {
    pub fn rows(&self) -> &[ExtractionRow] {
        match self {
            ResultsViewModel::Table { rows, .. } => rows,
            _ => &[],
        }
    }

    pub fn blocks(&self) -> &[SearchBlock] {
        match self {
            ResultsViewModel::SearchList { blocks } => blocks,
            _ => &[],
        }
    }
}
