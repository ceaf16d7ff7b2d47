use crate::status::{EXTRACTING_TEXT, NO_RESULTS_TEXT, SEARCHING_TEXT};
use crate::{AppState, Effect, JobId, JobPhase, JobRequest, Msg, Notification, StatusPhase};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::InputChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::QueryChanged(text) => {
            state.set_query_input(text);
            Vec::new()
        }
        Msg::ExtractSubmitted => submit_extraction(&mut state),
        Msg::SearchSubmitted => submit_search(&mut state),
        Msg::ChannelJoined { job_id } => {
            if state.job_phase(job_id) == Some(JobPhase::Binding) {
                state.set_job_phase(job_id, JobPhase::AwaitingResults);
            }
            Vec::new()
        }
        Msg::ChannelFailed { job_id, reason } => {
            // Covers both a failed join and a socket lost mid-stream.
            if state.job_phase(job_id).is_some_and(JobPhase::is_open) {
                state.set_job_phase(job_id, JobPhase::Failed);
                if state.is_active(job_id) {
                    state.set_status(
                        StatusPhase::Error,
                        format!("Result stream unavailable: {reason}"),
                    );
                }
                state.forget_if_abandoned(job_id);
            }
            Vec::new()
        }
        Msg::SubmitFailed { job_id, reason } => {
            if !state.job_phase(job_id).is_some_and(JobPhase::is_open) {
                return (state, Vec::new());
            }
            state.set_job_phase(job_id, JobPhase::Failed);
            if state.is_active(job_id) {
                state.set_status(StatusPhase::Error, format!("Submission failed: {reason}"));
            }
            state.forget_if_abandoned(job_id);
            vec![Effect::LeaveChannel { job_id }]
        }
        Msg::Notification {
            job_id,
            notification,
        } => apply_notification(&mut state, job_id, notification),
        Msg::SearchCompleted { ticket, outcome } => {
            if state.take_pending_search(ticket) {
                if outcome.hits.is_empty() {
                    state.set_status(StatusPhase::Error, NO_RESULTS_TEXT);
                } else {
                    state.show_search_results(&outcome.hits);
                    state.set_status(
                        StatusPhase::Done,
                        format!("Results found in {}ms", outcome.server_time_ms),
                    );
                }
            }
            Vec::new()
        }
        Msg::SearchFailed { ticket, reason } => {
            if state.take_pending_search(ticket) {
                state.set_status(StatusPhase::Error, format!("Search failed: {reason}"));
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit_extraction(state: &mut AppState) -> Vec<Effect> {
    state.clear_results();
    let request = match JobRequest::extract(state.url_input()) {
        Ok(request) => request,
        Err(err) => {
            state.set_status(StatusPhase::EmptyInput, err.to_string());
            return Vec::new();
        }
    };

    let job_id = JobId::generate();
    state.set_status(StatusPhase::Working, EXTRACTING_TEXT);
    state.begin_extraction(job_id, request.urls.clone());
    vec![Effect::StartExtraction {
        job_id,
        urls: request.urls,
    }]
}

fn submit_search(state: &mut AppState) -> Vec<Effect> {
    state.clear_results();
    let request = match JobRequest::search(state.url_input(), state.query_input()) {
        Ok(request) => request,
        Err(err) => {
            state.set_status(StatusPhase::EmptyInput, err.to_string());
            return Vec::new();
        }
    };

    let ticket = state.begin_search();
    state.set_status(StatusPhase::Working, SEARCHING_TEXT);
    let search_term = request.search_term().unwrap_or_default().to_string();
    vec![Effect::SubmitSearch {
        ticket,
        urls: request.urls,
        search_term,
    }]
}

/// Reducer for one job's stream: rows while open, exactly one terminal.
fn apply_notification(
    state: &mut AppState,
    job_id: JobId,
    notification: Notification,
) -> Vec<Effect> {
    // Unknown or closed jobs: late or duplicate notifications are dropped.
    if !state.job_phase(job_id).is_some_and(JobPhase::is_open) {
        return Vec::new();
    }

    match notification {
        Notification::Result(result) => {
            state.set_job_phase(job_id, JobPhase::AwaitingResults);
            state.append_row(job_id, &result);
            Vec::new()
        }
        Notification::Terminal { message, .. } => {
            state.set_job_phase(job_id, JobPhase::Terminal);
            if state.is_active(job_id) {
                state.set_status(StatusPhase::Done, message);
            }
            state.forget_if_abandoned(job_id);
            vec![Effect::LeaveChannel { job_id }]
        }
    }
}
