use crate::{JobId, SearchTicket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Join `frontend_stream:<job_id>`, then (only once joined) POST `/extract`.
    StartExtraction { job_id: JobId, urls: Vec<String> },
    /// Release the job's channel binding.
    LeaveChannel { job_id: JobId },
    /// POST `/search`; the response comes back as a single message.
    SubmitSearch {
        ticket: SearchTicket,
        urls: Vec<String>,
        search_term: String,
    },
}
