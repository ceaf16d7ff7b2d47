use crate::{JobId, Notification, SearchOutcome, SearchTicket};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the newline-separated URL input.
    InputChanged(String),
    /// User edited the search query.
    QueryChanged(String),
    /// User asked to extract dates for the current URL input.
    ExtractSubmitted,
    /// User asked to search the current URL input for the current query.
    SearchSubmitted,
    /// The job's channel join was acknowledged by the transport.
    ChannelJoined { job_id: JobId },
    /// The job's channel could not be joined, or was lost before a terminal
    /// notification arrived.
    ChannelFailed { job_id: JobId, reason: String },
    /// The extraction POST failed at the transport level or with a non-2xx status.
    SubmitFailed { job_id: JobId, reason: String },
    /// A push notification arrived on the job's channel.
    Notification {
        job_id: JobId,
        notification: Notification,
    },
    /// Search response arrived.
    SearchCompleted {
        ticket: SearchTicket,
        outcome: SearchOutcome,
    },
    /// Search request failed.
    SearchFailed { ticket: SearchTicket, reason: String },
    /// Changes nothing; used when an input event has no meaning for the reducer.
    NoOp,
}
