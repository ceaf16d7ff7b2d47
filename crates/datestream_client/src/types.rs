use std::sync::mpsc;

use datestream_core::{JobId, Msg, Notification, SearchOutcome, SearchTicket};

/// Everything the client reports back to the reducer, in the order it happened.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    ChannelJoined {
        job_id: JobId,
    },
    ChannelFailed {
        job_id: JobId,
        error: ChannelError,
    },
    SubmitFailed {
        job_id: JobId,
        error: SubmitError,
    },
    Notification {
        job_id: JobId,
        notification: Notification,
    },
    SearchCompleted {
        ticket: SearchTicket,
        outcome: SearchOutcome,
    },
    SearchFailed {
        ticket: SearchTicket,
        error: SubmitError,
    },
}

impl ClientEvent {
    /// The reducer message this event feeds.
    pub fn into_msg(self) -> Msg {
        match self {
            ClientEvent::ChannelJoined { job_id } => Msg::ChannelJoined { job_id },
            ClientEvent::ChannelFailed { job_id, error } => Msg::ChannelFailed {
                job_id,
                reason: error.to_string(),
            },
            ClientEvent::SubmitFailed { job_id, error } => Msg::SubmitFailed {
                job_id,
                reason: error.to_string(),
            },
            ClientEvent::Notification {
                job_id,
                notification,
            } => Msg::Notification {
                job_id,
                notification,
            },
            ClientEvent::SearchCompleted { ticket, outcome } => {
                Msg::SearchCompleted { ticket, outcome }
            }
            ClientEvent::SearchFailed { ticket, error } => Msg::SearchFailed {
                ticket,
                reason: error.to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    #[error("invalid socket endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("socket connect failed: {0}")]
    Connect(String),
    #[error("socket send failed: {0}")]
    Send(String),
    #[error("socket closed")]
    Closed,
}

/// The `SubmissionFailed` condition. Never retried.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("invalid endpoint: {0}")]
    InvalidUrl(String),
    #[error("timeout: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("invalid response body: {0}")]
    Decode(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("malformed json: {0}")]
    Json(String),
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("unexpected socket event: {0}")]
    UnexpectedEvent(String),
}

impl From<serde_json::Error> for WireError {
    fn from(err: serde_json::Error) -> Self {
        WireError::Json(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error(transparent)]
    Channel(#[from] ChannelError),
    #[error(transparent)]
    Submit(#[from] SubmitError),
}

pub trait EventSink: Send + Sync {
    fn emit(&self, event: ClientEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<ClientEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<ClientEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: ClientEvent) {
        let _ = self.tx.send(event);
    }
}
