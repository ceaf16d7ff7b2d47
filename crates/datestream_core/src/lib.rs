//! Datestream core: pure job/result correlation state machine and view-model helpers.
mod effect;
mod input;
mod job;
mod msg;
mod notification;
mod render;
mod state;
mod status;
mod update;
mod view_model;

pub use effect::Effect;
pub use input::{normalize_urls, InputError, JobKind, JobRequest};
pub use job::{JobId, ParseJobIdError, SearchTicket, TOPIC_PREFIX};
pub use msg::Msg;
pub use notification::{
    ExtractionOutcome, ExtractionResult, Notification, RichSpan, RichText, SearchHit,
    SearchOutcome, Timing,
};
pub use render::{
    format_date, format_ms, render_extraction_row, render_search_block, shorten_url,
    ExtractionRow, Link, ResultCell, SearchBlock, EXTRACTION_COLUMNS, NO_SNIPPET_TEXT,
};
pub use state::{AppState, JobPhase};
pub use status::{StatusIndicator, StatusPhase};
pub use update::update;
pub use view_model::{AppViewModel, ResultsViewModel};
