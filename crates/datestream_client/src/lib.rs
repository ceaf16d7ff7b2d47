//! Datestream client: channel binding, job submission and wire codecs.
mod channel;
mod client;
mod runner;
mod sanitize;
mod submit;
mod types;
mod wire;

pub use channel::{AmberSocket, ChannelBinder, ChannelBinding, ChannelTransport, PushFrame};
pub use client::{ClientHandle, ClientSettings};
pub use runner::JobRunner;
pub use sanitize::sanitize_snippet;
pub use submit::{JobSubmitter, ReqwestSubmitter, SubmitSettings, REQUEST_ID_HEADER};
pub use types::{
    ChannelError, ChannelEventSink, ClientError, ClientEvent, EventSink, SubmitError, WireError,
};
pub use wire::{decode_notification, SocketFrame, MESSAGE_SUBJECT};
