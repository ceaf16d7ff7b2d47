use std::time::Duration;

use datestream_client::{ClientEvent, ClientHandle};
use datestream_core::{Effect, Msg};
use datestream_logging::{ds_debug, ds_info, ds_warn};

/// Hands reducer effects to the client and turns its events back into messages.
pub struct EffectRunner {
    client: ClientHandle,
}

impl EffectRunner {
    pub fn new(client: ClientHandle) -> Self {
        Self { client }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in &effects {
            match effect {
                Effect::StartExtraction { job_id, urls } => {
                    ds_info!(job: job_id, "StartExtraction url_count={}", urls.len());
                }
                Effect::LeaveChannel { job_id } => ds_debug!(job: job_id, "LeaveChannel"),
                Effect::SubmitSearch {
                    ticket,
                    urls,
                    search_term,
                } => {
                    ds_info!(
                        "SubmitSearch {} url_count={} term={:?}",
                        ticket,
                        urls.len(),
                        search_term
                    );
                }
            }
        }
        self.client.execute(effects);
    }

    /// Waits up to `timeout` for the next client event.
    pub fn next_msg(&self, timeout: Duration) -> Option<Msg> {
        let event = self.client.recv_timeout(timeout)?;
        match &event {
            ClientEvent::ChannelFailed { job_id, error } => {
                ds_warn!(job: job_id, "channel failed: {}", error);
            }
            ClientEvent::SubmitFailed { job_id, error } => {
                ds_warn!(job: job_id, "submission failed: {}", error);
            }
            ClientEvent::SearchFailed { ticket, error } => {
                ds_warn!("{} failed: {}", ticket, error);
            }
            _ => {}
        }
        Some(event.into_msg())
    }

    pub fn shutdown(self) {
        self.client.shutdown();
    }
}
