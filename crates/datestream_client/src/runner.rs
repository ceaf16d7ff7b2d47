use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use datestream_core::{JobId, SearchTicket};
use datestream_logging::{ds_debug, ds_info, ds_warn};

use crate::channel::{ChannelBinder, ChannelBinding, ChannelTransport, PushQueue};
use crate::wire::{decode_notification, MESSAGE_SUBJECT};
use crate::{ChannelError, ClientEvent, EventSink, JobSubmitter};

/// Executes jobs against a transport and a submitter, reporting every step to
/// the sink. Must be driven from inside a tokio runtime.
pub struct JobRunner {
    binder: ChannelBinder,
    submitter: Arc<dyn JobSubmitter>,
    bindings: Arc<Mutex<HashMap<JobId, Arc<ChannelBinding>>>>,
    sink: Arc<dyn EventSink>,
}

impl JobRunner {
    pub fn new(
        transport: Arc<dyn ChannelTransport>,
        submitter: Arc<dyn JobSubmitter>,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        Self {
            binder: ChannelBinder::new(transport),
            submitter,
            bindings: Arc::default(),
            sink,
        }
    }

    /// Binds the job's channel, then submits. The POST is never issued before
    /// the join has completed.
    pub async fn start_extraction(&self, job_id: JobId, urls: Vec<String>) {
        let (binding, queue) = match self.binder.bind(job_id).await {
            Ok(bound) => bound,
            Err(error) => {
                ds_warn!(job: job_id, "channel join failed: {}", error);
                self.sink.emit(ClientEvent::ChannelFailed { job_id, error });
                return;
            }
        };

        let binding = Arc::new(binding);
        if let Ok(mut bindings) = self.bindings.lock() {
            bindings.insert(job_id, binding.clone());
        }
        self.sink.emit(ClientEvent::ChannelJoined { job_id });

        // The stream is drained independently of the acknowledgement.
        tokio::spawn(forward_notifications(
            binding,
            queue,
            self.sink.clone(),
            self.bindings.clone(),
        ));

        if let Err(error) = self.submitter.submit_extraction(job_id, &urls).await {
            ds_warn!(job: job_id, "submission failed: {}", error);
            self.sink.emit(ClientEvent::SubmitFailed { job_id, error });
        }
    }

    /// Releases the job's binding. Unknown or already released jobs are a no-op.
    pub async fn leave(&self, job_id: JobId) {
        let binding = self
            .bindings
            .lock()
            .ok()
            .and_then(|mut bindings| bindings.remove(&job_id));
        match binding {
            Some(binding) => {
                let _ = binding.leave().await;
            }
            None => ds_debug!(job: job_id, "no binding to leave"),
        }
    }

    pub async fn search(&self, ticket: SearchTicket, urls: Vec<String>, search_term: String) {
        let event = match self.submitter.submit_search(&urls, &search_term).await {
            Ok(outcome) => {
                ds_info!("{} returned {} hits", ticket, outcome.hits.len());
                ClientEvent::SearchCompleted { ticket, outcome }
            }
            Err(error) => {
                ds_warn!("{} failed: {}", ticket, error);
                ClientEvent::SearchFailed { ticket, error }
            }
        };
        self.sink.emit(event);
    }

    pub fn active_bindings(&self) -> usize {
        self.bindings.lock().map(|b| b.len()).unwrap_or(0)
    }
}

/// Single consumer of one job's queue: decodes in delivery order and stops
/// after the first terminal notification.
async fn forward_notifications(
    binding: Arc<ChannelBinding>,
    mut queue: PushQueue,
    sink: Arc<dyn EventSink>,
    bindings: Arc<Mutex<HashMap<JobId, Arc<ChannelBinding>>>>,
) {
    let job_id = binding.job_id();
    while let Some(frame) = queue.recv().await {
        if frame.subject != MESSAGE_SUBJECT {
            ds_debug!(job: job_id, "ignoring subject {}", frame.subject);
            continue;
        }
        let notification = match decode_notification(&frame.payload) {
            Ok(notification) => notification,
            Err(err) => {
                ds_warn!(job: job_id, "dropping malformed notification: {}", err);
                continue;
            }
        };
        ds_debug!(job: job_id, "notification {:?}", notification);
        let terminal = notification.is_terminal();
        sink.emit(ClientEvent::Notification {
            job_id,
            notification,
        });
        if terminal {
            return;
        }
    }

    // Queue closed without a terminal: the subscription is gone.
    if binding.is_left() {
        return;
    }
    binding.mark_left();
    if let Ok(mut bindings) = bindings.lock() {
        bindings.remove(&job_id);
    }
    ds_warn!(job: job_id, "result stream ended before a terminal notification");
    sink.emit(ClientEvent::ChannelFailed {
        job_id,
        error: ChannelError::Closed,
    });
}
