use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use datestream_core::{Effect, JobId, SearchTicket};
use datestream_logging::{ds_debug, ds_error, ds_warn};
use url::Url;

use crate::channel::{AmberSocket, ChannelTransport};
use crate::runner::JobRunner;
use crate::submit::{JobSubmitter, ReqwestSubmitter, SubmitSettings};
use crate::{ChannelEventSink, ClientError, ClientEvent};

/// How long shutdown waits for commands still in flight.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub submit: SubmitSettings,
    pub socket_path: String,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            submit: SubmitSettings::default(),
            socket_path: "/frontend".to_string(),
        }
    }
}

impl ClientSettings {
    pub fn socket_url(&self) -> Result<Url, ClientError> {
        Ok(AmberSocket::endpoint(
            &self.submit.base_url,
            &self.socket_path,
        )?)
    }
}

enum ClientCommand {
    StartExtraction { job_id: JobId, urls: Vec<String> },
    LeaveChannel { job_id: JobId },
    Search {
        ticket: SearchTicket,
        urls: Vec<String>,
        search_term: String,
    },
}

/// Owns the async runtime on a background thread and executes reducer effects.
///
/// Events come back through a single ordered queue, so a job's notifications
/// are observed in the order they were delivered on its channel.
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
    worker: thread::JoinHandle<()>,
}

impl ClientHandle {
    /// Connects the socket up front; jobs bind topics on this connection.
    pub fn connect(settings: ClientSettings) -> Result<Self, ClientError> {
        let runtime = tokio::runtime::Runtime::new()?;
        let socket_url = settings.socket_url()?;
        let socket = runtime.block_on(AmberSocket::connect(&socket_url))?;
        let submitter = ReqwestSubmitter::new(settings.submit)?;
        Ok(Self::with_parts(
            runtime,
            Arc::new(socket),
            Arc::new(submitter),
        ))
    }

    pub fn with_parts(
        runtime: tokio::runtime::Runtime,
        transport: Arc<dyn ChannelTransport>,
        submitter: Arc<dyn JobSubmitter>,
    ) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink = Arc::new(ChannelEventSink::new(event_tx));
        let runner = Arc::new(JobRunner::new(transport, submitter, sink));

        let worker = thread::spawn(move || {
            let mut in_flight: Vec<tokio::task::JoinHandle<()>> = Vec::new();
            while let Ok(command) = cmd_rx.recv() {
                in_flight.retain(|task| !task.is_finished());
                let runner = runner.clone();
                in_flight.push(runtime.spawn(async move {
                    handle_command(runner.as_ref(), command).await;
                }));
            }
            // A final leave is usually still on its way to the socket.
            let drained = runtime.block_on(tokio::time::timeout(
                SHUTDOWN_GRACE,
                futures_util::future::join_all(in_flight),
            ));
            if drained.is_err() {
                ds_warn!("client stopped with commands still in flight");
            }
            ds_debug!("client command loop finished");
        });

        Self {
            cmd_tx,
            event_rx,
            worker,
        }
    }

    /// Translates reducer effects into client commands.
    pub fn execute(&self, effects: Vec<Effect>) {
        for effect in effects {
            let command = match effect {
                Effect::StartExtraction { job_id, urls } => {
                    ClientCommand::StartExtraction { job_id, urls }
                }
                Effect::LeaveChannel { job_id } => ClientCommand::LeaveChannel { job_id },
                Effect::SubmitSearch {
                    ticket,
                    urls,
                    search_term,
                } => ClientCommand::Search {
                    ticket,
                    urls,
                    search_term,
                },
            };
            let _ = self.cmd_tx.send(command);
        }
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    /// Stops accepting effects and waits for those already issued to finish.
    pub fn shutdown(self) {
        let Self { cmd_tx, worker, .. } = self;
        drop(cmd_tx);
        if worker.join().is_err() {
            ds_error!("client worker panicked");
        }
    }
}

async fn handle_command(runner: &JobRunner, command: ClientCommand) {
    match command {
        ClientCommand::StartExtraction { job_id, urls } => {
            runner.start_extraction(job_id, urls).await;
        }
        ClientCommand::LeaveChannel { job_id } => runner.leave(job_id).await,
        ClientCommand::Search {
            ticket,
            urls,
            search_term,
        } => runner.search(ticket, urls, search_term).await,
    }
}
