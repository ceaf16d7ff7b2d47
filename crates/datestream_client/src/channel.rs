use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use datestream_core::JobId;
use datestream_logging::{ds_debug, ds_error, ds_info, ds_warn};
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::wire::SocketFrame;
use crate::ChannelError;

/// A server push routed to one topic's queue.
#[derive(Debug, Clone, PartialEq)]
pub struct PushFrame {
    pub subject: String,
    pub payload: serde_json::Value,
}

/// Single-consumer queue of pushes for one topic, in delivery order.
pub type PushQueue = mpsc::UnboundedReceiver<PushFrame>;

/// Pub/sub transport the binder joins topics on.
#[async_trait::async_trait]
pub trait ChannelTransport: Send + Sync {
    /// Subscribes to `topic`. Returns only once the join has been handed to the
    /// transport, so a request sent afterwards cannot outrun the subscription.
    async fn join(&self, topic: &str) -> Result<PushQueue, ChannelError>;

    /// Unsubscribes from `topic`. Leaving a topic that is not joined is a no-op.
    async fn leave(&self, topic: &str) -> Result<(), ChannelError>;
}

type Subscribers = Arc<Mutex<HashMap<String, mpsc::UnboundedSender<PushFrame>>>>;
type SocketSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// WebSocket client for an Amber-style socket endpoint.
///
/// One connection multiplexes every topic; a reader task routes `message`
/// frames to the queue registered for their topic.
pub struct AmberSocket {
    writer: tokio::sync::Mutex<SocketSink>,
    subscribers: Subscribers,
    reader: JoinHandle<()>,
}

impl AmberSocket {
    /// Derives the socket URL from the HTTP server URL (`http`→`ws`, `https`→`wss`).
    pub fn endpoint(server_url: &Url, socket_path: &str) -> Result<Url, ChannelError> {
        let mut url = server_url
            .join(socket_path)
            .map_err(|err| ChannelError::InvalidEndpoint(err.to_string()))?;
        let scheme = match url.scheme() {
            "http" | "ws" => "ws",
            "https" | "wss" => "wss",
            other => {
                return Err(ChannelError::InvalidEndpoint(format!(
                    "unsupported scheme {other}"
                )))
            }
        };
        url.set_scheme(scheme)
            .map_err(|_| ChannelError::InvalidEndpoint(url.to_string()))?;
        Ok(url)
    }

    pub async fn connect(url: &Url) -> Result<Self, ChannelError> {
        ds_info!("connecting socket {}", url);
        let (stream, _response) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(|err| ChannelError::Connect(err.to_string()))?;
        let (sink, mut source) = stream.split();

        let subscribers: Subscribers = Arc::default();
        let routes = subscribers.clone();
        let reader = tokio::spawn(async move {
            while let Some(message) = source.next().await {
                match message {
                    Ok(Message::Text(text)) => route_frame(&routes, &text),
                    Ok(Message::Close(frame)) => {
                        ds_info!("socket closed by server: {:?}", frame);
                        break;
                    }
                    Ok(_) => {}
                    Err(err) => {
                        ds_error!("socket read failed: {}", err);
                        break;
                    }
                }
            }
            // Dropping the senders ends every open queue.
            if let Ok(mut routes) = routes.lock() {
                routes.clear();
            }
        });

        Ok(Self {
            writer: tokio::sync::Mutex::new(sink),
            subscribers,
            reader,
        })
    }

    async fn send_frame(&self, frame: &SocketFrame) -> Result<(), ChannelError> {
        let text = frame
            .to_text()
            .map_err(|err| ChannelError::Send(err.to_string()))?;
        let mut writer = self.writer.lock().await;
        writer
            .send(Message::Text(text))
            .await
            .map_err(|err| ChannelError::Send(err.to_string()))
    }

    fn unsubscribe(&self, topic: &str) -> bool {
        self.subscribers
            .lock()
            .map(|mut subs| subs.remove(topic).is_some())
            .unwrap_or(false)
    }
}

impl Drop for AmberSocket {
    fn drop(&mut self) {
        self.reader.abort();
    }
}

fn route_frame(routes: &Subscribers, text: &str) {
    let frame = match SocketFrame::from_text(text) {
        Ok(frame) => frame,
        Err(err) => {
            ds_debug!("ignoring socket frame: {}", err);
            return;
        }
    };
    let SocketFrame::Message {
        topic,
        subject,
        payload,
    } = frame
    else {
        ds_debug!("ignoring non-message frame");
        return;
    };

    let Ok(routes) = routes.lock() else {
        return;
    };
    match routes.get(&topic) {
        Some(tx) => {
            if tx.send(PushFrame { subject, payload }).is_err() {
                ds_debug!("queue for {} already closed", topic);
            }
        }
        None => ds_debug!("no subscriber for {}", topic),
    }
}

#[async_trait::async_trait]
impl ChannelTransport for AmberSocket {
    async fn join(&self, topic: &str) -> Result<PushQueue, ChannelError> {
        if self.reader.is_finished() {
            return Err(ChannelError::Closed);
        }
        // Register before sending so nothing pushed right after the join is lost.
        let (tx, rx) = mpsc::unbounded_channel();
        if let Ok(mut subs) = self.subscribers.lock() {
            subs.insert(topic.to_string(), tx);
        }
        let frame = SocketFrame::Join {
            topic: topic.to_string(),
        };
        if let Err(err) = self.send_frame(&frame).await {
            self.unsubscribe(topic);
            return Err(err);
        }
        ds_info!("joined {}", topic);
        Ok(rx)
    }

    async fn leave(&self, topic: &str) -> Result<(), ChannelError> {
        if !self.unsubscribe(topic) {
            ds_debug!("leave of {} ignored, not joined", topic);
            return Ok(());
        }
        let frame = SocketFrame::Leave {
            topic: topic.to_string(),
        };
        self.send_frame(&frame).await?;
        ds_info!("left {}", topic);
        Ok(())
    }
}

/// Opens the per-job subscription ahead of submission.
#[derive(Clone)]
pub struct ChannelBinder {
    transport: Arc<dyn ChannelTransport>,
}

impl ChannelBinder {
    pub fn new(transport: Arc<dyn ChannelTransport>) -> Self {
        Self { transport }
    }

    pub async fn bind(&self, job_id: JobId) -> Result<(ChannelBinding, PushQueue), ChannelError> {
        let topic = job_id.topic();
        let queue = self.transport.join(&topic).await?;
        let binding = ChannelBinding {
            job_id,
            topic,
            transport: self.transport.clone(),
            left: AtomicBool::new(false),
        };
        Ok((binding, queue))
    }
}

/// A live association between one job id and its subscription.
pub struct ChannelBinding {
    job_id: JobId,
    topic: String,
    transport: Arc<dyn ChannelTransport>,
    left: AtomicBool,
}

impl ChannelBinding {
    pub fn job_id(&self) -> JobId {
        self.job_id
    }

    pub fn is_left(&self) -> bool {
        self.left.load(Ordering::Acquire)
    }

    /// Releases the subscription. Only the first call reaches the transport.
    pub async fn leave(&self) -> Result<(), ChannelError> {
        if self.left.swap(true, Ordering::AcqRel) {
            ds_debug!(job: self.job_id, "channel already left");
            return Ok(());
        }
        self.transport.leave(&self.topic).await.inspect_err(|err| {
            ds_warn!(job: self.job_id, "leave of {} failed: {}", self.topic, err);
        })
    }

    /// Marks the binding as gone without telling the transport (socket lost).
    pub(crate) fn mark_left(&self) {
        self.left.store(true, Ordering::Release);
    }
}
