//! Live-update WebSocket channel.
//!
//! Connects to a server pushing [`LiveSnapshot`] JSON frames and forwards them
//! through an mpsc channel. Connection loss is reported, then retried with
//! exponential backoff until the feed is closed.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use tokio::time::interval;
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use tracing::{debug, info, warn};
use types::LiveSnapshot;

use crate::StreamError;

/// Configuration for the live channel.
#[derive(Debug, Clone)]
pub struct LiveFeedConfig {
    /// WebSocket URL, e.g. `ws://localhost:8000/ws/simulation`.
    pub url: String,
    /// Connection timeout.
    pub connect_timeout: Duration,
    /// Keepalive ping interval.
    pub ping_interval: Duration,
    /// First reconnect delay; doubles on each failure.
    pub reconnect_delay: Duration,
    /// Reconnect delay cap.
    pub max_reconnect_delay: Duration,
    /// Channel buffer size.
    pub buffer_size: usize,
}

impl LiveFeedConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            connect_timeout: Duration::from_secs(10),
            ping_interval: Duration::from_secs(30),
            reconnect_delay: Duration::from_secs(1),
            max_reconnect_delay: Duration::from_secs(30),
            buffer_size: 256,
        }
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }
}

/// What the live channel delivers to its consumer.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveMessage {
    /// A session was established.
    Connected,
    /// Authoritative stock values for one warehouse.
    Snapshot(LiveSnapshot),
    /// The session ended; local simulation should take over.
    Disconnected(StreamError),
}

/// Handle to a running live channel.
///
/// Dropping the handle without [`LiveFeed::close`] aborts the background task.
pub struct LiveFeed {
    rx: mpsc::Receiver<LiveMessage>,
    shutdown_tx: broadcast::Sender<()>,
    handle: Option<JoinHandle<()>>,
}

impl LiveFeed {
    /// Spawn the connection task.
    pub fn connect(config: LiveFeedConfig) -> Self {
        let (tx, rx) = mpsc::channel(config.buffer_size);
        let (shutdown_tx, shutdown_rx) = broadcast::channel(1);
        let handle = tokio::spawn(run_connection(config, tx, shutdown_rx));
        Self {
            rx,
            shutdown_tx,
            handle: Some(handle),
        }
    }

    /// Next message, or `None` once the task has ended.
    pub async fn recv(&mut self) -> Option<LiveMessage> {
        self.rx.recv().await
    }

    /// Signal shutdown and wait for the connection task to finish.
    pub async fn close(mut self) {
        let _ = self.shutdown_tx.send(());
        if let Some(mut handle) = self.handle.take()
            && tokio::time::timeout(Duration::from_secs(2), &mut handle)
                .await
                .is_err()
        {
            handle.abort();
        }
        info!("Live feed closed");
    }
}

impl Drop for LiveFeed {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn run_connection(
    config: LiveFeedConfig,
    tx: mpsc::Sender<LiveMessage>,
    mut shutdown: broadcast::Receiver<()>,
) {
    let mut reconnect_delay = config.reconnect_delay;

    loop {
        match run_session(&config, &tx, &mut shutdown).await {
            Ok(()) => {
                info!("Live feed: clean shutdown");
                return;
            }
            Err(e) => {
                warn!(url = %config.url, error = %e, "Live feed disconnected, falling back to local simulation");
                if tx.send(LiveMessage::Disconnected(e)).await.is_err() {
                    return;
                }

                tokio::select! {
                    _ = tokio::time::sleep(reconnect_delay) => {}
                    _ = shutdown.recv() => {
                        info!("Live feed: shutdown during reconnect");
                        return;
                    }
                }

                reconnect_delay = (reconnect_delay * 2).min(config.max_reconnect_delay);
            }
        }
    }
}

/// Run a single WebSocket session. `Ok` means shutdown was requested.
async fn run_session(
    config: &LiveFeedConfig,
    tx: &mpsc::Sender<LiveMessage>,
    shutdown: &mut broadcast::Receiver<()>,
) -> Result<(), StreamError> {
    info!(url = %config.url, "Connecting to live feed");

    let connect_result =
        tokio::time::timeout(config.connect_timeout, connect_async(config.url.as_str())).await;

    let (ws_stream, _) = match connect_result {
        Ok(Ok(pair)) => pair,
        Ok(Err(e)) => return Err(StreamError::Connect(e.to_string())),
        Err(_) => return Err(StreamError::Timeout),
    };

    if tx.send(LiveMessage::Connected).await.is_err() {
        return Ok(());
    }
    info!("Connected to live feed");

    let (mut write, mut read) = ws_stream.split();
    let mut ping_timer = interval(config.ping_interval);
    ping_timer.tick().await;

    loop {
        tokio::select! {
            msg = read.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<LiveSnapshot>(&text) {
                            Ok(snapshot) => {
                                if tx.send(LiveMessage::Snapshot(snapshot)).await.is_err() {
                                    return Ok(());
                                }
                            }
                            Err(e) => {
                                // Bad frames are skipped; the session stays up.
                                warn!(error = %StreamError::Decode(e.to_string()), "Skipping live frame");
                            }
                        }
                    }
                    Some(Ok(Message::Ping(data))) => {
                        write
                            .send(Message::Pong(data))
                            .await
                            .map_err(|e| StreamError::Protocol(e.to_string()))?;
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        return Err(StreamError::Closed);
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        return Err(StreamError::Protocol(e.to_string()));
                    }
                }
            }
            _ = ping_timer.tick() => {
                debug!("Live feed ping");
                write
                    .send(Message::Ping(Vec::new().into()))
                    .await
                    .map_err(|e| StreamError::Protocol(e.to_string()))?;
            }
            _ = shutdown.recv() => {
                let _ = write.send(Message::Close(None)).await;
                return Ok(());
            }
        }
    }
}
