//! Native transport — `tokio-tungstenite`.
//!
//! Owns the socket for one user-data stream and feeds text frames to a
//! [`Dispatcher`] from a single background task, preserving arrival
//! order. Handles protocol-level ping/pong and reconnects with
//! exponential backoff and jitter until the configured attempts run out.
//!
//! Listen-key acquisition and keepalive are REST concerns and live
//! outside this crate; the client takes the key as an opaque token.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{info, warn};

use crate::error::WsError;
use crate::shared::ListenKey;
use crate::ws::dispatcher::{Dispatcher, UserStreamHandler};
use crate::ws::WsConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

// ─── Commands from public API to background task ─────────────────────────────

enum Command {
    Disconnect,
}

// ─── Disconnect reasons for the reconnection decision ────────────────────────

enum DisconnectReason {
    UserRequested,
    ServerClose { code: Option<u16>, reason: String },
    Error(String),
}

// ─── Background task state ───────────────────────────────────────────────────

struct TaskState<H> {
    config: WsConfig,
    listen_key: ListenKey,
    cmd_rx: mpsc::Receiver<Command>,
    dispatcher: Dispatcher<H>,
    reconnect_attempts: u32,
}

impl<H> TaskState<H> {
    fn should_reconnect(&self) -> bool {
        self.config.reconnect && self.reconnect_attempts < self.config.max_reconnect_attempts
    }
}

// ─── Public client ───────────────────────────────────────────────────────────

/// Drives one user-data stream connection.
///
/// `connect` hands a [`Dispatcher`] to a background tokio task; the
/// task calls the dispatcher's lifecycle hooks inline from its read
/// loop, so frame handling keeps the at-most-one-in-flight guarantee.
pub struct UserStreamClient {
    config: WsConfig,
    listen_key: ListenKey,
    cmd_tx: Option<mpsc::Sender<Command>>,
    task_handle: Option<JoinHandle<()>>,
}

impl UserStreamClient {
    /// Create a new client. Does not connect yet.
    pub fn new(listen_key: ListenKey, config: WsConfig) -> Self {
        Self {
            config,
            listen_key,
            cmd_tx: None,
            task_handle: None,
        }
    }

    /// Connect and start delivering frames to `dispatcher`.
    ///
    /// The dispatcher moves into the background task and stays there
    /// for the life of the connection, across reconnects.
    pub fn connect<H>(&mut self, dispatcher: Dispatcher<H>) -> Result<(), WsError>
    where
        H: UserStreamHandler + Send + 'static,
    {
        if self.cmd_tx.is_some() {
            return Err(WsError::AlreadyConnected);
        }

        let (cmd_tx, cmd_rx) = mpsc::channel(8);
        self.cmd_tx = Some(cmd_tx);

        let state = TaskState {
            config: self.config.clone(),
            listen_key: self.listen_key.clone(),
            cmd_rx,
            dispatcher,
            reconnect_attempts: 0,
        };

        self.task_handle = Some(tokio::spawn(run_task(state)));
        Ok(())
    }

    /// Close the connection gracefully and wait for the task to finish.
    pub async fn disconnect(&mut self) -> Result<(), WsError> {
        let tx = self.cmd_tx.take().ok_or(WsError::NotConnected)?;
        let _ = tx.send(Command::Disconnect).await;

        if let Some(handle) = self.task_handle.take() {
            let _ = tokio::time::timeout(Duration::from_secs(5), handle).await;
        }
        Ok(())
    }

    /// Whether a background task is currently driving the stream.
    pub fn is_running(&self) -> bool {
        self.cmd_tx.is_some()
    }
}

impl Drop for UserStreamClient {
    fn drop(&mut self) {
        if let Some(handle) = self.task_handle.take() {
            handle.abort();
        }
    }
}

// ─── Background task ─────────────────────────────────────────────────────────

async fn run_task<H: UserStreamHandler>(mut state: TaskState<H>) {
    loop {
        // ── 1. Attempt connection ────────────────────────────────────────
        let url = format!("{}/ws/{}", state.config.base_url, state.listen_key);
        let stream = match attempt_connect(&url).await {
            Ok(stream) => stream,
            Err(e) => {
                state.dispatcher.on_transport_error(&e);
                if state.should_reconnect() {
                    backoff_sleep(&mut state).await;
                    continue;
                }
                state.dispatcher.on_closed();
                return;
            }
        };

        // ── 2. Connected ─────────────────────────────────────────────────
        state.reconnect_attempts = 0;
        state.dispatcher.on_connected();

        // ── 3. Read loop, then decide ────────────────────────────────────
        match run_connected(&mut state, stream).await {
            DisconnectReason::UserRequested => {
                state.dispatcher.on_closed();
                return;
            }
            DisconnectReason::ServerClose { code, reason } => {
                state.dispatcher.on_transport_error(&WsError::Closed { code, reason });
            }
            DisconnectReason::Error(reason) => {
                state.dispatcher.on_transport_error(&reason);
            }
        }

        if !state.should_reconnect() {
            state.dispatcher.on_closed();
            return;
        }
        backoff_sleep(&mut state).await;
    }
}

/// The inner connected loop — runs until the connection breaks.
async fn run_connected<H: UserStreamHandler>(
    state: &mut TaskState<H>,
    stream: WsStream,
) -> DisconnectReason {
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            // ── a) Incoming WS message ───────────────────────────────────
            msg = source.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        let text_str: &str = text.as_ref();
                        state.dispatcher.on_text_frame(text_str);
                    }
                    Some(Ok(Message::Ping(data))) => {
                        if let Err(e) = sink.send(Message::Pong(data)).await {
                            warn!("failed to answer ping: {}", e);
                        }
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let (code, reason) = match frame {
                            Some(f) => (Some(u16::from(f.code)), f.reason.to_string()),
                            None => (None, String::new()),
                        };
                        return DisconnectReason::ServerClose { code, reason };
                    }
                    Some(Ok(_)) => {} // Binary, Pong, Frame — ignore
                    Some(Err(e)) => {
                        return DisconnectReason::Error(e.to_string());
                    }
                    None => {
                        return DisconnectReason::Error("stream ended".into());
                    }
                }
            }

            // ── b) Command from public API ───────────────────────────────
            cmd = state.cmd_rx.recv() => {
                match cmd {
                    // None means the client was dropped — same clean exit.
                    Some(Command::Disconnect) | None => {
                        let _ = sink.send(Message::Close(None)).await;
                        return DisconnectReason::UserRequested;
                    }
                }
            }
        }
    }
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

/// Attempt to establish a WebSocket connection with a 30-second timeout.
async fn attempt_connect(url: &str) -> Result<WsStream, WsError> {
    let (stream, _) = tokio::time::timeout(Duration::from_secs(30), connect_async(url))
        .await
        .map_err(|_| WsError::ConnectionFailed("connection timeout".into()))?
        .map_err(|e| WsError::ConnectionFailed(e.to_string()))?;
    Ok(stream)
}

// ─── Reconnection backoff ────────────────────────────────────────────────────

async fn backoff_sleep<H>(state: &mut TaskState<H>) {
    state.reconnect_attempts += 1;

    let exp = (state.reconnect_attempts - 1).min(10);
    let base = state.config.base_reconnect_delay_ms.saturating_mul(1u32 << exp);
    let jitter = rand::random::<u32>() % 500;
    let delay = base.saturating_add(jitter).min(60_000);

    info!(
        "reconnect attempt {}/{} in {}ms",
        state.reconnect_attempts, state.config.max_reconnect_attempts, delay
    );

    tokio::time::sleep(Duration::from_millis(delay as u64)).await;
}

// ─── Tests ───────────────────────────────────────────────────────────────────
