//! WebSocket connection and event loop.
//!
//! This module owns the single channel to the Painter QML plugin, including
//! request/response correlation and event routing.
//!
//! # Event Loop
//!
//! The connection spawns a tokio task that handles:
//!
//! - Inbound messages from Painter (replies, pushed events)
//! - Outbound commands and notifications from the Rust API
//! - Request/response correlation by [`RequestId`]
//! - Event fan-out through the [`EventRouter`]
//!
//! Correlation ids, not arrival order, determine which waiter a reply
//! releases; Painter may answer concurrent requests out of order. While one
//! caller awaits its reply the loop keeps servicing everything else, so a
//! slow request never stalls unrelated event delivery.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use serde_json::to_string;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::time::timeout;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error, trace, warn};

use crate::error::{Error, Result};
use crate::identifiers::RequestId;
use crate::protocol::{Command, Incoming, Notification, RequestEnvelope, ResponseEnvelope};

use super::events::{EventCallback, EventRouter, EventWait, Subscription, dispatch_event};

// ============================================================================
// Constants
// ============================================================================

/// Maximum pending requests before rejecting new ones.
const MAX_PENDING_REQUESTS: usize = 100;

// ============================================================================
// Types
// ============================================================================

/// Map of request IDs to reply channels.
type CorrelationMap = FxHashMap<RequestId, oneshot::Sender<Result<ResponseEnvelope>>>;

// ============================================================================
// ConnectionState
// ============================================================================

/// Lifecycle state of the channel to the host.
///
/// `Connecting` covers the [`Connector`](super::Connector) handshake phase;
/// a [`Connection`] starts in `Open`. `Closed` and `Errored` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Handshake in progress.
    Connecting,
    /// Channel established and serving traffic.
    Open,
    /// Local shutdown requested, flushing the close frame.
    Closing,
    /// Channel ended cleanly.
    Closed,
    /// Channel ended on a transport error.
    Errored,
}

impl ConnectionState {
    /// Returns `true` once the channel can carry no further traffic.
    #[inline]
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }
}

// ============================================================================
// LoopCommand
// ============================================================================

/// Internal commands for the event loop.
enum LoopCommand {
    /// Send a request and route its reply to `reply_tx`.
    Send {
        request_id: RequestId,
        envelope: RequestEnvelope,
        reply_tx: oneshot::Sender<Result<ResponseEnvelope>>,
    },
    /// Send a one-way notification.
    Notify { envelope: RequestEnvelope },
    /// Shutdown the connection.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// WebSocket connection to the Painter plugin.
///
/// Handles request/response correlation and event routing. The connection
/// spawns an internal event loop task; the handle is cheap to clone and all
/// operations are non-blocking apart from awaiting replies.
///
/// Loss of this channel is reported through [`Connection::watch_state`]; the
/// owning engine decides whether that is fatal (in the pipeline integration
/// it is, since the host process is the reason the bridge exists).
#[derive(Clone)]
pub struct Connection {
    /// Channel for sending commands to the event loop.
    command_tx: mpsc::UnboundedSender<LoopCommand>,
    /// Correlation map (shared with event loop).
    correlation: Arc<Mutex<CorrelationMap>>,
    /// Event subscription table (shared with event loop).
    router: Arc<Mutex<EventRouter>>,
    /// Lifecycle state published by the event loop.
    state_rx: watch::Receiver<ConnectionState>,
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("state", &self.state())
            .field("pending", &self.pending_count())
            .finish_non_exhaustive()
    }
}

impl Connection {
    /// Creates a connection from an established WebSocket stream.
    ///
    /// Spawns the event loop task internally.
    pub(crate) fn new<S>(ws_stream: WebSocketStream<S>) -> Self
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Open);
        let correlation = Arc::new(Mutex::new(CorrelationMap::default()));
        let router = Arc::new(Mutex::new(EventRouter::default()));

        tokio::spawn(Self::run_event_loop(
            ws_stream,
            command_rx,
            Arc::clone(&correlation),
            Arc::clone(&router),
            state_tx,
        ));

        Self {
            command_tx,
            correlation,
            router,
            state_rx,
        }
    }

    /// Sends a request and waits for the correlated reply.
    ///
    /// Exactly one of three outcomes occurs: the host's result value, a
    /// typed failure carrying the host's error payload, or a timeout. On
    /// timeout the pending entry is removed before returning, so a late
    /// reply for the same id is discarded as stale.
    ///
    /// # Errors
    ///
    /// - [`Error::ConnectionClosed`] if the channel is gone
    /// - [`Error::RequestTimeout`] if no reply arrives within `deadline`
    /// - [`Error::Remote`] if the host answered with an error payload
    /// - [`Error::Protocol`] if too many requests are pending
    pub async fn call(&self, command: Command, deadline: Duration) -> Result<serde_json::Value> {
        let method = command.method_name();

        {
            let correlation = self.correlation.lock();
            if correlation.len() >= MAX_PENDING_REQUESTS {
                warn!(
                    pending = correlation.len(),
                    max = MAX_PENDING_REQUESTS,
                    "Too many pending requests"
                );
                return Err(Error::protocol(format!(
                    "Too many pending requests: {}/{}",
                    correlation.len(),
                    MAX_PENDING_REQUESTS
                )));
            }
        }

        let request_id = RequestId::generate();
        let envelope = RequestEnvelope::call_with_id(command, request_id);
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(LoopCommand::Send {
                request_id,
                envelope,
                reply_tx,
            })
            .map_err(|_| Error::ConnectionClosed)?;

        match timeout(deadline, reply_rx).await {
            Ok(Ok(Ok(reply))) => reply.into_result(method),
            Ok(Ok(Err(e))) => Err(e),
            Ok(Err(_)) => Err(Error::ConnectionClosed),
            Err(_) => {
                // Entry removed here; a late reply for this id is stale.
                self.correlation.lock().remove(&request_id);
                Err(Error::request_timeout(
                    request_id,
                    deadline.as_millis() as u64,
                ))
            }
        }
    }

    /// Sends a one-way notification; returns immediately with no result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the channel is gone.
    pub fn notify(&self, notification: Notification) -> Result<()> {
        let envelope = RequestEnvelope::notify(notification);
        self.command_tx
            .send(LoopCommand::Notify { envelope })
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Registers a callback for a named host event.
    ///
    /// Callbacks for one event type fire in subscription order, from the
    /// event-loop task. The returned handle cancels exactly this entry.
    pub fn subscribe(&self, event: &str, callback: EventCallback) -> Subscription {
        let id = self.router.lock().subscribe(event, callback);
        Subscription {
            event: event.to_string(),
            id,
        }
    }

    /// Removes a subscription; returns `true` if it was still registered.
    pub fn unsubscribe(&self, subscription: Subscription) -> bool {
        self.router
            .lock()
            .unsubscribe(&subscription.event, subscription.id)
    }

    /// Installs a one-shot wait for the next event of the given type.
    ///
    /// The table entry exists from this point on, so a completion event
    /// cannot race a triggering call sent afterwards. First delivery
    /// resolves the wait and removes the entry.
    pub fn wait_for(&self, event: &str) -> EventWait {
        let (tx, rx) = oneshot::channel();
        let id = self.router.lock().subscribe_once(event, tx);
        EventWait::new(event.to_string(), id, Arc::clone(&self.router), rx)
    }

    /// Returns the current lifecycle state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        *self.state_rx.borrow()
    }

    /// Returns a watch on the lifecycle state.
    ///
    /// Owners that treat channel loss as fatal observe `Closed`/`Errored`
    /// here and react.
    #[must_use]
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state_rx.clone()
    }

    /// Waits until the connection reaches a terminal state.
    pub async fn closed(&self) -> ConnectionState {
        let mut state_rx = self.state_rx.clone();
        loop {
            let state = *state_rx.borrow_and_update();
            if state.is_terminal() {
                return state;
            }
            if state_rx.changed().await.is_err() {
                return ConnectionState::Closed;
            }
        }
    }

    /// Returns the number of pending requests.
    #[inline]
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.correlation.lock().len()
    }

    /// Shuts down the connection gracefully.
    ///
    /// Requests still pending resolve with [`Error::ConnectionClosed`].
    pub fn shutdown(&self) {
        let _ = self.command_tx.send(LoopCommand::Shutdown);
    }

    /// Event loop that handles WebSocket I/O.
    async fn run_event_loop<S>(
        ws_stream: WebSocketStream<S>,
        mut command_rx: mpsc::UnboundedReceiver<LoopCommand>,
        correlation: Arc<Mutex<CorrelationMap>>,
        router: Arc<Mutex<EventRouter>>,
        state_tx: watch::Sender<ConnectionState>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let (mut ws_write, mut ws_read) = ws_stream.split();
        let mut errored = false;

        loop {
            tokio::select! {
                // Inbound messages from Painter
                message = ws_read.next() => {
                    match message {
                        Some(Ok(Message::Text(text))) => {
                            Self::handle_incoming_message(&text, &correlation, &router);
                        }

                        Some(Ok(Message::Close(_))) => {
                            debug!("WebSocket closed by host");
                            break;
                        }

                        Some(Err(e)) => {
                            error!(error = %e, "WebSocket error");
                            errored = true;
                            break;
                        }

                        None => {
                            debug!("WebSocket stream ended");
                            break;
                        }

                        // Ignore Binary, Ping, Pong
                        _ => {}
                    }
                }

                // Commands from the Rust API
                command = command_rx.recv() => {
                    match command {
                        Some(LoopCommand::Send { request_id, envelope, reply_tx }) => {
                            Self::handle_send_command(
                                request_id,
                                envelope,
                                reply_tx,
                                &mut ws_write,
                                &correlation,
                            ).await;
                        }

                        Some(LoopCommand::Notify { envelope }) => {
                            Self::handle_notify_command(envelope, &mut ws_write).await;
                        }

                        Some(LoopCommand::Shutdown) => {
                            debug!("Shutdown command received");
                            let _ = state_tx.send(ConnectionState::Closing);
                            let _ = ws_write.close().await;
                            break;
                        }

                        None => {
                            debug!("Command channel closed");
                            break;
                        }
                    }
                }
            }
        }

        let final_state = if errored {
            ConnectionState::Errored
        } else {
            ConnectionState::Closed
        };
        let _ = state_tx.send(final_state);

        Self::fail_pending_requests(&correlation);
        router.lock().clear();

        debug!(state = ?final_state, "Event loop terminated");
    }

    /// Handles an inbound text message from the host.
    fn handle_incoming_message(
        text: &str,
        correlation: &Arc<Mutex<CorrelationMap>>,
        router: &Arc<Mutex<EventRouter>>,
    ) {
        match Incoming::parse(text) {
            Ok(Incoming::Reply(reply)) => {
                let tx = correlation.lock().remove(&reply.id);

                match tx {
                    Some(tx) => {
                        let _ = tx.send(Ok(reply));
                    }
                    None => warn!(id = %reply.id, "Discarding stale reply"),
                }
            }

            Ok(Incoming::Event(event)) => {
                trace!(method = %event.method, "Event received");
                dispatch_event(router, &event.method, &event.params);
            }

            Err(e) => {
                warn!(error = %e, "Dropping malformed message");
            }
        }
    }

    /// Handles a send command from the Rust API.
    async fn handle_send_command<S>(
        request_id: RequestId,
        envelope: RequestEnvelope,
        reply_tx: oneshot::Sender<Result<ResponseEnvelope>>,
        ws_write: &mut SplitSink<WebSocketStream<S>, Message>,
        correlation: &Arc<Mutex<CorrelationMap>>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        // The caller may have timed out while this command sat in the queue;
        // registering its correlation entry now would leak it until shutdown.
        if reply_tx.is_closed() {
            debug!(%request_id, "Dropping send for an abandoned request");
            return;
        }

        let json = match to_string(&envelope) {
            Ok(j) => j,
            Err(e) => {
                let _ = reply_tx.send(Err(Error::Json(e)));
                return;
            }
        };

        // Correlation registered before the frame leaves
        correlation.lock().insert(request_id, reply_tx);

        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
            if let Some(tx) = correlation.lock().remove(&request_id) {
                let _ = tx.send(Err(Error::connection(e.to_string())));
            }
            return;
        }

        trace!(%request_id, method = envelope.method_name(), "Request sent");
    }

    /// Handles a one-way notification.
    async fn handle_notify_command<S>(
        envelope: RequestEnvelope,
        ws_write: &mut SplitSink<WebSocketStream<S>, Message>,
    ) where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let json = match to_string(&envelope) {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "Failed to serialize notification");
                return;
            }
        };

        if let Err(e) = ws_write.send(Message::Text(json.into())).await {
            warn!(error = %e, method = envelope.method_name(), "Failed to send notification");
        }
    }

    /// Fails all pending requests with ConnectionClosed.
    fn fail_pending_requests(correlation: &Arc<Mutex<CorrelationMap>>) {
        let pending: Vec<_> = correlation.lock().drain().collect();
        let count = pending.len();

        for (_, tx) in pending {
            let _ = tx.send(Err(Error::ConnectionClosed));
        }

        if count > 0 {
            debug!(count, "Failed pending requests on shutdown");
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
