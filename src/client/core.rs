//! Core PainterClient struct and call plumbing.

use std::fmt;
use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::{Command, Notification};
use crate::transport::{Connection, Connector};

// ============================================================================
// Constants
// ============================================================================

/// Default deadline for one request/response round trip (5s, matching the
/// Painter plugin's expectations).
pub(crate) const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(5);

/// Default deadline for the map-export completion event. Exports of large
/// texture sets take minutes.
pub(crate) const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(300);

// ============================================================================
// PainterClient
// ============================================================================

/// High-level facade over the bridge connection.
///
/// Each method corresponds to one function the QML plugin exposes and hides
/// the request/response correlation behind plain async calls. The client is
/// cheap to clone; pass it to whatever needs Painter access instead of
/// stashing it in a global.
#[derive(Clone)]
pub struct PainterClient {
    pub(crate) connection: Connection,
    pub(crate) call_timeout: Duration,
    pub(crate) export_timeout: Duration,
}

impl fmt::Debug for PainterClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PainterClient")
            .field("state", &self.connection.state())
            .field("call_timeout", &self.call_timeout)
            .field("export_timeout", &self.export_timeout)
            .finish_non_exhaustive()
    }
}

impl PainterClient {
    /// Wraps an established connection.
    #[must_use]
    pub fn new(connection: Connection) -> Self {
        Self {
            connection,
            call_timeout: DEFAULT_CALL_TIMEOUT,
            export_timeout: DEFAULT_EXPORT_TIMEOUT,
        }
    }

    /// Connects to the plugin's WebSocket endpoint with default retries.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the handshake budget is exhausted.
    pub async fn connect(endpoint: &str) -> Result<Self> {
        Self::connect_with(&Connector::default(), endpoint).await
    }

    /// Connects with a custom retry policy.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] if the handshake budget is exhausted.
    pub async fn connect_with(connector: &Connector, endpoint: &str) -> Result<Self> {
        let connection = connector.connect(endpoint).await?;
        Ok(Self::new(connection))
    }

    /// Overrides the per-call timeout.
    #[must_use]
    pub fn with_call_timeout(mut self, timeout: Duration) -> Self {
        self.call_timeout = timeout;
        self
    }

    /// Overrides the export-completion timeout.
    #[must_use]
    pub fn with_export_timeout(mut self, timeout: Duration) -> Self {
        self.export_timeout = timeout;
        self
    }

    /// Returns the underlying connection.
    ///
    /// Use it for event subscriptions and lifecycle watching.
    #[inline]
    #[must_use]
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// Sends a command with the client's default timeout.
    pub(crate) async fn call(&self, command: Command) -> Result<Value> {
        self.connection.call(command, self.call_timeout).await
    }

    /// Sends a command with an explicit timeout for this call only.
    ///
    /// # Errors
    ///
    /// Same contract as [`Connection::call`].
    pub async fn call_with_timeout(&self, command: Command, timeout: Duration) -> Result<Value> {
        self.connection.call(command, timeout).await
    }

    /// Sends a one-way notification.
    pub(crate) fn send_notification(&self, notification: Notification) -> Result<()> {
        self.connection.notify(notification)
    }
}

// ============================================================================
// PainterClient - Application
// ============================================================================

impl PainterClient {
    /// Retrieves the version of the running Painter application.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] if the host's reply lacks the `painter`
    /// version field.
    pub async fn get_application_version(&self) -> Result<String> {
        let result = self.call(Command::GetVersion {}).await?;

        let version = result
            .get("painter")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::protocol(format!("GET_VERSION returned {result}")))?;

        debug!(version, "Painter version");
        Ok(version.to_string())
    }

    /// Executes a Python statement inside the Painter environment.
    pub async fn execute_statement(&self, statement: impl Into<String>) -> Result<Value> {
        self.call(Command::ExecuteStatement {
            statement: statement.into(),
        })
        .await
    }

    /// Announces to the plugin that the pipeline engine finished
    /// bootstrapping.
    ///
    /// One-way; the plugin holds back its toolbar until it hears this.
    pub fn broadcast_engine_ready(&self) -> Result<()> {
        self.send_notification(Notification::EngineReady {})
    }
}

// ============================================================================
// Result Conversions
// ============================================================================

/// Interprets a result value as a boolean.
pub(crate) fn expect_bool(method: &str, value: &Value) -> Result<bool> {
    value
        .as_bool()
        .ok_or_else(|| Error::protocol(format!("{method} returned non-boolean {value}")))
}

/// Interprets a result value as a string.
pub(crate) fn expect_string(method: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Error::protocol(format!(
            "{method} returned non-string {other}"
        ))),
    }
}

/// Interprets a result value as an optional string; `null` and the empty
/// string both mean "nothing there".
pub(crate) fn optional_string(value: Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
