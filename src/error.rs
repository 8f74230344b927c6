//! Error types for the Painter bridge.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use painter_bridge::{PainterClient, Result};
//!
//! async fn example(client: &PainterClient) -> Result<()> {
//!     let version = client.get_application_version().await?;
//!     client.log_info(format!("Painter {version}"))?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants |
//! |----------|----------|
//! | Connection | [`Error::Connection`], [`Error::ConnectionClosed`] |
//! | Timeout | [`Error::RequestTimeout`], [`Error::Timeout`] |
//! | Remote | [`Error::Remote`] |
//! | Protocol | [`Error::Protocol`] |
//! | External | [`Error::Io`], [`Error::Json`], [`Error::WebSocket`] |
//!
//! A connection-category error on the primary channel is normally fatal to
//! the owning process: the host application is the only reason the bridge
//! exists. Timeout and remote errors are returned to the immediate caller,
//! which decides whether to retry, report, or abort.

// ============================================================================
// Imports
// ============================================================================

use std::io::Error as IoError;
use std::result::Result as StdResult;

use serde_json::Value;
use thiserror::Error;
use tokio_tungstenite::tungstenite::Error as WsError;

use crate::identifiers::RequestId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes relevant context for debugging.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Connection Errors
    // ========================================================================
    /// WebSocket connection failed.
    ///
    /// Returned when the connection to the host plugin cannot be established
    /// or drops mid-operation.
    #[error("Connection failed: {message}")]
    Connection {
        /// Description of the connection error.
        message: String,
    },

    /// WebSocket connection closed.
    ///
    /// Returned for requests still pending when the channel goes away; none
    /// are ever left unresolved.
    #[error("Connection closed")]
    ConnectionClosed,

    // ========================================================================
    // Timeout Errors
    // ========================================================================
    /// Request timed out waiting for its response.
    ///
    /// The pending entry is removed before this is returned, so a late reply
    /// for the same ID is discarded as stale.
    #[error("Request {request_id} timed out after {timeout_ms}ms")]
    RequestTimeout {
        /// The request ID that timed out.
        request_id: RequestId,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    /// A named operation exceeded its deadline.
    ///
    /// Used for event-completed operations such as the map export wait.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the operation that timed out.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Remote Errors
    // ========================================================================
    /// The host returned an explicit error payload for a request.
    #[error("Remote error from {method}: {payload}")]
    Remote {
        /// Method the host rejected.
        method: String,
        /// Error payload as sent by the host.
        payload: Value,
    },

    // ========================================================================
    // Protocol Errors
    // ========================================================================
    /// Protocol violation or unexpected message shape.
    ///
    /// Malformed inbound envelopes are logged and dropped by the event loop;
    /// this variant surfaces only when a caller-visible value has the wrong
    /// shape (e.g. a non-boolean `SAVE_PROJECT` result).
    #[error("Protocol error: {message}")]
    Protocol {
        /// Description of the protocol violation.
        message: String,
    },

    // ========================================================================
    // External Errors
    // ========================================================================
    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] IoError),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] WsError),
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a connection error.
    #[inline]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// Creates a request timeout error.
    #[inline]
    pub fn request_timeout(request_id: RequestId, timeout_ms: u64) -> Self {
        Self::RequestTimeout {
            request_id,
            timeout_ms,
        }
    }

    /// Creates a named-operation timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a remote error from a host error payload.
    #[inline]
    pub fn remote(method: impl Into<String>, payload: Value) -> Self {
        Self::Remote {
            method: method.into(),
            payload,
        }
    }

    /// Creates a protocol error.
    #[inline]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::RequestTimeout { .. } | Self::Timeout { .. })
    }

    /// Returns `true` if this is a connection error.
    ///
    /// Connection errors on the primary channel are typically treated as
    /// fatal by the owning engine.
    #[inline]
    #[must_use]
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            Self::Connection { .. } | Self::ConnectionClosed | Self::WebSocket(_)
        )
    }

    /// Returns `true` if this error came from the host's error payload.
    #[inline]
    #[must_use]
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::Remote { .. })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::ErrorKind;

    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = Error::connection("refused");
        assert_eq!(err.to_string(), "Connection failed: refused");
    }

    #[test]
    fn test_request_timeout_display() {
        let id = RequestId::generate();
        let err = Error::request_timeout(id, 5000);
        assert_eq!(
            err.to_string(),
            format!("Request {id} timed out after 5000ms")
        );
    }

    #[test]
    fn test_is_timeout() {
        let id = RequestId::generate();
        assert!(Error::request_timeout(id, 5000).is_timeout());
        assert!(Error::timeout("export", 1000).is_timeout());
        assert!(!Error::connection("x").is_timeout());
    }

    #[test]
    fn test_is_connection_error() {
        assert!(Error::connection("x").is_connection_error());
        assert!(Error::ConnectionClosed.is_connection_error());
        assert!(!Error::protocol("x").is_connection_error());
    }

    #[test]
    fn test_remote_error() {
        let err = Error::remote("SAVE_PROJECT", json!({"code": -1}));
        assert!(err.is_remote());
        assert!(err.to_string().contains("SAVE_PROJECT"));
    }

    #[test]
    fn test_from_io_error() {
        let io_err = IoError::new(ErrorKind::ConnectionRefused, "refused");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_from_json_error() {
        let json_err = serde_json::from_str::<String>("not json").unwrap_err();
        let err: Error = json_err.into();
        assert!(matches!(err, Error::Json(_)));
    }
}
