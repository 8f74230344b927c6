//! JSON-RPC envelope types.
//!
//! # Format
//!
//! Request (reply expected):
//! ```json
//! {"jsonrpc": "2.0", "method": "SAVE_PROJECT_AS", "params": {"path": "/a.spp"}, "id": "uuid-hex"}
//! ```
//!
//! One-way notification: same shape without `id`.
//!
//! Response, correlated by `id`, carrying exactly one of `result` / `error`:
//! ```json
//! {"jsonrpc": "2.0", "result": {"painter": "10.1.0"}, "id": "uuid-hex"}
//! ```
//!
//! Host events carry `method` and `params` but no pending request.
//! Unknown extra fields are ignored everywhere.

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{Error, Result};
use crate::identifiers::RequestId;

use super::{Command, Notification};

// ============================================================================
// RequestEnvelope
// ============================================================================

/// An outbound JSON-RPC message.
///
/// Built from a [`Command`] (fresh [`RequestId`], reply expected) or a
/// [`Notification`] (no `id`, one-way).
#[derive(Debug, Clone, Serialize)]
pub struct RequestEnvelope {
    /// Protocol version marker, always `"2.0"`.
    pub jsonrpc: &'static str,

    /// Method and params, flattened into the envelope.
    #[serde(flatten)]
    pub payload: Payload,

    /// Correlation ID; absent for notifications.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

/// The method/params portion of an outbound envelope.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Payload {
    /// A request expecting a correlated reply.
    Command(Command),
    /// A one-way notification.
    Notification(Notification),
}

impl RequestEnvelope {
    /// Wraps a command with a freshly generated correlation ID.
    #[must_use]
    pub fn call(command: Command) -> Self {
        Self::call_with_id(command, RequestId::generate())
    }

    /// Wraps a command with a caller-supplied correlation ID.
    #[must_use]
    pub fn call_with_id(command: Command, id: RequestId) -> Self {
        Self {
            jsonrpc: "2.0",
            payload: Payload::Command(command),
            id: Some(id),
        }
    }

    /// Wraps a notification; no ID, no reply expected.
    #[must_use]
    pub fn notify(notification: Notification) -> Self {
        Self {
            jsonrpc: "2.0",
            payload: Payload::Notification(notification),
            id: None,
        }
    }

    /// Returns the wire method name of the payload.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match &self.payload {
            Payload::Command(c) => c.method_name(),
            Payload::Notification(n) => n.method_name(),
        }
    }
}

// ============================================================================
// ResponseEnvelope
// ============================================================================

/// A reply from the host, correlated by `id`.
#[derive(Debug, Clone, Deserialize)]
pub struct ResponseEnvelope {
    /// Matches the request `id`.
    pub id: RequestId,

    /// Result value (if success).
    #[serde(default)]
    pub result: Option<Value>,

    /// Error payload (if failure).
    #[serde(default)]
    pub error: Option<Value>,
}

impl ResponseEnvelope {
    /// Returns `true` if the host reported an error for this request.
    #[inline]
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }

    /// Extracts the result value, or a typed [`Error::Remote`] failure.
    ///
    /// `method` names the request this reply answers, for error context.
    /// A reply with neither `result` nor `error` resolves to `Null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Remote`] if the host sent an error payload.
    pub fn into_result(self, method: &str) -> Result<Value> {
        match self.error {
            Some(payload) => Err(Error::remote(method, payload)),
            None => Ok(self.result.unwrap_or(Value::Null)),
        }
    }
}

// ============================================================================
// EventMessage
// ============================================================================

/// A server-pushed message with no correlated pending request.
///
/// Covers both unsolicited notifications (`EXPORT_FINISHED`) and host-side
/// requests the engine treats as events (`DISPLAY_MENU`, `QUIT`).
#[derive(Debug, Clone, Deserialize)]
pub struct EventMessage {
    /// Event-type name.
    pub method: String,

    /// Event parameter set.
    #[serde(default)]
    pub params: Value,
}

// ============================================================================
// Incoming
// ============================================================================

/// Classification of one inbound text frame.
#[derive(Debug)]
pub enum Incoming {
    /// A reply to a pending request.
    Reply(ResponseEnvelope),
    /// A pushed event.
    Event(EventMessage),
}

impl Incoming {
    /// Parses and classifies an inbound frame.
    ///
    /// A payload carrying `result` or `error` is a reply and must carry an
    /// `id`; otherwise a payload carrying `method` is an event. Anything
    /// else is malformed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Protocol`] for unparseable or unclassifiable
    /// payloads and [`Error::Json`] for invalid JSON. The caller logs and
    /// drops these without touching the pending map.
    pub fn parse(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;

        if !value.is_object() {
            return Err(Error::protocol("message is not a JSON object"));
        }

        if value.get("result").is_some() || value.get("error").is_some() {
            if value.get("id").is_none() {
                return Err(Error::protocol("reply without an id"));
            }
            let reply: ResponseEnvelope = serde_json::from_value(value)?;
            return Ok(Self::Reply(reply));
        }

        if value.get("method").is_some() {
            let event: EventMessage = serde_json::from_value(value)?;
            return Ok(Self::Event(event));
        }

        Err(Error::protocol("message carries neither result nor method"))
    }
}

// ============================================================================
// Tests
// ============================================================================
