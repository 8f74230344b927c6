//! JSON-RPC protocol message types.
//!
//! This module defines the wire format spoken between the bridge (Rust) and
//! the Painter QML plugin (remote end).
//!
//! # Protocol Overview
//!
//! | Message Type | Direction | Purpose |
//! |--------------|-----------|---------|
//! | [`RequestEnvelope`] | Bridge → Painter | Command or notification |
//! | [`ResponseEnvelope`] | Painter → Bridge | Correlated reply |
//! | [`EventMessage`] | Painter → Bridge | Pushed notification |
//!
//! Method names use Painter's flat SCREAMING_SNAKE namespace:
//!
//! - `GET_VERSION`
//! - `SAVE_PROJECT_AS`
//! - `EXPORT_DOCUMENT_MAPS`
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `command` | Closed enums of request and notification kinds |
//! | `envelope` | JSON-RPC envelopes and inbound classification |
//! | `event` | Host event names and typed parsing |

// ============================================================================
// Submodules
// ============================================================================

/// Command and notification definitions.
pub mod command;

/// JSON-RPC envelope types.
pub mod envelope;

/// Host event names and typed parsing.
pub mod event;

// ============================================================================
// Re-exports
// ============================================================================

pub use command::{Command, Notification};
pub use envelope::{EventMessage, Incoming, Payload, RequestEnvelope, ResponseEnvelope};
pub use event::HostEvent;
