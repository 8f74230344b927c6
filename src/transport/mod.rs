//! WebSocket transport layer.
//!
//! This module owns the channel between the bridge (Rust) and the Painter
//! QML plugin (remote end).
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────┐                              ┌──────────────────┐
//! │  Bridge (Rust)   │                              │  Painter Plugin  │
//! │                  │          WebSocket           │  (QML)           │
//! │  Connector       │◄────────────────────────────►│                  │
//! │  → Connection    │      localhost:PORT          │  WebSocket       │
//! │                  │                              │  Server          │
//! └──────────────────┘                              └──────────────────┘
//! ```
//!
//! # Connection Lifecycle
//!
//! 1. Painter launches with the plugin, which opens a local WebSocket server
//! 2. `Connector::connect` - dial the advertised port, bounded retries
//! 3. `Connection` - send commands, receive replies and events
//! 4. `Connection::shutdown` - close frame, fail whatever is still pending
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connection` | WebSocket connection and event loop |
//! | `connector` | Endpoint dialing and retry policy |
//! | `events` | Event subscription table |

// ============================================================================
// Submodules
// ============================================================================

/// WebSocket connection and event loop.
pub mod connection;

/// WebSocket connector with bounded retries.
pub mod connector;

/// Event subscription table.
pub mod events;

#[cfg(test)]
pub(crate) mod testhost;

// ============================================================================
// Re-exports
// ============================================================================

pub use connection::{Connection, ConnectionState};
pub use connector::Connector;
pub use events::{EventCallback, EventWait, Subscription};
