//! Painter Bridge - WebSocket JSON-RPC client for Adobe Substance 3D Painter.
//!
//! This library drives Substance 3D Painter from an external pipeline
//! process, talking JSON-RPC 2.0 over the WebSocket server that Painter's
//! QML plugin opens on localhost.
//!
//! # Architecture
//!
//! The bridge has two layers:
//!
//! - **Transport** ([`transport`]): owns the single persistent connection,
//!   serializes envelopes, and multiplexes concurrent in-flight requests by
//!   correlation ID. Unsolicited host events fan out through a subscription
//!   table.
//! - **Facade** ([`client`]): one typed async method per host operation.
//!   Each call suspends only its own caller; the event loop keeps servicing
//!   replies, timers, and unrelated events throughout.
//!
//! Painter may answer out of order, so correlation IDs - never arrival
//! order - decide which caller a reply releases. Every call carries a
//! timeout; a reply that arrives after its deadline is discarded as stale.
//!
//! # Quick Start
//!
//! ```no_run
//! use painter_bridge::{PainterClient, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     // Painter's plugin advertises its port through the launch environment
//!     let client = PainterClient::connect("ws://localhost:12345").await?;
//!
//!     let version = client.get_application_version().await?;
//!     println!("Painter {version}");
//!
//!     client.open_project("/shots/sq010/paint_v003.spp").await?;
//!     let maps = client.export_document_maps("/tmp/maps").await?;
//!     println!("exported: {maps}");
//!
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | High-level facade: [`PainterClient`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`protocol`] | JSON-RPC message types |
//! | [`transport`] | Connection, connector, event routing |

// ============================================================================
// Modules
// ============================================================================

/// High-level Painter client facade.
///
/// Use [`PainterClient::connect`] to establish a session.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
///
/// Newtype wrappers prevent mixing incompatible IDs at compile time.
pub mod identifiers;

/// JSON-RPC protocol message types.
///
/// Envelope formats, the closed command/notification enums, and host
/// event parsing.
pub mod protocol;

/// WebSocket transport layer.
///
/// Connection lifecycle, request correlation, and event subscriptions.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::PainterClient;

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::{RequestId, SubscriptionId};

// Protocol types
pub use protocol::{Command, HostEvent, Notification};

// Transport types
pub use transport::{Connection, ConnectionState, Connector, EventWait, Subscription};
