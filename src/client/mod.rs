//! High-level Painter client facade.
//!
//! [`PainterClient`] wraps a [`Connection`](crate::transport::Connection)
//! and exposes one typed async method per function the QML plugin offers.
//! Call sites get plain "do this and get the answer" semantics; the
//! correlation, timeout, and event machinery stays in the transport layer.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `core` | Client struct, call plumbing, application queries |
//! | `project` | Project lifecycle (open, save, close, settings) |
//! | `resources` | Resource import, lookup, replacement, thumbnails |
//! | `export` | Map export, including the completion-event wait |
//! | `logging` | One-way log forwarding to the Painter console |

// ============================================================================
// Submodules
// ============================================================================

/// Core PainterClient struct and call plumbing.
pub mod core;

/// Texture map export.
pub mod export;

/// One-way log forwarding.
pub mod logging;

/// Project lifecycle operations.
pub mod project;

/// Project resource operations.
pub mod resources;

// ============================================================================
// Re-exports
// ============================================================================

pub use self::core::PainterClient;
