//! Host event names and typed parsing.
//!
//! Painter pushes these without a correlated request. Subscriptions are
//! keyed by the raw method name; [`HostEvent::parse`] gives consumers a
//! typed view for pattern matching.

// ============================================================================
// Imports
// ============================================================================

use serde_json::Value;

use super::EventMessage;

// ============================================================================
// Event Names
// ============================================================================

/// The user clicked the pipeline menu button in Painter's toolbar.
pub const DISPLAY_MENU: &str = "DISPLAY_MENU";

/// A new project was created in Painter.
pub const NEW_PROJECT_CREATED: &str = "NEW_PROJECT_CREATED";

/// A project file was opened in Painter.
pub const PROJECT_OPENED: &str = "PROJECT_OPENED";

/// A previously requested map export completed.
pub const EXPORT_FINISHED: &str = "EXPORT_FINISHED";

/// Painter is shutting down; the bridge's host process should follow.
pub const QUIT: &str = "QUIT";

// ============================================================================
// HostEvent
// ============================================================================

/// Typed view of a pushed host event.
#[derive(Debug, Clone)]
pub enum HostEvent {
    /// Menu requested at an optional click position.
    DisplayMenu {
        /// Click position in window coordinates, when provided.
        position: Option<(f64, f64)>,
    },

    /// A new project was created.
    NewProjectCreated {
        /// Path of the new project file.
        path: String,
    },

    /// A project was opened.
    ProjectOpened {
        /// Path of the opened project file.
        path: String,
    },

    /// Map export completed.
    ExportFinished {
        /// Per-map export information as sent by Painter.
        map_infos: Value,
    },

    /// Painter is shutting down.
    Quit,

    /// An event this crate does not model.
    Unknown {
        /// Raw event name.
        method: String,
        /// Raw parameter set.
        params: Value,
    },
}

impl HostEvent {
    /// Parses an event message into its typed variant.
    #[must_use]
    pub fn parse(message: &EventMessage) -> Self {
        match message.method.as_str() {
            DISPLAY_MENU => Self::DisplayMenu {
                position: parse_position(&message.params),
            },

            NEW_PROJECT_CREATED => Self::NewProjectCreated {
                path: get_string(&message.params, "path"),
            },

            PROJECT_OPENED => Self::ProjectOpened {
                path: get_string(&message.params, "path"),
            },

            EXPORT_FINISHED => Self::ExportFinished {
                map_infos: message
                    .params
                    .get("map_infos")
                    .cloned()
                    .unwrap_or(Value::Null),
            },

            QUIT => Self::Quit,

            _ => Self::Unknown {
                method: message.method.clone(),
                params: message.params.clone(),
            },
        }
    }
}

// ============================================================================
// Param Helpers
// ============================================================================

/// Gets a string from params, empty if absent.
#[inline]
fn get_string(params: &Value, key: &str) -> String {
    params
        .get(key)
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string()
}

/// Extracts the `clickedPosition {x, y}` pair, if present and well-formed.
fn parse_position(params: &Value) -> Option<(f64, f64)> {
    let clicked = params.get("clickedPosition")?;
    let x = clicked.get("x")?.as_f64()?;
    let y = clicked.get("y")?.as_f64()?;
    Some((x, y))
}

// ============================================================================
// Tests
// ============================================================================
