//! Command and notification definitions.
//!
//! The Painter QML plugin exposes a flat namespace of SCREAMING_SNAKE
//! methods. Each request kind is a variant of a closed enum carrying its own
//! typed parameters, so dispatch is pattern matching rather than string
//! comparison.
//!
//! # Method Kinds
//!
//! | Kind | Direction | Reply |
//! |------|-----------|-------|
//! | [`Command`] | Bridge → Painter | Correlated response expected |
//! | [`Notification`] | Bridge → Painter | One-way, no `id`, never acknowledged |

// ============================================================================
// Imports
// ============================================================================

use serde::{Deserialize, Serialize};

// ============================================================================
// Command
// ============================================================================

/// All request methods understood by the Painter plugin.
///
/// Serialized adjacently tagged so each variant becomes
/// `{"method": "...", "params": {...}}` on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Command {
    /// Query the running Painter version.
    #[serde(rename = "GET_VERSION")]
    GetVersion {},

    /// Path of the currently open project, if any.
    #[serde(rename = "GET_CURRENT_PROJECT_PATH")]
    GetCurrentProjectPath {},

    /// Whether the current project has unsaved changes.
    #[serde(rename = "NEEDS_SAVING")]
    NeedsSaving {},

    /// Open a project file.
    #[serde(rename = "OPEN_PROJECT")]
    OpenProject {
        /// Project file path (`.spp`).
        path: String,
    },

    /// Save the current project in place.
    #[serde(rename = "SAVE_PROJECT")]
    SaveProject {},

    /// Save the current project to a new path.
    #[serde(rename = "SAVE_PROJECT_AS")]
    SaveProjectAs {
        /// Destination file path.
        path: String,
    },

    /// Trigger Painter's native Save As dialog.
    #[serde(rename = "SAVE_PROJECT_AS_ACTION")]
    SaveProjectAsAction {},

    /// Close the current project.
    #[serde(rename = "CLOSE_PROJECT")]
    CloseProject {},

    /// Execute a Python statement inside the Painter environment.
    #[serde(rename = "EXECUTE_STATEMENT")]
    ExecuteStatement {
        /// Statement source text.
        statement: String,
    },

    /// Capture a viewport thumbnail to a file.
    #[serde(rename = "EXTRACT_THUMBNAIL")]
    ExtractThumbnail {
        /// Output image path.
        path: String,
    },

    /// Import a file as a project resource.
    #[serde(rename = "IMPORT_PROJECT_RESOURCE")]
    ImportProjectResource {
        /// Source file path.
        path: String,
        /// Resource usage (e.g. `texture`, `alpha`, `environment`).
        usage: String,
        /// Destination shelf or project location.
        destination: String,
    },

    /// Read a value from the project metadata settings.
    #[serde(rename = "GET_PROJECT_SETTINGS")]
    GetProjectSettings {
        /// Settings key.
        key: String,
    },

    /// Information about one project resource.
    #[serde(rename = "GET_RESOURCE_INFO")]
    GetResourceInfo {
        /// Resource URL.
        url: String,
    },

    /// Default export path of the current project.
    #[serde(rename = "GET_PROJECT_EXPORT_PATH")]
    GetProjectExportPath {},

    /// Description of the maps the next export would produce.
    #[serde(rename = "GET_MAP_EXPORT_INFORMATION")]
    GetMapExportInformation {},

    /// Start a texture map export.
    ///
    /// Painter acknowledges quickly; completion arrives later as an
    /// `EXPORT_FINISHED` event.
    #[serde(rename = "EXPORT_DOCUMENT_MAPS")]
    ExportDocumentMaps {
        /// Export destination directory.
        destination: String,
    },

    /// Replace every use of a resource with another.
    #[serde(rename = "UPDATE_DOCUMENT_RESOURCES")]
    UpdateDocumentResources {
        /// URL of the resource being replaced.
        old_url: String,
        /// URL of the replacement resource.
        new_url: String,
    },

    /// URLs of all resources used by the current project.
    #[serde(rename = "DOCUMENT_RESOURCES")]
    DocumentResources {},
}

impl Command {
    /// Returns the wire method name for this command.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::GetVersion {} => "GET_VERSION",
            Self::GetCurrentProjectPath {} => "GET_CURRENT_PROJECT_PATH",
            Self::NeedsSaving {} => "NEEDS_SAVING",
            Self::OpenProject { .. } => "OPEN_PROJECT",
            Self::SaveProject {} => "SAVE_PROJECT",
            Self::SaveProjectAs { .. } => "SAVE_PROJECT_AS",
            Self::SaveProjectAsAction {} => "SAVE_PROJECT_AS_ACTION",
            Self::CloseProject {} => "CLOSE_PROJECT",
            Self::ExecuteStatement { .. } => "EXECUTE_STATEMENT",
            Self::ExtractThumbnail { .. } => "EXTRACT_THUMBNAIL",
            Self::ImportProjectResource { .. } => "IMPORT_PROJECT_RESOURCE",
            Self::GetProjectSettings { .. } => "GET_PROJECT_SETTINGS",
            Self::GetResourceInfo { .. } => "GET_RESOURCE_INFO",
            Self::GetProjectExportPath {} => "GET_PROJECT_EXPORT_PATH",
            Self::GetMapExportInformation {} => "GET_MAP_EXPORT_INFORMATION",
            Self::ExportDocumentMaps { .. } => "EXPORT_DOCUMENT_MAPS",
            Self::UpdateDocumentResources { .. } => "UPDATE_DOCUMENT_RESOURCES",
            Self::DocumentResources {} => "DOCUMENT_RESOURCES",
        }
    }
}

// ============================================================================
// Notification
// ============================================================================

/// One-way methods sent without an `id` and never acknowledged.
///
/// These feed the Painter-side log console and plugin toggles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "method", content = "params")]
pub enum Notification {
    /// Info message for the Painter log console.
    #[serde(rename = "LOG_INFO")]
    LogInfo {
        /// Message text.
        message: String,
    },

    /// Debug message for the Painter log console.
    #[serde(rename = "LOG_DEBUG")]
    LogDebug {
        /// Message text.
        message: String,
    },

    /// Warning message for the Painter log console.
    #[serde(rename = "LOG_WARNING")]
    LogWarning {
        /// Message text.
        message: String,
    },

    /// Error message for the Painter log console.
    #[serde(rename = "LOG_ERROR")]
    LogError {
        /// Message text.
        message: String,
    },

    /// Exception report for the Painter log console.
    #[serde(rename = "LOG_EXCEPTION")]
    LogException {
        /// Message text, typically a traceback.
        message: String,
    },

    /// Toggle debug-level logging inside the Painter plugin.
    #[serde(rename = "TOGGLE_DEBUG_LOGGING")]
    ToggleDebugLogging {
        /// New debug-logging state.
        enabled: bool,
    },

    /// Announce that the pipeline engine finished bootstrapping.
    ///
    /// The plugin defers its toolbar setup until this arrives.
    #[serde(rename = "ENGINE_READY")]
    EngineReady {},
}

impl Notification {
    /// Returns the wire method name for this notification.
    #[must_use]
    pub const fn method_name(&self) -> &'static str {
        match self {
            Self::LogInfo { .. } => "LOG_INFO",
            Self::LogDebug { .. } => "LOG_DEBUG",
            Self::LogWarning { .. } => "LOG_WARNING",
            Self::LogError { .. } => "LOG_ERROR",
            Self::LogException { .. } => "LOG_EXCEPTION",
            Self::ToggleDebugLogging { .. } => "TOGGLE_DEBUG_LOGGING",
            Self::EngineReady {} => "ENGINE_READY",
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
