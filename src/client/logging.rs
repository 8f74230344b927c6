//! One-way log forwarding to the Painter console.
//!
//! These mirror the engine's log handlers: pipeline messages show up in
//! Painter's own log view so artists see them without a terminal. All of
//! them are fire-and-forget notifications.

use crate::error::Result;
use crate::protocol::Notification;

use super::PainterClient;

// ============================================================================
// PainterClient - Logging
// ============================================================================

impl PainterClient {
    /// Sends an info message to the Painter log console.
    pub fn log_info(&self, message: impl Into<String>) -> Result<()> {
        self.send_notification(Notification::LogInfo {
            message: message.into(),
        })
    }

    /// Sends a debug message to the Painter log console.
    pub fn log_debug(&self, message: impl Into<String>) -> Result<()> {
        self.send_notification(Notification::LogDebug {
            message: message.into(),
        })
    }

    /// Sends a warning message to the Painter log console.
    pub fn log_warning(&self, message: impl Into<String>) -> Result<()> {
        self.send_notification(Notification::LogWarning {
            message: message.into(),
        })
    }

    /// Sends an error message to the Painter log console.
    pub fn log_error(&self, message: impl Into<String>) -> Result<()> {
        self.send_notification(Notification::LogError {
            message: message.into(),
        })
    }

    /// Sends an exception report to the Painter log console.
    pub fn log_exception(&self, message: impl Into<String>) -> Result<()> {
        self.send_notification(Notification::LogException {
            message: message.into(),
        })
    }

    /// Toggles debug-level logging inside the Painter plugin.
    pub fn toggle_debug_logging(&self, enabled: bool) -> Result<()> {
        self.send_notification(Notification::ToggleDebugLogging { enabled })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use crate::transport::testhost::spawn_host;

    use super::super::PainterClient;

    #[tokio::test]
    async fn test_log_messages_are_notifications() {
        let host = spawn_host(|mut host| async move {
            let frame = host.recv().await;
            assert_eq!(frame["method"], "LOG_WARNING");
            assert_eq!(frame["params"]["message"], "texture set renamed");
            assert!(frame.get("id").is_none());

            let frame = host.recv().await;
            assert_eq!(frame["method"], "TOGGLE_DEBUG_LOGGING");
            assert_eq!(frame["params"]["enabled"], true);
            assert!(frame.get("id").is_none());
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        client.log_warning("texture set renamed").expect("notify");
        client.toggle_debug_logging(true).expect("notify");

        host.handle.await.expect("host assertions");
    }
}
