//! Project lifecycle operations.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::protocol::Command;

use super::PainterClient;
use super::core::{expect_bool, expect_string, optional_string};

// ============================================================================
// PainterClient - Project
// ============================================================================

impl PainterClient {
    /// Gets the file path of the currently open project, if any.
    pub async fn get_current_project_path(&self) -> Result<Option<String>> {
        let result = self.call(Command::GetCurrentProjectPath {}).await?;
        Ok(optional_string(result))
    }

    /// Checks whether the current project has unsaved changes.
    pub async fn needs_saving(&self) -> Result<bool> {
        let result = self.call(Command::NeedsSaving {}).await?;
        expect_bool("NEEDS_SAVING", &result)
    }

    /// Opens a project from the given file path.
    pub async fn open_project(&self, path: impl Into<String>) -> Result<()> {
        let path = path.into();
        debug!(%path, "Opening project");

        self.call(Command::OpenProject { path }).await?;
        Ok(())
    }

    /// Saves the current project in place.
    pub async fn save_project(&self) -> Result<bool> {
        let result = self.call(Command::SaveProject {}).await?;
        expect_bool("SAVE_PROJECT", &result)
    }

    /// Saves the current project to a new file path.
    pub async fn save_project_as(&self, path: impl Into<String>) -> Result<bool> {
        let path = path.into();
        debug!(%path, "Saving project as");

        let result = self.call(Command::SaveProjectAs { path }).await?;
        expect_bool("SAVE_PROJECT_AS", &result)
    }

    /// Triggers Painter's native Save As dialog.
    ///
    /// The reply only acknowledges the dialog; whether the user saved shows
    /// up later through [`needs_saving`](Self::needs_saving).
    pub async fn save_project_as_action(&self) -> Result<Value> {
        self.call(Command::SaveProjectAsAction {}).await
    }

    /// Closes the current project.
    pub async fn close_project(&self) -> Result<bool> {
        let result = self.call(Command::CloseProject {}).await?;
        expect_bool("CLOSE_PROJECT", &result)
    }

    /// Reads a value from the project's metadata settings.
    ///
    /// The pipeline stores its context under well-known keys here.
    pub async fn get_project_settings(&self, key: impl Into<String>) -> Result<Value> {
        self.call(Command::GetProjectSettings { key: key.into() })
            .await
    }

    /// Gets the default export path of the current project.
    pub async fn get_project_export_path(&self) -> Result<String> {
        let result = self.call(Command::GetProjectExportPath {}).await?;
        expect_string("GET_PROJECT_EXPORT_PATH", result)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::sleep;

    use crate::error::Error;
    use crate::transport::testhost::spawn_host;

    use super::super::PainterClient;

    #[tokio::test]
    async fn test_save_project_as_times_out_when_host_is_silent() {
        let host = spawn_host(|mut host| async move {
            let _request = host.recv().await;
            // Never reply.
            sleep(Duration::from_millis(500)).await;
        })
        .await;

        let client = PainterClient::connect(&host.url)
            .await
            .expect("connect")
            .with_call_timeout(Duration::from_millis(100));

        let err = client.save_project_as("/a/b.spp").await.unwrap_err();
        assert!(err.is_timeout());
        assert_eq!(client.connection().pending_count(), 0);
    }

    #[tokio::test]
    async fn test_current_project_path_none_when_no_project() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            assert_eq!(request["method"], "GET_CURRENT_PROJECT_PATH");
            host.reply(&request, json!(null)).await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        let path = client.get_current_project_path().await.expect("call");
        assert_eq!(path, None);
        host.handle.await.expect("host assertions");
    }

    #[tokio::test]
    async fn test_needs_saving_roundtrip() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            assert_eq!(request["method"], "NEEDS_SAVING");
            host.reply(&request, json!(true)).await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        assert!(client.needs_saving().await.expect("call"));
        host.handle.await.expect("host assertions");
    }

    #[tokio::test]
    async fn test_remote_error_propagates() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            host.reply_error(&request, json!({"message": "no project open"}))
                .await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        let err = client.save_project().await.unwrap_err();

        match err {
            Error::Remote { method, payload } => {
                assert_eq!(method, "SAVE_PROJECT");
                assert_eq!(payload["message"], "no project open");
            }
            other => panic!("expected remote error, got {other}"),
        }
    }

    #[tokio::test]
    async fn test_open_project_sends_path() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            assert_eq!(request["method"], "OPEN_PROJECT");
            assert_eq!(request["params"]["path"], "/shots/sq010/paint_v003.spp");
            host.reply(&request, json!(true)).await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        client
            .open_project("/shots/sq010/paint_v003.spp")
            .await
            .expect("open");
        host.handle.await.expect("host assertions");
    }
}
