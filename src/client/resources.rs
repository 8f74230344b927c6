//! Project resource operations.
//!
//! Resources are Painter's imported assets (textures, alphas, environments)
//! addressed by `resource://` URLs. The loader and breakdown hooks use these
//! calls to bring published files in and swap outdated ones for newer
//! versions.

use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::protocol::Command;

use super::PainterClient;

// ============================================================================
// PainterClient - Resources
// ============================================================================

impl PainterClient {
    /// Imports a file as a project resource.
    ///
    /// Returns the host's description of the imported resource, including
    /// its new URL.
    pub async fn import_project_resource(
        &self,
        path: impl Into<String>,
        usage: impl Into<String>,
        destination: impl Into<String>,
    ) -> Result<Value> {
        let path = path.into();
        debug!(%path, "Importing project resource");

        self.call(Command::ImportProjectResource {
            path,
            usage: usage.into(),
            destination: destination.into(),
        })
        .await
    }

    /// Gets information about a specific project resource.
    pub async fn get_resource_info(&self, url: impl Into<String>) -> Result<Value> {
        self.call(Command::GetResourceInfo { url: url.into() }).await
    }

    /// Replaces every use of a resource with another.
    pub async fn update_document_resources(
        &self,
        old_url: impl Into<String>,
        new_url: impl Into<String>,
    ) -> Result<Value> {
        let old_url = old_url.into();
        let new_url = new_url.into();
        debug!(%old_url, %new_url, "Updating document resources");

        self.call(Command::UpdateDocumentResources { old_url, new_url })
            .await
    }

    /// Lists the URLs of all resources used by the current project.
    pub async fn document_resources(&self) -> Result<Vec<String>> {
        let result = self.call(Command::DocumentResources {}).await?;
        serde_json::from_value(result.clone())
            .map_err(|_| Error::protocol(format!("DOCUMENT_RESOURCES returned {result}")))
    }

    /// Captures a viewport thumbnail of the current project to a file.
    pub async fn extract_thumbnail(&self, path: impl Into<String>) -> Result<()> {
        self.call(Command::ExtractThumbnail { path: path.into() })
            .await?;
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::Error;
    use crate::transport::testhost::spawn_host;

    use super::super::PainterClient;

    #[tokio::test]
    async fn test_document_resources_as_url_list() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            assert_eq!(request["method"], "DOCUMENT_RESOURCES");
            host.reply(
                &request,
                json!(["resource://shelf/brick_wall", "resource://shelf/rust_mask"]),
            )
            .await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        let resources = client.document_resources().await.expect("call");
        assert_eq!(resources.len(), 2);
        assert_eq!(resources[0], "resource://shelf/brick_wall");
        host.handle.await.expect("host assertions");
    }

    #[tokio::test]
    async fn test_document_resources_bad_shape() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            host.reply(&request, json!({"unexpected": "object"})).await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        let err = client.document_resources().await.unwrap_err();
        assert!(matches!(err, Error::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_import_project_resource_params() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            assert_eq!(request["method"], "IMPORT_PROJECT_RESOURCE");
            assert_eq!(request["params"]["path"], "/pub/textures/wall_v002.png");
            assert_eq!(request["params"]["usage"], "texture");
            assert_eq!(request["params"]["destination"], "project");
            host.reply(&request, json!({"url": "resource://project/wall_v002"}))
                .await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        let info = client
            .import_project_resource("/pub/textures/wall_v002.png", "texture", "project")
            .await
            .expect("import");
        assert_eq!(info["url"], "resource://project/wall_v002");
        host.handle.await.expect("host assertions");
    }

    #[tokio::test]
    async fn test_update_document_resources_params() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            assert_eq!(request["method"], "UPDATE_DOCUMENT_RESOURCES");
            assert_eq!(request["params"]["old_url"], "resource://project/wall_v001");
            assert_eq!(request["params"]["new_url"], "resource://project/wall_v002");
            host.reply(&request, json!(true)).await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        client
            .update_document_resources(
                "resource://project/wall_v001",
                "resource://project/wall_v002",
            )
            .await
            .expect("update");
        host.handle.await.expect("host assertions");
    }
}
