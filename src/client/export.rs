//! Texture map export.
//!
//! Export is Painter's one long-running operation: the `EXPORT_DOCUMENT_MAPS`
//! reply is only an acknowledgment, and the real result arrives later as an
//! `EXPORT_FINISHED` event. [`PainterClient::export_document_maps`] hides
//! that two-step shape behind a single awaitable call.

use serde_json::Value;
use tracing::debug;

use crate::error::Result;
use crate::protocol::{Command, event};

use super::PainterClient;

// ============================================================================
// PainterClient - Export
// ============================================================================

impl PainterClient {
    /// Retrieves information about the maps the next export would produce.
    pub async fn get_map_export_information(&self) -> Result<Value> {
        self.call(Command::GetMapExportInformation {}).await
    }

    /// Exports the document's texture maps and waits for completion.
    ///
    /// The completion wait is registered before the triggering call is
    /// sent, so a fast export cannot finish unobserved. The registration is
    /// one-shot; a duplicate completion event triggers nothing.
    ///
    /// Returns the `map_infos` payload of the completion event: a mapping of
    /// map names to their written file paths.
    ///
    /// # Errors
    ///
    /// - any [`Connection::call`](crate::transport::Connection::call) failure
    ///   for the triggering request
    /// - [`Error::Timeout`](crate::Error::Timeout) if the completion event
    ///   does not arrive within the export timeout
    pub async fn export_document_maps(&self, destination: impl Into<String>) -> Result<Value> {
        let destination = destination.into();
        debug!(%destination, "Starting map export");

        let finished = self.connection.wait_for(event::EXPORT_FINISHED);

        self.call(Command::ExportDocumentMaps { destination }).await?;

        let params = finished.wait(self.export_timeout).await?;
        let map_infos = params.get("map_infos").cloned().unwrap_or(Value::Null);

        debug!("Map export ended");
        Ok(map_infos)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use crate::transport::testhost::spawn_host;

    use super::super::PainterClient;

    #[tokio::test]
    async fn test_export_waits_for_finished_event() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            assert_eq!(request["method"], "EXPORT_DOCUMENT_MAPS");
            assert_eq!(request["params"]["destination"], "/tmp/maps");

            // Ack first, completion event later, as Painter does.
            host.reply(&request, json!(true)).await;
            host.send_event(
                "EXPORT_FINISHED",
                json!({"map_infos": {"BaseColor": ["/tmp/maps/base.png"]}}),
            )
            .await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        let map_infos = client
            .export_document_maps("/tmp/maps")
            .await
            .expect("export");

        assert_eq!(map_infos["BaseColor"][0], "/tmp/maps/base.png");
        host.handle.await.expect("host assertions");
    }

    #[tokio::test]
    async fn test_export_completion_before_ack_is_not_lost() {
        // A fast export may emit the completion event before the ack frame.
        // The wait is registered before the call, so order must not matter.
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            host.send_event("EXPORT_FINISHED", json!({"map_infos": {"Normal": []}}))
                .await;
            host.reply(&request, json!(true)).await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        let map_infos = client
            .export_document_maps("/tmp/maps")
            .await
            .expect("export");
        assert!(map_infos.get("Normal").is_some());
        host.handle.await.expect("host assertions");
    }

    #[tokio::test]
    async fn test_export_times_out_without_event() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            host.reply(&request, json!(true)).await;
            // Completion never arrives.
            tokio::time::sleep(Duration::from_millis(500)).await;
        })
        .await;

        let client = PainterClient::connect(&host.url)
            .await
            .expect("connect")
            .with_export_timeout(Duration::from_millis(100));

        let err = client.export_document_maps("/tmp/maps").await.unwrap_err();
        assert!(err.is_timeout());
    }

    #[tokio::test]
    async fn test_map_export_information() {
        let host = spawn_host(|mut host| async move {
            let request = host.recv().await;
            assert_eq!(request["method"], "GET_MAP_EXPORT_INFORMATION");
            host.reply(&request, json!({"maps": ["BaseColor", "Normal"]}))
                .await;
        })
        .await;

        let client = PainterClient::connect(&host.url).await.expect("connect");
        let info = client.get_map_export_information().await.expect("call");
        assert_eq!(info["maps"][0], "BaseColor");
        host.handle.await.expect("host assertions");
    }
}
