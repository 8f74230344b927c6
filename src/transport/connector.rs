//! WebSocket connector with bounded, timer-scheduled retries.
//!
//! The Painter QML plugin runs the WebSocket server (the port arrives via
//! the launch environment); this process is the client. Painter may still be
//! initializing its plugin when the engine starts, so the connector retries
//! the handshake a bounded number of times with a fixed backoff interval.
//! Backoff is `tokio::time::sleep`, never a thread-blocking wait, so timers
//! and unrelated tasks keep running between attempts.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use tokio::time::sleep;
use tokio_tungstenite::connect_async;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};

use super::Connection;

// ============================================================================
// Constants
// ============================================================================

/// Default number of handshake attempts before giving up.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default interval between handshake attempts.
const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

// ============================================================================
// Connector
// ============================================================================

/// Establishes the channel to the Painter plugin.
///
/// # Example
///
/// ```ignore
/// use painter_bridge::transport::Connector;
///
/// let connection = Connector::default()
///     .max_attempts(10)
///     .connect("ws://localhost:12345")
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Connector {
    max_attempts: u32,
    retry_interval: Duration,
}

impl Default for Connector {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_interval: DEFAULT_RETRY_INTERVAL,
        }
    }
}

impl Connector {
    /// Sets the number of handshake attempts before giving up.
    ///
    /// Values below 1 are clamped to 1.
    #[must_use]
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Sets the interval between handshake attempts.
    #[must_use]
    pub fn retry_interval(mut self, interval: Duration) -> Self {
        self.retry_interval = interval;
        self
    }

    /// Connects to the host's WebSocket endpoint.
    ///
    /// Attempts the handshake up to the configured budget, sleeping the
    /// retry interval between failures.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Connection`] for an invalid endpoint or once every
    /// attempt has failed.
    pub async fn connect(&self, endpoint: &str) -> Result<Connection> {
        let url = Url::parse(endpoint)
            .map_err(|e| Error::connection(format!("invalid endpoint {endpoint}: {e}")))?;

        if !matches!(url.scheme(), "ws" | "wss") {
            return Err(Error::connection(format!(
                "endpoint {endpoint} is not a WebSocket URL"
            )));
        }

        let mut last_error = None;

        for attempt in 1..=self.max_attempts {
            debug!(%url, attempt, max = self.max_attempts, "Connecting to host");

            match connect_async(url.as_str()).await {
                Ok((ws_stream, _response)) => {
                    info!(%url, attempt, "Connected to host");
                    return Ok(Connection::new(ws_stream));
                }
                Err(e) => {
                    warn!(%url, attempt, error = %e, "Connection attempt failed");
                    last_error = Some(e);
                }
            }

            if attempt < self.max_attempts {
                sleep(self.retry_interval).await;
            }
        }

        let detail = last_error.map_or_else(|| "unknown error".to_string(), |e| e.to_string());
        Err(Error::connection(format!(
            "giving up on {url} after {} attempts: {detail}",
            self.max_attempts
        )))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::transport::ConnectionState;
    use crate::transport::testhost::spawn_host;

    #[tokio::test]
    async fn test_connect_success() {
        let host = spawn_host(|mut host| async move {
            let _ = host.recv_close().await;
        })
        .await;

        let connection = Connector::default()
            .connect(&host.url)
            .await
            .expect("connect");
        assert_eq!(connection.state(), ConnectionState::Open);
        assert!(format!("{connection:?}").contains("Open"));
        connection.shutdown();
    }

    #[tokio::test]
    async fn test_connect_exhausts_attempts() {
        // Bind then drop to get a port with no listener.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let port = listener.local_addr().expect("addr").port();
        drop(listener);

        let err = Connector::default()
            .max_attempts(2)
            .retry_interval(Duration::from_millis(10))
            .connect(&format!("ws://127.0.0.1:{port}"))
            .await
            .unwrap_err();

        assert!(err.is_connection_error());
        assert!(err.to_string().contains("2 attempts"));
    }

    #[tokio::test]
    async fn test_rejects_non_websocket_scheme() {
        let err = Connector::default()
            .connect("http://localhost:12345")
            .await
            .unwrap_err();
        assert!(err.is_connection_error());
    }

    #[tokio::test]
    async fn test_rejects_unparseable_endpoint() {
        let err = Connector::default()
            .connect("not a url")
            .await
            .unwrap_err();
        assert!(err.is_connection_error());
    }

    #[test]
    fn test_max_attempts_clamped_to_one() {
        let connector = Connector::default().max_attempts(0);
        assert_eq!(connector.max_attempts, 1);
    }
}
