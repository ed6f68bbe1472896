//! Batch delivery to the collection endpoint.
//!
//! The flusher owns the outbound HTTP leg of the pipeline. It only ever
//! operates on an already-drained batch copy, never on the live buffer, and
//! runs the network send as an independent task so the logging call that
//! triggered the flush returns immediately.
//!
//! Delivery is at-most-once by design: a failed or rejected batch is logged
//! and dropped. There is no retry, no re-buffering and no pending-batch
//! queue.

use crate::envelope::{BatchPayload, Envelope};
use crate::error::Error;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

#[derive(Debug, Clone)]
pub struct Flusher {
    client: reqwest::Client,
    endpoint: Url,
    timeout: Duration,
}

impl Flusher {
    #[must_use]
    pub fn new(endpoint: Url, timeout: Duration) -> Self {
        Flusher {
            client: reqwest::Client::new(),
            endpoint,
            timeout,
        }
    }

    /// Fire-and-forget delivery of an already-drained batch.
    ///
    /// Spawns the send on the Tokio runtime and returns without waiting for
    /// the outcome; success and failure alike are reported through the
    /// diagnostic sink only. Must be called from within a runtime context.
    pub fn dispatch(&self, batch: Vec<Envelope>) {
        if batch.is_empty() {
            debug!("Skipping flush: batch is empty");
            return;
        }

        let flusher = self.clone();
        tokio::spawn(async move {
            let count = batch.len();
            match flusher.send_batch(&batch).await {
                Ok(()) => info!("Delivered batch of {count} events"),
                Err(Error::Serialization(e)) => {
                    error!("Failed to serialize batch of {count} events, batch dropped: {e}");
                }
                Err(e) => warn!("Failed to deliver batch of {count} events, batch dropped: {e}"),
            }
        });
    }

    /// Serialize and send one batch; any 2xx response counts as delivered.
    pub(crate) async fn send_batch(&self, batch: &[Envelope]) -> Result<(), Error> {
        let body = serde_json::to_vec(&BatchPayload { events: batch })?;

        let response = self
            .client
            .put(self.endpoint.clone())
            .timeout(self.timeout)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::UnexpectedStatus(status))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Attributes;
    use mockito::{Matcher, Server};

    fn test_batch(count: usize) -> Vec<Envelope> {
        (0..count)
            .map(|i| Envelope {
                user: "abc123".to_string(),
                timestamp: format!("2024-02-15T12:00:{i:02}.000Z"),
                event: Attributes::new(),
            })
            .collect()
    }

    fn test_flusher(server: &Server) -> Flusher {
        let endpoint =
            Url::parse(&format!("{}/collect", server.url())).expect("mock endpoint should parse");
        Flusher::new(endpoint, Duration::from_secs(5))
    }

    #[tokio::test]
    async fn test_send_batch_success() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/collect")
            .match_header("content-type", "application/json")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "events": [{"user": "abc123", "timestamp": "2024-02-15T12:00:00.000Z"}]
            })))
            .with_status(200)
            .create_async()
            .await;

        let flusher = test_flusher(&server);
        let result = flusher.send_batch(&test_batch(1)).await;

        assert!(result.is_ok());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_batch_accepts_any_2xx() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/collect")
            .with_status(202)
            .create_async()
            .await;

        let flusher = test_flusher(&server);
        assert!(flusher.send_batch(&test_batch(2)).await.is_ok());
    }

    #[tokio::test]
    async fn test_send_batch_non_success_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("PUT", "/collect")
            .with_status(500)
            .create_async()
            .await;

        let flusher = test_flusher(&server);
        let result = flusher.send_batch(&test_batch(1)).await;

        match result {
            Err(Error::UnexpectedStatus(status)) => assert_eq!(status.as_u16(), 500),
            other => panic!("expected UnexpectedStatus, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_batch_preserves_order() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/collect")
            .match_body(Matcher::PartialJson(serde_json::json!({
                "events": [
                    {"timestamp": "2024-02-15T12:00:00.000Z"},
                    {"timestamp": "2024-02-15T12:00:01.000Z"},
                    {"timestamp": "2024-02-15T12:00:02.000Z"},
                ]
            })))
            .with_status(200)
            .create_async()
            .await;

        let flusher = test_flusher(&server);
        flusher
            .send_batch(&test_batch(3))
            .await
            .expect("batch should be delivered");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_dispatch_empty_batch_sends_nothing() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("PUT", "/collect")
            .expect(0)
            .create_async()
            .await;

        let flusher = test_flusher(&server);
        flusher.dispatch(Vec::new());

        tokio::time::sleep(Duration::from_millis(50)).await;
        mock.assert_async().await;
    }
}
