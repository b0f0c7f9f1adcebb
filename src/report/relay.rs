//! HTTP mail relay sender
//!
//! Posts the rendered report as JSON to a configured relay endpoint
//! (any webhook-style mail bridge). The relay owns the actual mail
//! protocol; fundwatch only cares that the handoff succeeded.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::report::ReportSender;

#[derive(Serialize)]
struct RelayPayload<'a> {
    from: &'a str,
    to: &'a [String],
    subject: &'a str,
    html: &'a str,
}

/// Sends reports through an HTTP relay endpoint
pub struct RelaySender {
    endpoint: String,
    from: String,
    to: Vec<String>,
    client: Client,
}

impl RelaySender {
    pub fn new(
        endpoint: impl Into<String>,
        from: impl Into<String>,
        to: Vec<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build relay HTTP client")?;
        Ok(Self {
            endpoint: endpoint.into(),
            from: from.into(),
            to,
            client,
        })
    }
}

#[async_trait]
impl ReportSender for RelaySender {
    async fn send(&self, subject: &str, html_body: &str) -> Result<()> {
        debug!("Posting report to relay: {}", subject);

        let payload = RelayPayload {
            from: &self.from,
            to: &self.to,
            subject,
            html: html_body,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&payload)
            .send()
            .await
            .context("Failed to reach report relay")?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Report relay returned error status: {}",
                response.status()
            ));
        }

        Ok(())
    }

    async fn verify(&self) -> Result<()> {
        // Relays differ on HEAD/GET semantics, so any HTTP response
        // counts as reachable; only transport failures are errors.
        self.client
            .head(&self.endpoint)
            .send()
            .await
            .context("Report relay is unreachable")?;
        info!("Report relay is reachable");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payload_serializes_expected_shape() {
        let payload = RelayPayload {
            from: "fundwatch@example.com",
            to: &["me@example.com".to_string()],
            subject: "Weekly Portfolio Report",
            html: "<html></html>",
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["from"], "fundwatch@example.com");
        assert_eq!(json["to"][0], "me@example.com");
        assert_eq!(json["subject"], "Weekly Portfolio Report");
        assert_eq!(json["html"], "<html></html>");
    }

    #[tokio::test]
    async fn test_send_fails_fast_on_unreachable_endpoint() {
        let sender = RelaySender::new(
            "http://127.0.0.1:1/relay",
            "fundwatch@example.com",
            vec!["me@example.com".to_string()],
            Duration::from_millis(500),
        )
        .unwrap();

        let err = sender.send("subject", "<html></html>").await.unwrap_err();
        assert!(format!("{:#}", err).contains("Failed to reach report relay"));
    }
}
