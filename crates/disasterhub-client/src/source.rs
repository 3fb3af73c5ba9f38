use std::time::Instant;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ClientError;

/// Where raw fact-checker payloads come from.
pub trait ReportSource: Send + Sync {
    fn fetch(&self) -> BoxFuture<'_, Result<Value, ClientError>>;
}

/// GETs predictions from the fact-checking service.
pub struct HttpReportSource {
    client: Client,
    url: String,
}

impl HttpReportSource {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn fetch_json(&self) -> Result<Value, ClientError> {
        let start = Instant::now();
        debug!("Fetching disaster reports from {}", self.url);

        let resp = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("Report source returned {}: {}", status, body);
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: format!(
                    "Server error: {} - {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown")
                ),
            });
        }

        let data: Value = resp.json().await.map_err(ClientError::from_reqwest)?;
        if data.is_null() {
            return Err(ClientError::Decode("No data received from server".into()));
        }

        debug!(
            "Report source responded in {:.2}s",
            start.elapsed().as_secs_f32()
        );
        Ok(data)
    }
}

impl ReportSource for HttpReportSource {
    fn fetch(&self) -> BoxFuture<'_, Result<Value, ClientError>> {
        self.fetch_json().boxed()
    }
}
