use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

use disasterhub_db::LocalState;
use disasterhub_types::geo::{Coordinates, GeoPoint};
use disasterhub_types::models::{EmergencyAlert, Priority};

use crate::error::ClientError;

/// Deadline for a single SOS post.
pub const DEFAULT_SUBMIT_TIMEOUT: Duration = Duration::from_millis(8000);

pub const SEND_EMERGENCY_PATH: &str = "/emergency/sendemergency";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitOutcome {
    /// Server-issued identifier, when the response carried one.
    pub id: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResendSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Caller-side checks before anything touches the network.
pub fn compose_alert(
    disaster_type: &str,
    location: Option<Coordinates>,
    priority: Priority,
) -> Result<EmergencyAlert, ClientError> {
    let location =
        location.ok_or_else(|| ClientError::Validation("Location not available".into()))?;

    let disaster_type = disaster_type.trim();
    if disaster_type.is_empty() {
        return Err(ClientError::Validation("Please select a disaster type".into()));
    }

    Ok(EmergencyAlert {
        disaster_type: disaster_type.to_string(),
        location: GeoPoint::from(location),
        priority,
    })
}

/// Posts SOS alerts and parks failed ones in the persisted retry queue.
pub struct EmergencyClient {
    client: Client,
    endpoint: String,
    timeout: Duration,
    queue: Arc<LocalState>,
}

impl EmergencyClient {
    pub fn new(client: Client, base_url: &str, queue: Arc<LocalState>) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SEND_EMERGENCY_PATH),
            timeout: DEFAULT_SUBMIT_TIMEOUT,
            queue,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validates, then submits. A validation failure never reaches the network.
    pub async fn send_sos(
        &self,
        disaster_type: &str,
        location: Option<Coordinates>,
        priority: Priority,
    ) -> Result<SubmitOutcome, ClientError> {
        let alert = compose_alert(disaster_type, location, priority)?;
        self.submit(&alert).await
    }

    /// Single attempt. On failure the alert is appended to the retry queue;
    /// nothing is retried automatically.
    pub async fn submit(&self, alert: &EmergencyAlert) -> Result<SubmitOutcome, ClientError> {
        match self.post(alert).await {
            Ok(outcome) => {
                info!(
                    "Emergency reported: type={}, priority={}, id={}",
                    alert.disaster_type,
                    alert.priority,
                    outcome.id.as_deref().unwrap_or("N/A")
                );
                Ok(outcome)
            }
            Err(e) => {
                warn!("Emergency submission failed: {}", e);
                if let Err(queue_err) = self.queue.push_pending(alert) {
                    warn!("Could not save emergency for retry: {}", queue_err);
                }
                Err(e)
            }
        }
    }

    pub fn pending(&self) -> anyhow::Result<Vec<EmergencyAlert>> {
        self.queue.pending_emergencies()
    }

    /// Manual resend of everything queued.
    ///
    /// Alerts stay persisted while they are resent; only the ones the server
    /// accepted are removed afterwards. If that removal fails the queue is
    /// left as it was, so delivered alerts may be sent again but none are lost.
    pub async fn resend_pending(&self) -> anyhow::Result<ResendSummary> {
        let pending = self.queue.pending_emergencies()?;
        let mut sent = Vec::with_capacity(pending.len());

        for alert in &pending {
            match self.post(alert).await {
                Ok(_) => sent.push(alert.clone()),
                Err(e) => debug!("Resend failed for {}: {}", alert.disaster_type, e),
            }
        }

        let summary = ResendSummary {
            sent: sent.len(),
            failed: pending.len() - sent.len(),
        };
        self.queue.remove_pending(&sent)?;

        info!("Resent pending emergencies: sent={}, failed={}", summary.sent, summary.failed);
        Ok(summary)
    }

    async fn post(&self, alert: &EmergencyAlert) -> Result<SubmitOutcome, ClientError> {
        debug!("Sending emergency payload to {}", self.endpoint);

        let resp = self
            .client
            .post(&self.endpoint)
            .json(alert)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(ClientError::from_reqwest)?;
        let parsed: Option<Value> = serde_json::from_slice(&body).ok();

        if !status.is_success() {
            let message = parsed
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(Value::as_str)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            return Err(ClientError::Http {
                status: status.as_u16(),
                message,
            });
        }

        let id = parsed.as_ref().and_then(|v| match v.get("id")? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        });

        Ok(SubmitOutcome { id })
    }
}
