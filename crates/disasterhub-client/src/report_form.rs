use chrono::{DateTime, SecondsFormat, Utc};
use rand::Rng;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

use disasterhub_types::models::Priority;

use crate::error::ClientError;

pub const SAVE_REPORT_PATH: &str = "/save";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/300";

/// A citizen's disaster report as typed into the form.
#[derive(Debug, Clone)]
pub struct DisasterReportDraft {
    pub disaster_type: String,
    pub margin: Priority,
    pub location: String,
    pub description: String,
    pub image_url: Option<String>,
    pub proof: Option<String>,
}

/// Wire body for the report endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSubmission {
    pub disaster_type: String,
    pub margin_of_disaster: Priority,
    pub location: String,
    pub image_url: String,
    pub proof: String,
    pub timestamp: String,
    pub description: String,
    pub accuracy: u32,
    pub status: String,
}

impl DisasterReportDraft {
    pub fn into_submission<R: Rng + ?Sized>(
        self,
        now: DateTime<Utc>,
        rng: &mut R,
    ) -> Result<ReportSubmission, ClientError> {
        if self.disaster_type.trim().is_empty() {
            return Err(ClientError::Validation("Please select a disaster type".into()));
        }
        if self.location.trim().is_empty() {
            return Err(ClientError::Validation("Please select a location".into()));
        }

        Ok(ReportSubmission {
            disaster_type: self.disaster_type.trim().to_lowercase(),
            margin_of_disaster: self.margin,
            location: self.location,
            image_url: non_empty_or_placeholder(self.image_url),
            proof: non_empty_or_placeholder(self.proof),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Millis, true),
            description: self.description,
            accuracy: rng.random_range(70..=99),
            status: "not_verified".into(),
        })
    }
}

fn non_empty_or_placeholder(value: Option<String>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.into())
}

pub struct ReportFormClient {
    client: Client,
    endpoint: String,
}

impl ReportFormClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), SAVE_REPORT_PATH),
        }
    }

    pub async fn submit(&self, draft: DisasterReportDraft) -> Result<(), ClientError> {
        let body = draft.into_submission(Utc::now(), &mut rand::rng())?;

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: format!("API request failed with status {}", status.as_u16()),
            });
        }

        info!("Disaster report submitted: {} at {}", body.disaster_type, body.location);
        Ok(())
    }
}
