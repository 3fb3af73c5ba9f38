use chrono::{DateTime, Utc};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use disasterhub_types::models::EmergencySummary;

use crate::error::ClientError;

pub const GET_EMERGENCY_PATH: &str = "/emergency/getemergency";

const INVALID_FORMAT: &str = "Invalid data format received from API";

/// Admin view of submitted emergencies. `error` is set when the listing
/// could not be loaded and the fallback row is shown instead.
#[derive(Debug, Clone)]
pub struct EmergencyListing {
    pub emergencies: Vec<EmergencySummary>,
    pub error: Option<String>,
}

pub struct EmergencyDirectory {
    client: Client,
    endpoint: String,
}

impl EmergencyDirectory {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            client,
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), GET_EMERGENCY_PATH),
        }
    }

    pub async fn list(&self) -> EmergencyListing {
        let result = match self.fetch().await {
            Ok(data) => normalize_emergencies(&data),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(emergencies) => {
                debug!("Loaded {} emergencies", emergencies.len());
                EmergencyListing {
                    emergencies,
                    error: None,
                }
            }
            Err(message) => {
                warn!("Error fetching emergency data: {}", message);
                EmergencyListing {
                    emergencies: vec![fallback_emergency()],
                    error: Some(message),
                }
            }
        }
    }

    async fn fetch(&self) -> Result<Value, ClientError> {
        let resp = self
            .client
            .get(&self.endpoint)
            .send()
            .await
            .map_err(ClientError::from_reqwest)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ClientError::Http {
                status: status.as_u16(),
                message: format!("HTTP error! status: {}", status.as_u16()),
            });
        }

        resp.json().await.map_err(ClientError::from_reqwest)
    }
}

/// Accepts a bare array, `{ "data": [...] }`, or a single record.
pub fn normalize_emergencies(data: &Value) -> Result<Vec<EmergencySummary>, String> {
    let records: Vec<&Value> = match data {
        Value::Array(items) => items.iter().collect(),
        Value::Object(obj) => match obj.get("data") {
            Some(Value::Array(items)) => items.iter().collect(),
            _ => vec![data],
        },
        _ => return Err(INVALID_FORMAT.into()),
    };

    Ok(records
        .into_iter()
        .enumerate()
        .map(|(index, record)| summarize(index, record))
        .collect())
}

pub fn fallback_emergency() -> EmergencySummary {
    EmergencySummary {
        id: "fallback-1".into(),
        disaster_type: "earthquake".into(),
        user_name: "System User".into(),
        priority: "high".into(),
        time: "Just now".into(),
        location: "Unknown location".into(),
    }
}

fn summarize(index: usize, record: &Value) -> EmergencySummary {
    EmergencySummary {
        id: string_field(record, "_id").unwrap_or_else(|| format!("emergency-{}", index)),
        disaster_type: string_field(record, "disasterType").unwrap_or_else(|| "unknown".into()),
        user_name: record
            .get("user")
            .and_then(|u| string_field(u, "name"))
            .unwrap_or_else(|| "Anonymous User".into()),
        priority: string_field(record, "priority").unwrap_or_else(|| "medium".into()),
        time: string_field(record, "createdAt")
            .map(|raw| format_created_at(&raw))
            .unwrap_or_else(|| "Recently".into()),
        location: format_location(record),
    }
}

fn string_field(record: &Value, key: &str) -> Option<String> {
    record
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn format_created_at(raw: &str) -> String {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc).format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// `[lng, lat]` rendered latitude first; a missing component reads as 0.
fn format_location(record: &Value) -> String {
    let Some(coords) = record
        .get("location")
        .and_then(|l| l.get("coordinates"))
        .and_then(Value::as_array)
    else {
        return "Location not available".into();
    };

    let lng = coords.first().and_then(Value::as_f64).unwrap_or(0.0);
    let lat = coords.get(1).and_then(Value::as_f64).unwrap_or(0.0);
    format!("{:.4}° N, {:.4}° E", lat, lng)
}
