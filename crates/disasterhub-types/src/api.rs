use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::Coordinates;
use crate::models::{EmergencyAlert, EmergencySummary, Priority, Report, Role, UserProfile};

// -- JWT Claims --

/// Session token claims issued by the API after login or registration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub role: Role,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: UserProfile,
    pub token: String,
}

// -- Reports --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportsResponse {
    pub reports: Vec<Report>,
    pub error: Option<String>,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
}

/// `report` is `None` when the id was unknown and nothing changed.
#[derive(Debug, Serialize, Deserialize)]
pub struct VoteResponse {
    pub report: Option<Report>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct DisasterReportRequest {
    #[serde(default)]
    pub disaster_type: String,
    #[serde(default)]
    pub margin_of_disaster: Priority,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
    pub proof: Option<String>,
}

// -- Emergencies --

/// SOS request from a dashboard user. Coordinates come from the caller's
/// own geolocation; when absent the server-side provider is consulted.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SosRequest {
    #[serde(default)]
    pub disaster_type: String,
    #[serde(default)]
    pub priority: Priority,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    pub id: Option<String>,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmergencyListResponse {
    pub emergencies: Vec<EmergencySummary>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PendingResponse {
    pub pending: Vec<EmergencyAlert>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ResendResponse {
    pub sent: usize,
    pub failed: usize,
}

// -- Map --

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    pub path: Vec<Coordinates>,
}

#[derive(Debug, Deserialize)]
pub struct HeatmapQuery {
    pub lat: f64,
    pub lng: f64,
    pub radius_km: Option<f64>,
    pub samples: Option<usize>,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
