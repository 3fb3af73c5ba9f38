use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use tracing::debug;

use disasterhub_types::api::{
    Claims, EmergencyListResponse, PendingResponse, ResendResponse, SosRequest, SubmitResponse,
};
use disasterhub_types::geo::Coordinates;

use crate::error::ApiError;
use crate::middleware::require_admin;
use crate::state::AppState;

/// POST /emergencies: validate, then forward the SOS upstream.
///
/// Coordinates in the body take precedence; otherwise the server's
/// geolocation provider is asked once.
pub async fn send_sos(
    State(state): State<AppState>,
    Json(req): Json<SosRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let location = match (req.latitude, req.longitude) {
        (Some(lat), Some(lng)) => Coordinates::new(lat, lng),
        _ => match state.geolocation.resolve().await {
            Ok(c) => Some(c),
            Err(e) => {
                debug!("Geolocation unavailable: {}", e);
                None
            }
        },
    };

    let outcome = state
        .emergencies
        .send_sos(&req.disaster_type, location, req.priority)
        .await?;

    let message = format!(
        "Emergency reported successfully! ID: {}",
        outcome.id.as_deref().unwrap_or("N/A")
    );

    Ok((
        StatusCode::CREATED,
        Json(SubmitResponse {
            id: outcome.id,
            message,
        }),
    ))
}

/// GET /emergencies: admin listing, with fallback row on failure.
pub async fn list_emergencies(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&claims)?;

    let listing = state.directory.list().await;
    Ok(Json(EmergencyListResponse {
        emergencies: listing.emergencies,
        error: listing.error,
    }))
}

pub async fn pending(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let pending = state.emergencies.pending()?;
    Ok(Json(PendingResponse { pending }))
}

pub async fn resend_pending(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state.emergencies.resend_pending().await?;
    Ok(Json(ResendResponse {
        sent: summary.sent,
        failed: summary.failed,
    }))
}
