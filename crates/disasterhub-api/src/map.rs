use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};

use disasterhub_client::heatmap::{DEFAULT_RADIUS_KM, DEFAULT_SAMPLES, severity_heatmap};
use disasterhub_types::api::{HeatmapQuery, RouteQuery, RouteResponse};
use disasterhub_types::geo::Coordinates;

use crate::error::ApiError;
use crate::state::AppState;

const MAX_SAMPLES: usize = 1000;
const MAX_RADIUS_KM: f64 = 50.0;

pub async fn relief_centers(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.relief_centers.clone())
}

/// Driving route from the caller through the relief centres.
pub async fn route(
    State(state): State<AppState>,
    Query(q): Query<RouteQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let origin = Coordinates::new(q.lat, q.lng)
        .ok_or_else(|| ApiError::BadRequest("Invalid coordinates".into()))?;

    let path = state.routing.route(origin, &state.relief_centers).await?;
    Ok(Json(RouteResponse { path }))
}

pub async fn heatmap(Query(q): Query<HeatmapQuery>) -> Result<impl IntoResponse, ApiError> {
    let center = Coordinates::new(q.lat, q.lng)
        .ok_or_else(|| ApiError::BadRequest("Invalid coordinates".into()))?;

    let radius_km = q.radius_km.unwrap_or(DEFAULT_RADIUS_KM);
    if !radius_km.is_finite() || radius_km < 0.0 || radius_km > MAX_RADIUS_KM {
        return Err(ApiError::BadRequest(format!(
            "radius_km must be between 0 and {}",
            MAX_RADIUS_KM
        )));
    }
    let samples = q.samples.unwrap_or(DEFAULT_SAMPLES).min(MAX_SAMPLES);

    let collection = severity_heatmap(center, radius_km, samples, &mut rand::rng());
    Ok(Json(collection))
}
