pub mod auth;
pub mod emergencies;
pub mod error;
pub mod map;
pub mod middleware;
pub mod reports;
pub mod state;

use axum::{
    Json, Router,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};

pub use state::{AppState, AppStateInner};

/// Every dashboard route. Callers add tracing/CORS layers.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health))
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        .route("/auth/remembered", get(auth::remembered));

    let protected_routes = Router::new()
        .route("/auth/logout", post(auth::logout))
        .route("/reports", get(reports::list_reports))
        .route("/reports/refresh", post(reports::refresh_reports))
        .route("/reports/submit", post(reports::submit_report))
        .route("/reports/{id}", get(reports::get_report))
        .route("/reports/{id}/upvote", post(reports::upvote))
        .route("/reports/{id}/downvote", post(reports::downvote))
        .route(
            "/emergencies",
            post(emergencies::send_sos).get(emergencies::list_emergencies),
        )
        .route("/emergencies/pending", get(emergencies::pending))
        .route("/emergencies/pending/resend", post(emergencies::resend_pending))
        .route("/map/relief-centers", get(map::relief_centers))
        .route("/map/route", get(map::route))
        .route("/map/heatmap", get(map::heatmap))
        .layer(from_fn_with_state(state.clone(), middleware::require_auth));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
