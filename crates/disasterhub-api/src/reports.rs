use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use disasterhub_client::report_form::DisasterReportDraft;
use disasterhub_types::api::{Claims, DisasterReportRequest, ReportsResponse, VoteResponse};
use disasterhub_types::models::VoteDirection;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn list_reports(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> impl IntoResponse {
    let snapshot = state.feed.snapshot(&claims.sub).await;

    Json(ReportsResponse {
        reports: snapshot.reports,
        error: snapshot.error,
        loading: snapshot.loading,
        last_updated: snapshot.last_updated,
    })
}

pub async fn get_report(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let report = state
        .feed
        .report(&claims.sub, &id)
        .await
        .ok_or_else(|| ApiError::NotFound(format!("Report {}", id)))?;
    Ok(Json(report))
}

pub async fn upvote(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let report = state.feed.vote(&claims.sub, &id, VoteDirection::Up).await;
    Json(VoteResponse { report })
}

pub async fn downvote(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> impl IntoResponse {
    let report = state.feed.vote(&claims.sub, &id, VoteDirection::Down).await;
    Json(VoteResponse { report })
}

/// Runs one fetch cycle outside the poll schedule.
pub async fn refresh_reports(State(state): State<AppState>) -> impl IntoResponse {
    let outcome = state.feed.refresh().await;
    Json(serde_json::json!({
        "count": outcome.count,
        "fallback": outcome.fallback,
    }))
}

pub async fn submit_report(
    State(state): State<AppState>,
    Json(req): Json<DisasterReportRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = DisasterReportDraft {
        disaster_type: req.disaster_type,
        margin: req.margin_of_disaster,
        location: req.location,
        description: req.description,
        image_url: req.image_url,
        proof: req.proof,
    };

    state.report_form.submit(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({ "message": "Report submitted successfully" })),
    ))
}
