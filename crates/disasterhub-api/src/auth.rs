use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};

use disasterhub_types::api::{AuthResponse, Claims, LoginRequest, RegisterRequest};
use disasterhub_types::models::StoredUser;

use crate::error::ApiError;
use crate::state::AppState;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.authenticator.register(&req)?;
    let token = create_token(&state.jwt_secret, &user)?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: user.profile(),
            token,
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state.authenticator.login(&req)?;
    let token = create_token(&state.jwt_secret, &user)?;

    Ok(Json(AuthResponse {
        user: user.profile(),
        token,
    }))
}

/// Clears the stored current user. Local state models a single browser
/// session, so this is shared by every caller of this server instance.
pub async fn logout(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    state.authenticator.logout()?;
    Ok(StatusCode::NO_CONTENT)
}

/// Email and role saved by a previous "remember me" login, if any.
///
/// Public so the login form can prefill before a token exists. Like the rest
/// of the local session state it is process-wide, not per caller.
pub async fn remembered(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    Ok(Json(state.authenticator.remembered()?))
}

fn create_token(secret: &str, user: &StoredUser) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user.id.clone(),
        username: user.username.clone(),
        role: user.role,
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
