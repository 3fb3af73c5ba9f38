use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::warn;

use disasterhub_client::ClientError;
use disasterhub_client::auth::AuthError;
use disasterhub_types::api::ErrorBody;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Missing or invalid session token")]
    Unauthorized,

    #[error("Admin access required")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Auth(e) => match e {
                AuthError::MissingCredentials
                | AuthError::MissingFields
                | AuthError::WeakPassword => StatusCode::BAD_REQUEST,
                AuthError::EmailTaken => StatusCode::CONFLICT,
                AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
                AuthError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Client(e) => match e {
                ClientError::Validation(_) => StatusCode::BAD_REQUEST,
                ClientError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                ClientError::Network(_) | ClientError::Http { .. } | ClientError::Decode(_) => {
                    StatusCode::BAD_GATEWAY
                }
            },
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            warn!("Request failed ({}): {}", status, self);
        }

        (status, Json(ErrorBody { message: self.to_string() })).into_response()
    }
}
