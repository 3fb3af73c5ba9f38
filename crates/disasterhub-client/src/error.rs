use thiserror::Error;

/// Failures at the network boundary, plus the caller-side validation that
/// keeps a request from being sent at all.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Network error. Please check your internet connection.")]
    Network(#[source] reqwest::Error),

    #[error("{message}")]
    Http { status: u16, message: String },

    #[error("Request timed out. Please check your connection.")]
    Timeout,

    #[error("{0}")]
    Validation(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

impl ClientError {
    /// Classifies a reqwest failure, keeping timeouts distinguishable.
    pub fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err)
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }
}
