use axum::http::StatusCode;
use axum::response::IntoResponse;
use thiserror::Error;

/// Failures from the data access layer.
///
/// Every variant is terminal for the fetch that produced it; nothing retries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("API error: {status} {status_text}")]
    Transport { status: u16, status_text: String },

    #[error("schema error: {0}")]
    Schema(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid request: {0}")]
    InvalidInput(String),

    /// First failure observed in a concurrent batch. Partial successes are dropped.
    #[error("{context} failed: {source}")]
    Aggregate {
        context: String,
        #[source]
        source: Box<FetchError>,
    },
}

impl FetchError {
    pub fn in_batch(self, context: impl Into<String>) -> Self {
        match self {
            // Keep the innermost context when batches nest.
            FetchError::Aggregate { .. } => self,
            other => FetchError::Aggregate {
                context: context.into(),
                source: Box::new(other),
            },
        }
    }

    /// HTTP status of the underlying transport failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Transport { status, .. } => Some(*status),
            FetchError::Aggregate { source, .. } => source.status(),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
        }
    }
}
