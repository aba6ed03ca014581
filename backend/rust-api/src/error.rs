use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Domain error taxonomy. Every failure surfaces to the caller as a typed
/// result; nothing is silently defaulted or partially applied.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0} not found")]
    NotFound(String),

    /// Submission targets a content item that is neither a quiz nor the
    /// course exam.
    #[error("activity is not a quiz or exam")]
    NotAQuiz,

    /// Incomplete or invalid answer set. The message identifies the
    /// offending question or option; no completion record is written.
    #[error("malformed submission: {0}")]
    MalformedSubmission(String),

    /// User is not enrolled in the course owning the content item.
    #[error("user is not enrolled in this course")]
    Authorization,

    /// Identity header missing or empty; the auth gateway did not vouch
    /// for this request.
    #[error("missing or stale authentication")]
    Unauthenticated,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::NotAQuiz | ApiError::MalformedSubmission(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            ApiError::Authorization => StatusCode::FORBIDDEN,
            ApiError::Unauthenticated => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(what.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!("Internal error: {:#}", self);
        }
        let body = json!({
            "message": self.to_string(),
            "status": status.as_u16(),
        });
        (status, Json(body)).into_response()
    }
}
