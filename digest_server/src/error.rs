use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use digest_core::error::DigestError;
use serde::Serialize;
use utoipa::ToResponse;

#[derive(Debug, Serialize, ToResponse)]
pub struct ErrorServer {
    pub message: String,
    pub status: u16,
}

impl std::fmt::Display for ErrorServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl IntoResponse for ErrorServer {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

impl From<DigestError> for ErrorServer {
    fn from(err: DigestError) -> Self {
        log::error!("Digest run failed: {}", err);

        let (status, message) = match err {
            DigestError::Generation { .. } => (
                StatusCode::BAD_GATEWAY,
                "Summarization failed, try again later".to_string(),
            ),
            DigestError::Durable(_) | DigestError::Serialization(_) => (
                StatusCode::SERVICE_UNAVAILABLE,
                "Storage unavailable".to_string(),
            ),
            DigestError::Cancelled => (
                StatusCode::REQUEST_TIMEOUT,
                "Request cancelled".to_string(),
            ),
            DigestError::Config(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        ErrorServer {
            message,
            status: status.into(),
        }
    }
}

impl From<tokio::task::JoinError> for ErrorServer {
    fn from(err: tokio::task::JoinError) -> Self {
        ErrorServer {
            message: format!("Summarization task failed: {}", err),
            status: StatusCode::INTERNAL_SERVER_ERROR.into(),
        }
    }
}
