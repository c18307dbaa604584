use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::error;

use chirp_core::{ServiceError, ServiceResult};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Rejections go back as plain text with the rule's message. Store and
/// runtime failures are logged and answered with a generic 500.
impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Service(ServiceError::InvalidField(msg)) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Service(ServiceError::Conflict(msg)) => (StatusCode::CONFLICT, msg),
            ApiError::Service(ServiceError::Unauthorized(msg)) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Service(ServiceError::Store(e)) => {
                error!("Store error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
            ApiError::Join(e) => {
                error!("spawn_blocking join error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };

        (status, message).into_response()
    }
}

/// Run a store-backed operation off the async runtime.
pub(crate) async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> ServiceResult<T> + Send + 'static,
    T: Send + 'static,
{
    let result = tokio::task::spawn_blocking(f).await?;
    Ok(result?)
}
