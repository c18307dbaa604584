use thiserror::Error;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Rejections produced by the account and message rules. The message is
/// meant to be shown to the caller as is.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// A field or reference failed validation.
    #[error("{0}")]
    InvalidField(String),

    /// The entity collides with an existing unique one.
    #[error("{0}")]
    Conflict(String),

    /// Credentials did not match.
    #[error("{0}")]
    Unauthorized(String),

    /// The store itself failed.
    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn invalid_field(msg: impl Into<String>) -> Self {
        Self::InvalidField(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn unauthorized(msg: impl Into<String>) -> Self {
        Self::Unauthorized(msg.into())
    }
}
