use crate::context::Cancelled;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Corrupt data: {0}")]
    CorruptData(String),
    #[error("Query cancelled")]
    Cancelled,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<Cancelled> for ApiError {
    fn from(_: Cancelled) -> Self {
        ApiError::Cancelled
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
