use codenav_api::{ApiError, Cancelled};
use thiserror::Error;

/// Failure to turn a stored blob back into its value, or a value into a blob.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("zstd error: {0}")]
    Compression(#[from] std::io::Error),
    #[error("MSGPACK decode error: {0}")]
    Decode(#[from] rmp_serde::decode::Error),
    #[error("MSGPACK encode error: {0}")]
    Encode(#[from] rmp_serde::encode::Error),
    #[error("invalid value: {0}")]
    Invalid(String),
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Corrupt data ({context}): {source}")]
    CorruptData {
        context: String,
        #[source]
        source: CodecError,
    },
    #[error("Inconsistent data ({context}): {reason}")]
    Inconsistent { context: String, reason: String },
    #[error("Query cancelled")]
    Cancelled,
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
    #[error("Unsupported: {0}")]
    Unsupported(&'static str),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl StoreError {
    pub fn corrupt(context: impl Into<String>, source: CodecError) -> Self {
        StoreError::CorruptData {
            context: context.into(),
            source,
        }
    }

    pub fn inconsistent(context: impl Into<String>, reason: impl Into<String>) -> Self {
        StoreError::Inconsistent {
            context: context.into(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound(_))
    }

    pub fn is_corrupt(&self) -> bool {
        matches!(
            self,
            StoreError::CorruptData { .. } | StoreError::Inconsistent { .. }
        )
    }
}

impl From<Cancelled> for StoreError {
    fn from(_: Cancelled) -> Self {
        StoreError::Cancelled
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(what) => ApiError::NotFound(what),
            e @ (StoreError::CorruptData { .. } | StoreError::Inconsistent { .. }) => {
                ApiError::CorruptData(e.to_string())
            }
            StoreError::Cancelled => ApiError::Cancelled,
            StoreError::InvalidArgument(msg) => ApiError::InvalidArgument(msg),
            StoreError::Unsupported(what) => ApiError::Unsupported(what.to_string()),
            e @ (StoreError::Io(_) | StoreError::Internal(_)) => ApiError::Internal(e.to_string()),
        }
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;
