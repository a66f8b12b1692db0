pub mod context;
pub mod error;
pub mod models;
pub mod service;

pub use context::{Cancelled, QueryContext};
pub use error::{ApiError, ApiResult};
pub use models::*;
pub use service::{CodeIntelService, Paged};
