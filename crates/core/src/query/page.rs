use crate::error::{StoreError, StoreResult};
use codenav_api::Paged;

/// A validated `limit`/`offset` window over an ordered result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    pub const fn new(limit: usize, offset: usize) -> Self {
        Self { limit, offset }
    }

    /// Validate client-supplied bounds. Negative values are rejected.
    pub fn try_new(limit: i64, offset: i64) -> StoreResult<Self> {
        let limit = usize::try_from(limit).map_err(|_| {
            StoreError::InvalidArgument(format!("limit must not be negative, got {limit}"))
        })?;
        let offset = usize::try_from(offset).map_err(|_| {
            StoreError::InvalidArgument(format!("offset must not be negative, got {offset}"))
        })?;
        Ok(Self { limit, offset })
    }

    /// Cut the page out of the complete, ordered result set.
    pub fn apply<T>(&self, all: Vec<T>) -> Paged<T> {
        let total_count = all.len();
        let items = all
            .into_iter()
            .skip(self.offset)
            .take(self.limit)
            .collect();
        Paged { items, total_count }
    }
}
