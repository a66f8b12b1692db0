//! Read path of the store.
//!
//! [`IndexStore`] is stateless: every operation takes the caller's [`QueryContext`],
//! issues bounded reads against the backend, and decodes what it needs. Submodules group
//! the operations by the data they start from.

mod documents;
mod locations;
mod monikers;
mod page;

pub use page::Page;

use crate::error::{StoreError, StoreResult};
use crate::metrics::{NoopStoreMetrics, Outcome, StoreMetrics};
use crate::storage::IndexBackend;
use codenav_api::QueryContext;
use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

/// Operation names reported to [`StoreMetrics`] and in logs.
pub mod ops {
    pub const GET_DOCUMENT: &str = "GetDocument";
    pub const GET_MONIKERS_BY_POSITION: &str = "GetMonikersByPosition";
    pub const GET_RESULT_CHUNK: &str = "GetResultChunk";
    pub const GET_BULK_MONIKER_LOCATIONS: &str = "GetBulkMonikerLocations";
    pub const GET_HOVER: &str = "GetHover";
    pub const GET_LOCATIONS: &str = "GetLocations";
    pub const GET_DIAGNOSTICS: &str = "GetDiagnostics";
    pub const GET_PACKAGE_INFORMATION: &str = "GetPackageInformation";
}

pub struct IndexStore {
    backend: Arc<dyn IndexBackend>,
    metrics: Arc<dyn StoreMetrics>,
}

impl IndexStore {
    pub fn new(backend: Arc<dyn IndexBackend>) -> Self {
        Self {
            backend,
            metrics: Arc::new(NoopStoreMetrics),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn StoreMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn backend(&self) -> &Arc<dyn IndexBackend> {
        &self.backend
    }

    /// Run one operation, reporting its duration and outcome.
    async fn observe<T, F>(&self, op: &'static str, fut: F) -> StoreResult<T>
    where
        F: Future<Output = StoreResult<T>>,
    {
        let started = Instant::now();
        let result = fut.await;
        let outcome = match &result {
            Ok(_) => Outcome::Ok,
            Err(StoreError::NotFound(_)) => Outcome::NotFound,
            Err(StoreError::Cancelled) => Outcome::Cancelled,
            Err(e) => {
                if e.is_corrupt() {
                    tracing::warn!("{} failed: {}", op, e);
                } else {
                    tracing::debug!("{} failed: {}", op, e);
                }
                Outcome::Error
            }
        };
        self.metrics
            .observe_operation(op, started.elapsed(), outcome);
        result
    }

    fn count(&self, op: &'static str, field: &'static str, count: usize) {
        self.metrics.observe_count(op, field, count);
    }
}

/// Await a backend read unless `ctx` is cancelled first.
async fn fetch<T, F>(ctx: &QueryContext, fut: F) -> StoreResult<T>
where
    F: Future<Output = StoreResult<T>>,
{
    ctx.run(fut).await?
}
