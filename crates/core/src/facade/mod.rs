use std::path::Path;
use std::sync::Arc;

use crate::error::StoreResult;
use crate::metrics::StoreMetrics;
use crate::query::IndexStore;
use crate::storage::MemoryBackend;

mod intel;

/// Store handle - the interface handed to transports and the CLI.
///
/// Cheap to clone; every clone queries the same store.
#[derive(Clone)]
pub struct StoreHandle {
    pub(crate) store: Arc<IndexStore>,
}

impl StoreHandle {
    pub fn new(store: IndexStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Handle over an existing in-memory backend.
    pub fn from_backend(backend: Arc<MemoryBackend>) -> Self {
        Self::new(IndexStore::new(backend))
    }

    /// Load the snapshot at `path`. An absent file yields an empty store.
    pub async fn open(path: &Path, metrics: Arc<dyn StoreMetrics>) -> StoreResult<Self> {
        let backend = match MemoryBackend::load_from(path).await? {
            Some(backend) => backend,
            None => {
                tracing::info!("No snapshot at {}, starting empty", path.display());
                MemoryBackend::new()
            }
        };
        Ok(Self::new(
            IndexStore::new(Arc::new(backend)).with_metrics(metrics),
        ))
    }

    pub fn store(&self) -> &IndexStore {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::NoopStoreMetrics;
    use crate::writer::UploadWriter;
    use crate::config::StoreConfig;
    use codenav_api::{
        CodeIntelService, DocumentData, Id, MonikerData, MonikerKind, Position, QueryContext,
        Range, RangeData, UploadId,
    };

    async fn handle_with_one_moniker() -> StoreHandle {
        let mut doc = DocumentData::default();
        doc.ranges.insert(
            Id::new("r1"),
            RangeData::new(Range::new(0, 0, 0, 10)).with_monikers(["m1"]),
        );
        doc.monikers.insert(
            Id::new("m1"),
            MonikerData {
                kind: MonikerKind::Export,
                scheme: "gomod".to_string(),
                identifier: "pkg:F".to_string(),
                package_information_id: None,
            },
        );
        let backend = Arc::new(MemoryBackend::new());
        UploadWriter::new(UploadId(1))
            .with_document("main.go", doc)
            .write_to(&backend, &StoreConfig::default())
            .await
            .unwrap();
        StoreHandle::from_backend(backend)
    }

    #[tokio::test]
    async fn test_open_missing_snapshot_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let handle = StoreHandle::open(&dir.path().join("none.snapshot"), Arc::new(NoopStoreMetrics))
            .await
            .unwrap();
        let ctx = QueryContext::new();
        let monikers = handle
            .get_monikers_by_position(&ctx, UploadId(1), "a.go", Position::new(0, 0))
            .await
            .unwrap();
        assert!(monikers.is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_queries() {
        use tokio::task::JoinSet;

        let handle = handle_with_one_moniker().await;
        let mut set = JoinSet::new();

        for _ in 0..10 {
            let h = handle.clone();
            set.spawn(async move {
                let ctx = QueryContext::new();
                for _ in 0..5 {
                    let found = h
                        .get_monikers_by_position(&ctx, UploadId(1), "main.go", Position::new(0, 4))
                        .await
                        .unwrap();
                    assert_eq!(found.len(), 1);
                }
            });
        }

        while let Some(result) = set.join_next().await {
            result.unwrap();
        }
    }

    #[test]
    fn test_blocking_access() {
        // Runtime built on a separate thread, as a synchronous caller would.
        std::thread::spawn(|| {
            let rt = tokio::runtime::Runtime::new().unwrap();
            let handle = rt.block_on(handle_with_one_moniker());
            let found = rt
                .block_on(handle.get_monikers_by_position(
                    &QueryContext::new(),
                    UploadId(1),
                    "main.go",
                    Position::new(0, 0),
                ))
                .unwrap();
            assert_eq!(found[0][0].identifier, "pkg:F");
        })
        .join()
        .unwrap();
    }
}
