use super::memory::BackendStats;
use super::records::{DocumentColumns, DocumentRecord, LocationRecord, ResultChunkRecord, UploadMetadata};
use crate::error::StoreResult;
use async_trait::async_trait;
use codenav_api::{MonikerKey, ResultKind, UploadId};

/// Read access to the persisted tables of every upload.
///
/// Implementations must only expose uploads that were written completely. Each call is
/// a single bounded read against one consistent view of the data.
#[async_trait]
pub trait IndexBackend: Send + Sync {
    async fn metadata(&self, upload_id: UploadId) -> StoreResult<Option<UploadMetadata>>;

    /// The document stored at exactly `path`. Should duplicates exist, any one of them
    /// may be returned.
    async fn document(
        &self,
        upload_id: UploadId,
        path: &str,
        columns: DocumentColumns,
    ) -> StoreResult<Option<DocumentRecord>>;

    /// Documents whose path starts with `prefix`, ordered by path.
    async fn documents_with_prefix(
        &self,
        upload_id: UploadId,
        prefix: &str,
        columns: DocumentColumns,
    ) -> StoreResult<Vec<DocumentRecord>>;

    async fn result_chunk(
        &self,
        upload_id: UploadId,
        index: u32,
    ) -> StoreResult<Option<ResultChunkRecord>>;

    /// Location records of `kind` whose upload is in `upload_ids` and whose
    /// (scheme, identifier) equals one of `monikers`, ordered by
    /// (upload, scheme, identifier). Duplicate inputs do not duplicate output.
    async fn moniker_locations(
        &self,
        kind: ResultKind,
        upload_ids: &[UploadId],
        monikers: &[MonikerKey],
    ) -> StoreResult<Vec<LocationRecord>>;

    /// Uploads with metadata, ascending.
    async fn upload_ids(&self) -> StoreResult<Vec<UploadId>>;

    async fn stats(&self) -> StoreResult<BackendStats>;
}
