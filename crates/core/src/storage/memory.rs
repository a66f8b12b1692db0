//! In-memory backend.
//!
//! Readers take a cheap snapshot (an `Arc` clone) of the current tables. Writers build a
//! new version and swap it in, so a read never observes a partially written upload and
//! every call works against one consistent version.

use super::backend::IndexBackend;
use super::records::{DocumentColumns, DocumentRecord, LocationRecord, ResultChunkRecord, UploadMetadata};
use crate::error::StoreResult;
use crate::writer::EncodedUpload;
use async_trait::async_trait;
use codenav_api::{MonikerKey, ResultKind, UploadId};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::RwLock;

pub(crate) type LocationKey = (ResultKind, UploadId, String, String);

#[derive(Debug, Clone, Default)]
pub(crate) struct Tables {
    pub metadata: BTreeMap<UploadId, UploadMetadata>,
    pub documents: BTreeMap<(UploadId, String), DocumentRecord>,
    pub result_chunks: BTreeMap<(UploadId, u32), ResultChunkRecord>,
    pub locations: BTreeMap<LocationKey, LocationRecord>,
}

impl Tables {
    /// Drop every record of `upload_id`. Returns the number of records removed.
    fn remove_upload(&mut self, upload_id: UploadId) -> usize {
        let before = self.len();
        self.metadata.remove(&upload_id);
        self.documents.retain(|(id, _), _| *id != upload_id);
        self.result_chunks.retain(|(id, _), _| *id != upload_id);
        self.locations.retain(|(_, id, _, _), _| *id != upload_id);
        before - self.len()
    }

    fn insert_upload(&mut self, upload: EncodedUpload) {
        let upload_id = upload.metadata.upload_id;
        self.metadata.insert(upload_id, upload.metadata);
        for doc in upload.documents {
            self.documents.insert((upload_id, doc.path.clone()), doc);
        }
        for chunk in upload.result_chunks {
            self.result_chunks.insert((upload_id, chunk.index), chunk);
        }
        for loc in upload.locations {
            let key = (loc.kind, upload_id, loc.scheme.clone(), loc.identifier.clone());
            self.locations.insert(key, loc);
        }
    }

    fn len(&self) -> usize {
        self.metadata.len() + self.documents.len() + self.result_chunks.len() + self.locations.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BackendStats {
    pub uploads: usize,
    pub documents: usize,
    pub result_chunks: usize,
    pub location_records: usize,
}

pub struct MemoryBackend {
    current: RwLock<Arc<Tables>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::from_tables(Tables::default())
    }

    pub(crate) fn from_tables(tables: Tables) -> Self {
        Self {
            current: RwLock::new(Arc::new(tables)),
        }
    }

    pub(crate) async fn snapshot(&self) -> Arc<Tables> {
        self.current.read().await.clone()
    }

    /// Publish an upload, replacing any earlier data stored under the same ID.
    pub async fn insert_upload(&self, upload: EncodedUpload) -> StoreResult<()> {
        upload.validate()?;
        let upload_id = upload.metadata.upload_id;
        let counts = (
            upload.documents.len(),
            upload.result_chunks.len(),
            upload.locations.len(),
        );

        let mut lock = self.current.write().await;
        let mut tables = Tables::clone(&lock);
        let replaced = tables.remove_upload(upload_id);
        tables.insert_upload(upload);
        *lock = Arc::new(tables);

        tracing::info!(
            "Published upload {} ({} documents, {} result chunks, {} location records, {} replaced)",
            upload_id,
            counts.0,
            counts.1,
            counts.2,
            replaced
        );
        Ok(())
    }

    /// Remove every record of the given uploads. Returns the number of records removed.
    pub async fn delete_uploads(&self, upload_ids: &[UploadId]) -> usize {
        if upload_ids.is_empty() {
            return 0;
        }
        let mut lock = self.current.write().await;
        let mut tables = Tables::clone(&lock);
        let removed: usize = upload_ids
            .iter()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(|id| tables.remove_upload(*id))
            .sum();
        *lock = Arc::new(tables);
        tracing::info!("Deleted {} records for {} uploads", removed, upload_ids.len());
        removed
    }

    /// The subset of `upload_ids` that have metadata, ascending.
    pub async fn ids_with_meta(&self, upload_ids: &[UploadId]) -> Vec<UploadId> {
        let tables = self.snapshot().await;
        upload_ids
            .iter()
            .copied()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .filter(|id| tables.metadata.contains_key(id))
            .collect()
    }

    pub async fn upload_ids(&self) -> Vec<UploadId> {
        self.snapshot().await.metadata.keys().copied().collect()
    }

    pub async fn stats(&self) -> BackendStats {
        let tables = self.snapshot().await;
        BackendStats {
            uploads: tables.metadata.len(),
            documents: tables.documents.len(),
            result_chunks: tables.result_chunks.len(),
            location_records: tables.locations.len(),
        }
    }
}

#[async_trait]
impl IndexBackend for MemoryBackend {
    async fn metadata(&self, upload_id: UploadId) -> StoreResult<Option<UploadMetadata>> {
        Ok(self.snapshot().await.metadata.get(&upload_id).copied())
    }

    async fn document(
        &self,
        upload_id: UploadId,
        path: &str,
        columns: DocumentColumns,
    ) -> StoreResult<Option<DocumentRecord>> {
        let tables = self.snapshot().await;
        Ok(tables
            .documents
            .get(&(upload_id, path.to_string()))
            .map(|record| columns.project(record)))
    }

    async fn documents_with_prefix(
        &self,
        upload_id: UploadId,
        prefix: &str,
        columns: DocumentColumns,
    ) -> StoreResult<Vec<DocumentRecord>> {
        let tables = self.snapshot().await;
        Ok(tables
            .documents
            .range((upload_id, prefix.to_string())..)
            .take_while(|((id, path), _)| *id == upload_id && path.starts_with(prefix))
            .map(|(_, record)| columns.project(record))
            .collect())
    }

    async fn result_chunk(
        &self,
        upload_id: UploadId,
        index: u32,
    ) -> StoreResult<Option<ResultChunkRecord>> {
        Ok(self
            .snapshot()
            .await
            .result_chunks
            .get(&(upload_id, index))
            .cloned())
    }

    async fn moniker_locations(
        &self,
        kind: ResultKind,
        upload_ids: &[UploadId],
        monikers: &[MonikerKey],
    ) -> StoreResult<Vec<LocationRecord>> {
        let tables = self.snapshot().await;
        let uploads: BTreeSet<UploadId> = upload_ids.iter().copied().collect();
        let monikers: BTreeSet<&MonikerKey> = monikers.iter().collect();

        let mut records = Vec::new();
        for upload_id in uploads {
            for moniker in &monikers {
                let key = (
                    kind,
                    upload_id,
                    moniker.scheme.clone(),
                    moniker.identifier.clone(),
                );
                if let Some(record) = tables.locations.get(&key) {
                    records.push(record.clone());
                }
            }
        }
        Ok(records)
    }

    async fn upload_ids(&self) -> StoreResult<Vec<UploadId>> {
        Ok(MemoryBackend::upload_ids(self).await)
    }

    async fn stats(&self) -> StoreResult<BackendStats> {
        Ok(MemoryBackend::stats(self).await)
    }
}
