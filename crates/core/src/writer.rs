//! Write-side contract: turns the facts of one upload into stored records.
//!
//! Producing those facts from an uploaded index is the ingestion pipeline's job; this
//! module only lays them out the way the read path expects them (encoded columns,
//! result linkage sharded by the pinned hash, location rows grouped per moniker).

use crate::chunks::{num_result_chunks, result_chunk_index};
use crate::codec;
use crate::config::StoreConfig;
use crate::error::{CodecError, StoreError, StoreResult};
use crate::storage::MemoryBackend;
use crate::storage::records::{DocumentRecord, LocationRecord, ResultChunkRecord, UploadMetadata};
use codenav_api::{
    DocumentData, DocumentIdRangeId, Id, LocationData, MonikerKey, ResultChunkData, ResultKind,
    UploadId,
};
use std::collections::{BTreeMap, HashSet};

/// Every record of one upload, ready to be published.
#[derive(Debug, Clone)]
pub struct EncodedUpload {
    pub metadata: UploadMetadata,
    pub documents: Vec<DocumentRecord>,
    pub result_chunks: Vec<ResultChunkRecord>,
    pub locations: Vec<LocationRecord>,
}

impl EncodedUpload {
    pub fn upload_id(&self) -> UploadId {
        self.metadata.upload_id
    }

    /// Reject records that belong to another upload, repeat a document path, or point
    /// past the chunk count.
    pub fn validate(&self) -> StoreResult<()> {
        let id = self.metadata.upload_id;
        if self.metadata.num_result_chunks == 0 {
            return Err(StoreError::InvalidArgument(format!(
                "upload {id} declares zero result chunks"
            )));
        }
        let foreign = self
            .documents
            .iter()
            .map(|d| d.upload_id)
            .chain(self.result_chunks.iter().map(|c| c.upload_id))
            .chain(self.locations.iter().map(|l| l.upload_id))
            .find(|other| *other != id);
        if let Some(other) = foreign {
            return Err(StoreError::InvalidArgument(format!(
                "record of upload {other} inside upload {id}"
            )));
        }
        let mut paths = HashSet::with_capacity(self.documents.len());
        if let Some(doc) = self.documents.iter().find(|d| !paths.insert(d.path.as_str())) {
            return Err(StoreError::InvalidArgument(format!(
                "upload {id} has more than one document at {}",
                doc.path
            )));
        }
        if let Some(chunk) = self
            .result_chunks
            .iter()
            .find(|c| c.index >= self.metadata.num_result_chunks)
        {
            return Err(StoreError::InvalidArgument(format!(
                "result chunk {} out of range for upload {id} ({} chunks)",
                chunk.index, self.metadata.num_result_chunks
            )));
        }
        Ok(())
    }
}

/// Collects the facts of one upload.
pub struct UploadWriter {
    upload_id: UploadId,
    documents: BTreeMap<String, DocumentData>,
    scip_documents: BTreeMap<String, Vec<u8>>,
    results: BTreeMap<Id, Vec<(String, Id)>>,
    locations: BTreeMap<(ResultKind, MonikerKey), Vec<LocationData>>,
}

impl UploadWriter {
    pub fn new(upload_id: UploadId) -> Self {
        Self {
            upload_id,
            documents: BTreeMap::new(),
            scip_documents: BTreeMap::new(),
            results: BTreeMap::new(),
            locations: BTreeMap::new(),
        }
    }

    pub fn with_document(mut self, path: impl Into<String>, document: DocumentData) -> Self {
        self.documents.insert(path.into(), document);
        self
    }

    /// Store an opaque SCIP payload at `path`. Reads of it report `Unsupported`.
    pub fn with_scip_document(mut self, path: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.scip_documents.insert(path.into(), bytes);
        self
    }

    /// Declare the (path, range) pairs a definition/reference/implementation result
    /// resolves to. Order is preserved.
    pub fn with_result<P, R>(
        mut self,
        result_id: impl Into<Id>,
        ranges: impl IntoIterator<Item = (P, R)>,
    ) -> Self
    where
        P: Into<String>,
        R: Into<Id>,
    {
        let entry = self.results.entry(result_id.into()).or_default();
        entry.extend(ranges.into_iter().map(|(p, r)| (p.into(), r.into())));
        self
    }

    /// Append location rows for `moniker` to the `kind` table.
    pub fn with_locations(
        mut self,
        kind: ResultKind,
        moniker: MonikerKey,
        rows: impl IntoIterator<Item = LocationData>,
    ) -> Self {
        self.locations.entry((kind, moniker)).or_default().extend(rows);
        self
    }

    pub fn encode(&self, config: &StoreConfig) -> Result<EncodedUpload, CodecError> {
        let num_chunks = num_result_chunks(self.results.len(), config);

        let mut documents = Vec::with_capacity(self.documents.len() + self.scip_documents.len());
        for (path, document) in &self.documents {
            documents.push(codec::encode_document(self.upload_id, path, document)?);
        }
        for (path, bytes) in &self.scip_documents {
            let mut record = DocumentRecord::empty(self.upload_id, path.clone());
            record.scip_document = Some(bytes.clone());
            documents.push(record);
        }

        let mut result_chunks = Vec::new();
        for (index, chunk) in self.shard_results(num_chunks) {
            result_chunks.push(codec::encode_result_chunk(self.upload_id, index, &chunk)?);
        }

        let mut locations = Vec::with_capacity(self.locations.len());
        for ((kind, moniker), rows) in &self.locations {
            locations.push(codec::encode_locations(*kind, self.upload_id, moniker, rows)?);
        }

        Ok(EncodedUpload {
            metadata: UploadMetadata {
                upload_id: self.upload_id,
                num_result_chunks: num_chunks,
            },
            documents,
            result_chunks,
            locations,
        })
    }

    /// Encode and publish into `backend`.
    pub async fn write_to(&self, backend: &MemoryBackend, config: &StoreConfig) -> StoreResult<()> {
        let upload = self
            .encode(config)
            .map_err(|e| StoreError::Internal(format!("encoding upload {}: {e}", self.upload_id)))?;
        backend.insert_upload(upload).await
    }

    /// Group results by chunk. Document IDs are assigned per chunk, in path order of first
    /// use. Empty chunks are not emitted.
    fn shard_results(&self, num_chunks: u32) -> BTreeMap<u32, ResultChunkData> {
        let mut chunks: BTreeMap<u32, (BTreeMap<String, Id>, ResultChunkData)> = BTreeMap::new();

        for (result_id, ranges) in &self.results {
            let index = result_chunk_index(result_id.as_str(), num_chunks);
            let (doc_ids, chunk) = chunks.entry(index).or_default();

            let mut pairs = Vec::with_capacity(ranges.len());
            for (path, range_id) in ranges {
                let next = doc_ids.len() + 1;
                let document_id = doc_ids
                    .entry(path.clone())
                    .or_insert_with(|| Id::new(next.to_string()))
                    .clone();
                chunk
                    .document_paths
                    .insert(document_id.clone(), path.clone());
                pairs.push(DocumentIdRangeId {
                    document_id,
                    range_id: range_id.clone(),
                });
            }
            chunk.document_id_range_ids.insert(result_id.clone(), pairs);
        }

        chunks
            .into_iter()
            .map(|(index, (_, chunk))| (index, chunk))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codenav_api::Range;

    fn small_chunks() -> StoreConfig {
        StoreConfig {
            results_per_result_chunk: 2,
            max_result_chunks: 8,
            ..StoreConfig::default()
        }
    }

    #[test]
    fn test_results_land_in_hashed_chunk() {
        let mut writer = UploadWriter::new(UploadId(5));
        for i in 0..9 {
            writer = writer.with_result(format!("res{i}"), [("a.go", format!("r{i}"))]);
        }
        let upload = writer.encode(&small_chunks()).unwrap();
        assert_eq!(upload.metadata.num_result_chunks, 4);

        for record in &upload.result_chunks {
            let chunk = codec::decode_result_chunk(record).unwrap();
            for result_id in chunk.document_id_range_ids.keys() {
                assert_eq!(result_chunk_index(result_id.as_str(), 4), record.index);
            }
        }
        let total: usize = upload
            .result_chunks
            .iter()
            .map(|r| codec::decode_result_chunk(r).unwrap().document_id_range_ids.len())
            .sum();
        assert_eq!(total, 9);
        upload.validate().unwrap();
    }

    #[test]
    fn test_document_ids_are_chunk_local_and_shared() {
        let upload = UploadWriter::new(UploadId(1))
            .with_result("only", [("a.go", "r1"), ("b.go", "r2"), ("a.go", "r3")])
            .encode(&StoreConfig::default())
            .unwrap();
        assert_eq!(upload.result_chunks.len(), 1);

        let chunk = codec::decode_result_chunk(&upload.result_chunks[0]).unwrap();
        assert_eq!(chunk.document_paths.len(), 2);
        let pairs = &chunk.document_id_range_ids[&Id::new("only")];
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].document_id, pairs[2].document_id);
        assert_eq!(chunk.document_paths[&pairs[1].document_id], "b.go");
    }

    #[test]
    fn test_locations_append_per_moniker() {
        let key = MonikerKey::new("gomod", "leftpad");
        let upload = UploadWriter::new(UploadId(2))
            .with_locations(
                ResultKind::References,
                key.clone(),
                [LocationData::new("a.go", Range::new(0, 0, 0, 1))],
            )
            .with_locations(
                ResultKind::References,
                key.clone(),
                [LocationData::new("b.go", Range::new(0, 0, 0, 1))],
            )
            .encode(&StoreConfig::default())
            .unwrap();
        assert_eq!(upload.locations.len(), 1);
        let rows = codec::decode_locations(&upload.locations[0]).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].uri, "b.go");
    }

    #[test]
    fn test_validate_rejects_foreign_records() {
        let mut upload = UploadWriter::new(UploadId(1))
            .with_document("a.go", DocumentData::default())
            .encode(&StoreConfig::default())
            .unwrap();
        upload.documents[0].upload_id = UploadId(2);
        assert!(matches!(
            upload.validate(),
            Err(StoreError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn test_same_path_twice_is_rejected() {
        let writer = UploadWriter::new(UploadId(3))
            .with_document("a.go", DocumentData::default())
            .with_scip_document("a.go", b"scip".to_vec());
        let upload = writer.encode(&StoreConfig::default()).unwrap();
        assert!(matches!(
            upload.validate(),
            Err(StoreError::InvalidArgument(ref m)) if m.contains("a.go")
        ));

        let backend = MemoryBackend::new();
        let err = writer
            .write_to(&backend, &StoreConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
        assert_eq!(backend.stats().await.documents, 0);
    }
}
