use super::{IndexStore, Page, fetch, ops};
use crate::chunks::result_chunk_index;
use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::ranges::find_enclosing_ranges;
use crate::storage::records::DocumentColumns;
use codenav_api::{
    DocumentData, Id, Location, Paged, Position, QueryContext, RangeData, ResultChunkData,
    ResultKind, UploadId,
};
use std::collections::{HashMap, HashSet};

impl IndexStore {
    /// The linkage of one result: its (document, range) pairs and the paths of the
    /// documents they reference. Nothing else from the shard is returned.
    pub async fn get_result_chunk(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        result_id: &str,
    ) -> StoreResult<ResultChunkData> {
        self.observe(ops::GET_RESULT_CHUNK, async {
            self.resolve_result(ctx, upload_id, result_id).await
        })
        .await
    }

    /// Definitions, references, or implementations of the ranges at `position`.
    ///
    /// Results are collected outside-in and resolved within the same upload. Results the
    /// shard has no entry for are skipped. Duplicate locations are reported once.
    pub async fn get_locations(
        &self,
        ctx: &QueryContext,
        kind: ResultKind,
        upload_id: UploadId,
        path: &str,
        position: Position,
        page: Page,
    ) -> StoreResult<Paged<Location>> {
        self.observe(ops::GET_LOCATIONS, async {
            let Some(document) = self
                .fetch_document(ctx, upload_id, path, DocumentColumns::RANGES)
                .await?
            else {
                return Ok(Paged::empty());
            };

            let mut result_ids: Vec<&Id> = Vec::new();
            for range in find_enclosing_ranges(&document, position) {
                if let Some(id) = result_id(range, kind) {
                    if !result_ids.contains(&id) {
                        result_ids.push(id);
                    }
                }
            }
            self.count(ops::GET_LOCATIONS, "results", result_ids.len());

            let mut targets = Vec::new();
            for id in result_ids {
                let chunk = match self.resolve_result(ctx, upload_id, id.as_str()).await {
                    Ok(chunk) => chunk,
                    Err(StoreError::NotFound(what)) => {
                        tracing::debug!("Skipping {} result {}: {}", kind, id, what);
                        continue;
                    }
                    Err(e) => return Err(e),
                };
                for pair in chunk.document_id_range_ids.get(id).into_iter().flatten() {
                    if let Some(target_path) = chunk.document_paths.get(&pair.document_id) {
                        targets.push((target_path.clone(), pair.range_id.clone()));
                    }
                }
            }

            let mut documents: HashMap<String, Option<DocumentData>> = HashMap::new();
            let mut seen = HashSet::new();
            let mut all = Vec::new();
            for (target_path, range_id) in targets {
                if !documents.contains_key(&target_path) {
                    let target = self
                        .fetch_document(ctx, upload_id, &target_path, DocumentColumns::RANGES)
                        .await?;
                    documents.insert(target_path.clone(), target);
                }
                let Some(range) = documents
                    .get(&target_path)
                    .and_then(|d| d.as_ref())
                    .and_then(|d| d.ranges.get(&range_id))
                    .map(RangeData::range)
                else {
                    tracing::trace!("Dangling range {} in {}", range_id, target_path);
                    continue;
                };
                let location = Location {
                    upload_id,
                    path: target_path,
                    range,
                };
                if seen.insert(location.clone()) {
                    all.push(location);
                }
            }

            let paged = page.apply(all);
            tracing::debug!(
                "{} at {}:{} in upload {}: {} of {}",
                kind,
                path,
                position,
                upload_id,
                paged.items.len(),
                paged.total_count
            );
            Ok(paged)
        })
        .await
    }

    async fn resolve_result(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        result_id: &str,
    ) -> StoreResult<ResultChunkData> {
        let metadata = fetch(ctx, self.backend.metadata(upload_id))
            .await?
            .ok_or_else(|| StoreError::NotFound(format!("upload {upload_id}")))?;

        let index = result_chunk_index(result_id, metadata.num_result_chunks);
        let context = || format!("upload {upload_id} result chunk {index}");

        let record = fetch(ctx, self.backend.result_chunk(upload_id, index))
            .await?
            .ok_or_else(|| StoreError::NotFound(context()))?;
        let mut chunk =
            codec::decode_result_chunk(&record).map_err(|e| StoreError::corrupt(context(), e))?;

        let key = Id::new(result_id);
        let pairs = chunk
            .document_id_range_ids
            .remove(&key)
            .ok_or_else(|| StoreError::NotFound(format!("result {result_id} in {}", context())))?;

        let mut document_paths = HashMap::new();
        for pair in &pairs {
            let path = chunk.document_paths.get(&pair.document_id).ok_or_else(|| {
                StoreError::inconsistent(
                    context(),
                    format!("document {} of result {result_id} has no path", pair.document_id),
                )
            })?;
            document_paths.insert(pair.document_id.clone(), path.clone());
        }

        Ok(ResultChunkData {
            document_paths,
            document_id_range_ids: HashMap::from([(key, pairs)]),
        })
    }
}

fn result_id(range: &RangeData, kind: ResultKind) -> Option<&Id> {
    match kind {
        ResultKind::Definitions => range.definition_result_id.as_ref(),
        ResultKind::References => range.reference_result_id.as_ref(),
        ResultKind::Implementations => range.implementation_result_id.as_ref(),
    }
}
