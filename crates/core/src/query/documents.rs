use super::{IndexStore, Page, fetch, ops};
use crate::codec::{self, DocumentPayload};
use crate::error::{StoreError, StoreResult};
use crate::ranges::find_enclosing_ranges;
use crate::storage::records::{DocumentColumns, DocumentRecord};
use codenav_api::{
    Diagnostic, DocumentData, Id, PackageInformationData, Paged, Position, QueryContext, Range,
    UploadId,
};

impl IndexStore {
    /// The complete document stored at `path`, if any.
    pub async fn get_document(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
    ) -> StoreResult<Option<DocumentData>> {
        self.observe(ops::GET_DOCUMENT, async {
            self.fetch_document(ctx, upload_id, path, DocumentColumns::ALL)
                .await
        })
        .await
    }

    pub async fn get_hover(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        position: Position,
    ) -> StoreResult<Option<(String, Range)>> {
        self.observe(ops::GET_HOVER, async {
            let Some(document) = self
                .fetch_document(ctx, upload_id, path, DocumentColumns::RANGES_AND_HOVERS)
                .await?
            else {
                return Ok(None);
            };

            let ranges = find_enclosing_ranges(&document, position);
            self.count(ops::GET_HOVER, "ranges", ranges.len());

            // Innermost first.
            let hover = ranges.into_iter().rev().find_map(|r| {
                let text = document.hover_results.get(r.hover_result_id.as_ref()?)?;
                Some((text.clone(), r.range()))
            });
            tracing::debug!(
                "Hover at {}:{} in upload {}: {}",
                path,
                position,
                upload_id,
                if hover.is_some() { "found" } else { "none" }
            );
            Ok(hover)
        })
        .await
    }

    /// Diagnostics of every document under `path_prefix`, by path then stored order.
    pub async fn get_diagnostics(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path_prefix: &str,
        page: Page,
    ) -> StoreResult<Paged<Diagnostic>> {
        self.observe(ops::GET_DIAGNOSTICS, async {
            let records = fetch(
                ctx,
                self.backend
                    .documents_with_prefix(upload_id, path_prefix, DocumentColumns::DIAGNOSTICS),
            )
            .await?;
            self.count(ops::GET_DIAGNOSTICS, "documents", records.len());

            let mut all = Vec::new();
            for record in &records {
                ctx.check()?;
                let document = decode_lsif(record)?;
                all.extend(document.diagnostics.into_iter().map(|data| Diagnostic {
                    upload_id,
                    path: record.path.clone(),
                    data,
                }));
            }

            let paged = page.apply(all);
            tracing::debug!(
                "Diagnostics under {:?} in upload {}: {} of {}",
                path_prefix,
                upload_id,
                paged.items.len(),
                paged.total_count
            );
            Ok(paged)
        })
        .await
    }

    pub async fn get_package_information(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        package_information_id: &str,
    ) -> StoreResult<Option<PackageInformationData>> {
        self.observe(ops::GET_PACKAGE_INFORMATION, async {
            let document = self
                .fetch_document(ctx, upload_id, path, DocumentColumns::PACKAGES)
                .await?;
            Ok(document.and_then(|mut d| {
                d.package_information
                    .remove(&Id::new(package_information_id))
            }))
        })
        .await
    }

    /// Read and decode the requested columns of one document.
    pub(super) async fn fetch_document(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        columns: DocumentColumns,
    ) -> StoreResult<Option<DocumentData>> {
        let record = fetch(ctx, self.backend.document(upload_id, path, columns)).await?;
        match record {
            Some(record) => decode_lsif(&record).map(Some),
            None => {
                tracing::trace!("No document {} in upload {}", path, upload_id);
                Ok(None)
            }
        }
    }
}

fn decode_lsif(record: &DocumentRecord) -> StoreResult<DocumentData> {
    match codec::decode_document(record) {
        Ok(DocumentPayload::Lsif(document)) => Ok(document),
        Ok(DocumentPayload::Scip(_)) => Err(StoreError::Unsupported("SCIP documents")),
        Err(e) => Err(StoreError::corrupt(
            format!("upload {} document {}", record.upload_id, record.path),
            e,
        )),
    }
}
