use super::{IndexStore, Page, fetch, ops};
use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::ranges::find_enclosing_ranges;
use crate::storage::records::DocumentColumns;
use codenav_api::{
    Location, MonikerData, MonikerKey, Paged, Position, QueryContext, ResultKind, UploadId,
};

impl IndexStore {
    /// Monikers of every range containing `position`, one list per range, outside-in.
    ///
    /// Moniker IDs with no entry in the document's moniker map are skipped. A missing
    /// document or a position outside every range yields an empty list.
    pub async fn get_monikers_by_position(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        position: Position,
    ) -> StoreResult<Vec<Vec<MonikerData>>> {
        self.observe(ops::GET_MONIKERS_BY_POSITION, async {
            let Some(document) = self
                .fetch_document(ctx, upload_id, path, DocumentColumns::RANGES_AND_MONIKERS)
                .await?
            else {
                return Ok(Vec::new());
            };

            let ranges = find_enclosing_ranges(&document, position);
            self.count(ops::GET_MONIKERS_BY_POSITION, "ranges", ranges.len());

            let monikers: Vec<Vec<MonikerData>> = ranges
                .iter()
                .map(|range| {
                    range
                        .moniker_ids
                        .iter()
                        .filter_map(|id| document.monikers.get(id).cloned())
                        .collect()
                })
                .collect();

            tracing::debug!(
                "Found {} ranges at {}:{} in upload {}",
                monikers.len(),
                path,
                position,
                upload_id
            );
            Ok(monikers)
        })
        .await
    }

    /// Locations of `kind` for any of `monikers` within any of `upload_ids`.
    ///
    /// Rows are ordered by (upload, scheme, identifier) and then by stored order. The
    /// page and the total count come from the same read.
    pub async fn get_bulk_moniker_locations(
        &self,
        ctx: &QueryContext,
        kind: ResultKind,
        upload_ids: &[UploadId],
        monikers: &[MonikerKey],
        page: Page,
    ) -> StoreResult<Paged<Location>> {
        self.observe(ops::GET_BULK_MONIKER_LOCATIONS, async {
            if upload_ids.is_empty() || monikers.is_empty() {
                return Ok(Paged::empty());
            }

            let records = fetch(
                ctx,
                self.backend.moniker_locations(kind, upload_ids, monikers),
            )
            .await?;
            self.count(ops::GET_BULK_MONIKER_LOCATIONS, "groups", records.len());

            let mut skip = page.offset;
            let mut items = Vec::with_capacity(page.limit.min(64));
            let mut total_count = 0;

            for record in &records {
                ctx.check()?;
                let rows = codec::decode_locations(record).map_err(|e| {
                    StoreError::corrupt(
                        format!(
                            "upload {} {} locations of {}",
                            record.upload_id,
                            kind,
                            record.key()
                        ),
                        e,
                    )
                })?;
                total_count += rows.len();

                if items.len() >= page.limit {
                    continue;
                }
                let skipped = skip.min(rows.len());
                skip -= skipped;
                for row in rows.into_iter().skip(skipped) {
                    if items.len() >= page.limit {
                        break;
                    }
                    items.push(Location {
                        upload_id: record.upload_id,
                        range: row.range(),
                        path: row.uri,
                    });
                }
            }

            self.count(ops::GET_BULK_MONIKER_LOCATIONS, "rows", total_count);
            tracing::debug!(
                "Bulk {} lookup over {} uploads and {} monikers: {} of {}",
                kind,
                upload_ids.len(),
                monikers.len(),
                items.len(),
                total_count
            );
            Ok(Paged { items, total_count })
        })
        .await
    }
}
