use crate::context::QueryContext;
use crate::error::ApiResult;
use crate::models::{
    Diagnostic, Location, MonikerData, MonikerKey, PackageInformationData, Position, Range,
    ResultKind, UploadId,
};
use async_trait::async_trait;

/// A page of results together with the size of the complete result set.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total_count: usize,
}

impl<T> Paged<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
        }
    }
}

/// Query surface of the precise code-intelligence store.
///
/// Every method is read-only and may be called concurrently. Pagination arguments are
/// signed so that a transport can forward client input untouched; negative values are
/// rejected with `ApiError::InvalidArgument` before any data is read.
#[async_trait]
pub trait CodeIntelService: Send + Sync {
    /// Monikers attached to every range containing `position`, one inner list per range.
    ///
    /// The outer list is ordered outside-in: ranges earlier in the list enclose the
    /// ranges later in the list. A missing document yields an empty list.
    async fn get_monikers_by_position(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        position: Position,
    ) -> ApiResult<Vec<Vec<MonikerData>>>;

    /// Locations within any of `upload_ids` carrying a moniker whose scheme and
    /// identifier equal one of `monikers`, plus the size of the complete match set.
    async fn get_bulk_moniker_locations(
        &self,
        ctx: &QueryContext,
        kind: ResultKind,
        upload_ids: &[UploadId],
        monikers: &[MonikerKey],
        limit: i64,
        offset: i64,
    ) -> ApiResult<Paged<Location>>;

    /// Hover text of the innermost range at `position` that has one.
    async fn get_hover(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        position: Position,
    ) -> ApiResult<Option<(String, Range)>>;

    /// Definition, reference, or implementation locations of the ranges at `position`,
    /// resolved within the same upload.
    async fn get_locations(
        &self,
        ctx: &QueryContext,
        kind: ResultKind,
        upload_id: UploadId,
        path: &str,
        position: Position,
        limit: i64,
        offset: i64,
    ) -> ApiResult<Paged<Location>>;

    /// Diagnostics of every document whose path starts with `path_prefix`.
    async fn get_diagnostics(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path_prefix: &str,
        limit: i64,
        offset: i64,
    ) -> ApiResult<Paged<Diagnostic>>;

    async fn get_package_information(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        package_information_id: &str,
    ) -> ApiResult<Option<PackageInformationData>>;
}
