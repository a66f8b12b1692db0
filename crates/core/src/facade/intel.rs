use crate::facade::StoreHandle;
use crate::query::Page;
use async_trait::async_trait;
use codenav_api::{
    ApiResult, CodeIntelService, Diagnostic, Location, MonikerData, MonikerKey, PackageInformationData,
    Paged, Position, QueryContext, Range, ResultKind, UploadId,
};

#[async_trait]
impl CodeIntelService for StoreHandle {
    async fn get_monikers_by_position(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        position: Position,
    ) -> ApiResult<Vec<Vec<MonikerData>>> {
        Ok(self
            .store
            .get_monikers_by_position(ctx, upload_id, path, position)
            .await?)
    }

    async fn get_bulk_moniker_locations(
        &self,
        ctx: &QueryContext,
        kind: ResultKind,
        upload_ids: &[UploadId],
        monikers: &[MonikerKey],
        limit: i64,
        offset: i64,
    ) -> ApiResult<Paged<Location>> {
        let page = Page::try_new(limit, offset)?;
        Ok(self
            .store
            .get_bulk_moniker_locations(ctx, kind, upload_ids, monikers, page)
            .await?)
    }

    async fn get_hover(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        position: Position,
    ) -> ApiResult<Option<(String, Range)>> {
        Ok(self.store.get_hover(ctx, upload_id, path, position).await?)
    }

    async fn get_locations(
        &self,
        ctx: &QueryContext,
        kind: ResultKind,
        upload_id: UploadId,
        path: &str,
        position: Position,
        limit: i64,
        offset: i64,
    ) -> ApiResult<Paged<Location>> {
        let page = Page::try_new(limit, offset)?;
        Ok(self
            .store
            .get_locations(ctx, kind, upload_id, path, position, page)
            .await?)
    }

    async fn get_diagnostics(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path_prefix: &str,
        limit: i64,
        offset: i64,
    ) -> ApiResult<Paged<Diagnostic>> {
        let page = Page::try_new(limit, offset)?;
        Ok(self
            .store
            .get_diagnostics(ctx, upload_id, path_prefix, page)
            .await?)
    }

    async fn get_package_information(
        &self,
        ctx: &QueryContext,
        upload_id: UploadId,
        path: &str,
        package_information_id: &str,
    ) -> ApiResult<Option<PackageInformationData>> {
        Ok(self
            .store
            .get_package_information(ctx, upload_id, path, package_information_id)
            .await?)
    }
}
