use crate::view::{DiagnosticRow, LocationRow, MonikerRow, format_range};
use crate::{DocumentPosition, PageArgs};
use codenav_api::{CodeIntelService, Location, MonikerKey, Paged, QueryContext, ResultKind, UploadId};
use codenav_core::StoreHandle;
use serde::Serialize;
use serde_json::json;
use tabled::Table;

type CliResult = Result<String, Box<dyn std::error::Error>>;

pub async fn monikers(handle: &StoreHandle, at: &DocumentPosition, json: bool) -> CliResult {
    let ctx = QueryContext::new();
    let ranges = handle
        .get_monikers_by_position(&ctx, at.upload_id(), &at.path, at.position())
        .await?;
    tracing::info!(
        "monikers {}:{} upload {}: {} ranges",
        at.path,
        at.position(),
        at.upload,
        ranges.len()
    );

    if json {
        return Ok(serde_json::to_string_pretty(&ranges)?);
    }
    if ranges.is_empty() {
        return Ok("No ranges at this position.".to_string());
    }
    Ok(Table::new(MonikerRow::rows(&ranges)).to_string())
}

pub async fn locations(
    handle: &StoreHandle,
    kind: ResultKind,
    at: &DocumentPosition,
    page: PageArgs,
    json: bool,
) -> CliResult {
    let ctx = QueryContext::new();
    let paged = handle
        .get_locations(
            &ctx,
            kind,
            at.upload_id(),
            &at.path,
            at.position(),
            page.limit,
            page.offset,
        )
        .await?;
    render_locations(paged, page, json)
}

pub async fn bulk(
    handle: &StoreHandle,
    kind: ResultKind,
    uploads: &[UploadId],
    monikers: &[MonikerKey],
    page: PageArgs,
    json: bool,
) -> CliResult {
    let ctx = QueryContext::new();
    let paged = handle
        .get_bulk_moniker_locations(&ctx, kind, uploads, monikers, page.limit, page.offset)
        .await?;
    render_locations(paged, page, json)
}

pub async fn hover(handle: &StoreHandle, at: &DocumentPosition, json: bool) -> CliResult {
    let ctx = QueryContext::new();
    let hover = handle
        .get_hover(&ctx, at.upload_id(), &at.path, at.position())
        .await?;

    match (hover, json) {
        (Some((text, range)), true) => Ok(serde_json::to_string_pretty(&json!({
            "text": text,
            "range": range,
        }))?),
        (None, true) => Ok("null".to_string()),
        (Some((text, range)), false) => Ok(format!("{}\n\n{}", format_range(&range), text)),
        (None, false) => Ok("No hover at this position.".to_string()),
    }
}

pub async fn diagnostics(
    handle: &StoreHandle,
    upload_id: UploadId,
    prefix: &str,
    page: PageArgs,
    json: bool,
) -> CliResult {
    let ctx = QueryContext::new();
    let paged = handle
        .get_diagnostics(&ctx, upload_id, prefix, page.limit, page.offset)
        .await?;
    if json {
        return paged_json(&paged);
    }
    let rows: Vec<DiagnosticRow> = paged.items.iter().map(DiagnosticRow::from).collect();
    Ok(with_footer(Table::new(rows).to_string(), &paged, page))
}

fn render_locations(paged: Paged<Location>, page: PageArgs, json: bool) -> CliResult {
    if json {
        return paged_json(&paged);
    }
    let rows: Vec<LocationRow> = paged.items.iter().map(LocationRow::from).collect();
    Ok(with_footer(Table::new(rows).to_string(), &paged, page))
}

fn paged_json<T: Serialize>(paged: &Paged<T>) -> CliResult {
    Ok(serde_json::to_string_pretty(&json!({
        "total_count": paged.total_count,
        "items": paged.items,
    }))?)
}

fn with_footer<T>(table: String, paged: &Paged<T>, page: PageArgs) -> String {
    format!(
        "{table}\nShowing {} of {} (offset {})",
        paged.items.len(),
        paged.total_count,
        page.offset
    )
}
