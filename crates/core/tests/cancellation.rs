mod common;

use codenav_api::{ApiError, CodeIntelService, Position, QueryContext, ResultKind, UploadId};
use codenav_core::query::ops;
use codenav_core::{IndexStore, InMemoryMetrics, Page, StoreError, StoreHandle};
use common::{leftpad, leftpad_backend, pad_backend};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

#[tokio::test]
async fn test_cancelled_context_yields_no_output() {
    let handle = StoreHandle::from_backend(pad_backend().await);
    let token = CancellationToken::new();
    let ctx = QueryContext::with_token(token.clone());
    token.cancel();

    let monikers = handle
        .get_monikers_by_position(&ctx, UploadId(1), "pad.go", Position::new(1, 3))
        .await;
    assert!(matches!(monikers, Err(ApiError::Cancelled)));

    let locations = handle
        .get_locations(&ctx, ResultKind::References, UploadId(1), "pad.go", Position::new(0, 1), 10, 0)
        .await;
    assert!(matches!(locations, Err(ApiError::Cancelled)));

    let hover = handle
        .get_hover(&ctx, UploadId(1), "pad.go", Position::new(1, 3))
        .await;
    assert!(matches!(hover, Err(ApiError::Cancelled)));
}

#[tokio::test]
async fn test_expired_deadline_cancels_bulk_scan() {
    let handle = StoreHandle::from_backend(leftpad_backend().await);
    let ctx = QueryContext::new().with_timeout(Duration::ZERO);

    let result = handle
        .get_bulk_moniker_locations(&ctx, ResultKind::References, &[UploadId(2)], &[leftpad()], 10, 0)
        .await;
    assert!(matches!(result, Err(ApiError::Cancelled)));
}

#[tokio::test]
async fn test_metrics_record_outcomes() {
    let metrics = Arc::new(InMemoryMetrics::new());
    let store = IndexStore::new(pad_backend().await).with_metrics(metrics.clone());
    let ctx = QueryContext::new();

    store
        .get_monikers_by_position(&ctx, UploadId(1), "pad.go", Position::new(1, 3))
        .await
        .unwrap();
    store
        .get_monikers_by_position(&ctx, UploadId(1), "pad.go", Position::new(3, 0))
        .await
        .unwrap();
    let missing = store.get_result_chunk(&ctx, UploadId(1), "nope").await;
    assert!(matches!(missing, Err(StoreError::NotFound(_))));

    let cancelled = QueryContext::new();
    cancelled.cancel();
    let err = store
        .get_locations(
            &cancelled,
            ResultKind::Definitions,
            UploadId(1),
            "pad.go",
            Position::new(1, 3),
            Page::new(10, 0),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Cancelled));

    let monikers = metrics.operation(ops::GET_MONIKERS_BY_POSITION).unwrap();
    assert_eq!(monikers.calls, 2);
    assert_eq!(monikers.errors, 0);
    assert_eq!(metrics.count(ops::GET_MONIKERS_BY_POSITION, "ranges"), Some(1));

    let chunks = metrics.operation(ops::GET_RESULT_CHUNK).unwrap();
    assert_eq!(chunks.calls, 1);
    assert_eq!(chunks.errors, 0);

    let locations = metrics.operation(ops::GET_LOCATIONS).unwrap();
    assert_eq!(locations.cancelled, 1);
    assert!(metrics.operation(ops::GET_DIAGNOSTICS).is_none());
}
