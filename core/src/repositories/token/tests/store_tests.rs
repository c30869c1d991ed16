//! Unit tests for the document-backed token store

use std::sync::Arc;
use std::time::Duration;

use chrono::{TimeZone, Utc};

use gs_shared::config::TokenStoreConfig;

use crate::context::OpContext;
use crate::domain::entities::token::TokenInfo;
use crate::errors::StoreError;
use crate::repositories::token::{DocumentTokenStore, TokenStore};
use crate::store::{MemoryDocumentStore, MemoryStoreError};

const COLLECTION: &str = "oauth2_tokens";

fn setup() -> (Arc<MemoryDocumentStore>, DocumentTokenStore<MemoryDocumentStore>) {
    let backend = Arc::new(MemoryDocumentStore::new());
    let store = DocumentTokenStore::new(Arc::clone(&backend), COLLECTION);
    (backend, store)
}

fn token(code: &str, access: &str, refresh: &str) -> TokenInfo {
    let issued = Utc.with_ymd_and_hms(2024, 3, 9, 8, 30, 0).unwrap();
    TokenInfo::new("client-1", "user-1")
        .with_redirect_uri("https://app.example/cb")
        .with_scope("read write")
        .with_code(code, issued, Duration::from_secs(600))
        .with_code_challenge("challenge", "S256")
        .with_access(access, issued, Duration::from_secs(3600))
        .with_refresh(refresh, issued, Duration::from_secs(604_800))
}

#[tokio::test]
async fn test_create_then_get_by_code_returns_same_fields() {
    let (_, store) = setup();
    let ctx = OpContext::background();
    let info = token("abc123", "acc456", "ref789");

    store.create(&ctx, &info).await.unwrap();

    let found = store.get_by_code(&ctx, "abc123").await.unwrap();
    assert_eq!(found, info);
}

#[tokio::test]
async fn test_get_by_each_key() {
    let (_, store) = setup();
    let ctx = OpContext::background();
    let info = token("abc123", "acc456", "ref789");
    store.create(&ctx, &info).await.unwrap();

    assert_eq!(store.get_by_access(&ctx, "acc456").await.unwrap(), info);
    assert_eq!(store.get_by_refresh(&ctx, "ref789").await.unwrap(), info);

    // Values are only matched against their own field
    let cross = store.get_by_code(&ctx, "acc456").await;
    assert!(matches!(cross, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn test_get_unknown_is_not_found() {
    let (_, store) = setup();
    let ctx = OpContext::background();

    assert!(matches!(store.get_by_code(&ctx, "missing").await, Err(StoreError::NotFound)));
    assert!(matches!(store.get_by_access(&ctx, "missing").await, Err(StoreError::NotFound)));
    assert!(matches!(store.get_by_refresh(&ctx, "missing").await, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn test_remove_unknown_is_noop() {
    let (backend, store) = setup();
    let ctx = OpContext::background();
    store.create(&ctx, &token("abc123", "acc456", "ref789")).await.unwrap();

    store.remove_by_access(&ctx, "not-stored").await.unwrap();
    store.remove_by_code(&ctx, "not-stored").await.unwrap();
    store.remove_by_refresh(&ctx, "not-stored").await.unwrap();

    assert_eq!(backend.len(COLLECTION).await, 1);
    assert!(store.get_by_access(&ctx, "acc456").await.is_ok());
}

#[tokio::test]
async fn test_remove_by_refresh_then_get_is_not_found() {
    let (_, store) = setup();
    let ctx = OpContext::background();
    let info = token("abc123", "acc456", "ref789");
    store.create(&ctx, &info).await.unwrap();

    store.remove_by_refresh(&ctx, &info.refresh).await.unwrap();

    let result = store.get_by_refresh(&ctx, &info.refresh).await;
    assert!(matches!(result, Err(StoreError::NotFound)));
}

#[tokio::test]
async fn test_create_invalid_token_info_writes_nothing() {
    let (backend, store) = setup();
    let ctx = OpContext::background();

    let result = store.create(&ctx, &TokenInfo::default()).await;
    assert!(matches!(result, Err(StoreError::InvalidTokenInfo)));

    let blank = TokenInfo::new("", "").with_scope("");
    let result = store.create(&ctx, &blank).await;
    assert!(matches!(result, Err(StoreError::InvalidTokenInfo)));

    assert!(backend.is_empty(COLLECTION).await);
    assert_eq!(backend.round_trips(), 0);
}

#[tokio::test]
async fn test_remove_by_code_deletes_whole_record() {
    let (backend, store) = setup();
    let ctx = OpContext::background();
    let issued = Utc::now();
    let info = TokenInfo::new("client-1", "user-1")
        .with_code("abc123", issued, Duration::from_secs(60))
        .with_access("acc456", issued, Duration::from_secs(3600));
    store.create(&ctx, &info).await.unwrap();

    let by_code = store.get_by_code(&ctx, "abc123").await.unwrap();
    let by_access = store.get_by_access(&ctx, "acc456").await.unwrap();
    assert_eq!(by_code, by_access);

    store.remove_by_code(&ctx, "abc123").await.unwrap();

    assert!(matches!(store.get_by_code(&ctx, "abc123").await, Err(StoreError::NotFound)));
    assert!(matches!(store.get_by_access(&ctx, "acc456").await, Err(StoreError::NotFound)));
    assert!(backend.is_empty(COLLECTION).await);
}

#[tokio::test]
async fn test_empty_key_value_never_matches() {
    let (backend, store) = setup();
    let ctx = OpContext::background();
    let access_only = TokenInfo::new("client-1", "user-1")
        .with_access("acc456", Utc::now(), Duration::from_secs(3600));
    store.create(&ctx, &access_only).await.unwrap();
    let trips = backend.round_trips();

    assert!(matches!(store.get_by_code(&ctx, "").await, Err(StoreError::NotFound)));
    assert!(matches!(store.get_by_refresh(&ctx, "").await, Err(StoreError::NotFound)));
    store.remove_by_code(&ctx, "").await.unwrap();
    store.remove_by_refresh(&ctx, "").await.unwrap();

    assert_eq!(backend.round_trips(), trips);
    assert_eq!(store.get_by_access(&ctx, "acc456").await.unwrap(), access_only);
}

#[tokio::test]
async fn test_duplicate_keys_are_not_deduplicated() {
    let (backend, store) = setup();
    let ctx = OpContext::background();
    store.create(&ctx, &token("same", "acc-1", "ref-1")).await.unwrap();
    store.create(&ctx, &token("same", "acc-2", "ref-2")).await.unwrap();
    assert_eq!(backend.count_matching(COLLECTION, "Code", "same").await, 2);

    let found = store.get_by_code(&ctx, "same").await.unwrap();
    assert!(found.access == "acc-1" || found.access == "acc-2");

    store.remove_by_code(&ctx, "same").await.unwrap();
    assert_eq!(backend.count_matching(COLLECTION, "Code", "same").await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_are_all_retrievable() {
    let (_, store) = setup();
    let store = Arc::new(store);

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..32 {
        let store = Arc::clone(&store);
        tasks.spawn(async move {
            let info = token(&format!("code-{i}"), &format!("acc-{i}"), &format!("ref-{i}"));
            store.create(&OpContext::background(), &info).await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    let ctx = OpContext::background();
    for i in 0..32 {
        let by_code = store.get_by_code(&ctx, &format!("code-{i}")).await.unwrap();
        let by_access = store.get_by_access(&ctx, &format!("acc-{i}")).await.unwrap();
        let by_refresh = store.get_by_refresh(&ctx, &format!("ref-{i}")).await.unwrap();
        assert_eq!(by_code.access, format!("acc-{i}"));
        assert_eq!(by_access, by_code);
        assert_eq!(by_refresh, by_code);
    }
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_operations_are_serialized() {
    let backend = Arc::new(MemoryDocumentStore::new().with_latency(Duration::from_millis(5)));
    let store = Arc::new(DocumentTokenStore::new(Arc::clone(&backend), COLLECTION));

    let mut tasks = tokio::task::JoinSet::new();
    for i in 0..6 {
        let store = Arc::clone(&store);
        tasks.spawn(async move {
            let ctx = OpContext::background();
            let code = format!("code-{i}");
            store.create(&ctx, &token(&code, "a", "r")).await?;
            store.get_by_code(&ctx, &code).await?;
            store.remove_by_code(&ctx, &code).await
        });
    }
    while let Some(joined) = tasks.join_next().await {
        joined.unwrap().unwrap();
    }

    assert_eq!(backend.peak_in_flight(), 1);
    assert!(backend.is_empty(COLLECTION).await);
}

#[tokio::test]
async fn test_expired_context_fails_without_round_trip() {
    let (backend, store) = setup();
    let ctx = OpContext::background().with_timeout(Duration::ZERO);
    let info = token("abc123", "acc456", "ref789");

    assert!(matches!(store.create(&ctx, &info).await, Err(StoreError::DeadlineExceeded)));
    assert!(matches!(store.get_by_code(&ctx, "abc123").await, Err(StoreError::DeadlineExceeded)));
    assert!(matches!(store.get_by_access(&ctx, "").await, Err(StoreError::DeadlineExceeded)));
    assert!(matches!(store.remove_by_refresh(&ctx, "ref789").await, Err(StoreError::DeadlineExceeded)));

    assert_eq!(backend.round_trips(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_configured_timeout_applies() {
    let backend = Arc::new(MemoryDocumentStore::new().with_latency(Duration::from_secs(10)));
    let config = TokenStoreConfig::new(COLLECTION).with_timeout_secs(2);
    let store = DocumentTokenStore::from_config(Arc::clone(&backend), &config);
    assert_eq!(store.collection().timeout(), Duration::from_secs(2));
    assert_eq!(store.collection().name(), COLLECTION);

    let result = store.get_by_access(&OpContext::background(), "acc456").await;
    assert!(matches!(result, Err(StoreError::DeadlineExceeded)));
}

#[tokio::test]
async fn test_backend_error_passes_through() {
    let (backend, store) = setup();
    backend.fail_next("unavailable");

    let err = store
        .create(&OpContext::background(), &token("abc123", "acc456", "ref789"))
        .await
        .unwrap_err();

    let inner = err.as_backend().and_then(|e| e.downcast_ref::<MemoryStoreError>()).unwrap();
    assert_eq!(inner.0, "unavailable");
    assert!(backend.is_empty(COLLECTION).await);
}

#[tokio::test]
async fn test_usable_as_trait_object() {
    let backend: Arc<dyn crate::store::DocumentStore> = Arc::new(MemoryDocumentStore::new());
    let store: Arc<dyn TokenStore> = Arc::new(DocumentTokenStore::new(backend, COLLECTION));
    let ctx = OpContext::background();
    let info = token("abc123", "acc456", "ref789");

    store.create(&ctx, &info).await.unwrap();
    assert_eq!(store.get_by_refresh(&ctx, "ref789").await.unwrap(), info);
}
