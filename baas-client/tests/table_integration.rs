// baas-client/tests/table_integration.rs
// Typed table access over the in-memory backend

use std::sync::Arc;

use baas_client::{CallKind, ClientError, DataStore, MemoryBackend, Query, Table};
use rust_decimal::Decimal;
use serde_json::json;
use shared::models::{ActiveToggle, Category, ServiceListing, ServiceListingDraft};
use uuid::Uuid;

fn listing_row(id: Uuid, version: i64) -> serde_json::Value {
    json!({
        "id": id,
        "vendor_id": Uuid::new_v4(),
        "category_id": Uuid::new_v4(),
        "title": "Rose petal decor",
        "description": "Petals and candles",
        "base_price": 3000,
        "discounted_price": 2500,
        "service_type": "decoration",
        "location": "Mumbai",
        "images": [],
        "approval_status": "pending",
        "is_active": true,
        "version": version
    })
}

fn setup() -> (MemoryBackend, Table<ServiceListing>) {
    let backend = MemoryBackend::new();
    let store: Arc<dyn DataStore> = Arc::new(backend.clone());
    (backend, Table::new(store))
}

#[tokio::test]
async fn test_versioned_update_bumps_version() {
    let (backend, listings) = setup();
    let id = Uuid::new_v4();
    backend.seed("service_listings", [listing_row(id, 4)]);

    let current = listings.get(id).await.unwrap();
    let mut draft = ServiceListingDraft::from(&current);
    draft.title = "Rose petal and balloon decor".to_string();
    draft.base_price = Decimal::from(3500);

    let updated = listings.update_versioned(id, 4, &draft).await.unwrap();
    assert_eq!(updated.title, "Rose petal and balloon decor");
    assert_eq!(updated.version, 5);
    assert_eq!(updated.base_price, Decimal::from(3500));
}

#[tokio::test]
async fn test_stale_version_is_conflict() {
    let (backend, listings) = setup();
    let id = Uuid::new_v4();
    backend.seed("service_listings", [listing_row(id, 7)]);
    let draft = ServiceListingDraft::from(&listings.get(id).await.unwrap());

    let err = listings.update_versioned(id, 6, &draft).await.unwrap_err();
    assert!(matches!(err, ClientError::Conflict(_)), "got {:?}", err);

    // Row untouched
    let row = listings.get(id).await.unwrap();
    assert_eq!(row.version, 7);
}

#[tokio::test]
async fn test_missing_row_is_not_found() {
    let (backend, listings) = setup();
    let id = Uuid::new_v4();
    backend.seed("service_listings", [listing_row(id, 0)]);
    let draft = ServiceListingDraft::from(&listings.get(id).await.unwrap());

    let err = listings
        .update_versioned(Uuid::new_v4(), 0, &draft)
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::NotFound(_)), "got {:?}", err);
    assert!(matches!(
        listings.delete(Uuid::new_v4()).await,
        Err(ClientError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_patch_sends_only_the_field() {
    let backend = MemoryBackend::new();
    let categories: Table<Category> = Table::new(Arc::new(backend.clone()));
    let id = Uuid::new_v4();
    backend.seed(
        "categories",
        [json!({"id": id, "name": "Balloons", "sort_order": 1, "is_active": true})],
    );

    let updated = categories
        .patch(id, &ActiveToggle { is_active: false })
        .await
        .unwrap();
    assert!(!updated.is_active);

    let writes = backend.write_calls();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].kind, CallKind::Update);
    assert_eq!(writes[0].payload, Some(json!({"is_active": false})));
}

#[tokio::test]
async fn test_list_where_filters() {
    let (backend, listings) = setup();
    let vendor = Uuid::new_v4();
    let mut mine = listing_row(Uuid::new_v4(), 0);
    mine["vendor_id"] = json!(vendor);
    backend.seed(
        "service_listings",
        [mine, listing_row(Uuid::new_v4(), 0), listing_row(Uuid::new_v4(), 0)],
    );

    let rows = listings
        .list_where(Query::new().eq("vendor_id", vendor.to_string()))
        .await
        .unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].vendor_id, vendor);
    assert_eq!(listings.list().await.unwrap().len(), 3);
}
