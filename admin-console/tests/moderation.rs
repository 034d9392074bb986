//! Listing, vendor and edit screens against the in-memory backend

mod common;

use baas_client::CallKind;
use common::*;
use http::StatusCode;
use serde_json::json;
use uuid::Uuid;

fn seed_listings(t: &TestApp) -> Vec<serde_json::Value> {
    let rows = vec![
        listing_row("Balloon arch", 2500.0, "approved"),
        listing_row("Neon birthday sign", 1800.0, "pending"),
        listing_row("Rose petal entrance", 4200.0, "pending"),
    ];
    t.backend.seed("service_listings", rows.clone());
    rows
}

#[tokio::test]
async fn test_listing_search_is_case_insensitive() {
    let t = TestApp::new();
    seed_listings(&t);
    let session = t.admin().await;

    let (status, body) = t.get("/admin/api/services?search=BALLOON", &session).await;
    assert_eq!(status, StatusCode::OK);
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["title"], "Balloon arch");
    assert!(rows[0]["price"].is_object());

    // Description text is searched too
    let (_, body) = t.get("/admin/api/services?search=private%20screenings", &session).await;
    assert_eq!(body.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_listing_status_filter_and_sort() {
    let t = TestApp::new();
    seed_listings(&t);
    let session = t.admin().await;

    let (_, body) = t
        .get("/admin/api/services?status=pending&sort=base_price&dir=desc", &session)
        .await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, ["Rose petal entrance", "Neon birthday sign"]);
}

#[tokio::test]
async fn test_toggle_writes_only_that_field() {
    let t = TestApp::new();
    let rows = seed_listings(&t);
    let id = rows[0]["id"].as_str().unwrap();
    let session = t.admin().await;

    let (status, body) = t
        .put(
            &format!("/admin/api/services/{id}/active"),
            &session,
            json!({ "is_active": false }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["is_active"], false);

    let writes = t.backend.write_calls();
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].kind, CallKind::Update);
    assert_eq!(writes[0].target, "service_listings");
    assert_eq!(writes[0].payload, Some(json!({ "is_active": false })));
}

#[tokio::test]
async fn test_approval_changes_status_only() {
    let t = TestApp::new();
    let rows = seed_listings(&t);
    let id = rows[1]["id"].as_str().unwrap();
    let session = t.admin().await;

    let (status, body) = t
        .put(
            &format!("/admin/api/services/{id}/approval"),
            &session,
            json!({ "status": "approved", "reason": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["approval_status"], "approved");
    assert_eq!(
        t.backend.write_calls()[0].payload,
        Some(json!({ "approval_status": "approved" }))
    );
}

#[tokio::test]
async fn test_invalid_listing_never_reaches_backend() {
    let t = TestApp::new();
    let session = t.admin().await;

    // Discount above the base price
    let (status, _) = t
        .post(
            "/admin/api/services",
            &session,
            json!({
                "vendor_id": Uuid::new_v4(),
                "category_id": Uuid::new_v4(),
                "title": "Fairy lights",
                "base_price": 1000,
                "discounted_price": 1500
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // No category
    let (status, _) = t
        .post(
            "/admin/api/services",
            &session,
            json!({
                "vendor_id": Uuid::new_v4(),
                "category_id": null,
                "title": "Fairy lights",
                "base_price": 1000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Blank title
    let (status, body) = t
        .post(
            "/admin/api/services",
            &session,
            json!({
                "vendor_id": Uuid::new_v4(),
                "category_id": Uuid::new_v4(),
                "title": "   ",
                "base_price": 1000
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"]["field"], "title");

    assert!(t.backend.calls().is_empty());
}

#[tokio::test]
async fn test_stale_version_is_a_conflict() {
    let t = TestApp::new();
    let rows = seed_listings(&t);
    let id = rows[0]["id"].as_str().unwrap();
    let session = t.admin().await;

    let (_, form) = t
        .get(&format!("/admin/api/edit/service_listing/{id}"), &session)
        .await;
    assert_eq!(form["kind"], "service_listing");
    assert_eq!(form["version"], 1);

    let mut first = form.clone();
    first["data"]["title"] = json!("Balloon arch deluxe");
    let (status, saved) = t.post("/admin/api/edit", &session, first).await;
    assert_eq!(status, StatusCode::OK, "{saved}");
    assert_eq!(saved["kind"], "service_listing");
    assert_eq!(saved["record"]["title"], "Balloon arch deluxe");
    assert_eq!(saved["record"]["version"], 2);

    // A second editor still holding version 1
    let mut second = form;
    second["data"]["title"] = json!("Balloon arch classic");
    let (status, _) = t.post("/admin/api/edit", &session, second).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let stored = t.backend.rows("service_listings");
    let row = stored.iter().find(|r| r["id"] == id).unwrap();
    assert_eq!(row["title"], "Balloon arch deluxe");
}

#[tokio::test]
async fn test_edit_form_creates_private_theater() {
    let t = TestApp::new();
    let session = t.admin().await;

    let form = json!({
        "kind": "private_theater",
        "data": {
            "vendor_id": null,
            "name": "Cinema Nook",
            "city": "Pune",
            "capacity": 12,
            "base_price": 2999
        }
    });
    let (status, body) = t.post("/admin/api/edit/validate", &session, form.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["valid"], true);
    assert!(t.backend.calls().is_empty());

    let (status, body) = t.post("/admin/api/edit", &session, form).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["kind"], "private_theater");
    assert_eq!(body["record"]["name"], "Cinema Nook");
    assert_eq!(t.backend.rows("private_theaters").len(), 1);
}

#[tokio::test]
async fn test_edit_update_without_version_is_rejected() {
    let t = TestApp::new();
    let session = t.admin().await;
    let (status, _) = t
        .post(
            "/admin/api/edit",
            &session,
            json!({
                "kind": "service_listing",
                "id": Uuid::new_v4(),
                "data": {
                    "vendor_id": Uuid::new_v4(),
                    "category_id": Uuid::new_v4(),
                    "title": "Fog machine",
                    "base_price": 900
                }
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(t.backend.calls().is_empty());
}

#[tokio::test]
async fn test_vendor_detail_survives_wallet_failure() {
    let t = TestApp::new();
    let vendor_id = Uuid::new_v4();
    t.backend.seed(
        "vendors",
        [json!({ "id": vendor_id, "business_name": "Starlight Decor", "verification_status": "pending" })],
    );
    t.backend.seed(
        "vendor_documents",
        [json!({ "vendor_id": vendor_id, "document_type": "gst", "document_url": "https://files.example/gst.pdf" })],
    );
    let session = t.admin().await;

    // No wallet procedure registered
    let (status, body) = t
        .get(&format!("/admin/api/vendors/{vendor_id}"), &session)
        .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["vendor"]["business_name"], "Starlight Decor");
    assert_eq!(body["documents"].as_array().unwrap().len(), 1);
    assert!(body["wallet"].is_null());

    t.backend.set_rpc_result(
        "get_vendor_wallet_balance",
        json!({ "available": 1500, "pending": 250, "lifetime_earnings": 9000 }),
    );
    let (_, body) = t
        .get(&format!("/admin/api/vendors/{vendor_id}"), &session)
        .await;
    assert!(body["wallet"]["available_display"].is_string());
}

#[tokio::test]
async fn test_document_rejection_needs_reason() {
    let t = TestApp::new();
    let doc_id = Uuid::new_v4();
    t.backend.seed(
        "vendor_documents",
        [json!({ "id": doc_id, "vendor_id": Uuid::new_v4(), "document_type": "pan", "document_url": "https://files.example/pan.pdf" })],
    );
    let session = t.admin().await;
    let uri = format!("/admin/api/vendor-documents/{doc_id}/status");

    let (status, _) = t.put(&uri, &session, json!({ "status": "rejected" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(t.backend.write_calls().is_empty());

    let (status, body) = t
        .put(&uri, &session, json!({ "status": "rejected", "reason": "Scan is blurry" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["rejection_reason"], "Scan is blurry");
}

#[tokio::test]
async fn test_missing_row_is_not_found() {
    let t = TestApp::new();
    let session = t.admin().await;
    let (status, _) = t
        .put(
            &format!("/admin/api/vendors/{}/active", Uuid::new_v4()),
            &session,
            json!({ "is_active": true }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
