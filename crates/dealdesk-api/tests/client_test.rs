#![allow(clippy::unwrap_used)]
// Integration tests for `ApiClient` using wiremock.

use serde_json::json;
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dealdesk_api::models::{ProductQuery, RedemptionReview};
use dealdesk_api::transport::TransportConfig;
use dealdesk_api::{ApiClient, Error, RedemptionScope, TokenSource};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ApiClient) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&server.uri()).unwrap();
    let token: secrecy::SecretString = "test-token".to_string().into();
    let client = ApiClient::new(
        &base_url,
        TokenSource::Static(token),
        &TransportConfig::default(),
    )
    .unwrap();
    (server, client)
}

// ── Category tests ──────────────────────────────────────────────────

#[tokio::test]
async fn test_list_categories() {
    let (server, client) = setup().await;

    let body = json!([
        { "id": "c2", "name": "Dining", "index": 2 },
        { "id": "c1", "name": "Beauty", "index": "1", "parentId": "c2" }
    ]);

    Mock::given(method("GET"))
        .and(path("/category"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let categories = client.list_categories().await.unwrap();

    // The backend returns them unsorted; ordering is the caller's job.
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].id, "c2");
    assert_eq!(categories[0].index, 2);
    assert_eq!(categories[1].index, 1, "string index must parse");
    assert_eq!(categories[1].parent_id.as_deref(), Some("c2"));
}

#[tokio::test]
async fn test_set_category_index_sends_string() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/category/c1"))
        .and(body_json(json!({ "index": "3" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client.set_category_index("c1", 3).await.unwrap();
}

// ── Product tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_products_with_filters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products"))
        .and(query_param("take", "25"))
        .and(query_param("skip", "50"))
        .and(query_param("q", "soap"))
        .and(query_param("categoryId", "c1"))
        .and(query_param("state", "ACTIVE"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "p1", "title": "Lavender soap" }
        ])))
        .mount(&server)
        .await;

    let query = ProductQuery {
        q: Some("soap".into()),
        category_id: Some("c1".into()),
        state: Some("ACTIVE".into()),
        take: 25,
        skip: 50,
    };
    let products = client.list_products(&query).await.unwrap();

    assert_eq!(products.len(), 1);
    assert_eq!(products[0].title, "Lavender soap");
}

#[tokio::test]
async fn test_reorder_products_sends_full_order() {
    let (server, client) = setup().await;

    Mock::given(method("PUT"))
        .and(path("/products/reorder"))
        .and(body_json(json!({
            "products": [
                { "id": "p2", "orderIndex": 0 },
                { "id": "p1", "orderIndex": 1 }
            ]
        })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client
        .reorder_products(&[("p2".into(), 0), ("p1".into(), 1)])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_get_product_not_found() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/products/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "statusCode": 404,
            "message": "Product not found",
            "error": "Not Found"
        })))
        .mount(&server)
        .await;

    let result = client.get_product("missing").await;

    match result {
        Err(Error::NotFound { resource, ref id }) => {
            assert_eq!(resource, "product");
            assert_eq!(id, "missing");
        }
        other => panic!("expected NotFound error, got: {other:?}"),
    }
}

// ── Partner tests ───────────────────────────────────────────────────

#[tokio::test]
async fn test_list_vendors_skips_empty_search() {
    let (server, client) = setup().await;

    // No `search` param should appear when the filter is empty.
    Mock::given(method("GET"))
        .and(path("/admin/shops"))
        .and(query_param("take", "25"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "v1", "name": "Corner Cafe", "approved": true }
        ])))
        .mount(&server)
        .await;

    let vendors = client.list_vendors(25, 0, Some("")).await.unwrap();

    assert_eq!(vendors.len(), 1);
    assert_eq!(vendors[0].name, "Corner Cafe");
}

#[tokio::test]
async fn test_credit_wallet() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/wallet/u1/credit"))
        .and(body_json(json!({ "amount": 25.0 })))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    client
        .credit_wallet("u1", 25.0)
        .await
        .unwrap();
}

// ── Redemption tests ────────────────────────────────────────────────

#[tokio::test]
async fn test_list_redemptions_by_scope() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/admin/pending-approval-coupons"))
        .and(query_param("take", "25"))
        .and(query_param("skip", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "id": "r1", "status": "pending", "used": false }
        ])))
        .mount(&server)
        .await;

    let pending = client
        .list_redemptions(RedemptionScope::PendingApproval, 25, 0)
        .await
        .unwrap();

    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, "pending");
}

#[tokio::test]
async fn test_review_redemption() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/deals-redeem/approve/r1"))
        .and(body_json(json!({ "status": "approved" })))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    client
        .review_redemption("r1", &RedemptionReview::approved())
        .await
        .unwrap();
}

// ── Analytics tests ─────────────────────────────────────────────────

#[tokio::test]
async fn test_vendor_analytics_decodes_wire_keys() {
    let (server, client) = setup().await;

    let body = json!({
        "totalDeals": 12,
        "totalRedeemedDeals": 7,
        "redemptionRate": 0.58,
        "approvalStats": [
            { "redeemedDeal_status": "approved", "count": "5" },
            { "redeemedDeal_status": "pending", "count": 2 }
        ],
        "topUsers": [
            { "name": "Ana", "redeemedcount": "4" }
        ]
    });

    Mock::given(method("GET"))
        .and(path("/analytics/v1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(&body))
        .mount(&server)
        .await;

    let analytics = client.vendor_analytics("v1").await.unwrap();

    assert_eq!(analytics.total_deals, 12);
    assert_eq!(analytics.approval_stats[0].status, "approved");
    assert_eq!(analytics.approval_stats[0].count, 5);
    assert_eq!(analytics.approval_stats[1].count, 2);
    assert_eq!(analytics.top_users[0].redeemed_count, 4);
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_unauthorized_maps_to_auth_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "statusCode": 401,
            "message": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let result = client.list_categories().await;

    match result {
        Err(Error::Unauthorized { status, ref message }) => {
            assert_eq!(status, 401);
            assert!(message.contains("Unauthorized"), "got: {message}");
        }
        other => panic!("expected Unauthorized error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_validation_messages_are_joined() {
    let (server, client) = setup().await;

    Mock::given(method("PATCH"))
        .and(path("/subscriptions/s1"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "statusCode": 400,
            "message": ["name should not be empty", "amount must be positive"],
            "error": "Bad Request"
        })))
        .mount(&server)
        .await;

    let body = dealdesk_api::models::PlanPayload {
        name: String::new(),
        amount: -1.0,
        interval: "month".into(),
        description: String::new(),
        is_active: true,
        trial_days: None,
        max_deals: 5,
    };
    let result = client.update_plan("s1", &body).await;

    match result {
        Err(Error::Api { status, ref message }) => {
            assert_eq!(status, 400);
            assert_eq!(
                message,
                "name should not be empty; amount must be positive"
            );
        }
        other => panic!("expected Api error, got: {other:?}"),
    }
}
