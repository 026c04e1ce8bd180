//! Public storefront lookup, products, clicks and signups.

use briklyst_integration_tests::{Owner, base_url, client};
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_lookup_requires_identification() {
    let resp = client()
        .get(format!("{}/api/storefronts", base_url()))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_current_without_session_is_unauthorized() {
    let resp = client()
        .get(format!("{}/api/storefronts?current", base_url()))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unknown_username_not_found() {
    let resp = client()
        .get(format!("{}/api/storefronts?username=nobody-here-404", base_url()))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_product_click_redirects_and_counts() {
    let owner = Owner::register().await;
    let (status, product) = owner
        .send(
            Method::POST,
            "/api/products",
            &json!({
                "title": "Leather tote",
                "price": "89.00",
                "affiliateUrl": "https://shop.example.com/tote"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let resp = client()
        .get(format!("{}/go/{}", base_url(), product["id"]))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers()
            .get("location")
            .and_then(|v| v.to_str().ok()),
        Some("https://shop.example.com/tote")
    );

    let (_, view) = owner
        .get(&format!("/api/storefronts?username={}", owner.username))
        .await;
    assert_eq!(view["products"][0]["clicks"], 1);
    assert!(view["products"][0].get("affiliateUrl").is_none());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_deleted_product_hidden() {
    let owner = Owner::register().await;
    let (_, product) = owner
        .send(
            Method::POST,
            "/api/products",
            &json!({
                "title": "Old lamp",
                "price": 20,
                "affiliateUrl": "https://shop.example.com/lamp"
            }),
        )
        .await;

    let resp = owner
        .client
        .delete(format!("{}/api/products/{}", base_url(), product["id"]))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let (_, view) = owner
        .get(&format!("/api/storefronts?username={}", owner.username))
        .await;
    assert_eq!(view["products"], json!([]));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_subscribe_twice_is_idempotent() {
    let owner = Owner::register().await;
    let (_, view) = owner.get("/api/storefronts?current").await;
    let storefront_id = &view["storefront"]["id"];

    for _ in 0..2 {
        let resp = client()
            .post(format!(
                "{}/api/storefronts/{storefront_id}/subscribers",
                base_url()
            ))
            .json(&json!({"email": "fan@example.com"}))
            .send()
            .await
            .expect("Request failed");
        assert_eq!(resp.status(), StatusCode::OK);
    }

    let (_, subscribers) = owner.get("/api/subscribers").await;
    assert_eq!(subscribers.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_public_page_renders_variables() {
    let owner = Owner::register().await;
    let resp = client()
        .get(format!("{}/s/{}", base_url(), owner.username))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.expect("Failed to read body");
    assert!(html.contains("--bk-color-primary"));
}
