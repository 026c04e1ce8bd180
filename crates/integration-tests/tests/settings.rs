//! The settings write path over HTTP.

use briklyst_integration_tests::{Owner, base_url, client};
use reqwest::{Method, StatusCode};
use serde_json::json;

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_settings_require_session() {
    let resp = client()
        .get(format!("{}/api/storefront/settings", base_url()))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_unknown_theme_rejected_and_storefront_unchanged() {
    let owner = Owner::register().await;
    let (_, before) = owner.get("/api/storefront/settings").await;

    let (status, body) = owner
        .send(
            Method::PATCH,
            "/api/storefront/theme",
            &json!({"themeId": "does-not-exist"}),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"error": "Invalid theme ID"}));

    let (_, after) = owner.get("/api/storefront/settings").await;
    assert_eq!(before["storefront"], after["storefront"]);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_template_with_accent_override() {
    let owner = Owner::register().await;

    let (status, _) = owner
        .send(
            Method::PUT,
            "/api/storefront/settings",
            &json!({"templateId": "sleek-noir"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = owner
        .send(
            Method::PATCH,
            "/api/storefront/settings",
            &json!({"templateOverrides": {"colors": {"accent": "#E04FD4"}}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let colors = &body["resolved"]["colors"];
    assert_eq!(colors["primary"], "#111112");
    assert_eq!(colors["background"], "#18181B");
    assert_eq!(colors["accent"], "#E04FD4");
    assert_eq!(body["storefront"]["accentColor"], "#E04FD4");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_concurrent_disjoint_patches_union() {
    let owner = Owner::register().await;

    let colors = json!({"templateOverrides": {"colors": {"accent": "#E04FD4"}}});
    let fonts = json!({"templateOverrides": {"fonts": {"heading": "Playfair Display"}}});
    let (a, b) = tokio::join!(
        owner.send(Method::PATCH, "/api/storefront/settings", &colors),
        owner.send(Method::PATCH, "/api/storefront/settings", &fonts),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);

    let (_, body) = owner.get("/api/storefront/settings").await;
    let overrides = &body["settings"]["templateOverrides"];
    assert_eq!(overrides["colors"]["accent"], "#E04FD4");
    assert_eq!(overrides["fonts"]["heading"], "Playfair Display");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_concurrent_same_group_patches_union() {
    let owner = Owner::register().await;

    let accent = json!({"templateOverrides": {"colors": {"accent": "#E04FD4"}}});
    let primary = json!({"templateOverrides": {"colors": {"primary": "#0A0A0A"}}});
    let (a, b) = tokio::join!(
        owner.send(Method::PATCH, "/api/storefront/settings", &accent),
        owner.send(Method::PATCH, "/api/storefront/settings", &primary),
    );
    assert_eq!(a.0, StatusCode::OK);
    assert_eq!(b.0, StatusCode::OK);

    let (status, body) = owner
        .send(
            Method::PATCH,
            "/api/storefront/settings",
            &json!({"templateOverrides": {"colors": {}}}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let colors = &body["settings"]["templateOverrides"]["colors"];
    assert_eq!(colors["accent"], "#E04FD4");
    assert_eq!(colors["primary"], "#0A0A0A");
    assert_eq!(body["storefront"]["primaryColor"], "#0A0A0A");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_template_switch_clears_theme_pick() {
    let owner = Owner::register().await;

    let (status, _) = owner
        .send(
            Method::PATCH,
            "/api/storefront/theme",
            &json!({"themeId": "bold-pop"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = owner
        .send(
            Method::PATCH,
            "/api/storefront/settings",
            &json!({"templateId": "sleek-noir"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["settings"]["themeId"].is_null());
    assert_eq!(body["resolved"]["colors"]["primary"], "#111112");
    assert_eq!(body["storefront"]["themeId"], "midnight-luxe");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_preview_is_not_saved() {
    let owner = Owner::register().await;

    let (status, preview) = owner
        .send(
            Method::POST,
            "/api/storefront/preview",
            &json!({"themeId": "bold-pop"}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(preview["resolved"]["themeId"], "bold-pop");

    let (_, stored) = owner.get("/api/storefront/settings").await;
    assert!(stored["settings"]["themeId"].is_null());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_catalogs_listed() {
    let resp = client()
        .get(format!("{}/api/catalog/themes", base_url()))
        .send()
        .await
        .expect("Request failed");
    assert_eq!(resp.status(), StatusCode::OK);
    let themes: serde_json::Value = resp.json().await.expect("Invalid JSON body");
    assert!(
        themes
            .as_array()
            .is_some_and(|t| t.iter().any(|theme| theme["id"] == "minimal-light"))
    );
}
