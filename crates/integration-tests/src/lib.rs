//! Black-box HTTP tests for the Briklyst server.
//!
//! # Running Tests
//!
//! ```bash
//! # Start PostgreSQL, migrate and run the server
//! cargo run -p briklyst-cli -- migrate
//! cargo run -p briklyst-storefront
//!
//! # Run the ignored integration tests against it
//! BRIKLYST_TEST_URL=http://localhost:3000 cargo test -p briklyst-integration-tests -- --ignored
//! ```
//!
//! Every test registers its own throwaway account, so tests can run in
//! parallel against one database.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, StatusCode, redirect};
use serde_json::{Value, json};
use uuid::Uuid;

/// Base URL of the server under test (configurable via environment).
#[must_use]
pub fn base_url() -> String {
    std::env::var("BRIKLYST_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// A client that keeps the session cookie and does not follow redirects.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn client() -> Client {
    builder().build().expect("Failed to create HTTP client")
}

fn builder() -> reqwest::ClientBuilder {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
}

/// A client that presents as its own forwarded address, so the per-IP auth
/// rate limit applies to each test owner separately.
fn client_with_forwarded_ip(id: &Uuid) -> Client {
    let [a, b, c, ..] = *id.as_bytes();
    let mut headers = HeaderMap::new();
    headers.insert(
        "x-forwarded-for",
        HeaderValue::from_str(&format!("10.{a}.{b}.{c}")).expect("Invalid forwarded address"),
    );
    builder()
        .default_headers(headers)
        .build()
        .expect("Failed to create HTTP client")
}

/// A logged-in owner with a fresh storefront.
pub struct Owner {
    pub client: Client,
    pub username: String,
    pub user: Value,
}

impl Owner {
    /// Register a unique account; the response cookie logs the client in.
    ///
    /// # Panics
    ///
    /// Panics if registration does not return 201.
    pub async fn register() -> Self {
        let id = Uuid::new_v4();
        let client = client_with_forwarded_ip(&id);
        let suffix = id.simple().to_string();
        let username = format!("t{}", suffix.get(..12).unwrap_or(&suffix));

        let resp = client
            .post(format!("{}/api/auth/register", base_url()))
            .json(&json!({
                "email": format!("{username}@example.com"),
                "username": username,
                "password": "correct horse battery staple",
            }))
            .send()
            .await
            .expect("Failed to register");
        assert_eq!(resp.status(), StatusCode::CREATED);
        let user = resp.json().await.expect("Invalid registration body");

        Self {
            client,
            username,
            user,
        }
    }

    /// `GET` a dashboard path and decode the JSON body.
    ///
    /// # Panics
    ///
    /// Panics on transport or decoding errors.
    pub async fn get(&self, path: &str) -> (StatusCode, Value) {
        let resp = self
            .client
            .get(format!("{}{path}", base_url()))
            .send()
            .await
            .expect("Request failed");
        let status = resp.status();
        (status, resp.json().await.expect("Invalid JSON body"))
    }

    /// Send a JSON body with `method` and decode the JSON response.
    ///
    /// # Panics
    ///
    /// Panics on transport or decoding errors.
    pub async fn send(&self, method: reqwest::Method, path: &str, body: &Value) -> (StatusCode, Value) {
        let resp = self
            .client
            .request(method, format!("{}{path}", base_url()))
            .json(body)
            .send()
            .await
            .expect("Request failed");
        let status = resp.status();
        (status, resp.json().await.expect("Invalid JSON body"))
    }
}
