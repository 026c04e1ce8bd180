//! Owner product API.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;

use briklyst_core::ProductId;

use crate::db::{CollectionRepository, ProductRepository, StorefrontRepository};
use crate::error::{ApiJson, ApiPath, Result};
use crate::middleware::RequireAuth;
use crate::models::{Product, ProductInput};
use crate::services::products::{ImportReport, ProductService};
use crate::state::AppState;

/// Body of `POST /api/products/import`.
///
/// Rows stay untyped so one malformed row cannot reject the whole batch.
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub products: Vec<serde_json::Value>,
}

fn service(
    state: &AppState,
) -> ProductService<StorefrontRepository<'_>, ProductRepository<'_>, CollectionRepository<'_>> {
    ProductService::new(
        StorefrontRepository::new(state.pool()),
        ProductRepository::new(state.pool()),
        CollectionRepository::new(state.pool()),
    )
}

pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(service(&state).list(user.id).await?))
}

#[tracing::instrument(skip(state, user, input), fields(user_id = %user.id))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = service(&state).create(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

#[tracing::instrument(skip(state, user, input), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<ProductId>,
    ApiJson(input): ApiJson<ProductInput>,
) -> Result<Json<Product>> {
    Ok(Json(service(&state).update(user.id, id, input).await?))
}

#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<ProductId>,
) -> Result<StatusCode> {
    service(&state).delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn import(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(request): ApiJson<ImportRequest>,
) -> Result<Json<ImportReport>> {
    Ok(Json(service(&state).import(user.id, request.products).await?))
}
