//! Owner collection API.

use axum::{Json, extract::State, http::StatusCode};

use briklyst_core::CollectionId;

use crate::db::{CollectionRepository, StorefrontRepository};
use crate::error::{ApiJson, ApiPath, Result};
use crate::middleware::RequireAuth;
use crate::models::{Collection, CollectionInput};
use crate::services::collections::CollectionService;
use crate::state::AppState;

fn service(state: &AppState) -> CollectionService<StorefrontRepository<'_>, CollectionRepository<'_>> {
    CollectionService::new(
        StorefrontRepository::new(state.pool()),
        CollectionRepository::new(state.pool()),
    )
}

pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Collection>>> {
    Ok(Json(service(&state).list(user.id).await?))
}

pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(input): ApiJson<CollectionInput>,
) -> Result<(StatusCode, Json<Collection>)> {
    let collection = service(&state).create(user.id, input).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<CollectionId>,
    ApiJson(input): ApiJson<CollectionInput>,
) -> Result<Json<Collection>> {
    Ok(Json(service(&state).update(user.id, id, input).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiPath(id): ApiPath<CollectionId>,
) -> Result<StatusCode> {
    service(&state).delete(user.id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
