//! Authentication route handlers.
//!
//! Registration and password login. The session stores a [`CurrentUser`];
//! the dashboard API reads it through `RequireAuth`.

use axum::{Json, extract::State, http::StatusCode};
use serde::Deserialize;
use tower_sessions::Session;

use crate::db::{StorefrontRepository, StorefrontStore, UserRepository};
use crate::error::{ApiJson, AppError, Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::auth::{AuthService, Registration};
use crate::services::settings::flatten;
use crate::state::AppState;

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Create an account, its storefront, and log in.
///
/// The storefront exists as soon as the account does, so `/s/{username}`
/// works right away.
#[tracing::instrument(skip(state, session, registration))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    ApiJson(registration): ApiJson<Registration>,
) -> Result<(StatusCode, Json<User>)> {
    let user = AuthService::new(UserRepository::new(state.pool()))
        .register(registration)
        .await?;
    StorefrontRepository::new(state.pool())
        .ensure(user.id, flatten)
        .await?;

    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User registered");
    Ok((StatusCode::CREATED, Json(user)))
}

/// Log in with email and password.
#[tracing::instrument(skip(state, session, request))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<User>> {
    let user = AuthService::new(UserRepository::new(state.pool()))
        .login(&request.email, &request.password)
        .await?;

    start_session(&session, &user).await?;
    tracing::info!(user_id = %user.id, "User logged in");
    Ok(Json(user))
}

/// End the session.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await.map_err(|e| {
        tracing::error!("Failed to clear session: {e}");
        AppError::Internal("session".to_string())
    })?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

async fn start_session(session: &Session, user: &User) -> Result<()> {
    let current = CurrentUser {
        id: user.id,
        username: user.username.clone(),
    };
    set_current_user(session, &current).await.map_err(|e| {
        tracing::error!("Failed to set session: {e}");
        AppError::Internal("session".to_string())
    })?;
    set_sentry_user(&user.id, Some(&user.username));
    Ok(())
}
