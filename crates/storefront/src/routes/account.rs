//! The logged-in user's account and email preferences.

use axum::{Json, extract::State};

use crate::db::{NotificationPreferences, UserRepository, UserStore};
use crate::error::{ApiJson, AppError, Result};
use crate::middleware::RequireAuth;
use crate::models::User;
use crate::state::AppState;

pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<User>> {
    UserRepository::new(state.pool())
        .find_by_id(user.id)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("User"))
}

/// Toggle the weekly report and click alert emails.
#[tracing::instrument(skip(state, user), fields(user_id = %user.id))]
pub async fn update_notifications(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(preferences): ApiJson<NotificationPreferences>,
) -> Result<Json<User>> {
    UserRepository::new(state.pool())
        .update_notifications(user.id, &preferences)
        .await?
        .map(Json)
        .ok_or(AppError::NotFound("User"))
}
