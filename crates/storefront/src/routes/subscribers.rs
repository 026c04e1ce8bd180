//! The owner's mailing list.

use axum::{Json, extract::State};

use crate::db::{StorefrontRepository, SubscriberRepository, UserRepository};
use crate::error::Result;
use crate::middleware::RequireAuth;
use crate::models::Subscriber;
use crate::services::subscribers::SubscriberService;
use crate::state::AppState;

pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<Subscriber>>> {
    let subscribers = SubscriberService::new(
        StorefrontRepository::new(state.pool()),
        SubscriberRepository::new(state.pool()),
        UserRepository::new(state.pool()),
        state.mailer(),
    )
    .list(user.id)
    .await?;
    Ok(Json(subscribers))
}
