//! Storefront lookup, identity edits and mailing-list signups.

use axum::{Json, extract::State};
use serde::Deserialize;

use briklyst_core::{StorefrontId, UserId};

use crate::db::{ProductRepository, StorefrontRepository, SubscriberRepository, UserRepository};
use crate::error::{ApiJson, ApiPath, ApiQuery, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::StorefrontDetails;
use crate::services::presentation::{Lookup, PresentationService, StorefrontView};
use crate::services::settings::{SettingsService, SettingsView};
use crate::services::subscribers::{SubscribeOutcome, SubscriberService};
use crate::state::AppState;

/// Query keys of `GET /api/storefronts`. The first one present wins.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorefrontQuery {
    pub user_id: Option<UserId>,
    pub username: Option<String>,
    /// Present (with any value but `false`) to ask for the session user's
    /// own storefront.
    pub current: Option<String>,
}

impl StorefrontQuery {
    fn wants_current(&self) -> bool {
        self.current.as_deref().is_some_and(|v| v != "false")
    }
}

/// Signup body.
#[derive(Debug, Deserialize)]
pub struct SubscribeRequest {
    pub email: String,
}

/// Public view of a storefront.
#[tracing::instrument(skip(state, user))]
pub async fn show(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    ApiQuery(query): ApiQuery<StorefrontQuery>,
) -> Result<Json<StorefrontView>> {
    let current = query.wants_current();
    let lookup = Lookup::from_params(
        query.user_id,
        query.username,
        current,
        user.map(|u| u.id),
    )?;

    let view = PresentationService::new(
        StorefrontRepository::new(state.pool()),
        ProductRepository::new(state.pool()),
    )
    .get_presentation(lookup)
    .await?;
    Ok(Json(view))
}

/// Edit the owner's storefront: identity fields plus the legacy color and
/// font fields, which are saved as settings overrides.
#[tracing::instrument(skip(state, user, details), fields(user_id = %user.id))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    ApiJson(details): ApiJson<StorefrontDetails>,
) -> Result<Json<SettingsView>> {
    let view = SettingsService::new(StorefrontRepository::new(state.pool()))
        .update_details(user.id, details)
        .await?;
    Ok(Json(view))
}

/// Join a storefront's mailing list.
#[tracing::instrument(skip(state, request))]
pub async fn subscribe(
    State(state): State<AppState>,
    ApiPath(storefront_id): ApiPath<StorefrontId>,
    ApiJson(request): ApiJson<SubscribeRequest>,
) -> Result<Json<SubscribeOutcome>> {
    let outcome = SubscriberService::new(
        StorefrontRepository::new(state.pool()),
        SubscriberRepository::new(state.pool()),
        UserRepository::new(state.pool()),
        state.mailer(),
    )
    .subscribe(storefront_id, &request.email, &state.config().base_url)
    .await?;
    Ok(Json(outcome))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn query(raw: &str) -> StorefrontQuery {
        let uri: axum::http::Uri = format!("/api/storefronts?{raw}").parse().unwrap();
        axum::extract::Query::<StorefrontQuery>::try_from_uri(&uri)
            .unwrap()
            .0
    }

    #[test]
    fn test_bare_current_key() {
        assert!(query("current").wants_current());
        assert!(query("current=true").wants_current());
        assert!(!query("current=false").wants_current());
        assert!(!query("username=ana").wants_current());
    }

    #[test]
    fn test_user_id_parsed() {
        assert_eq!(query("userId=42").user_id, Some(UserId::new(42)));
    }
}
