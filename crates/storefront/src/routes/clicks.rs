//! Outbound click tracking and the owner's click analytics.

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, header::REFERER},
    response::Redirect,
};
use tracing::Instrument;

use briklyst_core::ProductId;

use crate::db::{ClickRepository, ClickTarget, StorefrontRepository, UserRepository};
use crate::error::{ApiPath, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::models::ProductClicks;
use crate::services::clicks::ClickService;
use crate::services::email::AppMailer;
use crate::state::AppState;

type Clicks<'a> =
    ClickService<ClickRepository<'a>, UserRepository<'a>, StorefrontRepository<'a>, &'a AppMailer>;

fn service(state: &AppState) -> Clicks<'_> {
    ClickService::new(
        ClickRepository::new(state.pool()),
        UserRepository::new(state.pool()),
        StorefrontRepository::new(state.pool()),
        state.mailer(),
    )
}

/// Count the click and send the visitor on to the affiliate URL (303).
///
/// The owner's click alert is sent in the background so the redirect never
/// waits on SMTP.
#[tracing::instrument(skip(state, visitor, headers))]
pub async fn go(
    State(state): State<AppState>,
    OptionalAuth(visitor): OptionalAuth,
    ApiPath(product_id): ApiPath<ProductId>,
    headers: HeaderMap,
) -> Result<Redirect> {
    let referrer = headers.get(REFERER).and_then(|v| v.to_str().ok());
    let target = service(&state)
        .record(product_id, visitor.map(|v| v.id), referrer)
        .await?;

    let redirect = Redirect::to(&target.affiliate_url);
    tokio::spawn(notify_owner(state, target).instrument(tracing::Span::current()));
    Ok(redirect)
}

async fn notify_owner(state: AppState, target: ClickTarget) {
    service(&state)
        .notify_owner(&target, &state.config().base_url)
        .await;
}

/// Per-product click totals for the owner.
pub async fn analytics(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<ProductClicks>>> {
    Ok(Json(service(&state).totals(user.id).await?))
}
