//! Mailing-list subscriber.

use chrono::{DateTime, Utc};
use serde::Serialize;

use briklyst_core::{Email, StorefrontId, SubscriberId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: SubscriberId,
    pub storefront_id: StorefrontId,
    #[sqlx(try_from = "String")]
    pub email: Email,
    pub created_at: DateTime<Utc>,
}
