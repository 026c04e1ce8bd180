//! Click tracking types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use briklyst_core::{ClickId, ProductId, UserId};

/// One outbound click on a product link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ClickEvent {
    pub id: ClickId,
    pub product_id: ProductId,
    /// Logged-in visitor who clicked, if any.
    pub user_id: Option<UserId>,
    pub referrer: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Click totals for one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductClicks {
    pub product_id: ProductId,
    pub title: String,
    /// Lifetime counter on the product.
    pub clicks: i64,
    /// Click events recorded in the last seven days.
    pub clicks_last_7_days: i64,
}
