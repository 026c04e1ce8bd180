//! User domain types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use briklyst_core::{Email, UserId};

/// A Briklyst account. The password hash is never part of this type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    #[sqlx(try_from = "String")]
    pub email: Email,
    pub username: String,
    pub name: Option<String>,
    /// Opted into the weekly performance email.
    pub weekly_report: bool,
    /// Opted into an email for every product click.
    pub click_alerts: bool,
    pub created_at: DateTime<Utc>,
}
