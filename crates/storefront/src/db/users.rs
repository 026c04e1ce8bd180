//! User repository for database operations.

use sqlx::PgPool;

use briklyst_core::{Email, UserId};

use super::{NewUser, NotificationPreferences, RepositoryError, UserStore, conflict_on_unique};
use crate::models::User;

const USER_COLUMNS: &str =
    "id, email, username, name, weekly_report, click_alerts, created_at";

/// Repository for user database operations.
#[derive(Clone, Copy)]
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

impl UserStore for UserRepository<'_> {
    /// Create a new user with email and password.
    ///
    /// Returns `RepositoryError::Conflict` if the email or username is taken.
    async fn create(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let sql = format!(
            "INSERT INTO users (email, username, name, password_hash) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {USER_COLUMNS}"
        );
        sqlx::query_as::<_, User>(&sql)
            .bind(user.email.as_str())
            .bind(&user.username)
            .bind(user.name.as_deref())
            .bind(&user.password_hash)
            .fetch_one(self.pool)
            .await
            .map_err(conflict_on_unique("user"))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    async fn find_credentials(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, CredentialRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(|r| (r.user, r.password_hash)))
    }

    async fn update_notifications(
        &self,
        id: UserId,
        preferences: &NotificationPreferences,
    ) -> Result<Option<User>, RepositoryError> {
        let sql = format!(
            "UPDATE users SET \
                 weekly_report = COALESCE($2, weekly_report), \
                 click_alerts = COALESCE($3, click_alerts) \
             WHERE id = $1 \
             RETURNING {USER_COLUMNS}"
        );
        Ok(sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(preferences.weekly_report)
            .bind(preferences.click_alerts)
            .fetch_optional(self.pool)
            .await?)
    }
}
