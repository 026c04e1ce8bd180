//! Storefront and settings repository.
//!
//! Settings live in `storefront_settings` as two JSONB documents:
//! `template_overrides` and `content`. Writes merge inside an
//! `INSERT ... ON CONFLICT (user_id) DO UPDATE`: overrides leaf by leaf via
//! `jsonb_merge_groups`, content per top-level key with `||`. The update
//! reads the locked row, so two concurrent patches touching different
//! leaves both survive.

use sqlx::types::Json;
use sqlx::{PgConnection, PgExecutor, PgPool};

use briklyst_core::settings::{SettingsContent, TemplateOverrides};
use briklyst_core::{FlattenedTheme, SettingsPatch, StorefrontId, StorefrontSettings, UserId};

use super::{RepositoryError, StorefrontStore, conflict_on_unique};
use crate::models::Storefront;
use crate::models::storefront::IdentityUpdate;

const STOREFRONT_COLUMNS: &str = "s.id, s.user_id, s.title, s.description, s.domain, \
     s.logo_url, s.banner_url, s.primary_color, s.accent_color, s.background_color, \
     s.text_color, s.font_family, s.theme_id, s.created_at, s.updated_at";

/// Repository for storefronts and their settings.
#[derive(Clone, Copy)]
pub struct StorefrontRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> StorefrontRepository<'a> {
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SettingsRow {
    template_id: Option<String>,
    theme_id: Option<String>,
    template_overrides: Json<serde_json::Value>,
    content: Json<serde_json::Value>,
}

impl TryFrom<SettingsRow> for StorefrontSettings {
    type Error = RepositoryError;

    fn try_from(row: SettingsRow) -> Result<Self, Self::Error> {
        let template_overrides: TemplateOverrides =
            serde_json::from_value(row.template_overrides.0).map_err(|e| {
                RepositoryError::DataCorruption(format!("invalid template_overrides: {e}"))
            })?;
        let content: SettingsContent = serde_json::from_value(row.content.0).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid settings content: {e}"))
        })?;
        Ok(Self {
            template_id: row.template_id,
            theme_id: row.theme_id,
            template_overrides,
            content,
        })
    }
}

fn encode_error(e: &serde_json::Error) -> RepositoryError {
    RepositoryError::DataCorruption(format!("cannot encode settings patch: {e}"))
}

/// Insert the storefront and its baseline settings if they do not exist.
async fn ensure_in_tx(
    conn: &mut PgConnection,
    user_id: UserId,
    baseline: &FlattenedTheme,
) -> Result<Storefront, RepositoryError> {
    sqlx::query(
        r"
        INSERT INTO storefronts (user_id, title, primary_color, accent_color,
                                 background_color, text_color, font_family, theme_id)
        SELECT u.id, u.username, $2, $3, $4, $5, $6, $7
        FROM users u
        WHERE u.id = $1
        ON CONFLICT (user_id) DO NOTHING
        ",
    )
    .bind(user_id)
    .bind(&baseline.primary_color)
    .bind(&baseline.accent_color)
    .bind(&baseline.background_color)
    .bind(&baseline.text_color)
    .bind(&baseline.font_family)
    .bind(&baseline.theme_id)
    .execute(&mut *conn)
    .await?;

    sqlx::query(
        r"
        INSERT INTO storefront_settings (user_id, storefront_id)
        SELECT user_id, id FROM storefronts WHERE user_id = $1
        ON CONFLICT (user_id) DO NOTHING
        ",
    )
    .bind(user_id)
    .execute(&mut *conn)
    .await?;

    let sql = format!("SELECT {STOREFRONT_COLUMNS} FROM storefronts s WHERE s.user_id = $1");
    sqlx::query_as::<_, Storefront>(&sql)
        .bind(user_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or(RepositoryError::NotFound)
}

async fn load_settings(
    executor: impl PgExecutor<'_>,
    user_id: UserId,
) -> Result<Option<StorefrontSettings>, RepositoryError> {
    let row = sqlx::query_as::<_, SettingsRow>(
        r"
        SELECT template_id, theme_id, template_overrides, content
        FROM storefront_settings
        WHERE user_id = $1
        ",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;

    row.map(StorefrontSettings::try_from).transpose()
}

/// Upsert-merge `patch` into the stored settings.
///
/// A new template without a theme in the same patch drops the explicit
/// theme pick, so the template's default theme applies again.
async fn merge_settings_in_tx(
    conn: &mut PgConnection,
    user_id: UserId,
    patch: &SettingsPatch,
) -> Result<StorefrontSettings, RepositoryError> {
    let overrides = patch.overrides_json().map_err(|e| encode_error(&e))?;
    let content = patch.content_json().map_err(|e| encode_error(&e))?;

    let row = sqlx::query_as::<_, SettingsRow>(
        r"
        INSERT INTO storefront_settings AS s
            (user_id, storefront_id, template_id, theme_id, template_overrides, content)
        SELECT $1, id, $2, $3, $4, $5 FROM storefronts WHERE user_id = $1
        ON CONFLICT (user_id) DO UPDATE SET
            template_id = COALESCE(EXCLUDED.template_id, s.template_id),
            theme_id = CASE
                WHEN EXCLUDED.theme_id IS NOT NULL THEN EXCLUDED.theme_id
                WHEN EXCLUDED.template_id IS NOT NULL
                     AND EXCLUDED.template_id IS DISTINCT FROM s.template_id THEN NULL
                ELSE s.theme_id
            END,
            template_overrides = jsonb_merge_groups(s.template_overrides, EXCLUDED.template_overrides),
            content = s.content || EXCLUDED.content,
            updated_at = NOW()
        RETURNING template_id, theme_id, template_overrides, content
        ",
    )
    .bind(user_id)
    .bind(patch.template_id.as_deref())
    .bind(patch.theme_id.as_deref())
    .bind(Json(&overrides))
    .bind(Json(&content))
    .fetch_one(&mut *conn)
    .await?;
    StorefrontSettings::try_from(row)
}

/// Rewrite the cached presentation columns of the storefront.
async fn write_flattened_in_tx(
    conn: &mut PgConnection,
    user_id: UserId,
    flat: &FlattenedTheme,
) -> Result<Storefront, RepositoryError> {
    let sql = format!(
        "UPDATE storefronts s SET \
             primary_color = $2, accent_color = $3, background_color = $4, \
             text_color = $5, font_family = $6, theme_id = $7, updated_at = NOW() \
         WHERE s.user_id = $1 \
         RETURNING {STOREFRONT_COLUMNS}"
    );
    Ok(sqlx::query_as::<_, Storefront>(&sql)
        .bind(user_id)
        .bind(&flat.primary_color)
        .bind(&flat.accent_color)
        .bind(&flat.background_color)
        .bind(&flat.text_color)
        .bind(&flat.font_family)
        .bind(&flat.theme_id)
        .fetch_one(&mut *conn)
        .await?)
}

async fn update_identity_in_tx(
    conn: &mut PgConnection,
    user_id: UserId,
    update: &IdentityUpdate,
) -> Result<Storefront, RepositoryError> {
    // NULL keeps the stored value, an empty string clears it.
    let sql = format!(
        "UPDATE storefronts s SET \
             title = COALESCE($2, s.title), \
             description = CASE WHEN $3::text IS NULL THEN s.description ELSE NULLIF($3, '') END, \
             domain = CASE WHEN $4::text IS NULL THEN s.domain ELSE NULLIF($4, '') END, \
             logo_url = CASE WHEN $5::text IS NULL THEN s.logo_url ELSE NULLIF($5, '') END, \
             banner_url = CASE WHEN $6::text IS NULL THEN s.banner_url ELSE NULLIF($6, '') END, \
             updated_at = NOW() \
         WHERE s.user_id = $1 \
         RETURNING {STOREFRONT_COLUMNS}"
    );
    sqlx::query_as::<_, Storefront>(&sql)
        .bind(user_id)
        .bind(update.title.as_deref())
        .bind(update.description.as_deref())
        .bind(update.domain.as_deref())
        .bind(update.logo_url.as_deref())
        .bind(update.banner_url.as_deref())
        .fetch_optional(&mut *conn)
        .await
        .map_err(conflict_on_unique("domain"))?
        .ok_or(RepositoryError::NotFound)
}

impl StorefrontStore for StorefrontRepository<'_> {
    async fn find_by_user(&self, user_id: UserId) -> Result<Option<Storefront>, RepositoryError> {
        let sql = format!("SELECT {STOREFRONT_COLUMNS} FROM storefronts s WHERE s.user_id = $1");
        Ok(sqlx::query_as::<_, Storefront>(&sql)
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?)
    }

    async fn find_by_username(
        &self,
        username: &str,
    ) -> Result<Option<Storefront>, RepositoryError> {
        let sql = format!(
            "SELECT {STOREFRONT_COLUMNS} FROM storefronts s \
             JOIN users u ON u.id = s.user_id \
             WHERE u.username = $1"
        );
        Ok(sqlx::query_as::<_, Storefront>(&sql)
            .bind(username.to_ascii_lowercase())
            .fetch_optional(self.pool)
            .await?)
    }

    async fn find_by_id(&self, id: StorefrontId) -> Result<Option<Storefront>, RepositoryError> {
        let sql = format!("SELECT {STOREFRONT_COLUMNS} FROM storefronts s WHERE s.id = $1");
        Ok(sqlx::query_as::<_, Storefront>(&sql)
            .bind(id)
            .fetch_optional(self.pool)
            .await?)
    }

    async fn ensure<F>(&self, user_id: UserId, flatten: F) -> Result<Storefront, RepositoryError>
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme + Send + Sync,
    {
        let baseline = flatten(&StorefrontSettings::baseline());
        let mut tx = self.pool.begin().await?;
        let storefront = ensure_in_tx(&mut tx, user_id, &baseline).await?;
        tx.commit().await?;
        Ok(storefront)
    }

    async fn settings(
        &self,
        user_id: UserId,
    ) -> Result<Option<StorefrontSettings>, RepositoryError> {
        load_settings(self.pool, user_id).await
    }

    async fn apply_settings<F>(
        &self,
        user_id: UserId,
        patch: &SettingsPatch,
        flatten: F,
    ) -> Result<(Storefront, StorefrontSettings), RepositoryError>
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme + Send + Sync,
    {
        let baseline = flatten(&StorefrontSettings::baseline());

        let mut tx = self.pool.begin().await?;
        ensure_in_tx(&mut tx, user_id, &baseline).await?;
        let settings = merge_settings_in_tx(&mut tx, user_id, patch).await?;
        let storefront = write_flattened_in_tx(&mut tx, user_id, &flatten(&settings)).await?;
        tx.commit().await?;

        Ok((storefront, settings))
    }

    async fn save_details<F>(
        &self,
        user_id: UserId,
        identity: &IdentityUpdate,
        patch: &SettingsPatch,
        flatten: F,
    ) -> Result<(Storefront, StorefrontSettings), RepositoryError>
    where
        F: Fn(&StorefrontSettings) -> FlattenedTheme + Send + Sync,
    {
        let baseline = flatten(&StorefrontSettings::baseline());

        let mut tx = self.pool.begin().await?;
        let mut storefront = ensure_in_tx(&mut tx, user_id, &baseline).await?;
        if !identity.is_empty() {
            storefront = update_identity_in_tx(&mut tx, user_id, identity).await?;
        }
        let settings = if patch.is_empty() {
            load_settings(&mut *tx, user_id).await?.unwrap_or_default()
        } else {
            let settings = merge_settings_in_tx(&mut tx, user_id, patch).await?;
            storefront = write_flattened_in_tx(&mut tx, user_id, &flatten(&settings)).await?;
            settings
        };
        tx.commit().await?;

        Ok((storefront, settings))
    }
}
