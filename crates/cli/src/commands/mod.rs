//! Subcommand implementations.

pub mod catalog;
pub mod migrate;
pub mod report;

/// Errors a subcommand can fail with.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("configuration error: {0}")]
    Config(#[from] briklyst_storefront::config::ConfigError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("email error: {0}")]
    Email(#[from] briklyst_storefront::services::email::EmailError),

    #[error("{0}")]
    App(#[from] briklyst_storefront::error::AppError),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
