//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! bk-cli migrate
//! ```
//!
//! # Environment Variables
//!
//! - `BRIKLYST_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//!
//! # Migration Files
//!
//! Migrations live in `crates/storefront/migrations/` and are embedded into
//! the binary at compile time.

use briklyst_storefront::config::BriklystConfig;
use briklyst_storefront::db;

use super::CommandError;

/// Run the storefront database migrations.
///
/// # Errors
///
/// Returns an error if the database URL is missing, the connection fails or
/// a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let config = BriklystConfig::for_jobs()?;

    tracing::info!("Connecting to database...");
    let pool = db::create_pool(&config.database_url).await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../storefront/migrations").run(&pool).await?;

    tracing::info!("Migrations complete!");
    Ok(())
}
