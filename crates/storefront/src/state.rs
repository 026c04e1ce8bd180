//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;
use thiserror::Error;
use tower_sessions::cookie::Key;

use crate::config::{BriklystConfig, ConfigError};
use crate::services::email::{AppMailer, EmailError};

/// Errors building the application state at startup.
#[derive(Debug, Error)]
pub enum StateError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Email(#[from] EmailError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: BriklystConfig,
    pool: PgPool,
    mailer: AppMailer,
    session_key: Key,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the SMTP transport cannot be built or the session
    /// secret cannot serve as a signing key.
    pub fn new(config: BriklystConfig, pool: PgPool) -> Result<Self, StateError> {
        let mailer = AppMailer::from_config(config.email.as_ref(), &config.email_from)?;
        let session_key = config.session_key()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                mailer,
                session_key,
            }),
        })
    }

    /// Get a reference to the server configuration.
    #[must_use]
    pub fn config(&self) -> &BriklystConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the outbound mailer.
    #[must_use]
    pub fn mailer(&self) -> &AppMailer {
        &self.inner.mailer
    }

    /// Get the session cookie signing key.
    #[must_use]
    pub fn session_key(&self) -> &Key {
        &self.inner.session_key
    }
}
