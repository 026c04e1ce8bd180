//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `BRIKLYST_DATABASE_URL` - `PostgreSQL` connection string (falls back to `DATABASE_URL`)
//! - `BRIKLYST_BASE_URL` - Public URL of the server, used in email links
//! - `BRIKLYST_SESSION_SECRET` - Session cookie signing key (min 64 chars, high entropy)
//!
//! ## Optional
//! - `BRIKLYST_HOST` - Bind address (default: 127.0.0.1)
//! - `BRIKLYST_PORT` - Listen port (default: 3000)
//! - `BRIKLYST_REPORT_CONCURRENCY` - Parallel sends in the weekly report (default: 4)
//! - `SMTP_HOST`, `SMTP_PORT`, `SMTP_USERNAME`, `SMTP_PASSWORD`, `EMAIL_FROM` -
//!   outbound email; when `SMTP_HOST` is unset emails are only logged
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tower_sessions::cookie::Key;

const MIN_SESSION_SECRET_LENGTH: usize = 64;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;
const DEFAULT_REPORT_CONCURRENCY: usize = 4;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Briklyst server configuration.
#[derive(Debug, Clone)]
pub struct BriklystConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    /// IP address to bind the server to
    pub host: IpAddr,
    /// Port to listen on
    pub port: u16,
    /// Public base URL, without trailing slash
    pub base_url: String,
    /// Session signing secret
    pub session_secret: SecretString,
    /// SMTP settings, `None` to log emails instead of sending them
    pub email: Option<EmailConfig>,
    /// Sender address for outbound email
    pub email_from: String,
    /// Upper bound on concurrent sends in the weekly report job
    pub report_concurrency: usize,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment (e.g. "production")
    pub sentry_environment: Option<String>,
}

/// SMTP configuration.
///
/// Implements `Debug` manually to redact the password.
#[derive(Clone)]
pub struct EmailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: SecretString,
}

impl std::fmt::Debug for EmailConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EmailConfig")
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("smtp_username", &self.smtp_username)
            .field("smtp_password", &"[REDACTED]")
            .finish()
    }
}

impl BriklystConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let database_url = get_database_url("BRIKLYST_DATABASE_URL")?;
        let host = parse_env("BRIKLYST_HOST", "127.0.0.1")?;
        let port = parse_env("BRIKLYST_PORT", "3000")?;
        let base_url = get_required_env("BRIKLYST_BASE_URL")?
            .trim_end_matches('/')
            .to_string();
        url::Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("BRIKLYST_BASE_URL".to_string(), e.to_string())
        })?;
        let session_secret = get_validated_secret("BRIKLYST_SESSION_SECRET")?;
        validate_session_secret(&session_secret, "BRIKLYST_SESSION_SECRET")?;

        let email = EmailConfig::from_env()?;
        let email_from = get_env_or_default("EMAIL_FROM", "Briklyst <hello@briklyst.com>");
        let report_concurrency = parse_env(
            "BRIKLYST_REPORT_CONCURRENCY",
            &DEFAULT_REPORT_CONCURRENCY.to_string(),
        )?;
        if report_concurrency == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "BRIKLYST_REPORT_CONCURRENCY".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            database_url,
            host,
            port,
            base_url,
            session_secret,
            email,
            email_from,
            report_concurrency,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// Load only what the CLI needs: the database URL and the email settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the database URL is missing or SMTP settings
    /// are incomplete.
    pub fn for_jobs() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let report_concurrency = parse_env(
            "BRIKLYST_REPORT_CONCURRENCY",
            &DEFAULT_REPORT_CONCURRENCY.to_string(),
        )?;

        Ok(Self {
            database_url: get_database_url("BRIKLYST_DATABASE_URL")?,
            host: parse_env("BRIKLYST_HOST", "127.0.0.1")?,
            port: parse_env("BRIKLYST_PORT", "3000")?,
            base_url: get_env_or_default("BRIKLYST_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            session_secret: SecretString::from(String::new()),
            email: EmailConfig::from_env()?,
            email_from: get_env_or_default("EMAIL_FROM", "Briklyst <hello@briklyst.com>"),
            report_concurrency: report_concurrency.max(1),
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }

    /// The key session cookies are signed with.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InsecureSecret` if the secret is too short to
    /// serve as a signing key.
    pub fn session_key(&self) -> Result<Key, ConfigError> {
        Key::try_from(self.session_secret.expose_secret().as_bytes()).map_err(|e| {
            ConfigError::InsecureSecret("BRIKLYST_SESSION_SECRET".to_string(), e.to_string())
        })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl EmailConfig {
    fn from_env() -> Result<Option<Self>, ConfigError> {
        let Some(smtp_host) = get_optional_env("SMTP_HOST") else {
            return Ok(None);
        };
        Ok(Some(Self {
            smtp_host,
            smtp_port: parse_env("SMTP_PORT", "587")?,
            smtp_username: get_required_env("SMTP_USERNAME")?,
            smtp_password: get_required_secret("SMTP_PASSWORD")?,
        }))
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a required environment variable as a secret.
fn get_required_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    Ok(SecretString::from(value))
}

/// Get database URL with fallback to generic `DATABASE_URL`.
fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    if let Ok(value) = std::env::var(primary_key) {
        return Ok(SecretString::from(value));
    }
    if let Ok(value) = std::env::var("DATABASE_URL") {
        return Ok(SecretString::from(value));
    }
    Err(ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Get an optional environment variable. Empty values count as unset.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an environment variable, using `default` when unset.
fn parse_env<T>(key: &str, default: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    get_env_or_default(key, default)
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

/// Validate that a session secret meets minimum length requirements.
fn validate_session_secret(secret: &SecretString, var_name: &str) -> Result<(), ConfigError> {
    let value = secret.expose_secret();
    if value.len() < MIN_SESSION_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {} characters (got {})",
                MIN_SESSION_SECRET_LENGTH,
                value.len()
            ),
        ));
    }
    Ok(())
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.len() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)]
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
