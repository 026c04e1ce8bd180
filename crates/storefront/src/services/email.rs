//! Outbound email.
//!
//! Messages are rendered from Askama templates (HTML plus a plain-text
//! alternative) and handed to a [`Mailer`]. Production uses SMTP via lettre;
//! without SMTP configuration, [`LogMailer`] records what would have been
//! sent so local development never needs a mail server.
//!
//! Templates only see an [`EmailTheme`]: the storefront title and its
//! resolved primary color.

use std::future::Future;

use askama::Template;
use chrono::{DateTime, Utc};
use briklyst_core::style::EmailTheme;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{MultiPart, SinglePart, header::ContentType},
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use secrecy::ExposeSecret;
use thiserror::Error;

use crate::config::EmailConfig;

/// Errors that can occur when sending email.
#[derive(Debug, Error)]
pub enum EmailError {
    /// SMTP transport error.
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    /// Failed to build email message.
    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    /// Invalid email address.
    #[error("Invalid email address: {0}")]
    InvalidAddress(String),

    /// Template rendering error.
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

/// A rendered message ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

/// Delivers rendered messages.
pub trait Mailer: Send + Sync {
    fn send(&self, email: OutboundEmail) -> impl Future<Output = Result<(), EmailError>> + Send;
}

impl<M: Mailer> Mailer for &M {
    fn send(&self, email: OutboundEmail) -> impl Future<Output = Result<(), EmailError>> + Send {
        (**self).send(email)
    }
}

// =============================================================================
// Transports
// =============================================================================

/// SMTP delivery with STARTTLS.
#[derive(Clone)]
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    /// Create a new SMTP mailer from configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the relay cannot be configured.
    pub fn new(config: &EmailConfig, from_address: &str) -> Result<Self, SmtpError> {
        let credentials = Credentials::new(
            config.smtp_username.clone(),
            config.smtp_password.expose_secret().to_string(),
        );

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: from_address.to_string(),
        })
    }
}

impl Mailer for SmtpMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| EmailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(email
                .to
                .parse()
                .map_err(|_| EmailError::InvalidAddress(email.to.clone()))?)
            .subject(&email.subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(email.text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(email.html),
                    ),
            )?;

        self.transport.send(message).await?;

        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

/// Logs messages instead of sending them.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

impl Mailer for LogMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        tracing::info!(
            to = %email.to,
            subject = %email.subject,
            "SMTP not configured, email not sent"
        );
        tracing::debug!(body = %email.text, "Email body");
        Ok(())
    }
}

/// The mailer chosen at startup.
#[derive(Clone)]
pub enum AppMailer {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl AppMailer {
    /// SMTP when configured, logging otherwise.
    ///
    /// # Errors
    ///
    /// Returns an error if SMTP is configured but the relay is invalid.
    pub fn from_config(config: Option<&EmailConfig>, from_address: &str) -> Result<Self, EmailError> {
        match config {
            Some(config) => Ok(Self::Smtp(SmtpMailer::new(config, from_address)?)),
            None => {
                tracing::warn!("SMTP_HOST not set, outbound email will only be logged");
                Ok(Self::Log(LogMailer))
            }
        }
    }
}

impl Mailer for AppMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        match self {
            Self::Smtp(mailer) => mailer.send(email).await,
            Self::Log(mailer) => mailer.send(email).await,
        }
    }
}

// =============================================================================
// Messages
// =============================================================================

#[derive(Template)]
#[template(path = "email/click_alert.html")]
struct ClickAlertHtml<'a> {
    theme: &'a EmailTheme,
    product_title: &'a str,
    clicks: i64,
    clicked_at: &'a str,
    dashboard_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/click_alert.txt")]
struct ClickAlertText<'a> {
    theme: &'a EmailTheme,
    product_title: &'a str,
    clicks: i64,
    clicked_at: &'a str,
    dashboard_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/weekly_report.html")]
struct WeeklyReportHtml<'a> {
    theme: &'a EmailTheme,
    username: &'a str,
    clicks: i64,
    new_subscribers: i64,
    top_products: &'a [(String, i64)],
    dashboard_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/weekly_report.txt")]
struct WeeklyReportText<'a> {
    theme: &'a EmailTheme,
    username: &'a str,
    clicks: i64,
    new_subscribers: i64,
    top_products: &'a [(String, i64)],
    dashboard_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/subscriber_welcome.html")]
struct SubscriberWelcomeHtml<'a> {
    theme: &'a EmailTheme,
    message: &'a str,
    storefront_url: &'a str,
}

#[derive(Template)]
#[template(path = "email/subscriber_welcome.txt")]
struct SubscriberWelcomeText<'a> {
    theme: &'a EmailTheme,
    message: &'a str,
    storefront_url: &'a str,
}

/// Notify an owner that one of their products was clicked.
///
/// # Errors
///
/// Returns `EmailError::Template` if rendering fails.
pub fn click_alert(
    to: &str,
    theme: &EmailTheme,
    product_title: &str,
    clicks: i64,
    clicked_at: DateTime<Utc>,
    base_url: &str,
) -> Result<OutboundEmail, EmailError> {
    let dashboard_url = format!("{base_url}/dashboard/analytics");
    let clicked_at = clicked_at.format("%Y-%m-%d %H:%M UTC").to_string();
    let html = ClickAlertHtml {
        theme,
        product_title,
        clicks,
        clicked_at: &clicked_at,
        dashboard_url: &dashboard_url,
    }
    .render()?;
    let text = ClickAlertText {
        theme,
        product_title,
        clicks,
        clicked_at: &clicked_at,
        dashboard_url: &dashboard_url,
    }
    .render()?;

    Ok(OutboundEmail {
        to: to.to_string(),
        subject: format!("New click on {product_title}"),
        html,
        text,
    })
}

/// The weekly performance summary for one storefront.
///
/// # Errors
///
/// Returns `EmailError::Template` if rendering fails.
pub fn weekly_report(
    to: &str,
    theme: &EmailTheme,
    username: &str,
    stats: &crate::db::WeeklyStats,
    base_url: &str,
) -> Result<OutboundEmail, EmailError> {
    let dashboard_url = format!("{base_url}/dashboard/analytics");
    let html = WeeklyReportHtml {
        theme,
        username,
        clicks: stats.clicks,
        new_subscribers: stats.new_subscribers,
        top_products: &stats.top_products,
        dashboard_url: &dashboard_url,
    }
    .render()?;
    let text = WeeklyReportText {
        theme,
        username,
        clicks: stats.clicks,
        new_subscribers: stats.new_subscribers,
        top_products: &stats.top_products,
        dashboard_url: &dashboard_url,
    }
    .render()?;

    Ok(OutboundEmail {
        to: to.to_string(),
        subject: format!("Your week on {}", theme.storefront_title),
        html,
        text,
    })
}

/// Confirm a new mailing-list signup.
///
/// # Errors
///
/// Returns `EmailError::Template` if rendering fails.
pub fn subscriber_welcome(
    to: &str,
    theme: &EmailTheme,
    message: &str,
    storefront_url: &str,
) -> Result<OutboundEmail, EmailError> {
    let html = SubscriberWelcomeHtml {
        theme,
        message,
        storefront_url,
    }
    .render()?;
    let text = SubscriberWelcomeText {
        theme,
        message,
        storefront_url,
    }
    .render()?;

    Ok(OutboundEmail {
        to: to.to_string(),
        subject: format!("You're subscribed to {}", theme.storefront_title),
        html,
        text,
    })
}

/// Records messages instead of sending them.
#[cfg(test)]
#[derive(Clone, Default)]
pub struct RecordingMailer {
    sent: std::sync::Arc<std::sync::Mutex<Vec<OutboundEmail>>>,
    fail: bool,
    fail_for: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl RecordingMailer {
    /// A mailer whose every send fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// A mailer that fails only for `address`.
    pub fn failing_for(address: &str) -> Self {
        Self {
            fail_for: Some(address.to_string()),
            ..Self::default()
        }
    }

    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
impl Mailer for RecordingMailer {
    async fn send(&self, email: OutboundEmail) -> Result<(), EmailError> {
        if self.fail || self.fail_for.as_deref() == Some(email.to.as_str()) {
            return Err(EmailError::InvalidAddress(email.to));
        }
        self.sent.lock().unwrap().push(email);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::WeeklyStats;

    fn theme() -> EmailTheme {
        EmailTheme {
            primary_color: "#111112".to_string(),
            storefront_title: "Noir Picks".to_string(),
        }
    }

    fn clicked_at() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2026-03-14T09:26:53Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn test_click_alert_uses_theme_color() {
        let email = click_alert(
            "owner@example.com",
            &theme(),
            "Leather tote",
            12,
            clicked_at(),
            "https://briklyst.com",
        )
        .unwrap();
        assert_eq!(email.subject, "New click on Leather tote");
        assert!(email.html.contains("#111112"));
        assert!(email.text.contains("12"));
        assert!(email.text.contains("https://briklyst.com/dashboard/analytics"));
    }

    #[test]
    fn test_click_alert_includes_click_time() {
        let email = click_alert(
            "owner@example.com",
            &theme(),
            "Leather tote",
            3,
            clicked_at(),
            "https://briklyst.com",
        )
        .unwrap();
        assert!(email.html.contains("2026-03-14 09:26 UTC"));
        assert!(email.text.contains("Clicked at 2026-03-14 09:26 UTC"));
    }

    #[test]
    fn test_click_alert_escapes_html() {
        let email = click_alert(
            "owner@example.com",
            &theme(),
            "<script>x</script>",
            1,
            clicked_at(),
            "https://briklyst.com",
        )
        .unwrap();
        assert!(!email.html.contains("<script>"));
    }

    #[test]
    fn test_weekly_report_lists_top_products() {
        let stats = WeeklyStats {
            clicks: 9,
            new_subscribers: 2,
            top_products: vec![("Mug".to_string(), 6), ("Tote".to_string(), 3)],
        };
        let email = weekly_report(
            "owner@example.com",
            &theme(),
            "noir",
            &stats,
            "https://briklyst.com",
        )
        .unwrap();
        assert_eq!(email.subject, "Your week on Noir Picks");
        assert!(email.text.contains("Mug"));
        assert!(email.html.contains("Tote"));
    }

    #[test]
    fn test_subscriber_welcome_message() {
        let email = subscriber_welcome(
            "fan@example.com",
            &theme(),
            "Thanks for subscribing!",
            "https://briklyst.com/s/noir",
        )
        .unwrap();
        assert!(email.text.contains("Thanks for subscribing!"));
        assert_eq!(email.to, "fan@example.com");
    }

    #[tokio::test]
    async fn test_log_mailer_accepts_everything() {
        let result = LogMailer
            .send(OutboundEmail {
                to: "a@example.com".to_string(),
                subject: "s".to_string(),
                html: String::new(),
                text: String::new(),
            })
            .await;
        assert!(result.is_ok());
    }
}
