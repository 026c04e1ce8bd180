//! The weekly owner report.
//!
//! Triggered externally (`bk-cli report weekly`). Recipients are processed
//! with bounded concurrency; one owner's failure is logged and counted but
//! never stops the others.

use futures::stream::{self, StreamExt};
use serde::Serialize;

use briklyst_core::resolve;
use briklyst_core::style::EmailTheme;

use super::email::{self, Mailer};
use crate::db::{ReportRecipient, ReportStore, StorefrontStore};
use crate::error::Result;

/// Totals for one report run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub sent: usize,
    pub failed: usize,
}

pub struct WeeklyReportJob<R, S, M> {
    reports: R,
    storefronts: S,
    mailer: M,
    base_url: String,
}

impl<R, S, M> WeeklyReportJob<R, S, M>
where
    R: ReportStore,
    S: StorefrontStore,
    M: Mailer,
{
    #[must_use]
    pub fn new(reports: R, storefronts: S, mailer: M, base_url: impl Into<String>) -> Self {
        Self {
            reports,
            storefronts,
            mailer,
            base_url: base_url.into(),
        }
    }

    /// Send the report to every opted-in owner, `concurrency` at a time.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Database` only if the recipient list cannot be
    /// loaded.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self, concurrency: usize) -> Result<ReportSummary> {
        let recipients = self.reports.weekly_recipients().await?;
        tracing::info!(recipients = recipients.len(), "Starting weekly report");

        let summary = stream::iter(recipients)
            .map(|recipient| async move {
                let outcome = self.send_one(&recipient).await;
                if let Err(e) = &outcome {
                    tracing::warn!(
                        error = %e,
                        user_id = %recipient.user_id,
                        "Weekly report failed"
                    );
                }
                outcome.is_ok()
            })
            .buffer_unordered(concurrency.max(1))
            .fold(ReportSummary::default(), |mut summary, ok| async move {
                if ok {
                    summary.sent += 1;
                } else {
                    summary.failed += 1;
                }
                summary
            })
            .await;

        tracing::info!(sent = summary.sent, failed = summary.failed, "Weekly report finished");
        Ok(summary)
    }

    async fn send_one(&self, recipient: &ReportRecipient) -> Result<()> {
        let stats = self.reports.weekly_stats(recipient.storefront_id).await?;
        let settings = self.storefronts.settings(recipient.user_id).await?;
        let theme = EmailTheme::new(
            &resolve(settings.as_ref()),
            recipient.storefront_title.clone(),
        );
        let message = email::weekly_report(
            &recipient.email,
            &theme,
            &recipient.username,
            &stats,
            &self.base_url,
        )?;
        self.mailer.send(message).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::memory::MemoryStore;
    use crate::services::email::RecordingMailer;
    use crate::services::settings::flatten;

    #[tokio::test]
    async fn test_sends_to_every_owner_with_storefront() {
        let store = MemoryStore::new();
        let a = store.seed_user("a@example.com", "alpha");
        let b = store.seed_user("b@example.com", "bravo");
        store.seed_user("c@example.com", "charlie");
        StorefrontStore::ensure(&store, a.id, flatten).await.unwrap();
        StorefrontStore::ensure(&store, b.id, flatten).await.unwrap();

        let mailer = RecordingMailer::default();
        let job = WeeklyReportJob::new(store.clone(), store, mailer.clone(), "https://briklyst.com");
        let summary = job.run(2).await.unwrap();

        assert_eq!(summary, ReportSummary { sent: 2, failed: 0 });
        let mut recipients: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
        recipients.sort();
        assert_eq!(recipients, vec!["a@example.com", "b@example.com"]);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_stop_the_others() {
        let store = MemoryStore::new();
        for (email, username) in [
            ("a@example.com", "alpha"),
            ("b@example.com", "bravo"),
            ("c@example.com", "charlie"),
        ] {
            let owner = store.seed_user(email, username);
            StorefrontStore::ensure(&store, owner.id, flatten).await.unwrap();
        }

        let mailer = RecordingMailer::failing_for("b@example.com");
        let job = WeeklyReportJob::new(store.clone(), store, mailer.clone(), "https://briklyst.com");
        let summary = job.run(2).await.unwrap();

        assert_eq!(summary, ReportSummary { sent: 2, failed: 1 });
        let mut recipients: Vec<String> = mailer.sent().into_iter().map(|m| m.to).collect();
        recipients.sort();
        assert_eq!(recipients, vec!["a@example.com", "c@example.com"]);
    }
}
