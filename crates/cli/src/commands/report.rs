//! Scheduled email reports.
//!
//! Meant to be run from cron or a scheduler once a week:
//!
//! ```bash
//! bk-cli report weekly
//! bk-cli report weekly --concurrency 8
//! ```

use briklyst_storefront::config::BriklystConfig;
use briklyst_storefront::db::{self, ReportRepository, StorefrontRepository};
use briklyst_storefront::services::email::AppMailer;
use briklyst_storefront::services::report::{ReportSummary, WeeklyReportJob};

use super::CommandError;

/// Send the weekly performance email to every opted-in owner.
///
/// `concurrency` overrides `BRIKLYST_REPORT_CONCURRENCY`.
///
/// # Errors
///
/// Returns an error if configuration or the recipient query fails. Failed
/// sends to individual owners are only counted.
pub async fn weekly(concurrency: Option<usize>) -> Result<ReportSummary, CommandError> {
    let config = BriklystConfig::for_jobs()?;
    let pool = db::create_pool(&config.database_url).await?;
    let mailer = AppMailer::from_config(config.email.as_ref(), &config.email_from)?;

    let job = WeeklyReportJob::new(
        ReportRepository::new(&pool),
        StorefrontRepository::new(&pool),
        mailer,
        config.base_url.clone(),
    );
    let summary = job
        .run(concurrency.unwrap_or(config.report_concurrency))
        .await?;
    Ok(summary)
}
