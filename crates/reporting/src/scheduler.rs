//! Periodic background jobs: the daily donation summary and ledger
//! reconciliation.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use common::{Money, Role};
use serde::Serialize;
use store::{DonationQuery, Store};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use workflow::{EmailMessage, EmailSender};

use crate::analytics::Totals;
use crate::error::{ReportError, Result};
use crate::reconciliation::LedgerReconciler;

/// Default period between runs.
pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Shortest period the scheduler accepts; smaller values are raised to it.
pub const MIN_REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Completed donations received since a point in time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySummary {
    pub since: DateTime<Utc>,
    pub total: Money,
    pub count: u64,
}

impl DailySummary {
    fn email(&self, to: String) -> EmailMessage {
        EmailMessage {
            to,
            subject: "Daily Donation Report".to_string(),
            body: format!(
                "Daily Report\n\nTotal donations last 24h: {} ({} donations since {})",
                self.total,
                self.count,
                self.since.format("%Y-%m-%d %H:%M UTC")
            ),
        }
    }
}

/// Runs the scheduled jobs on a fixed period until cancelled.
pub struct ReportScheduler<S> {
    store: S,
    reconciler: LedgerReconciler<S>,
    email: Arc<dyn EmailSender>,
    period: Duration,
}

impl<S: Store> ReportScheduler<S> {
    pub fn new(store: S, email: Arc<dyn EmailSender>, period: Duration) -> Self {
        Self {
            reconciler: LedgerReconciler::new(store.clone()),
            store,
            email,
            period: period.max(MIN_REPORT_INTERVAL),
        }
    }

    /// Sums completed donations from the last 24 hours and e-mails the
    /// result to the first registered admin.
    ///
    /// Returns `None` when there is no admin to send it to.
    #[tracing::instrument(skip(self))]
    pub async fn send_daily_summary(&self) -> Result<Option<DailySummary>> {
        let since = Utc::now() - chrono::Duration::hours(24);
        let donations = self
            .store
            .query_donations(DonationQuery::new().completed().since(since))
            .await?;
        let totals = Totals::of(&donations);
        let summary = DailySummary {
            since,
            total: totals.total,
            count: totals.count,
        };

        // Listings are newest first; the first admin is the oldest.
        let admins = self.store.list_users(Some(Role::Admin)).await?;
        let Some(admin) = admins.last() else {
            tracing::info!("no admin registered, skipping daily summary");
            return Ok(None);
        };

        self.email
            .send(summary.email(admin.email.clone()))
            .await
            .map_err(|e| ReportError::Delivery(e.to_string()))?;
        tracing::info!(
            to = %admin.email,
            total = summary.total.poisha(),
            count = summary.count,
            "daily summary sent"
        );
        Ok(Some(summary))
    }

    /// Runs every job once. Failures are logged; one job failing does not
    /// stop the other.
    pub async fn run_once(&self) {
        if let Err(e) = self.send_daily_summary().await {
            metrics::counter!("scheduled_job_failures_total", "job" => "daily_summary")
                .increment(1);
            tracing::error!(error = %e, "daily summary job failed");
        }
        if let Err(e) = self.reconciler.reconcile().await {
            metrics::counter!("scheduled_job_failures_total", "job" => "reconciliation")
                .increment(1);
            tracing::error!(error = %e, "reconciliation job failed");
        }
    }

    /// Spawns the job loop. The first run happens one period after start.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + self.period, self.period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tracing::info!(period_secs = self.period.as_secs(), "report scheduler started");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        tracing::info!("report scheduler stopped");
                        break;
                    }
                    _ = ticker.tick() => self.run_once().await,
                }
            }
        })
    }
}
