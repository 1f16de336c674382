//! Read-side reporting for the charity platform.
//!
//! - [`AnalyticsService`] for the admin dashboard and period reports
//! - [`LedgerReconciler`] for checking campaign totals against donations
//! - [`ReportScheduler`] for the periodic summary and reconciliation jobs
//! - [`DocumentService`] for donation receipts and volunteer certificates

pub mod analytics;
pub mod documents;
pub mod error;
pub mod pdf;
pub mod reconciliation;
pub mod scheduler;

pub use analytics::{AnalyticsService, Dashboard, PeriodReport, ReportPeriod, Totals};
pub use documents::{Document, DocumentService, render_certificate, render_receipt};
pub use error::{ReportError, Result};
pub use reconciliation::{Discrepancy, LedgerReconciler};
pub use scheduler::{
    DEFAULT_REPORT_INTERVAL, DailySummary, MIN_REPORT_INTERVAL, ReportScheduler,
};
