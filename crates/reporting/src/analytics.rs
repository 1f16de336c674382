//! Dashboard aggregates and period reports.

use std::collections::BTreeMap;

use chrono::{DateTime, Duration, Months, Utc};
use common::{
    Beneficiary, BeneficiaryStatus, CampaignStatus, Donation, Money, ParseEnumError,
    PaymentMethod, Role, TaskStatus, VolunteerTask,
};
use domain::Caller;
use serde::{Deserialize, Serialize};
use store::{BeneficiaryQuery, DonationQuery, Store, TaskQuery};

use crate::error::Result;

/// Window used for the "recent" donation totals on the dashboard.
const RECENT_WINDOW_DAYS: i64 = 30;

/// Sum and count of a set of completed donations.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub total: Money,
    pub count: u64,
}

impl Totals {
    pub(crate) fn of<'a>(donations: impl IntoIterator<Item = &'a Donation>) -> Self {
        donations.into_iter().fold(Totals::default(), |acc, d| Totals {
            total: acc.total + d.amount,
            count: acc.count + 1,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodTotals {
    pub method: PaymentMethod,
    pub total: Money,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationStats {
    pub total: Money,
    pub count: u64,
    pub recent: Totals,
    pub by_method: Vec<MethodTotals>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignStats {
    pub status: CampaignStatus,
    pub count: u64,
    pub total_target: Money,
    pub total_current: Money,
}

/// Platform-wide aggregates for the admin dashboard.
///
/// Status and role tallies list every known value, zeros included.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub donations: DonationStats,
    pub campaigns: Vec<CampaignStats>,
    pub beneficiaries: BTreeMap<&'static str, u64>,
    pub tasks: BTreeMap<&'static str, u64>,
    pub users: BTreeMap<&'static str, u64>,
}

/// Reporting window, counted back from now.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Weekly,
    #[default]
    Monthly,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportPeriod::Weekly => "weekly",
            ReportPeriod::Monthly => "monthly",
        }
    }

    /// Start of the window ending at `now`.
    pub fn start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            ReportPeriod::Weekly => now - Duration::days(7),
            ReportPeriod::Monthly => now
                .checked_sub_months(Months::new(1))
                .unwrap_or(now - Duration::days(30)),
        }
    }
}

impl std::str::FromStr for ReportPeriod {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "weekly" => Ok(ReportPeriod::Weekly),
            "monthly" => Ok(ReportPeriod::Monthly),
            other => Err(ParseEnumError::new("ReportPeriod", other)),
        }
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing<T> {
    pub count: u64,
    pub list: Vec<T>,
}

impl<T> From<Vec<T>> for Listing<T> {
    fn from(list: Vec<T>) -> Self {
        Self {
            count: list.len() as u64,
            list,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationListing {
    pub total: Money,
    pub count: u64,
    pub list: Vec<Donation>,
}

/// Activity recorded during one [`ReportPeriod`], newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodReport {
    pub period: ReportPeriod,
    pub start_date: DateTime<Utc>,
    pub donations: DonationListing,
    pub beneficiaries: Listing<Beneficiary>,
    pub tasks: Listing<VolunteerTask>,
}

fn tally<K: Copy>(
    all: &[K],
    keys: impl Iterator<Item = K>,
    name: fn(&K) -> &'static str,
) -> BTreeMap<&'static str, u64> {
    let mut counts: BTreeMap<&'static str, u64> = all.iter().map(|k| (name(k), 0)).collect();
    for key in keys {
        *counts.entry(name(&key)).or_default() += 1;
    }
    counts
}

/// Read-only aggregates over the record stores.
#[derive(Clone)]
pub struct AnalyticsService<S> {
    store: S,
}

impl<S: Store> AnalyticsService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Builds the admin dashboard.
    #[tracing::instrument(skip(self), fields(caller = %caller.user_id))]
    pub async fn dashboard(&self, caller: &Caller) -> Result<Dashboard> {
        caller.require_any(&[Role::Admin])?;

        let completed = self
            .store
            .query_donations(DonationQuery::new().completed())
            .await?;
        let recent_since = Utc::now() - Duration::days(RECENT_WINDOW_DAYS);
        let overall = Totals::of(&completed);
        let recent = Totals::of(completed.iter().filter(|d| d.created_at >= recent_since));

        let by_method = PaymentMethod::ALL
            .iter()
            .map(|method| {
                let totals = Totals::of(completed.iter().filter(|d| d.payment_method == *method));
                MethodTotals {
                    method: *method,
                    total: totals.total,
                    count: totals.count,
                }
            })
            .filter(|m| m.count > 0)
            .collect();

        let campaigns = self.store.list_campaigns(None).await?;
        let campaign_stats = CampaignStatus::ALL
            .iter()
            .map(|status| {
                campaigns.iter().filter(|c| c.status == *status).fold(
                    CampaignStats {
                        status: *status,
                        count: 0,
                        total_target: Money::zero(),
                        total_current: Money::zero(),
                    },
                    |acc, c| CampaignStats {
                        count: acc.count + 1,
                        total_target: acc.total_target + c.target_amount,
                        total_current: acc.total_current + c.current_amount,
                        ..acc
                    },
                )
            })
            .collect();

        let beneficiaries = self
            .store
            .query_beneficiaries(BeneficiaryQuery::new())
            .await?;
        let tasks = self.store.query_tasks(TaskQuery::new()).await?;
        let users = self.store.list_users(None).await?;

        Ok(Dashboard {
            donations: DonationStats {
                total: overall.total,
                count: overall.count,
                recent,
                by_method,
            },
            campaigns: campaign_stats,
            beneficiaries: tally(
                BeneficiaryStatus::ALL,
                beneficiaries.iter().map(|b| b.status),
                BeneficiaryStatus::as_str,
            ),
            tasks: tally(TaskStatus::ALL, tasks.iter().map(|t| t.status), TaskStatus::as_str),
            users: tally(Role::ALL, users.iter().map(|u| u.role), Role::as_str),
        })
    }

    /// Lists completed donations, beneficiary applications and tasks created
    /// within `period`.
    #[tracing::instrument(skip(self), fields(caller = %caller.user_id, period = %period))]
    pub async fn report(&self, caller: &Caller, period: ReportPeriod) -> Result<PeriodReport> {
        caller.require_any(&[Role::Admin, Role::Staff])?;

        let start_date = period.start(Utc::now());
        let donations = self
            .store
            .query_donations(DonationQuery::new().completed().since(start_date))
            .await?;
        let totals = Totals::of(&donations);
        let beneficiaries = self
            .store
            .query_beneficiaries(BeneficiaryQuery::new().since(start_date))
            .await?;
        let tasks = self
            .store
            .query_tasks(TaskQuery::new().since(start_date))
            .await?;

        Ok(PeriodReport {
            period,
            start_date,
            donations: DonationListing {
                total: totals.total,
                count: totals.count,
                list: donations,
            },
            beneficiaries: beneficiaries.into(),
            tasks: tasks.into(),
        })
    }
}
