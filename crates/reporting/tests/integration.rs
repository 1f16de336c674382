use std::sync::Arc;
use std::time::Duration;

use common::{
    Campaign, CampaignCategory, CampaignId, CampaignStatus, Donation, DonationId, DonationStatus,
    Money, PaymentMethod, Role, TaskId, TaskStatus, User, UserId, VolunteerTask, timestamp_now,
};
use domain::{Caller, DomainError};
use reporting::{
    AnalyticsService, DocumentService, LedgerReconciler, ReportError, ReportPeriod,
    ReportScheduler,
};
use store::{CampaignStore, DonationStore, InMemoryStore, TaskStore, UserStore};
use tokio_util::sync::CancellationToken;
use workflow::LoggingEmailSender;

async fn add_user(store: &InMemoryStore, role: Role) -> User {
    let now = timestamp_now();
    store
        .insert_user(User {
            id: UserId::new(),
            name: format!("{role} user"),
            email: format!("{}@example.org", UserId::new()),
            phone: None,
            role,
            is_active: true,
            is_approved: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

async fn add_campaign(store: &InMemoryStore, target: i64, current: i64) -> Campaign {
    let now = timestamp_now();
    store
        .insert_campaign(Campaign {
            id: CampaignId::new(),
            title: "Clean Water".to_string(),
            description: "Tube wells for coastal villages".to_string(),
            category: CampaignCategory::General,
            target_amount: Money::from_taka(target),
            current_amount: Money::from_taka(current),
            start_date: now,
            end_date: now + chrono::Duration::days(60),
            status: CampaignStatus::Active,
            image: None,
            created_by: UserId::new(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

async fn add_donation(
    store: &InMemoryStore,
    donor: UserId,
    campaign: CampaignId,
    taka: i64,
    method: PaymentMethod,
    status: DonationStatus,
) -> Donation {
    let now = timestamp_now();
    store
        .insert_donation(Donation {
            id: DonationId::new(),
            donor,
            campaign,
            amount: Money::from_taka(taka),
            payment_method: method,
            transaction_id: format!("TXN-{}", DonationId::new()),
            status,
            payment_details: None,
            receipt_generated: false,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

async fn add_task(store: &InMemoryStore, volunteer: UserId, status: TaskStatus) -> VolunteerTask {
    let now = timestamp_now();
    store
        .insert_task(VolunteerTask {
            id: TaskId::new(),
            volunteer,
            title: "Distribute blankets".to_string(),
            description: "Kurigram, ward 4".to_string(),
            status,
            assigned_by: UserId::new(),
            assigned_date: now,
            completed_date: (status == TaskStatus::Completed).then_some(now),
            updates: Vec::new(),
            field_photos: Vec::new(),
            certificate_generated: false,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap()
}

fn caller(user: &User) -> Caller {
    Caller::new(user.id, user.role)
}

#[tokio::test]
async fn dashboard_counts_only_completed_donations() {
    let store = InMemoryStore::new();
    let admin = add_user(&store, Role::Admin).await;
    let donor = add_user(&store, Role::Donor).await;
    let campaign = add_campaign(&store, 1_000, 1_100).await;
    add_donation(&store, donor.id, campaign.id, 600, PaymentMethod::BKash, DonationStatus::Completed).await;
    add_donation(&store, donor.id, campaign.id, 500, PaymentMethod::Card, DonationStatus::Completed).await;
    add_donation(&store, donor.id, campaign.id, 900, PaymentMethod::Card, DonationStatus::Failed).await;

    let analytics = AnalyticsService::new(store.clone());
    let dashboard = analytics.dashboard(&caller(&admin)).await.unwrap();

    assert_eq!(dashboard.donations.total, Money::from_taka(1_100));
    assert_eq!(dashboard.donations.count, 2);
    assert_eq!(dashboard.donations.recent.count, 2);
    assert_eq!(dashboard.donations.by_method.len(), 2);
    let card = dashboard
        .donations
        .by_method
        .iter()
        .find(|m| m.method == PaymentMethod::Card)
        .unwrap();
    assert_eq!(card.total, Money::from_taka(500));

    let active = dashboard
        .campaigns
        .iter()
        .find(|c| c.status == CampaignStatus::Active)
        .unwrap();
    assert_eq!(active.count, 1);
    assert_eq!(active.total_current, Money::from_taka(1_100));
    assert_eq!(dashboard.users["admin"], 1);
    assert_eq!(dashboard.users["donor"], 1);
    assert_eq!(dashboard.users["staff"], 0);
}

#[tokio::test]
async fn aggregates_over_extreme_stored_amounts_stay_bounded() {
    let store = InMemoryStore::new();
    let admin = add_user(&store, Role::Admin).await;
    let donor = add_user(&store, Role::Donor).await;
    let huge = i64::MAX / 100;
    let campaign = add_campaign(&store, huge, huge).await;
    add_donation(&store, donor.id, campaign.id, huge, PaymentMethod::Card, DonationStatus::Completed).await;
    add_donation(&store, donor.id, campaign.id, huge, PaymentMethod::Card, DonationStatus::Completed).await;
    add_campaign(&store, huge, huge).await;

    let analytics = AnalyticsService::new(store.clone());
    let dashboard = analytics.dashboard(&caller(&admin)).await.unwrap();
    assert_eq!(dashboard.donations.total, Money::from_poisha(i64::MAX));
    assert_eq!(dashboard.donations.count, 2);
    let active = dashboard
        .campaigns
        .iter()
        .find(|c| c.status == CampaignStatus::Active)
        .unwrap();
    assert_eq!(active.total_current, Money::from_poisha(i64::MAX));

    let report = analytics
        .report(&caller(&admin), ReportPeriod::Weekly)
        .await
        .unwrap();
    assert_eq!(report.donations.count, 2);

    let discrepancies = LedgerReconciler::new(store.clone()).reconcile().await.unwrap();
    assert_eq!(discrepancies.len(), 2);
}

#[tokio::test]
async fn dashboard_is_admin_only() {
    let store = InMemoryStore::new();
    let staff = add_user(&store, Role::Staff).await;

    let err = AnalyticsService::new(store)
        .dashboard(&caller(&staff))
        .await
        .unwrap_err();
    assert!(matches!(err, ReportError::Domain(DomainError::AccessDenied(_))));
}

#[tokio::test]
async fn period_report_lists_recent_activity() {
    let store = InMemoryStore::new();
    let staff = add_user(&store, Role::Staff).await;
    let donor = add_user(&store, Role::Donor).await;
    let volunteer = add_user(&store, Role::Volunteer).await;
    let campaign = add_campaign(&store, 1_000, 0).await;
    add_donation(&store, donor.id, campaign.id, 250, PaymentMethod::Nagad, DonationStatus::Completed).await;
    add_task(&store, volunteer.id, TaskStatus::Assigned).await;

    let report = AnalyticsService::new(store)
        .report(&caller(&staff), ReportPeriod::Weekly)
        .await
        .unwrap();

    assert_eq!(report.period, ReportPeriod::Weekly);
    assert_eq!(report.donations.total, Money::from_taka(250));
    assert_eq!(report.donations.list.len(), 1);
    assert_eq!(report.tasks.count, 1);
    assert_eq!(report.beneficiaries.count, 0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["period"], "weekly");
    assert!(json["startDate"].is_string());
}

#[tokio::test]
async fn reconciliation_reports_without_repairing() {
    let store = InMemoryStore::new();
    let donor = add_user(&store, Role::Donor).await;
    let balanced = add_campaign(&store, 1_000, 600).await;
    let drifted = add_campaign(&store, 1_000, 300).await;
    add_donation(&store, donor.id, balanced.id, 600, PaymentMethod::BKash, DonationStatus::Completed).await;
    add_donation(&store, donor.id, drifted.id, 500, PaymentMethod::BKash, DonationStatus::Completed).await;
    add_donation(&store, donor.id, balanced.id, 700, PaymentMethod::BKash, DonationStatus::Failed).await;

    let found = LedgerReconciler::new(store.clone()).reconcile().await.unwrap();

    assert_eq!(found.len(), 1);
    assert_eq!(found[0].campaign, drifted.id);
    assert_eq!(found[0].recorded, Money::from_taka(300));
    assert_eq!(found[0].confirmed, Money::from_taka(500));
    let stored = store.get_campaign(drifted.id).await.unwrap().unwrap();
    assert_eq!(stored.current_amount, Money::from_taka(300));
}

#[tokio::test]
async fn daily_summary_goes_to_the_first_admin() {
    let store = InMemoryStore::new();
    let first_admin = add_user(&store, Role::Admin).await;
    add_user(&store, Role::Admin).await;
    let donor = add_user(&store, Role::Donor).await;
    let campaign = add_campaign(&store, 1_000, 0).await;
    add_donation(&store, donor.id, campaign.id, 600, PaymentMethod::BKash, DonationStatus::Completed).await;

    let email = Arc::new(LoggingEmailSender::new());
    let scheduler = ReportScheduler::new(store, email.clone(), Duration::from_secs(60));
    let summary = scheduler.send_daily_summary().await.unwrap().unwrap();

    assert_eq!(summary.total, Money::from_taka(600));
    assert_eq!(summary.count, 1);
    let sent = email.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, first_admin.email);
    assert_eq!(sent[0].subject, "Daily Donation Report");
    assert!(sent[0].body.contains("600.00 BDT"));
}

#[tokio::test]
async fn daily_summary_without_admin_sends_nothing() {
    let store = InMemoryStore::new();
    let email = Arc::new(LoggingEmailSender::new());
    let scheduler = ReportScheduler::new(store, email.clone(), Duration::from_secs(60));

    assert!(scheduler.send_daily_summary().await.unwrap().is_none());
    assert_eq!(email.sent_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn scheduler_runs_each_period_until_cancelled() {
    let store = InMemoryStore::new();
    add_user(&store, Role::Admin).await;
    let email = Arc::new(LoggingEmailSender::new());
    let cancel = CancellationToken::new();
    let handle = ReportScheduler::new(store, email.clone(), Duration::from_secs(3_600))
        .spawn(cancel.clone());

    tokio::time::sleep(Duration::from_secs(1_800)).await;
    assert_eq!(email.sent_count(), 0);

    tokio::time::sleep(Duration::from_secs(5_500)).await;
    assert_eq!(email.sent_count(), 2);

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn scheduler_raises_a_zero_period_to_the_minimum() {
    let store = InMemoryStore::new();
    add_user(&store, Role::Admin).await;
    let email = Arc::new(LoggingEmailSender::new());
    let cancel = CancellationToken::new();
    let handle = ReportScheduler::new(store, email.clone(), Duration::ZERO).spawn(cancel.clone());

    tokio::time::sleep(Duration::from_millis(2_500)).await;
    assert_eq!(email.sent_count(), 2);

    cancel.cancel();
    handle.await.unwrap();
}

#[tokio::test]
async fn receipt_requires_completed_owned_donation() {
    let store = InMemoryStore::new();
    let donor = add_user(&store, Role::Donor).await;
    let other = add_user(&store, Role::Donor).await;
    let campaign = add_campaign(&store, 1_000, 600).await;
    let completed = add_donation(&store, donor.id, campaign.id, 600, PaymentMethod::BKash, DonationStatus::Completed).await;
    let failed = add_donation(&store, donor.id, campaign.id, 100, PaymentMethod::BKash, DonationStatus::Failed).await;
    let documents = DocumentService::new(store.clone());

    let receipt = documents.receipt(&caller(&donor), completed.id).await.unwrap();
    assert_eq!(receipt.filename, format!("receipt-{}.pdf", completed.transaction_id));
    assert!(receipt.bytes.starts_with(b"%PDF-1.4"));
    let text = String::from_utf8_lossy(&receipt.bytes);
    assert!(text.contains("Amount: 600.00 BDT"));
    assert!(text.contains("Campaign: Clean Water"));
    assert!(store.get_donation(completed.id).await.unwrap().unwrap().receipt_generated);

    let err = documents.receipt(&caller(&other), completed.id).await.unwrap_err();
    assert!(matches!(err, ReportError::Domain(DomainError::AccessDenied(_))));

    let err = documents.receipt(&caller(&donor), failed.id).await.unwrap_err();
    assert!(matches!(err, ReportError::Domain(DomainError::Validation(_))));

    let err = documents.receipt(&caller(&donor), DonationId::new()).await.unwrap_err();
    assert!(matches!(err, ReportError::Domain(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn certificate_requires_completed_task() {
    let store = InMemoryStore::new();
    let volunteer = add_user(&store, Role::Volunteer).await;
    let admin = add_user(&store, Role::Admin).await;
    let done = add_task(&store, volunteer.id, TaskStatus::Completed).await;
    let open = add_task(&store, volunteer.id, TaskStatus::InProgress).await;
    let documents = DocumentService::new(store.clone());

    let certificate = documents.certificate(&caller(&admin), done.id).await.unwrap();
    assert_eq!(certificate.filename, format!("certificate-{}.pdf", done.id));
    let text = String::from_utf8_lossy(&certificate.bytes);
    assert!(text.contains("Certificate of Participation"));
    assert!(text.contains("\"Distribute blankets\""));
    assert!(store.get_task(done.id).await.unwrap().unwrap().certificate_generated);

    let err = documents.certificate(&caller(&volunteer), open.id).await.unwrap_err();
    assert!(matches!(err, ReportError::Domain(DomainError::Validation(_))));
}
