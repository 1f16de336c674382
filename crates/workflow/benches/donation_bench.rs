use std::sync::Arc;

use chrono::Duration;
use common::{
    Campaign, CampaignCategory, CampaignId, CampaignStatus, Money, PaymentMethod, Role, User,
    UserId, timestamp_now,
};
use criterion::{Criterion, criterion_group, criterion_main};
use domain::NotificationService;
use store::{CampaignStore, InMemoryStore, UserStore};
use workflow::{
    DonationCoordinator, DonationRequest, LoggingEmailSender, LoggingSmsSender,
    NotificationDispatcher, SimulatedPaymentGateway,
};

async fn seed(store: &InMemoryStore) -> (UserId, CampaignId) {
    let now = timestamp_now();
    let donor = store
        .insert_user(User {
            id: UserId::new(),
            name: "Bench Donor".to_string(),
            email: "bench@example.org".to_string(),
            phone: Some("01700000000".to_string()),
            role: Role::Donor,
            is_active: true,
            is_approved: true,
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
    let campaign = store
        .insert_campaign(Campaign {
            id: CampaignId::new(),
            title: "Bench Campaign".to_string(),
            description: "Benchmark".to_string(),
            category: CampaignCategory::General,
            target_amount: Money::from_taka(1_000_000),
            current_amount: Money::zero(),
            start_date: now,
            end_date: now + Duration::days(365),
            status: CampaignStatus::Active,
            image: None,
            created_by: UserId::new(),
            created_at: now,
            updated_at: now,
        })
        .await
        .unwrap();
    (donor.id, campaign.id)
}

fn bench_donate(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let store = InMemoryStore::new();
    let (donor, campaign) = rt.block_on(seed(&store));
    let coordinator = rt.block_on(async {
        let (dispatcher, _worker) = NotificationDispatcher::spawn(
            NotificationService::new(store.clone()),
            Arc::new(LoggingEmailSender::new()),
            Arc::new(LoggingSmsSender::new()),
            1024,
        );
        DonationCoordinator::new(
            store.clone(),
            SimulatedPaymentGateway::always_accept(),
            dispatcher,
        )
    });

    c.bench_function("donate_completed", |b| {
        b.to_async(&rt).iter(|| async {
            coordinator
                .donate(
                    donor,
                    DonationRequest {
                        campaign,
                        amount: Money::from_taka(100),
                        payment_method: PaymentMethod::Card,
                        payment_details: None,
                    },
                )
                .await
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_donate);
criterion_main!(benches);
