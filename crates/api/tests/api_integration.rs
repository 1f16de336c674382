//! Integration tests for the API server.

use std::sync::{Arc, OnceLock};

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use common::{
    Campaign, CampaignCategory, CampaignId, CampaignStatus, Money, Role, User, UserId,
    timestamp_now,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde_json::{Value, json};
use store::{CampaignStore, DonationStore, InMemoryStore, UserStore};
use tower::ServiceExt;
use workflow::SimulatedPaymentGateway;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    router: axum::Router,
    state: Arc<api::AppState<InMemoryStore>>,
    store: InMemoryStore,
}

impl TestApp {
    fn new() -> Self {
        let store = InMemoryStore::new();
        let (state, _worker) = api::AppState::with_logging_senders(
            store.clone(),
            SimulatedPaymentGateway::always_accept(),
            64,
        );
        let state = Arc::new(state);
        let router = api::create_app(state.clone(), get_metrics_handle(), api::cors_layer(None));
        Self {
            router,
            state,
            store,
        }
    }

    async fn user(&self, role: Role) -> User {
        let now = timestamp_now();
        self.store
            .insert_user(User {
                id: UserId::new(),
                name: format!("{role} tester"),
                email: format!("{}@example.org", UserId::new()),
                phone: Some("01811112222".to_string()),
                role,
                is_active: true,
                is_approved: true,
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    async fn campaign(&self, target_taka: i64) -> Campaign {
        let now = timestamp_now();
        self.store
            .insert_campaign(Campaign {
                id: CampaignId::new(),
                title: "Ramadan Food Packs".to_string(),
                description: "Iftar packs for 500 families".to_string(),
                category: CampaignCategory::Sadaqah,
                target_amount: Money::from_taka(target_taka),
                current_amount: Money::zero(),
                start_date: now,
                end_date: now + Duration::days(30),
                status: CampaignStatus::Active,
                image: None,
                created_by: UserId::new(),
                created_at: now,
                updated_at: now,
            })
            .await
            .unwrap()
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        caller: Option<&User>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(user) = caller {
            request = request
                .header("x-user-id", user.id.to_string())
                .header("x-user-role", user.role.as_str());
        }
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .router
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    async fn donate(&self, donor: &User, campaign: CampaignId, amount_poisha: i64) -> (StatusCode, Value) {
        self.send(
            "POST",
            "/api/donations",
            Some(donor),
            Some(json!({
                "campaignId": campaign.to_string(),
                "amount": amount_poisha,
                "paymentMethod": "bKash",
                "paymentDetails": { "phoneNumber": "01811112222" }
            })),
        )
        .await
    }
}

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new();
    let (status, json) = app.send("GET", "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Server is running");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let app = TestApp::new();
    let response = app
        .router
        .clone()
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/plain"));
}

#[tokio::test]
async fn test_donation_scenario_allows_overfunding() {
    let app = TestApp::new();
    let donor = app.user(Role::Donor).await;
    let campaign = app.campaign(1_000).await;

    let (status, json) = app.donate(&donor, campaign.id, 60_000).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["message"], "Donation successful");
    assert_eq!(json["data"]["status"], "completed");
    assert_eq!(json["data"]["paymentMethod"], "bKash");

    let (status, json) = app
        .send("GET", &format!("/api/campaigns/{}", campaign.id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["currentAmount"], 60_000);

    let (status, _) = app.donate(&donor, campaign.id, 50_000).await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, json) = app
        .send("GET", &format!("/api/campaigns/{}", campaign.id), None, None)
        .await;
    assert_eq!(json["data"]["currentAmount"], 110_000);
}

#[tokio::test]
async fn test_donation_to_unknown_campaign_is_404() {
    let app = TestApp::new();
    let donor = app.user(Role::Donor).await;

    let (status, json) = app.donate(&donor, CampaignId::new(), 10_000).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Campaign not found");
    assert_eq!(app.store.count_donations().await.unwrap(), 0);
}

#[tokio::test]
async fn test_declined_payment_returns_failed_donation() {
    let app = TestApp::new();
    let donor = app.user(Role::Donor).await;
    let campaign = app.campaign(1_000).await;
    app.state.coordinator.gateway().set_force_decline(true);

    let (status, json) = app.donate(&donor, campaign.id, 10_000).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Payment failed. Please try again.");
    assert_eq!(json["donation"]["status"], "failed");
    assert!(
        json["donation"]["transactionId"]
            .as_str()
            .unwrap()
            .starts_with("FAILED-")
    );
    let stored = app.store.get_campaign(campaign.id).await.unwrap().unwrap();
    assert_eq!(stored.current_amount, Money::zero());
}

#[tokio::test]
async fn test_donation_validation() {
    let app = TestApp::new();
    let donor = app.user(Role::Donor).await;
    let campaign = app.campaign(1_000).await;

    let (status, json) = app.donate(&donor, campaign.id, 0).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let volunteer = app.user(Role::Volunteer).await;
    let (status, _) = app.donate(&volunteer, campaign.id, 10_000).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_unparseable_donation_body_is_400() {
    let app = TestApp::new();
    let donor = app.user(Role::Donor).await;
    let campaign = app.campaign(1_000).await;
    let id = campaign.id.to_string();

    let bodies = [
        json!({ "campaignId": id, "amount": 100, "paymentMethod": "Bitcoin" }),
        json!({ "campaignId": id, "paymentMethod": "bKash" }),
        json!({ "campaignId": id, "amount": 10.5, "paymentMethod": "bKash" }),
    ];
    for body in bodies {
        let (status, json) = app
            .send("POST", "/api/donations", Some(&donor), Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["success"], false);
        assert!(json["message"].is_string());
    }

    let (status, json) = app
        .send(
            "POST",
            "/api/campaigns",
            Some(&app.user(Role::Admin).await),
            Some(json!({ "title": "No target" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    assert_eq!(app.store.count_donations().await.unwrap(), 0);
}

#[tokio::test]
async fn test_oversized_amounts_are_rejected() {
    let app = TestApp::new();
    let donor = app.user(Role::Donor).await;
    let admin = app.user(Role::Admin).await;
    let campaign = app.campaign(1_000).await;

    let (status, json) = app.donate(&donor, campaign.id, i64::MAX).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    let (status, _) = app.donate(&donor, campaign.id, 1).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = app
        .send("GET", "/api/analytics/dashboard", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["donations"]["total"], 1);
    assert_eq!(app.store.count_donations().await.unwrap(), 1);
}

#[tokio::test]
async fn test_missing_identity_is_401() {
    let app = TestApp::new();

    let (status, json) = app.send("GET", "/api/donations", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["success"], false);

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/donations")
                .header("x-user-id", "not-a-uuid")
                .header("x-user-role", "donor")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_returns_created_document() {
    let app = TestApp::new();
    let donor = app.user(Role::Donor).await;
    let campaign = app.campaign(1_000).await;

    let (_, created) = app.donate(&donor, campaign.id, 25_000).await;
    let id = created["data"]["id"].as_str().unwrap();
    let (status, fetched) = app
        .send("GET", &format!("/api/donations/{id}"), Some(&donor), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["data"], created["data"]);
}

#[tokio::test]
async fn test_donor_isolation() {
    let app = TestApp::new();
    let alice = app.user(Role::Donor).await;
    let bob = app.user(Role::Donor).await;
    let admin = app.user(Role::Admin).await;
    let campaign = app.campaign(1_000).await;

    let (_, alice_donation) = app.donate(&alice, campaign.id, 10_000).await;
    app.donate(&bob, campaign.id, 20_000).await;

    let (_, json) = app.send("GET", "/api/donations", Some(&alice), None).await;
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["donor"], alice.id.to_string());

    let (_, json) = app.send("GET", "/api/donations", Some(&admin), None).await;
    assert_eq!(json["count"], 2);

    let id = alice_donation["data"]["id"].as_str().unwrap();
    let (status, _) = app
        .send("GET", &format!("/api/donations/{id}"), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_notification_after_donation() {
    let app = TestApp::new();
    let donor = app.user(Role::Donor).await;
    let campaign = app.campaign(1_000).await;

    app.donate(&donor, campaign.id, 60_000).await;
    app.state.coordinator.dispatcher().flush().await;

    let (status, json) = app
        .send("GET", "/api/notifications", Some(&donor), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["count"], 1);
    assert_eq!(json["data"][0]["title"], "Donation Successful");
    assert_eq!(json["data"][0]["isRead"], false);

    let (status, json) = app
        .send("PATCH", "/api/notifications/read-all", Some(&donor), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["updated"], 1);
}

#[tokio::test]
async fn test_receipt_pdf() {
    let app = TestApp::new();
    let donor = app.user(Role::Donor).await;
    let campaign = app.campaign(1_000).await;
    let (_, created) = app.donate(&donor, campaign.id, 60_000).await;
    let id = created["data"]["id"].as_str().unwrap();
    let txn = created["data"]["transactionId"].as_str().unwrap();

    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/api/pdf/receipt/{id}"))
                .header("x-user-id", donor.id.to_string())
                .header("x-user-role", "donor")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "application/pdf");
    assert_eq!(
        response.headers()["content-disposition"],
        format!("attachment; filename=receipt-{txn}.pdf").as_str()
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(bytes.starts_with(b"%PDF-1.4"));
}

#[tokio::test]
async fn test_campaign_admin_lifecycle() {
    let app = TestApp::new();
    let admin = app.user(Role::Admin).await;
    let donor = app.user(Role::Donor).await;
    let body = json!({
        "title": "School Books",
        "description": "Textbooks for madrasa students",
        "targetAmount": 500_000,
        "endDate": (timestamp_now() + Duration::days(90)).to_rfc3339()
    });

    let (status, _) = app
        .send("POST", "/api/campaigns", Some(&donor), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app
        .send("POST", "/api/campaigns", Some(&admin), Some(body))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(json["data"]["status"], "active");

    let (status, json) = app
        .send("PATCH", &format!("/api/campaigns/{id}/close"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "closed");

    let (_, json) = app.send("GET", "/api/campaigns?status=closed", None, None).await;
    assert_eq!(json["count"], 1);

    let (status, _) = app.send("GET", "/api/campaigns?status=archived", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send("DELETE", &format!("/api/campaigns/{id}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .send("GET", &format!("/api/campaigns/{id}"), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_invalid_id_format() {
    let app = TestApp::new();
    let (status, json) = app.send("GET", "/api/campaigns/not-a-uuid", None, None).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["message"], "Invalid campaign id: not-a-uuid");
}

#[tokio::test]
async fn test_volunteer_task_flow() {
    let app = TestApp::new();
    let staff = app.user(Role::Staff).await;
    let volunteer = app.user(Role::Volunteer).await;
    let other = app.user(Role::Volunteer).await;

    let (status, json) = app
        .send(
            "POST",
            "/api/volunteer/tasks",
            Some(&staff),
            Some(json!({
                "volunteer": volunteer.id.to_string(),
                "title": "Pack relief boxes",
                "description": "Warehouse, Saturday morning"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = json["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .send("GET", &format!("/api/volunteer/tasks/{id}"), Some(&other), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app
        .send(
            "PATCH",
            &format!("/api/volunteer/tasks/{id}/status"),
            Some(&volunteer),
            Some(json!({ "status": "completed", "updateText": "All 200 boxes packed" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "completed");
    assert!(json["data"]["completedDate"].is_string());

    let (status, _) = app
        .send(
            "PATCH",
            &format!("/api/volunteer/tasks/{id}/status"),
            Some(&volunteer),
            Some(json!({ "status": "in-progress" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, json) = app
        .send("GET", "/api/notifications", Some(&volunteer), None)
        .await;
    assert_eq!(json["data"][0]["title"], "New Task Assigned");
}

#[tokio::test]
async fn test_beneficiary_review_and_distribution() {
    let app = TestApp::new();
    let staff = app.user(Role::Staff).await;

    let (status, json) = app
        .send(
            "POST",
            "/api/beneficiaries",
            None,
            Some(json!({
                "name": "Rahima Begum",
                "phone": "01912345678",
                "address": "Char Fasson, Bhola",
                "aidType": "food"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["status"], "pending");
    let id = json["data"]["id"].as_str().unwrap().to_string();

    let distribute = json!({ "aidType": "food", "aidAmount": 150_000 });
    let (status, _) = app
        .send(
            "PATCH",
            &format!("/api/beneficiaries/{id}/distribute"),
            Some(&staff),
            Some(distribute.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, json) = app
        .send(
            "PATCH",
            &format!("/api/beneficiaries/{id}/review"),
            Some(&staff),
            Some(json!({ "status": "approved", "reviewNotes": "Verified by field team" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "approved");

    let (status, json) = app
        .send(
            "PATCH",
            &format!("/api/beneficiaries/{id}/distribute"),
            Some(&staff),
            Some(distribute),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["status"], "aid-distributed");
}

#[tokio::test]
async fn test_analytics_access() {
    let app = TestApp::new();
    let admin = app.user(Role::Admin).await;
    let staff = app.user(Role::Staff).await;

    let (status, json) = app
        .send("GET", "/api/analytics/dashboard", Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["donations"]["count"], 0);

    let (status, _) = app
        .send("GET", "/api/analytics/dashboard", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, json) = app
        .send("GET", "/api/analytics/reports?period=weekly", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["period"], "weekly");

    let (status, _) = app
        .send("GET", "/api/analytics/reports?period=daily", Some(&staff), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_user_management() {
    let app = TestApp::new();
    let admin = app.user(Role::Admin).await;

    let body = json!({ "name": "Karim", "email": "Karim@Example.org", "role": "volunteer" });
    let (status, json) = app
        .send("POST", "/api/users", Some(&admin), Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["data"]["email"], "karim@example.org");

    let (status, json) = app.send("POST", "/api/users", Some(&admin), Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);

    let (_, json) = app
        .send("GET", "/api/users?role=volunteer", Some(&admin), None)
        .await;
    assert_eq!(json["count"], 1);
}
