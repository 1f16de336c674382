//! HTTP API server for the charity donation platform.
//!
//! Exposes campaigns, donations, notifications, users, volunteer tasks,
//! beneficiaries, analytics and PDF documents under `/api`, with structured
//! logging (tracing) and Prometheus metrics on `/metrics`.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod response;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, patch, post};
use metrics_exporter_prometheus::PrometheusHandle;
use store::Store;
use tokio::task::JoinHandle;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use workflow::{DEFAULT_QUEUE_CAPACITY, SimulatedPaymentGateway};

pub use state::AppState;

/// CORS policy: the configured frontend origin, or any origin when unset.
pub fn cors_layer(frontend_url: Option<&str>) -> CorsLayer {
    let origin = match frontend_url.map(HeaderValue::from_str) {
        Some(Ok(origin)) => AllowOrigin::exact(origin),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "invalid FRONTEND_URL, allowing any origin");
            AllowOrigin::from(Any)
        }
        None => AllowOrigin::from(Any),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
    cors: CorsLayer,
) -> Router {
    use routes::{
        analytics, beneficiaries, campaigns, donations, notifications, pdf, service, users,
        volunteer,
    };

    let metrics_router = Router::new()
        .route("/metrics", get(service::metrics))
        .with_state(metrics_handle);

    let api = Router::new()
        .route("/health", get(service::health))
        .route(
            "/campaigns",
            get(campaigns::list::<S>).post(campaigns::create::<S>),
        )
        .route(
            "/campaigns/{id}",
            get(campaigns::get::<S>)
                .put(campaigns::update::<S>)
                .delete(campaigns::delete::<S>),
        )
        .route("/campaigns/{id}/close", patch(campaigns::close::<S>))
        .route(
            "/donations",
            get(donations::list::<S>).post(donations::create::<S>),
        )
        .route("/donations/{id}", get(donations::get::<S>))
        .route("/notifications", get(notifications::list::<S>))
        .route(
            "/notifications/read-all",
            patch(notifications::mark_all_read::<S>),
        )
        .route(
            "/notifications/{id}/read",
            patch(notifications::mark_read::<S>),
        )
        .route("/users", get(users::list::<S>).post(users::create::<S>))
        .route(
            "/users/{id}",
            get(users::get::<S>)
                .put(users::update::<S>)
                .delete(users::delete::<S>),
        )
        .route(
            "/volunteer/tasks",
            get(volunteer::list::<S>).post(volunteer::create::<S>),
        )
        .route("/volunteer/tasks/{id}", get(volunteer::get::<S>))
        .route(
            "/volunteer/tasks/{id}/status",
            patch(volunteer::update_status::<S>),
        )
        .route(
            "/beneficiaries",
            get(beneficiaries::list::<S>).post(beneficiaries::apply::<S>),
        )
        .route("/beneficiaries/{id}", get(beneficiaries::get::<S>))
        .route(
            "/beneficiaries/{id}/review",
            patch(beneficiaries::review::<S>),
        )
        .route(
            "/beneficiaries/{id}/distribute",
            patch(beneficiaries::distribute::<S>),
        )
        .route("/analytics/dashboard", get(analytics::dashboard::<S>))
        .route("/analytics/reports", get(analytics::reports::<S>))
        .route("/pdf/receipt/{id}", get(pdf::receipt::<S>))
        .route("/pdf/certificate/{id}", get(pdf::certificate::<S>))
        .with_state(state);

    Router::new()
        .nest("/api", api)
        .merge(metrics_router)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state: the simulated gateway at its
/// default decline rate and logging e-mail and SMS senders.
///
/// Must be called from within a Tokio runtime; the returned handle is the
/// notification dispatcher worker.
pub fn create_default_state<S: Store>(store: S) -> (Arc<AppState<S>>, JoinHandle<()>) {
    let (state, worker) = AppState::with_logging_senders(
        store,
        SimulatedPaymentGateway::default(),
        DEFAULT_QUEUE_CAPACITY,
    );
    (Arc::new(state), worker)
}
