//! API server entry point.

use std::sync::Arc;

use api::config::{Config, LogFormat};
use api::{AppState, cors_layer, create_app};
use metrics_exporter_prometheus::PrometheusHandle;
use reporting::ReportScheduler;
use sqlx::postgres::PgPoolOptions;
use store::{InMemoryStore, PostgresStore, Store};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use workflow::{LoggingEmailSender, LoggingSmsSender, SimulatedPaymentGateway};

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Serves the API over `store` until a shutdown signal arrives, then stops
/// the scheduler and drains the notification queue.
async fn serve<S: Store>(store: S, config: Config, metrics_handle: PrometheusHandle) {
    let (state, dispatcher_worker) = AppState::new(
        store.clone(),
        SimulatedPaymentGateway::new(config.payment_decline_rate),
        Arc::new(LoggingEmailSender::new()),
        Arc::new(LoggingSmsSender::with_signature(config.sms_signature.as_str())),
        config.dispatch_queue_capacity,
    );
    let state = Arc::new(state);

    let cancel = CancellationToken::new();
    let scheduler = ReportScheduler::new(store, state.email.clone(), config.report_interval)
        .spawn(cancel.clone());

    let app = create_app(
        state.clone(),
        metrics_handle,
        cors_layer(config.frontend_url.as_deref()),
    );

    let addr = config.addr();
    tracing::info!(%addr, "starting API server");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    cancel.cancel();
    if let Err(e) = scheduler.await {
        tracing::warn!(error = %e, "report scheduler ended abnormally");
    }
    state.coordinator.dispatcher().flush().await;
    drop(state);
    if let Err(e) = dispatcher_worker.await {
        tracing::warn!(error = %e, "notification dispatcher ended abnormally");
    }

    tracing::info!("server shut down gracefully");
}

#[tokio::main]
async fn main() {
    // 1. Load configuration
    if let Err(e) = dotenvy::dotenv()
        && !e.not_found()
    {
        eprintln!("failed to read .env: {e}");
    }
    let config = Config::from_env().expect("invalid configuration");

    // 2. Initialize tracing
    init_tracing(&config);

    // 3. Install Prometheus metrics recorder
    let metrics_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 4. Pick the store and serve
    match config.database_url.clone() {
        Some(url) => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database_max_connections)
                .connect(&url)
                .await
                .expect("failed to connect to PostgreSQL");
            let store = PostgresStore::new(pool);
            store
                .run_migrations()
                .await
                .expect("failed to run migrations");
            tracing::info!("using PostgreSQL store");
            serve(store, config, metrics_handle).await;
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory store");
            serve(InMemoryStore::new(), config, metrics_handle).await;
        }
    }
}
