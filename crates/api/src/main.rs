use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use herdscan_inference::{Classifier, HttpClassifier};
use herdscan_pipeline::location::{HttpLocationResolver, LocationResolver, NullLocationResolver};
use herdscan_storage::{ArtifactStore, LocalArtifactStore, S3ArtifactStore};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use herdscan_api::background;
use herdscan_api::config::{ServerConfig, StorageConfig};
use herdscan_api::router::build_app_router;
use herdscan_api::state::AppState;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "herdscan_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = herdscan_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    herdscan_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    herdscan_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- External adapters ---
    let classifier: Arc<dyn Classifier> = Arc::new(HttpClassifier::new(
        config.classifier_url.clone(),
        Duration::from_secs(config.classifier_timeout_secs),
    ));
    tracing::info!(endpoint = %config.classifier_url, "Classifier client ready");

    let artifacts: Arc<dyn ArtifactStore> = match &config.storage {
        StorageConfig::Local {
            base_dir,
            public_base_url,
        } => {
            tracing::info!(base_dir = %base_dir, "Using local artifact storage");
            Arc::new(LocalArtifactStore::new(base_dir, public_base_url.clone()))
        }
        StorageConfig::S3 {
            bucket,
            region,
            public_base_url,
        } => Arc::new(
            S3ArtifactStore::connect(bucket.clone(), region.clone(), public_base_url.clone())
                .await,
        ),
    };

    let location: Arc<dyn LocationResolver> = match &config.location_url {
        Some(url) => {
            tracing::info!(endpoint = %url, "Location resolver ready");
            Arc::new(HttpLocationResolver::new(
                url.clone(),
                Duration::from_secs(config.location_timeout_secs),
            ))
        }
        None => {
            tracing::info!("No location resolver configured; scans will have no location");
            Arc::new(NullLocationResolver)
        }
    };

    // --- Background jobs ---
    let sweep_cancel = CancellationToken::new();
    let sweep_handle = tokio::spawn(background::orphan_sweep::run(
        pool.clone(),
        Arc::clone(&artifacts),
        sweep_cancel.clone(),
    ));

    // --- Router / server ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        classifier,
        artifacts,
        location,
    };

    let app = build_app_router(state, &config);

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .expect("Invalid HOST/PORT combination");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Failed to bind {addr}: {e}"));
    tracing::info!(%addr, "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // Stop background work once the server has drained.
    sweep_cancel.cancel();
    let _ = sweep_handle.await;
}

/// Resolve when the process receives Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
