use std::env;
use std::sync::Arc;
use tracing_subscriber::filter::{EnvFilter, ParseError};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ambulance_core::config::{
    mongodb_uri_from_env_values, name_from_env_value, timeout_from_env_value,
};
use ambulance_core::constants::{
    DEFAULT_COUNTERS_COLLECTION, DEFAULT_DATABASE, DEFAULT_PATIENTS_COLLECTION,
};
use ambulance_core::{MongoPatientService, MongoUriParts, StoreConfig};
use api_rest::{router, AppState, ServerConfig};

/// Log targets that receive the environment's default level.
const LOG_TARGETS: &[&str] = &["ambulance_run", "ambulance_core", "api_rest", "tower_http"];

/// Main entry point for the ambulance waiting-list service
///
/// Connects to MongoDB, then serves the REST API until Ctrl+C or SIGTERM, after which
/// in-flight requests are drained and the database connection is closed.
///
/// # Environment Variables
/// - `AMBULANCE_API_PORT`: listen port (default: 8080)
/// - `AMBULANCE_API_BASE_PATH`: route prefix (default: none)
/// - `AMBULANCE_API_ENVIRONMENT`: `production` lowers default logging to info
/// - `AMBULANCE_API_MONGODB_URI`: connection URI; otherwise built from
///   `AMBULANCE_API_MONGODB_{HOST,PORT,USERNAME,PASSWORD}`
/// - `AMBULANCE_API_MONGODB_DATABASE`, `AMBULANCE_API_MONGODB_COLLECTION`,
///   `AMBULANCE_API_MONGODB_COUNTERS_COLLECTION`: store layout
/// - `AMBULANCE_API_MONGODB_TIMEOUT_SECONDS`: per-operation timeout (default: 10)
///
/// # Errors
/// Returns an error if:
/// - the configuration is invalid,
/// - MongoDB cannot be reached at startup,
/// - the listen address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let server_cfg = ServerConfig::from_env_values(
        env::var("AMBULANCE_API_PORT").ok(),
        env::var("AMBULANCE_API_BASE_PATH").ok(),
        env::var("AMBULANCE_API_ENVIRONMENT").ok(),
    )?;

    let filter = log_filter(
        env::var(EnvFilter::DEFAULT_ENV).ok(),
        server_cfg.environment().default_log_level(),
    )?;
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store_cfg = StoreConfig::new(
        mongodb_uri_from_env_values(
            env::var("AMBULANCE_API_MONGODB_URI").ok(),
            MongoUriParts {
                host: env::var("AMBULANCE_API_MONGODB_HOST").ok(),
                port: env::var("AMBULANCE_API_MONGODB_PORT").ok(),
                username: env::var("AMBULANCE_API_MONGODB_USERNAME").ok(),
                password: env::var("AMBULANCE_API_MONGODB_PASSWORD").ok(),
            },
        ),
        name_from_env_value(
            env::var("AMBULANCE_API_MONGODB_DATABASE").ok(),
            DEFAULT_DATABASE,
        ),
        name_from_env_value(
            env::var("AMBULANCE_API_MONGODB_COLLECTION").ok(),
            DEFAULT_PATIENTS_COLLECTION,
        ),
        name_from_env_value(
            env::var("AMBULANCE_API_MONGODB_COUNTERS_COLLECTION").ok(),
            DEFAULT_COUNTERS_COLLECTION,
        ),
        timeout_from_env_value(env::var("AMBULANCE_API_MONGODB_TIMEOUT_SECONDS").ok())?,
    )?;

    tracing::info!(
        "++ Connecting to MongoDB database '{}'",
        store_cfg.database()
    );
    let patient_service = MongoPatientService::connect(&store_cfg).await?;

    let app = router(
        AppState::new(Arc::new(patient_service.clone())),
        server_cfg.base_path(),
    );

    let addr = server_cfg.listen_addr();
    tracing::info!(
        "++ Starting ambulance REST API on {} (base path '{}')",
        addr,
        server_cfg.base_path()
    );

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Server stopped, closing database connection");
    patient_service.shutdown().await;

    Ok(())
}

/// Uses `RUST_LOG` verbatim when set, otherwise `level` for each of [`LOG_TARGETS`].
fn log_filter(rust_log: Option<String>, level: &str) -> Result<EnvFilter, ParseError> {
    match rust_log {
        Some(directives) if !directives.trim().is_empty() => EnvFilter::try_new(directives),
        _ => EnvFilter::try_new(
            LOG_TARGETS
                .iter()
                .map(|target| format!("{target}={level}"))
                .collect::<Vec<_>>()
                .join(","),
        ),
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for Ctrl+C: {:?}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to listen for SIGTERM: {:?}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
