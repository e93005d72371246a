//! # Vitrine Storefront
//!
//! HTTP application serving the catalog UI: operator login, product
//! create/update/delete, a carousel spotlight and a checkout page.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Application Startup                               │
//! │                                                                         │
//! │  1. Initialize Logging                                                  │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: INFO, can be overridden with RUST_LOG                    │
//! │                                                                         │
//! │  2. Load Configuration (.env + environment)                             │
//! │                                                                         │
//! │  3. Build Gateways                                                      │
//! │     • SQLite pool, migrations applied                                   │
//! │     • Blob store from the connection string                             │
//! │                                                                         │
//! │  4. Serve until Ctrl+C / SIGTERM                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod state;

use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use secrecy::ExposeSecret;
use tower::ServiceBuilder;
use tower_sessions::cookie::time::Duration;
use tower_sessions::cookie::SameSite;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use vitrine_blob::{AzureBlobStore, BlobError, BlobStore, MemoryBlobStore};
use vitrine_db::{Database, DbError};

use crate::config::{AppConfig, ConfigError};
use crate::state::{AppState, SESSION_COOKIE_NAME};

/// Connection string selecting the in-process blob store.
pub const MEMORY_STORAGE: &str = "UseMemoryStorage=true";

/// Sessions expire after this long without a request.
const SESSION_IDLE_HOURS: i64 = 8;

/// Initializes the tracing subscriber.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vitrine=trace` - Show trace for vitrine crates only
/// - Default: INFO, DEBUG for vitrine crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vitrine=debug,sqlx=warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();
}

/// Builds the router with every route, the session layer and the body limit.
pub fn build_router(state: AppState) -> Router {
    let sessions = SessionManagerLayer::new(MemoryStore::default())
        .with_name(SESSION_COOKIE_NAME)
        .with_secure(false)
        .with_http_only(true)
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(Duration::hours(SESSION_IDLE_HOURS)));

    let body_limit = DefaultBodyLimit::max(state.max_upload_bytes);

    Router::new()
        .route("/", get(handlers::current_page))
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/products", post(handlers::products::create_product))
        .route("/products/{id}", post(handlers::products::update_product))
        .route("/products/{id}/delete", post(handlers::products::delete_product))
        .route("/products/{id}/buy", post(handlers::products::buy_product))
        .route("/carousel/next", post(handlers::carousel::next))
        .route("/carousel/prev", post(handlers::carousel::prev))
        .route("/checkout/back", post(handlers::checkout::back))
        .route("/checkout/finalize", post(handlers::checkout::finalize))
        .route("/health", get(handlers::health::health))
        .layer(ServiceBuilder::new().layer(sessions).layer(body_limit))
        .with_state(state)
}

/// Builds the gateways described by the configuration.
pub async fn build_state(config: &AppConfig) -> Result<AppState, StartupError> {
    let db = Database::new(config.db_config()).await?;

    let connection = config.blob_connection_string.expose_secret();
    let blobs: Arc<dyn BlobStore> = if connection.trim() == MEMORY_STORAGE {
        info!(container = %config.blob_container, "Using in-memory blob store");
        Arc::new(MemoryBlobStore::new(config.blob_container.clone()))
    } else {
        Arc::new(AzureBlobStore::from_connection_string(
            connection,
            config.blob_container.clone(),
        )?)
    };

    Ok(AppState::new(db, blobs)
        .with_credentials(config.credentials())
        .with_policy(config.login_policy)
        .with_max_upload_bytes(config.max_upload_bytes))
}

/// Serves the storefront until a shutdown signal arrives.
pub async fn run(config: AppConfig) -> Result<(), StartupError> {
    info!(?config, "Configuration loaded");

    let state = build_state(&config).await?;
    let db = state.db.clone();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!(addr = %config.bind_addr, "Storefront listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
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
                error!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received, starting graceful shutdown...");
}

/// Errors that stop the storefront from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Database initialization failed: {0}")]
    Database(#[from] DbError),

    #[error("Blob store initialization failed: {0}")]
    Blob(#[from] BlobError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(blob_connection: &'static str) -> AppConfig {
        let env = HashMap::from([
            ("SQL_SERVER", "unused"),
            ("SQL_DATABASE", ":memory:"),
            ("SQL_USERNAME", "sa"),
            ("SQL_PASSWORD", "secret"),
            ("BLOB_CONNECTION_STRING", blob_connection),
            ("BLOB_CONTAINER_NAME", "imagens"),
            ("VITRINE_LOGIN_REQUIRED", "false"),
        ]);
        AppConfig::from_lookup(|name| env.get(name).map(|v| v.to_string())).unwrap()
    }

    #[tokio::test]
    async fn test_build_state_with_memory_storage() {
        let state = build_state(&config(MEMORY_STORAGE)).await.unwrap();

        assert_eq!(state.blobs.container(), "imagens");
        assert_eq!(state.policy, vitrine_core::LoginPolicy::Disabled);
        assert!(state.db.health_check().await);
    }

    #[tokio::test]
    async fn test_build_state_with_development_storage() {
        let state = build_state(&config("UseDevelopmentStorage=true")).await.unwrap();
        assert_eq!(state.blobs.container(), "imagens");
    }

    #[tokio::test]
    async fn test_build_state_rejects_bad_connection_string() {
        let result = build_state(&config("not a connection string")).await;
        assert!(matches!(result, Err(StartupError::Blob(_))));
    }
}
