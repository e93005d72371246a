//! # Health Check

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;

use vitrine_db::migrations::migration_status;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: bool,
    pub migrations_applied: usize,
    pub migrations_total: usize,
    pub blob_container: String,
    pub version: &'static str,
}

/// `GET /health` - 200 when the database answers, 503 otherwise.
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let database = state.db.health_check().await;
    let (migrations_total, migrations_applied) = migration_status(state.db.pool())
        .await
        .unwrap_or((0, 0));

    let status = if database {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if database { "ok" } else { "degraded" },
            database,
            migrations_applied,
            migrations_total,
            blob_container: state.blobs.container().to_string(),
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}
