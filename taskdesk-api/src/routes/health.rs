/// Health check endpoint
///
/// ```text
/// GET /health
/// ```
///
/// ```json
/// {
///   "status": "healthy",
///   "version": "0.1.0",
///   "database": "connected",
///   "pool": { "total_connections": 2, "idle_connections": 1 }
/// }
/// ```
///
/// Servers running on the in-memory store report `"not_configured"`.

use crate::app::AppState;
use axum::{extract::State, Json};
use serde::Serialize;
use taskdesk_shared::db::pool::{get_pool_stats, health_check as db_health_check, PoolStats};

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// "healthy" or "degraded"
    pub status: String,

    pub version: String,

    /// "connected", "disconnected" or "not_configured"
    pub database: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pool: Option<PoolStats>,
}

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let (database, pool) = match &state.db {
        Some(pool) => match db_health_check(pool).await {
            Ok(()) => ("connected", Some(get_pool_stats(pool))),
            Err(e) => {
                tracing::warn!(error = %e, "Database health check failed");
                ("disconnected", None)
            }
        },
        None => ("not_configured", None),
    };

    Json(HealthResponse {
        status: if database == "disconnected" {
            "degraded".to_string()
        } else {
            "healthy".to_string()
        },
        version: env!("CARGO_PKG_VERSION").to_string(),
        database: database.to_string(),
        pool,
    })
}
