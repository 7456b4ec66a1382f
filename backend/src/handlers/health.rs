//! Liveness and readiness handlers

use axum::{extract::State, Json};

use crate::db;
use crate::models::HealthResponse;
use crate::state::AppState;

/// GET / - Service banner
pub async fn root() -> &'static str {
    "Login API Server"
}

/// GET /health - Report service and database status
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_status = match &state.db_pool {
        Some(pool) => match db::ping(pool).await {
            Ok(()) => "connected".to_string(),
            Err(e) => {
                tracing::warn!(error = ?e, "Health check could not reach the database");
                format!("error: {}", e)
            }
        },
        None => "not configured".to_string(),
    };

    let status = if db_status == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        database: db_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
