// handlers/public/system.rs - GET /api and GET /health

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::database::DatabaseManager;
use crate::state::AppState;

/// GET /api - Public greeting
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Hello world!" }))
}

/// GET /health - Liveness plus a database round trip
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match DatabaseManager::health_check(&state.pool).await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "version": env!("CARGO_PKG_VERSION"),
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "version": env!("CARGO_PKG_VERSION"),
                    "database": "unavailable"
                })),
            )
        }
    }
}
