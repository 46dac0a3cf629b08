//! Liveness endpoint

use axum::Json;
use serde_json::{json, Value};

/// Liveness only; the database is not consulted
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "OK",
        "message": "MadSocial API is running",
    }))
}
