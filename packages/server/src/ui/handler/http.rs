//! HTTP endpoint handlers.

use axum::Json;

/// Static landing page
pub async fn home_page() -> &'static str {
    "Home page"
}

/// Health check endpoint
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}
