use axum::{routing::get, Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub message: String,
}

/// Health check
pub async fn health_handler() -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "OK".to_string(),
        message: "Mini Plant Store API is running".to_string(),
    })
}

pub fn router<T>() -> Router<T>
where
    T: Clone + Send + Sync + 'static,
{
    Router::new().route("/health", get(health_handler))
}
