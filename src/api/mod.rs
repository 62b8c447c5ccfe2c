//! HTTP surface of the catalog.

use crate::store::PlantStore;
use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod context;
mod error;
mod health;
mod plants;

pub use context::AppState;
pub use error::{ApiError, ErrorBody};
pub use health::HealthStatus;

/// Mount point of the plant collection.
pub const PLANTS_PATH: &str = "/api/plants";

pub fn router<S>(state: AppState<S>) -> Router
where
    S: PlantStore,
{
    Router::new()
        .nest(PLANTS_PATH, plants::router())
        .merge(health::router())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
