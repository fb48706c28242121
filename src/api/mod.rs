//! HTTP API exposing health, readiness, status reports and Prometheus metrics.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;
