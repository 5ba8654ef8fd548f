//! # vgate-api: Axum Hosting Layer
//!
//! Hosts a [`vgate_schema::ValidationService`] inside an Axum application:
//!
//! - [`state::AppState`] carries the service as an injectable `Arc`.
//! - [`extractors::Validation`] hands handlers the request body together
//!   with the service.
//! - [`error::AppError`] renders validation failures (and every other
//!   handler error) as a structured JSON response.
//!
//! ## Routes
//!
//! - `/health/*`: health probes
//! - `/v1/schemas`: registered schema listing
//! - `/v1/schemas/validate/{*id}`: validate the body against a named schema
//! - `/v1/validate`: validate data against an inline schema

pub mod bootstrap;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod state;
pub mod telemetry;

use axum::routing::get;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router with all routes and middleware.
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .merge(routes::schemas::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let health = Router::new()
        .route("/health/liveness", get(liveness))
        .route("/health/readiness", get(readiness));

    Router::new().merge(health).merge(api)
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: schemas are compiled before the router exists.
async fn readiness() -> &'static str {
    "ready"
}
