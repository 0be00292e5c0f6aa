//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: question bank selection and quiz orchestration
//! - `routes/`: HTTP routes + handlers (one file per resource)
//! - `extractors.rs`: content-type and JSON body validation
//! - `dto.rs`: request parsing and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router};
use tower::ServiceBuilder;
use tower_http::{catch_panic::CatchPanicLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod extractors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(router(services))
}

/// Router over an already built set of services.
pub fn router(services: Arc<AppServices>) -> Router {
    routes::router()
        .fallback(routes::system::not_found)
        .layer(Extension(services))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                // Outside the CORS layer so preflight answers carry them too.
                .layer(middleware::allow_headers_layer())
                .layer(middleware::allow_methods_layer())
                .layer(middleware::cors_layer())
                .layer(CatchPanicLayer::custom(middleware::panic_response))
                .layer(axum::middleware::from_fn(middleware::envelope_bare_errors)),
        )
}

pub use services::AppServices;
