//! Vitrine API library.
//!
//! Mock product catalog REST API backed by an in-memory repository. Every
//! endpoint answers after a simulated network delay. The router is exposed
//! as a library so it can be driven in-process by tests.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod latency;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use config::ApiConfig;
use db::{ProductRepository, RepositoryError};
use state::AppState;

/// Build the application state: the seed file when configured, otherwise the
/// built-in catalog.
///
/// # Errors
///
/// Returns `RepositoryError` if the configured seed file cannot be loaded.
pub async fn build_state(config: ApiConfig) -> Result<AppState, RepositoryError> {
    let seed = match &config.seed_file {
        Some(path) => db::seed::load_seed_file(path).await?,
        None => db::seed::seed_catalog(),
    };
    tracing::info!(products = seed.len(), "Product repository seeded");

    Ok(AppState::new(config, ProductRepository::new(seed)))
}

/// Build the HTTP application with its middleware stack.
pub fn app(state: AppState) -> Router {
    let cors = cors_layer(state.config().cors_origin.as_deref());

    routes::routes()
        .layer(axum::middleware::from_fn(
            middleware::request_id_middleware,
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// CORS for the configured origin, or any origin when none is set.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(HeaderValue::from_str) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(e)) => {
            tracing::warn!(error = %e, "Ignoring invalid VITRINE_CORS_ORIGIN");
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE])
        .expose_headers([header::HeaderName::from_static(
            middleware::REQUEST_ID_HEADER,
        )])
}
