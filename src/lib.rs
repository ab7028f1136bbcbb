use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod config;
pub mod domain;
pub mod errors;
pub mod http;
pub mod indra_client;
pub mod logging;
pub mod mcp;

use http::sse::SseSessions;
use indra_client::VariantProvider;

/// Stateless service handle constructed once at process start. The variant
/// provider holds only static configuration (upstream URL); the session
/// registry exists solely for the SSE transport.
#[derive(Clone)]
pub struct AppState {
    pub variant_provider: Arc<dyn VariantProvider>,
    pub sessions: Arc<SseSessions>,
}

impl AppState {
    pub fn new(variant_provider: Arc<dyn VariantProvider>) -> Self {
        Self {
            variant_provider,
            sessions: Arc::new(SseSessions::new()),
        }
    }
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(http::handlers::health))
        .route("/.well-known/mcp", get(http::handlers::discovery))
        .route("/mcp", post(http::handlers::mcp_endpoint))
        .route("/sse", get(http::sse::sse_endpoint))
        .route("/messages/", post(http::sse::post_message))
        .route(
            "/get_variants_for_gene",
            post(http::handlers::get_variants_for_gene),
        )
        .layer(middleware::from_fn(logging::request_logging_middleware))
        .with_state(state)
}
