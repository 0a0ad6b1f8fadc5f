//! HTTP request handlers for chatrelay

use crate::config::Config;
use crate::error::AppResult;
use crate::middleware::{catch_panic, request_id_middleware};
use crate::upstream::UpstreamClient;
use axum::{
    Router,
    handler::HandlerWithoutStateExt,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::{services::ServeDir, trace::TraceLayer};

pub mod chat;
pub mod fallback;
pub mod health;
pub mod pages;

/// Application state shared across all handlers
///
/// Immutable after construction. Both fields are Arc'd for cheap cloning
/// across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    upstream: Arc<UpstreamClient>,
}

impl AppState {
    /// Create a new AppState from configuration
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let upstream = Arc::new(UpstreamClient::new(config.upstream.clone())?);
        Ok(Self { config, upstream })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the upstream client
    pub fn upstream(&self) -> &UpstreamClient {
        &self.upstream
    }
}

/// Build the full application router
pub fn router(state: AppState) -> Router {
    let static_dir = ServeDir::new(&state.config().assets.static_dir)
        .not_found_service(fallback::not_found.into_service());

    let routes = Router::new()
        .route("/", get(pages::index))
        .route("/_debug/list", get(pages::debug_list))
        .route("/chat", post(chat::handler))
        .route("/health", get(health::handler))
        .nest_service("/static", static_dir)
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::method_not_allowed)
        .with_state(state);

    with_middleware(routes)
}

/// Wrap routes in the shared middleware stack
///
/// Layer order, innermost first: panic normalization, request ids, tracing.
pub fn with_middleware(routes: Router) -> Router {
    routes
        .layer(catch_panic::layer())
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
}
