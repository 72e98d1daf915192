use axum::handler::Handler;
use axum::routing::{get, MethodRouter};
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{self, AppState};

/// Create the main router with all routes.
///
/// With `enable_sessions` off, `/api/sessions` is not routed and answers 404
/// like any other unknown path.
pub fn create_router(state: Arc<AppState>, enable_sessions: bool) -> Router {
    // Only GET is served. `get` would also answer HEAD, so HEAD is routed to
    // the 404 handler explicitly; other methods fall through to it.
    let mut api_routes = Router::new()
        .route("/usage", get_only(handlers::get_usage))
        .route("/health", get_only(handlers::health_check));

    if enable_sessions {
        api_routes = api_routes.route("/sessions", get_only(handlers::get_sessions));
    }

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api", api_routes)
        .fallback(handlers::not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

fn get_only<H, T>(handler: H) -> MethodRouter<Arc<AppState>>
where
    H: Handler<T, Arc<AppState>>,
    T: 'static,
{
    get(handler)
        .head(handlers::not_found)
        .fallback(handlers::not_found)
}
