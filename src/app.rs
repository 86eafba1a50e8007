//! Router assembly

use axum::{Router, middleware};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    constants::API_BASE_PATH,
    handlers,
    middleware::{logging_middleware, rate_limit_middleware},
    state::AppState,
};

/// Build the full application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest(API_BASE_PATH, handlers::routes(state.clone()))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit_middleware,
        ))
        .layer(middleware::from_fn(logging_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
