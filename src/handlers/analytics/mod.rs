//! Analytics handlers

mod handler;
pub mod response;

pub use response::*;

use axum::{Router, middleware, routing::get};

use crate::{middleware::auth_middleware, state::AppState};

/// Analytics routes (admin only)
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(handler::get_overview))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}
