//! Authentication handlers

mod handler;
pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

use axum::{
    Router,
    middleware,
    routing::{get, post},
};

use crate::{middleware::auth_middleware, state::AppState};

/// Authentication routes
pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/register", post(handler::register))
        .route("/login", post(handler::login))
        .merge(
            Router::new()
                .route("/me", get(handler::get_current_admin))
                .route_layer(middleware::from_fn_with_state(state, auth_middleware)),
        )
}
