//! Event management handlers

mod handler;
pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::{middleware::auth_middleware, state::AppState};

/// Event routes. Reads are public, writes need an admin token.
pub fn routes(state: AppState) -> Router<AppState> {
    let auth = middleware::from_fn_with_state(state, auth_middleware);

    Router::new()
        .route(
            "/",
            get(handler::list_events).merge(post(handler::create_event).route_layer(auth.clone())),
        )
        .route(
            "/{id}",
            get(handler::get_event).merge(
                put(handler::update_event)
                    .delete(handler::delete_event)
                    .route_layer(auth),
            ),
        )
}
