//! Registration and check-in handlers

mod handler;
pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};

use crate::{
    middleware::{auth_middleware, optional_auth_middleware},
    state::AppState,
};

/// Registration routes
pub fn routes(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/event/{event_id}", get(handler::list_event_registrations))
        .route("/checkin", post(handler::check_in))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let cancel = Router::new()
        .route("/{id}", delete(handler::cancel_registration))
        .route_layer(middleware::from_fn_with_state(
            state,
            optional_auth_middleware,
        ));

    Router::new()
        .route("/", post(handler::create_registration))
        .route("/student/{email}", get(handler::list_student_registrations))
        .merge(protected)
        .merge(cancel)
}
