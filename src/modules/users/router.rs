use axum::{
    Router, middleware,
    routing::{get, put},
};

use crate::middleware::role::require_admin;
use crate::state::AppState;

use super::controller;

pub fn init_users_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/me", get(controller::get_self_details))
        .route("/me/details", put(controller::update_details))
        .route("/{id}", get(controller::get_details))
        .route(
            "/role",
            put(controller::update_role)
                .route_layer(middleware::from_fn_with_state(state, require_admin)),
        )
}
