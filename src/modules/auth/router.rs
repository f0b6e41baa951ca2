use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/register", post(controller::register))
        .route("/login", post(controller::login))
        .route("/refresh", post(controller::refresh))
        .route("/logout", post(controller::logout))
}
