use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller;

pub fn init_mfa_router() -> Router<AppState> {
    Router::new()
        .route("/status", get(controller::status))
        .route("/enroll", post(controller::enroll))
        .route("/verify", post(controller::verify))
        .route("/disable", post(controller::disable))
}
