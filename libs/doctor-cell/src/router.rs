use std::sync::Arc;

use axum::{routing::get, Router};
use shared_models::AppState;

use crate::handlers;

pub fn doctor_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::list_doctors))
        .route("/{id}", get(handlers::get_doctor))
        .route("/{id}/availability", get(handlers::get_availability))
        .with_state(state)
}
