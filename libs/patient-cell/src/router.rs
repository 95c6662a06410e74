use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use shared_models::AppState;

use crate::handlers;

pub fn patient_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::register_patient))
        .route("/lookup", get(handlers::lookup_patient))
        .route("/{id}", get(handlers::get_patient))
        .route("/{id}/insurance", put(handlers::save_insurance))
        .route("/{id}/forms", post(handlers::send_intake_forms))
        .with_state(state)
}
