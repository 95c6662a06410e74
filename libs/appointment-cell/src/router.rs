use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use shared_models::AppState;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(handlers::book_appointment))
        .route("/export", get(handlers::export_all_appointments))
        .route("/reminders/dispatch", post(handlers::dispatch_reminders))
        .route("/{id}", get(handlers::get_appointment))
        .route("/{id}/confirm", post(handlers::confirm_appointment))
        .route("/{id}/cancel", post(handlers::cancel_appointment))
        .route("/{id}/complete", post(handlers::complete_appointment))
        .route("/{id}/reminders", get(handlers::list_reminders))
        .route("/{id}/export", get(handlers::export_appointment))
        .with_state(state)
}
