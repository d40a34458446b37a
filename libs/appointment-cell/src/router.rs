use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn appointment_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::list_appointments).post(handlers::schedule_appointment),
        )
        .route("/paciente/{id}", get(handlers::patient_appointments))
        .route("/medico/{id}", get(handlers::doctor_appointments))
        .route("/{id}/cancelar", post(handlers::cancel_appointment))
        .route("/disponibilidad/{id}", get(handlers::doctor_availability))
        .with_state(state)
}
