use std::sync::Arc;

use axum::{routing::get, Router};

use appointment_cell::router::appointment_routes;
use shared_config::AppConfig;
use user_cell::router::user_routes;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic core API is running!" }))
        .nest("/api/usuarios", user_routes(state.clone()))
        .nest("/api/citas", appointment_routes(state.clone()))
}
