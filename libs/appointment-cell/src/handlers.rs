use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{AppointmentError, CreateAppointmentRequest};
use crate::services::SchedulingService;

#[axum::debug_handler]
pub async fn list_appointments(
    State(config): State<Arc<AppConfig>>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulingService::new(&config);

    let appointments = service.list_all().await.map_err(map_appointment_error)?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn schedule_appointment(
    State(config): State<Arc<AppConfig>>,
    WithRejection(Json(request), _): WithRejection<Json<CreateAppointmentRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    request.validate().map_err(AppError::Invalid)?;

    let service = SchedulingService::new(&config);
    let id = service
        .schedule(request.patient_id, request.slot_id, request.status)
        .await
        .map_err(map_appointment_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": id, "message": "appointment scheduled" })),
    ))
}

#[axum::debug_handler]
pub async fn patient_appointments(
    State(config): State<Arc<AppConfig>>,
    Path(patient_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulingService::new(&config);

    let appointments = service
        .list_for_patient(patient_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn doctor_appointments(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulingService::new(&config);

    let appointments = service
        .list_for_doctor(doctor_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(appointments)))
}

#[axum::debug_handler]
pub async fn cancel_appointment(
    State(config): State<Arc<AppConfig>>,
    Path(appointment_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulingService::new(&config);

    service
        .cancel(appointment_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!({ "message": "appointment cancelled" })))
}

#[axum::debug_handler]
pub async fn doctor_availability(
    State(config): State<Arc<AppConfig>>,
    Path(doctor_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = SchedulingService::new(&config);

    let slots = service
        .availability(doctor_id)
        .await
        .map_err(map_appointment_error)?;

    Ok(Json(json!(slots)))
}

fn map_appointment_error(err: AppointmentError) -> AppError {
    match err {
        AppointmentError::SlotRejected(message) => AppError::BadRequest(message),
        AppointmentError::NotFound => AppError::NotFound("appointment not found".to_string()),
        AppointmentError::Database(msg) => AppError::Database(msg),
    }
}
