use std::marker::PhantomData;
use std::sync::Arc;

use assert_matches::assert_matches;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use chrono::Utc;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use appointment_cell::handlers::*;
use appointment_cell::models::{AppointmentStatus, CreateAppointmentRequest};
use shared_config::AppConfig;
use shared_models::AppError;
use shared_utils::test_utils::{MockDbResponses, TestConfig};

fn mock_config(server: &MockServer) -> Arc<AppConfig> {
    TestConfig::for_mock_server(&server.uri()).to_arc()
}

fn schedule_request(patient_id: i64, slot_id: i64) -> CreateAppointmentRequest {
    CreateAppointmentRequest {
        patient_id,
        slot_id,
        status: AppointmentStatus::Scheduled,
    }
}

#[tokio::test]
async fn list_appointments_requests_most_recent_first() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_details"))
        .and(query_param("order", "slot_date.desc,slot_time.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::appointment_row(9, "scheduled", "2025-09-20", "10:30:00"),
            MockDbResponses::appointment_row(4, "cancelled", "2025-09-18", "16:00:00"),
        ])))
        .mount(&server)
        .await;

    let result = list_appointments(State(mock_config(&server))).await;

    let body = result.unwrap().0;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["id"], 9);
    assert_eq!(rows[1]["id"], 4);
}

#[tokio::test]
async fn schedule_appointment_returns_new_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/schedule_appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "appointment_id": 42 })))
        .mount(&server)
        .await;

    let result = schedule_appointment(
        State(mock_config(&server)),
        WithRejection(Json(schedule_request(7, 12)), PhantomData),
    )
    .await;

    let (status, Json(body)) = result.unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["id"], 42);
    assert_eq!(body["message"], "appointment scheduled");

    let requests = server.received_requests().await.unwrap();
    let sent: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent, json!({ "patient_id": 7, "slot_id": 12, "status": "scheduled" }));
}

#[tokio::test]
async fn schedule_rejection_message_is_relayed_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/schedule_appointment"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "error": "slot 12 is no longer available" })),
        )
        .mount(&server)
        .await;

    let result = schedule_appointment(
        State(mock_config(&server)),
        WithRejection(Json(schedule_request(7, 12)), PhantomData),
    )
    .await;

    assert_matches!(
        result.unwrap_err(),
        AppError::BadRequest(msg) if msg == "slot 12 is no longer available"
    );
}

#[tokio::test]
async fn schedule_bad_ids_never_reach_the_gateway() {
    let server = MockServer::start().await;

    let result = schedule_appointment(
        State(mock_config(&server)),
        WithRejection(Json(schedule_request(0, -4)), PhantomData),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Invalid(fields) => {
        assert_eq!(fields.len(), 2);
    });
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn patient_appointments_carry_the_doctor_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_details"))
        .and(query_param("patient_id", "eq.7"))
        .and(query_param("order", "slot_date.desc,slot_time.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::patient_appointment_row(9, "scheduled", "2025-09-20", "10:30:00"),
        ])))
        .mount(&server)
        .await;

    let result = patient_appointments(State(mock_config(&server)), Path(7)).await;

    let body = result.unwrap().0;
    assert_eq!(body[0]["doctor_name"], "Ana García");
    assert!(body[0].get("doctor_first_name").is_none());
}

#[tokio::test]
async fn doctor_appointments_carry_the_patient_display_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/appointment_details"))
        .and(query_param("doctor_id", "eq.3"))
        .and(query_param("order", "slot_date.desc,slot_time.desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::doctor_appointment_row(9, "scheduled", "2025-09-20", "10:30:00"),
        ])))
        .mount(&server)
        .await;

    let result = doctor_appointments(State(mock_config(&server)), Path(3)).await;

    let body = result.unwrap().0;
    assert_eq!(body[0]["patient_name"], "Luis Rojas");
}

#[tokio::test]
async fn cancel_unknown_appointment_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/cancel_appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(0)))
        .mount(&server)
        .await;

    let result = cancel_appointment(State(mock_config(&server)), Path(404)).await;

    assert_matches!(result.unwrap_err(), AppError::NotFound(_));
}

#[tokio::test]
async fn cancel_reports_success() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/cancel_appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(1)))
        .mount(&server)
        .await;

    let result = cancel_appointment(State(mock_config(&server)), Path(9)).await;

    let body = result.unwrap().0;
    assert_eq!(body["message"], "appointment cancelled");
}

#[tokio::test]
async fn cancel_is_idempotent_for_already_cancelled_rows() {
    // The status write is unconditional, so the database still reports one
    // affected row and the call keeps succeeding.
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/cancel_appointment"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!(1)))
        .expect(2)
        .mount(&server)
        .await;

    for _ in 0..2 {
        let result = cancel_appointment(State(mock_config(&server)), Path(9)).await;
        assert!(result.is_ok());
    }
}

#[tokio::test]
async fn availability_requests_only_open_future_slots_soonest_first() {
    let server = MockServer::start().await;
    let today = Utc::now().date_naive();
    Mock::given(method("GET"))
        .and(path("/rest/v1/agenda"))
        .and(query_param("doctor_id", "eq.3"))
        .and(query_param("is_available", "eq.true"))
        .and(query_param("slot_date", format!("gte.{}", today)))
        .and(query_param("order", "slot_date.asc,slot_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockDbResponses::slot_row(31, "2030-01-15", "09:00:00"),
            MockDbResponses::slot_row(32, "2030-01-15", "09:30:00"),
        ])))
        .mount(&server)
        .await;

    let result = doctor_availability(State(mock_config(&server)), Path(3)).await;

    let body = result.unwrap().0;
    let slots = body.as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["id"], 31);
    assert_eq!(slots[0]["is_available"], true);
}

#[tokio::test]
async fn gateway_failures_surface_as_server_errors() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/schedule_appointment"))
        .respond_with(ResponseTemplate::new(500).set_body_string("connection lost"))
        .mount(&server)
        .await;

    let result = schedule_appointment(
        State(mock_config(&server)),
        WithRejection(Json(schedule_request(7, 12)), PhantomData),
    )
    .await;

    assert_matches!(result.unwrap_err(), AppError::Database(_));
}
