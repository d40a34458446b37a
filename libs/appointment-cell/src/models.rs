use std::fmt;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use shared_models::FieldError;

// ==============================================================================
// CORE APPOINTMENT MODELS
// ==============================================================================

/// The database may define further states; this core only ever writes
/// `Scheduled` (on creation) and `Cancelled` (on cancellation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    #[default]
    Scheduled,
    Cancelled,
    Completed,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppointmentStatus::Scheduled => write!(f, "scheduled"),
            AppointmentStatus::Cancelled => write!(f, "cancelled"),
            AppointmentStatus::Completed => write!(f, "completed"),
        }
    }
}

/// An appointment joined with its agenda slot, as the `appointment_details`
/// view returns it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub id: i64,
    pub status: AppointmentStatus,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
}

/// Patient-facing row: carries the assigned doctor's name parts.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientAppointmentRow {
    pub id: i64,
    pub status: AppointmentStatus,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub doctor_first_name: String,
    pub doctor_last_name: String,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct PatientAppointment {
    pub id: i64,
    pub status: AppointmentStatus,
    pub patient_id: i64,
    pub doctor_id: i64,
    pub doctor_name: String,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
}

/// Doctor-facing row: carries the patient's name parts.
#[derive(Debug, Clone, Deserialize)]
pub struct DoctorAppointmentRow {
    pub id: i64,
    pub status: AppointmentStatus,
    pub patient_id: i64,
    pub patient_first_name: String,
    pub patient_last_name: String,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize)]
pub struct DoctorAppointment {
    pub id: i64,
    pub status: AppointmentStatus,
    pub patient_id: i64,
    pub patient_name: String,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaSlot {
    pub id: i64,
    pub slot_date: NaiveDate,
    pub slot_time: NaiveTime,
    pub is_available: bool,
}

/// Result of the `schedule_appointment` procedure. The database decides
/// whether the slot can be taken; this core only relays the verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleOutcome {
    Booked(i64),
    Rejected(String),
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAppointmentRequest {
    pub patient_id: i64,
    pub slot_id: i64,
    #[serde(default)]
    pub status: AppointmentStatus,
}

impl CreateAppointmentRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.patient_id <= 0 {
            errors.push(FieldError::new("patient_id", "must be a positive id"));
        }
        if self.slot_id <= 0 {
            errors.push(FieldError::new("slot_id", "must be a positive id"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppointmentError {
    #[error("{0}")]
    SlotRejected(String),

    #[error("appointment not found")]
    NotFound,

    #[error("database failure: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_defaults_to_scheduled() {
        let body = serde_json::json!({ "patient_id": 7, "slot_id": 12 });
        let request: CreateAppointmentRequest = serde_json::from_value(body).unwrap();

        assert_eq!(request.status, AppointmentStatus::Scheduled);
        assert!(request.validate().is_ok());
    }

    #[test]
    fn create_request_rejects_non_positive_ids() {
        let request = CreateAppointmentRequest {
            patient_id: 0,
            slot_id: -4,
            status: AppointmentStatus::Scheduled,
        };

        let errors = request.validate().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["patient_id", "slot_id"]);
    }

    #[test]
    fn status_renders_wire_values() {
        assert_eq!(AppointmentStatus::Scheduled.to_string(), "scheduled");
        assert_eq!(AppointmentStatus::Cancelled.to_string(), "cancelled");
        assert_eq!(AppointmentStatus::Completed.to_string(), "completed");
    }

    #[test]
    fn status_deserializes_from_wire_values() {
        let status: AppointmentStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, AppointmentStatus::Cancelled);

        assert!(serde_json::from_str::<AppointmentStatus>("\"Programada\"").is_err());
    }
}
