use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime};

use appointment_cell::models::{
    AgendaSlot, AppointmentError, AppointmentRecord, AppointmentStatus, DoctorAppointmentRow,
    PatientAppointmentRow, ScheduleOutcome,
};
use appointment_cell::repository::AppointmentRepository;
use appointment_cell::services::SchedulingService;
use shared_database::DbError;

/// Substitute gateway: the narrow repository trait is the whole seam, so a
/// handful of canned replies stands in for the database.
struct StubRepository {
    outcome: ScheduleOutcome,
    cancel_affected: u64,
}

impl StubRepository {
    fn booked(id: i64) -> Self {
        Self {
            outcome: ScheduleOutcome::Booked(id),
            cancel_affected: 1,
        }
    }

    fn rejected(message: &str) -> Self {
        Self {
            outcome: ScheduleOutcome::Rejected(message.to_string()),
            cancel_affected: 0,
        }
    }
}

fn date(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn time(s: &str) -> NaiveTime {
    s.parse().unwrap()
}

#[async_trait]
impl AppointmentRepository for StubRepository {
    async fn schedule(
        &self,
        _patient_id: i64,
        _slot_id: i64,
        _status: AppointmentStatus,
    ) -> Result<ScheduleOutcome, DbError> {
        Ok(self.outcome.clone())
    }

    async fn list_all(&self) -> Result<Vec<AppointmentRecord>, DbError> {
        Ok(vec![])
    }

    async fn list_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<PatientAppointmentRow>, DbError> {
        Ok(vec![PatientAppointmentRow {
            id: 9,
            status: AppointmentStatus::Scheduled,
            patient_id,
            doctor_id: 3,
            doctor_first_name: "Ana".to_string(),
            doctor_last_name: "García".to_string(),
            slot_date: date("2030-01-15"),
            slot_time: time("09:00:00"),
        }])
    }

    async fn list_for_doctor(&self, _doctor_id: i64) -> Result<Vec<DoctorAppointmentRow>, DbError> {
        Ok(vec![DoctorAppointmentRow {
            id: 9,
            status: AppointmentStatus::Cancelled,
            patient_id: 7,
            patient_first_name: "Luis".to_string(),
            patient_last_name: "Rojas".to_string(),
            slot_date: date("2030-01-15"),
            slot_time: time("09:00:00"),
        }])
    }

    async fn cancel(&self, _appointment_id: i64) -> Result<u64, DbError> {
        Ok(self.cancel_affected)
    }

    async fn open_slots(&self, _doctor_id: i64) -> Result<Vec<AgendaSlot>, DbError> {
        Ok(vec![])
    }
}

#[tokio::test]
async fn schedule_maps_booked_outcome_to_the_new_id() {
    let service = SchedulingService::with_repository(Arc::new(StubRepository::booked(42)));

    let id = service
        .schedule(7, 12, AppointmentStatus::Scheduled)
        .await
        .unwrap();

    assert_eq!(id, 42);
}

#[tokio::test]
async fn schedule_maps_rejection_to_a_slot_error_with_the_database_message() {
    let service =
        SchedulingService::with_repository(Arc::new(StubRepository::rejected("slot taken")));

    let err = service
        .schedule(7, 12, AppointmentStatus::Scheduled)
        .await
        .unwrap_err();

    assert_matches!(err, AppointmentError::SlotRejected(msg) if msg == "slot taken");
}

#[tokio::test]
async fn cancel_zero_affected_rows_is_not_found() {
    let service =
        SchedulingService::with_repository(Arc::new(StubRepository::rejected("unused")));

    let err = service.cancel(404).await.unwrap_err();

    assert_matches!(err, AppointmentError::NotFound);
}

#[tokio::test]
async fn patient_listing_concatenates_the_doctor_name() {
    let service = SchedulingService::with_repository(Arc::new(StubRepository::booked(1)));

    let rows = service.list_for_patient(7).await.unwrap();

    assert_eq!(rows[0].doctor_name, "Ana García");
    assert_eq!(rows[0].patient_id, 7);
}

#[tokio::test]
async fn doctor_listing_concatenates_the_patient_name() {
    let service = SchedulingService::with_repository(Arc::new(StubRepository::booked(1)));

    let rows = service.list_for_doctor(3).await.unwrap();

    assert_eq!(rows[0].patient_name, "Luis Rojas");
    assert_eq!(rows[0].status, AppointmentStatus::Cancelled);
}
