use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{DbError, PostgrestClient};

use crate::models::{
    AgendaSlot, AppointmentRecord, AppointmentStatus, DoctorAppointmentRow, PatientAppointmentRow,
    ScheduleOutcome,
};

/// Narrow gateway to the scheduling procedures and the appointment views.
#[async_trait]
pub trait AppointmentRepository: Send + Sync {
    async fn schedule(
        &self,
        patient_id: i64,
        slot_id: i64,
        status: AppointmentStatus,
    ) -> Result<ScheduleOutcome, DbError>;
    async fn list_all(&self) -> Result<Vec<AppointmentRecord>, DbError>;
    async fn list_for_patient(&self, patient_id: i64)
        -> Result<Vec<PatientAppointmentRow>, DbError>;
    async fn list_for_doctor(&self, doctor_id: i64) -> Result<Vec<DoctorAppointmentRow>, DbError>;
    async fn cancel(&self, appointment_id: i64) -> Result<u64, DbError>;
    async fn open_slots(&self, doctor_id: i64) -> Result<Vec<AgendaSlot>, DbError>;
}

/// Discriminated reply of `schedule_appointment`: the procedure returns either
/// a rejection message or the new appointment id, never both.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ScheduleReply {
    Rejected { error: String },
    Booked { appointment_id: i64 },
}

pub struct HttpAppointmentRepository {
    db: PostgrestClient,
}

impl HttpAppointmentRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }
}

#[async_trait]
impl AppointmentRepository for HttpAppointmentRepository {
    async fn schedule(
        &self,
        patient_id: i64,
        slot_id: i64,
        status: AppointmentStatus,
    ) -> Result<ScheduleOutcome, DbError> {
        debug!("Scheduling appointment for patient {} on slot {}", patient_id, slot_id);

        let reply: ScheduleReply = self
            .db
            .rpc(
                "schedule_appointment",
                json!({
                    "patient_id": patient_id,
                    "slot_id": slot_id,
                    "status": status
                }),
            )
            .await?;

        Ok(match reply {
            ScheduleReply::Booked { appointment_id } => ScheduleOutcome::Booked(appointment_id),
            ScheduleReply::Rejected { error } => ScheduleOutcome::Rejected(error),
        })
    }

    async fn list_all(&self) -> Result<Vec<AppointmentRecord>, DbError> {
        let path = "appointment_details?select=id,status,patient_id,doctor_id,slot_date,slot_time\
                    &order=slot_date.desc,slot_time.desc";
        self.db.select(path).await
    }

    async fn list_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<PatientAppointmentRow>, DbError> {
        let path = format!(
            "appointment_details?patient_id=eq.{}\
             &select=id,status,patient_id,doctor_id,doctor_first_name,doctor_last_name,slot_date,slot_time\
             &order=slot_date.desc,slot_time.desc",
            patient_id
        );
        self.db.select(&path).await
    }

    async fn list_for_doctor(&self, doctor_id: i64) -> Result<Vec<DoctorAppointmentRow>, DbError> {
        let path = format!(
            "appointment_details?doctor_id=eq.{}\
             &select=id,status,patient_id,patient_first_name,patient_last_name,slot_date,slot_time\
             &order=slot_date.desc,slot_time.desc",
            doctor_id
        );
        self.db.select(&path).await
    }

    async fn cancel(&self, appointment_id: i64) -> Result<u64, DbError> {
        debug!("Cancelling appointment {}", appointment_id);
        self.db
            .rpc("cancel_appointment", json!({ "appointment_id": appointment_id }))
            .await
    }

    async fn open_slots(&self, doctor_id: i64) -> Result<Vec<AgendaSlot>, DbError> {
        // Past slots never come back; the cutoff is the server-side "today".
        let today = Utc::now().date_naive();
        let path = format!(
            "agenda?doctor_id=eq.{}&is_available=eq.true&slot_date=gte.{}\
             &select=id,slot_date,slot_time,is_available&order=slot_date.asc,slot_time.asc",
            doctor_id, today
        );
        self.db.select(&path).await
    }
}
