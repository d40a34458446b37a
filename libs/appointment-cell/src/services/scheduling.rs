use std::sync::Arc;

use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::DbError;

use crate::models::{
    AgendaSlot, AppointmentError, AppointmentRecord, AppointmentStatus, DoctorAppointment,
    PatientAppointment, ScheduleOutcome,
};
use crate::repository::{AppointmentRepository, HttpAppointmentRepository};

/// Appointment workflow over the repository. The database procedures arbitrate
/// slot availability; this layer maps rows and relays verdicts.
pub struct SchedulingService {
    repo: Arc<dyn AppointmentRepository>,
}

impl SchedulingService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            repo: Arc::new(HttpAppointmentRepository::new(config)),
        }
    }

    pub fn with_repository(repo: Arc<dyn AppointmentRepository>) -> Self {
        Self { repo }
    }

    pub async fn schedule(
        &self,
        patient_id: i64,
        slot_id: i64,
        status: AppointmentStatus,
    ) -> Result<i64, AppointmentError> {
        let outcome = self
            .repo
            .schedule(patient_id, slot_id, status)
            .await
            .map_err(map_db_error)?;

        match outcome {
            ScheduleOutcome::Booked(id) => {
                info!("Appointment {} scheduled for patient {}", id, patient_id);
                Ok(id)
            }
            ScheduleOutcome::Rejected(message) => {
                debug!("Scheduling rejected: {}", message);
                Err(AppointmentError::SlotRejected(message))
            }
        }
    }

    pub async fn list_all(&self) -> Result<Vec<AppointmentRecord>, AppointmentError> {
        self.repo.list_all().await.map_err(map_db_error)
    }

    pub async fn list_for_patient(
        &self,
        patient_id: i64,
    ) -> Result<Vec<PatientAppointment>, AppointmentError> {
        let rows = self
            .repo
            .list_for_patient(patient_id)
            .await
            .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| PatientAppointment {
                id: row.id,
                status: row.status,
                patient_id: row.patient_id,
                doctor_id: row.doctor_id,
                doctor_name: format!("{} {}", row.doctor_first_name, row.doctor_last_name),
                slot_date: row.slot_date,
                slot_time: row.slot_time,
            })
            .collect())
    }

    pub async fn list_for_doctor(
        &self,
        doctor_id: i64,
    ) -> Result<Vec<DoctorAppointment>, AppointmentError> {
        let rows = self
            .repo
            .list_for_doctor(doctor_id)
            .await
            .map_err(map_db_error)?;

        Ok(rows
            .into_iter()
            .map(|row| DoctorAppointment {
                id: row.id,
                status: row.status,
                patient_id: row.patient_id,
                patient_name: format!("{} {}", row.patient_first_name, row.patient_last_name),
                slot_date: row.slot_date,
                slot_time: row.slot_time,
            })
            .collect())
    }

    /// Unconditional status write; cancelling an already-cancelled appointment
    /// succeeds and leaves it cancelled.
    pub async fn cancel(&self, appointment_id: i64) -> Result<(), AppointmentError> {
        let affected = self.repo.cancel(appointment_id).await.map_err(map_db_error)?;
        if affected == 0 {
            return Err(AppointmentError::NotFound);
        }

        info!("Appointment {} cancelled", appointment_id);
        Ok(())
    }

    pub async fn availability(&self, doctor_id: i64) -> Result<Vec<AgendaSlot>, AppointmentError> {
        self.repo.open_slots(doctor_id).await.map_err(map_db_error)
    }
}

fn map_db_error(err: DbError) -> AppointmentError {
    AppointmentError::Database(err.to_string())
}
