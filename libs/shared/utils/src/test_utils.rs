use std::sync::Arc;

use serde_json::json;

use shared_config::AppConfig;

pub struct TestConfig {
    pub database_api_url: String,
    pub database_api_key: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            database_api_url: "http://localhost:54321".to_string(),
            database_api_key: "test-service-key".to_string(),
        }
    }
}

impl TestConfig {
    /// Point the config at a wiremock server so gateway calls land there.
    pub fn for_mock_server(uri: &str) -> Self {
        Self {
            database_api_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            database_api_url: self.database_api_url.clone(),
            database_api_key: self.database_api_key.clone(),
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

/// Canned gateway rows matching the shapes the procedures and views return.
pub struct MockDbResponses;

impl MockDbResponses {
    pub fn user_row(id: i64, email: &str, role: &str) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": "Laura",
            "last_name": "Mendoza",
            "document": format!("DOC-{}", id),
            "email": email,
            "phone": "555-0101",
            "role": role
        })
    }

    pub fn user_summary_row(id: i64, email: &str, role: &str) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": "Laura",
            "last_name": "Mendoza",
            "email": email,
            "role": role
        })
    }

    pub fn credentials_row(
        id: i64,
        email: &str,
        role: &str,
        password_hash: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "first_name": "Laura",
            "last_name": "Mendoza",
            "role": role,
            "email": email,
            "password_hash": password_hash
        })
    }

    pub fn appointment_row(id: i64, status: &str, date: &str, time: &str) -> serde_json::Value {
        json!({
            "id": id,
            "status": status,
            "patient_id": 7,
            "doctor_id": 3,
            "slot_date": date,
            "slot_time": time
        })
    }

    pub fn patient_appointment_row(
        id: i64,
        status: &str,
        date: &str,
        time: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "status": status,
            "patient_id": 7,
            "doctor_id": 3,
            "doctor_first_name": "Ana",
            "doctor_last_name": "García",
            "slot_date": date,
            "slot_time": time
        })
    }

    pub fn doctor_appointment_row(
        id: i64,
        status: &str,
        date: &str,
        time: &str,
    ) -> serde_json::Value {
        json!({
            "id": id,
            "status": status,
            "patient_id": 7,
            "patient_first_name": "Luis",
            "patient_last_name": "Rojas",
            "slot_date": date,
            "slot_time": time
        })
    }

    pub fn slot_row(id: i64, date: &str, time: &str) -> serde_json::Value {
        json!({
            "id": id,
            "slot_date": date,
            "slot_time": time,
            "is_available": true
        })
    }
}
