use std::fmt;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

use shared_models::FieldError;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern compiles"));

// ==============================================================================
// CORE USER MODELS
// ==============================================================================

/// Classification of an account. Write-once: the update path carries no role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Administrator,
}

impl Role {
    pub fn parse(value: &str) -> Option<Role> {
        match value {
            "patient" => Some(Role::Patient),
            "doctor" => Some(Role::Doctor),
            "administrator" => Some(Role::Administrator),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Patient => write!(f, "patient"),
            Role::Doctor => write!(f, "doctor"),
            Role::Administrator => write!(f, "administrator"),
        }
    }
}

/// A user as returned to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub email: String,
    pub phone: Option<String>,
    pub role: Role,
}

/// Reduced projection returned by the search procedure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
}

/// Credential row fetched for login. Stays inside the service layer.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub email: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub email: String,
}

// ==============================================================================
// GATEWAY PAYLOADS
// ==============================================================================

/// Parameters for the `create_user` procedure. The password is already hashed
/// by the time this struct exists.
#[derive(Debug, Clone, Serialize)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub birth_date: Option<NaiveDate>,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
    pub role: Role,
}

/// Parameters for the `update_user` procedure. No role field: the procedure
/// leaves the stored role untouched.
#[derive(Debug, Clone, Serialize)]
pub struct UserChanges {
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub birth_date: Option<NaiveDate>,
    pub email: String,
    pub phone: Option<String>,
    pub password_hash: String,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub birth_date: Option<NaiveDate>,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
    pub role: String,
}

impl CreateUserRequest {
    /// Field-level checks run before any gateway call. Returns the parsed
    /// role on success so the caller never re-parses the string.
    pub fn validate(&self) -> Result<Role, Vec<FieldError>> {
        let mut errors = validate_profile_fields(
            &self.first_name,
            &self.last_name,
            &self.document,
            &self.email,
            self.phone.as_deref(),
            &self.password,
        );

        let role = Role::parse(&self.role);
        if role.is_none() {
            errors.push(FieldError::new(
                "role",
                "must be one of patient, doctor, administrator",
            ));
        }

        match role {
            Some(role) if errors.is_empty() => Ok(role),
            _ => Err(errors),
        }
    }
}

/// Update payload. Deliberately has no `role` field; a role supplied by the
/// client is dropped during deserialization and can never reach the gateway.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateUserRequest {
    pub first_name: String,
    pub last_name: String,
    pub document: String,
    pub birth_date: Option<NaiveDate>,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let errors = validate_profile_fields(
            &self.first_name,
            &self.last_name,
            &self.document,
            &self.email,
            self.phone.as_deref(),
            &self.password,
        );

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "is required"));
        }
        if self.password.is_empty() {
            errors.push(FieldError::new("password", "is required"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub new_password: String,
}

impl ResetPasswordRequest {
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.email.trim().is_empty() {
            errors.push(FieldError::new("email", "is required"));
        }
        if self.new_password.is_empty() {
            errors.push(FieldError::new("new_password", "is required"));
        } else if self.new_password.len() > 100 {
            errors.push(FieldError::new("new_password", "must be at most 100 characters"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

fn validate_profile_fields(
    first_name: &str,
    last_name: &str,
    document: &str,
    email: &str,
    phone: Option<&str>,
    password: &str,
) -> Vec<FieldError> {
    let mut errors = Vec::new();

    check_required(&mut errors, "first_name", first_name, 100);
    check_required(&mut errors, "last_name", last_name, 100);
    check_required(&mut errors, "document", document, 50);

    if email.trim().is_empty() {
        errors.push(FieldError::new("email", "is required"));
    } else if email.len() > 100 {
        errors.push(FieldError::new("email", "must be at most 100 characters"));
    } else if !EMAIL_RE.is_match(email) {
        errors.push(FieldError::new("email", "must be a valid email address"));
    }

    if let Some(phone) = phone {
        if phone.len() > 20 {
            errors.push(FieldError::new("phone", "must be at most 20 characters"));
        }
    }

    if password.is_empty() {
        errors.push(FieldError::new("password", "is required"));
    } else if password.len() > 100 {
        errors.push(FieldError::new("password", "must be at most 100 characters"));
    }

    errors
}

fn check_required(errors: &mut Vec<FieldError>, field: &str, value: &str, max_len: usize) {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
    } else if value.len() > max_len {
        errors.push(FieldError::new(
            field,
            &format!("must be at most {} characters", max_len),
        ));
    }
}

// ==============================================================================
// ERRORS
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum UserError {
    #[error("user not found")]
    NotFound,

    #[error("document or email already registered")]
    Duplicate,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("password hashing failed: {0}")]
    Hash(String),

    #[error("database failure: {0}")]
    Database(String),
}
