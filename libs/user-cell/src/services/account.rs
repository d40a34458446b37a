use std::sync::Arc;

use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::DbError;

use crate::models::{
    CreateUserRequest, LoginResponse, NewUser, Role, UpdateUserRequest, UserChanges, UserError,
    UserProfile, UserSummary,
};
use crate::repository::{HttpUserRepository, UserRepository};
use crate::services::password::PasswordService;

/// User workflow on top of the repository: hashing on every write path,
/// uniqueness translation, and the credential check for login.
pub struct AccountService {
    repo: Arc<dyn UserRepository>,
}

impl AccountService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            repo: Arc::new(HttpUserRepository::new(config)),
        }
    }

    pub fn with_repository(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn create(&self, request: CreateUserRequest, role: Role) -> Result<UserProfile, UserError> {
        debug!("Creating account for {}", request.email);

        let password_hash =
            PasswordService::hash(&request.password).map_err(|e| UserError::Hash(e.to_string()))?;

        let user = NewUser {
            first_name: request.first_name,
            last_name: request.last_name,
            document: request.document,
            birth_date: request.birth_date,
            email: request.email,
            phone: request.phone,
            password_hash,
            role,
        };

        let id = self.repo.create(&user).await.map_err(map_db_error)?;
        info!("User {} created", id);

        self.repo
            .fetch(id)
            .await
            .map_err(map_db_error)?
            .ok_or_else(|| UserError::Database(format!("created user {} not readable", id)))
    }

    pub async fn get(&self, id: i64) -> Result<UserProfile, UserError> {
        self.repo
            .fetch(id)
            .await
            .map_err(map_db_error)?
            .ok_or(UserError::NotFound)
    }

    pub async fn list(&self) -> Result<Vec<UserProfile>, UserError> {
        self.repo.list().await.map_err(map_db_error)
    }

    pub async fn update(&self, id: i64, request: UpdateUserRequest) -> Result<UserProfile, UserError> {
        debug!("Updating account {}", id);

        let password_hash =
            PasswordService::hash(&request.password).map_err(|e| UserError::Hash(e.to_string()))?;

        let changes = UserChanges {
            first_name: request.first_name,
            last_name: request.last_name,
            document: request.document,
            birth_date: request.birth_date,
            email: request.email,
            phone: request.phone,
            password_hash,
        };

        let affected = self.repo.update(id, &changes).await.map_err(map_db_error)?;
        if affected == 0 {
            return Err(UserError::NotFound);
        }

        self.repo
            .fetch(id)
            .await
            .map_err(map_db_error)?
            .ok_or(UserError::NotFound)
    }

    pub async fn delete(&self, id: i64) -> Result<(), UserError> {
        let affected = self.repo.delete(id).await.map_err(map_db_error)?;
        if affected == 0 {
            return Err(UserError::NotFound);
        }

        info!("User {} deleted", id);
        Ok(())
    }

    /// Unknown email and wrong password collapse into the same failure so the
    /// response never reveals whether an account exists.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, UserError> {
        let credentials = self
            .repo
            .credentials_by_email(email)
            .await
            .map_err(map_db_error)?
            .ok_or(UserError::InvalidCredentials)?;

        let verified = PasswordService::verify(password, &credentials.password_hash)
            .map_err(|e| UserError::Hash(e.to_string()))?;
        if !verified {
            return Err(UserError::InvalidCredentials);
        }

        debug!("User {} authenticated", credentials.id);
        Ok(LoginResponse {
            id: credentials.id,
            first_name: credentials.first_name,
            last_name: credentials.last_name,
            role: credentials.role,
            email: credentials.email,
        })
    }

    pub async fn reset_password(&self, email: &str, new_password: &str) -> Result<(), UserError> {
        let password_hash =
            PasswordService::hash(new_password).map_err(|e| UserError::Hash(e.to_string()))?;

        let affected = self
            .repo
            .reset_password(email, &password_hash)
            .await
            .map_err(map_db_error)?;
        if affected == 0 {
            return Err(UserError::NotFound);
        }

        info!("Password reset for {}", email);
        Ok(())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<UserSummary>, UserError> {
        self.repo.search(query).await.map_err(map_db_error)
    }
}

fn map_db_error(err: DbError) -> UserError {
    match err {
        DbError::Conflict(_) => UserError::Duplicate,
        other => UserError::Database(other.to_string()),
    }
}
