use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use shared_config::AppConfig;
use shared_database::{DbError, PostgrestClient};

use crate::models::{Credentials, NewUser, UserChanges, UserProfile, UserSummary};

/// Narrow gateway to the user procedures. The database engine behind it is
/// swappable without touching the service layer.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &NewUser) -> Result<i64, DbError>;
    async fn fetch(&self, id: i64) -> Result<Option<UserProfile>, DbError>;
    async fn list(&self) -> Result<Vec<UserProfile>, DbError>;
    async fn update(&self, id: i64, changes: &UserChanges) -> Result<u64, DbError>;
    async fn delete(&self, id: i64) -> Result<u64, DbError>;
    async fn credentials_by_email(&self, email: &str) -> Result<Option<Credentials>, DbError>;
    async fn reset_password(&self, email: &str, password_hash: &str) -> Result<u64, DbError>;
    async fn search(&self, query: &str) -> Result<Vec<UserSummary>, DbError>;
}

/// Stored-procedure implementation over the PostgREST gateway.
pub struct HttpUserRepository {
    db: PostgrestClient,
}

impl HttpUserRepository {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            db: PostgrestClient::new(config),
        }
    }
}

#[async_trait]
impl UserRepository for HttpUserRepository {
    async fn create(&self, user: &NewUser) -> Result<i64, DbError> {
        debug!("Creating user {}", user.email);
        let params = serde_json::to_value(user)?;
        self.db.rpc("create_user", params).await
    }

    async fn fetch(&self, id: i64) -> Result<Option<UserProfile>, DbError> {
        let rows: Vec<UserProfile> = self.db.rpc("get_user", json!({ "user_id": id })).await?;
        Ok(rows.into_iter().next())
    }

    async fn list(&self) -> Result<Vec<UserProfile>, DbError> {
        self.db.rpc("list_users", json!({})).await
    }

    async fn update(&self, id: i64, changes: &UserChanges) -> Result<u64, DbError> {
        debug!("Updating user {}", id);
        let mut params = serde_json::to_value(changes)?;
        if let Value::Object(map) = &mut params {
            map.insert("user_id".to_string(), json!(id));
        }
        self.db.rpc("update_user", params).await
    }

    async fn delete(&self, id: i64) -> Result<u64, DbError> {
        debug!("Deleting user {}", id);
        self.db.rpc("delete_user", json!({ "user_id": id })).await
    }

    async fn credentials_by_email(&self, email: &str) -> Result<Option<Credentials>, DbError> {
        let path = format!(
            "users?email=eq.{}&select=id,first_name,last_name,role,email,password_hash",
            urlencoding::encode(email)
        );
        let rows: Vec<Credentials> = self.db.select(&path).await?;
        Ok(rows.into_iter().next())
    }

    async fn reset_password(&self, email: &str, password_hash: &str) -> Result<u64, DbError> {
        self.db
            .rpc(
                "reset_password",
                json!({ "email": email, "password_hash": password_hash }),
            )
            .await
    }

    async fn search(&self, query: &str) -> Result<Vec<UserSummary>, DbError> {
        self.db.rpc("search_users", json!({ "query": query })).await
    }
}
