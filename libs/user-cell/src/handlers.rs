use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::AppError;

use crate::models::{
    CreateUserRequest, LoginRequest, ResetPasswordRequest, SearchParams, UpdateUserRequest,
    UserError,
};
use crate::services::AccountService;

#[axum::debug_handler]
pub async fn list_users(State(config): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&config);

    let users = service.list().await.map_err(map_user_error)?;

    Ok(Json(json!(users)))
}

#[axum::debug_handler]
pub async fn get_user(
    State(config): State<Arc<AppConfig>>,
    Path(user_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let service = AccountService::new(&config);

    let user = service.get(user_id).await.map_err(map_user_error)?;

    Ok(Json(json!(user)))
}

#[axum::debug_handler]
pub async fn create_user(
    State(config): State<Arc<AppConfig>>,
    WithRejection(Json(request), _): WithRejection<Json<CreateUserRequest>, AppError>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let role = request.validate().map_err(AppError::Invalid)?;

    let service = AccountService::new(&config);
    let user = service.create(request, role).await.map_err(map_user_error)?;

    Ok((StatusCode::CREATED, Json(json!(user))))
}

#[axum::debug_handler]
pub async fn update_user(
    State(config): State<Arc<AppConfig>>,
    Path(user_id): Path<i64>,
    WithRejection(Json(request), _): WithRejection<Json<UpdateUserRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    request.validate().map_err(AppError::Invalid)?;

    let service = AccountService::new(&config);
    let user = service.update(user_id, request).await.map_err(map_user_error)?;

    Ok(Json(json!(user)))
}

#[axum::debug_handler]
pub async fn delete_user(
    State(config): State<Arc<AppConfig>>,
    Path(user_id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let service = AccountService::new(&config);

    service.delete(user_id).await.map_err(map_user_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn login(
    State(config): State<Arc<AppConfig>>,
    WithRejection(Json(request), _): WithRejection<Json<LoginRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    request.validate().map_err(AppError::Invalid)?;

    let service = AccountService::new(&config);
    let profile = service
        .login(&request.email, &request.password)
        .await
        .map_err(map_user_error)?;

    Ok(Json(json!(profile)))
}

#[axum::debug_handler]
pub async fn reset_password(
    State(config): State<Arc<AppConfig>>,
    WithRejection(Json(request), _): WithRejection<Json<ResetPasswordRequest>, AppError>,
) -> Result<Json<Value>, AppError> {
    request.validate().map_err(AppError::Invalid)?;

    let service = AccountService::new(&config);
    service
        .reset_password(&request.email, &request.new_password)
        .await
        .map_err(|e| match e {
            UserError::NotFound => AppError::NotFound("email not found".to_string()),
            other => map_user_error(other),
        })?;

    Ok(Json(json!({ "message": "password updated" })))
}

#[axum::debug_handler]
pub async fn search_users(
    State(config): State<Arc<AppConfig>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Value>, AppError> {
    let query = match params.q.as_deref() {
        Some(q) if !q.trim().is_empty() => q.to_string(),
        _ => return Err(AppError::BadRequest("query parameter q is required".to_string())),
    };

    let service = AccountService::new(&config);
    let users = service.search(&query).await.map_err(map_user_error)?;

    Ok(Json(json!(users)))
}

fn map_user_error(err: UserError) -> AppError {
    match err {
        UserError::NotFound => AppError::NotFound("user not found".to_string()),
        UserError::Duplicate => {
            AppError::BadRequest("document or email already registered".to_string())
        }
        UserError::InvalidCredentials => AppError::Auth("invalid credentials".to_string()),
        UserError::Hash(msg) => AppError::Internal(msg),
        UserError::Database(msg) => AppError::Database(msg),
    }
}
