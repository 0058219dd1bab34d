// User handlers
// HTTP handlers for user management operations

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;

use crate::{
    db::Database,
    error::ApiError,
    middleware::ValidatedJson,
    models::user::{CreateUserRequest, UpdateUserRequest, User},
};

/// Create a new user
/// POST /users
pub async fn create_user(
    State(db): State<Arc<Database>>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Creating new user: {}", request.username);

    let user_id = db.insert_user(&request.username).await?;

    info!("Successfully created user with id: {}", user_id);
    Ok((
        StatusCode::CREATED,
        Json(User {
            user_id,
            username: request.username,
            points: 0,
        }),
    ))
}

/// Get all users
/// GET /users
pub async fn get_all_users(
    State(db): State<Arc<Database>>,
) -> Result<impl IntoResponse, ApiError> {
    let users = db.list_users().await?;

    info!("Retrieved {} users", users.len());
    Ok((StatusCode::OK, Json(users)))
}

/// Get user by ID
/// GET /users/:user_id
pub async fn get_user_by_id(
    State(db): State<Arc<Database>>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let user = db
        .find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok((StatusCode::OK, Json(user)))
}

/// Update user by ID, replacing username and points together
/// PUT /users/:user_id
pub async fn update_user(
    State(db): State<Arc<Database>>,
    Path(user_id): Path<i32>,
    body: Option<Json<Value>>,
) -> Result<impl IntoResponse, ApiError> {
    let body = body.map(|Json(value)| value).unwrap_or(Value::Null);

    // This route checks presence inline instead of going through the shared
    // required-field gate.
    if body.get("username").is_none() || body.get("points").is_none() {
        return Err(ApiError::validation("Missing username or points"));
    }

    let request: UpdateUserRequest = serde_json::from_value(body)
        .map_err(|err| ApiError::validation(format!("Invalid request body: {}", err)))?;

    // Existence check and update are two separate round trips; nothing
    // holds the row in between.
    db.find_user(user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    db.update_user(user_id, &request.username, request.points)
        .await?;

    info!("Successfully updated user with id: {}", user_id);
    Ok((
        StatusCode::OK,
        Json(User {
            user_id,
            username: request.username,
            points: request.points,
        }),
    ))
}
