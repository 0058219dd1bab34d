// Completion handlers
// HTTP handlers for the challenge completion sub-resource

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::info;

use crate::{
    db::Database,
    error::ApiError,
    middleware::ValidatedJson,
    models::completion::{Completion, CreateCompletionRequest},
};

/// Record a completion and award the challenge's points to the user.
/// POST /challenges/:challenge_id
///
/// The four store calls run strictly in sequence, each gated on the
/// previous one; there is no wrapping transaction, so a failed award does
/// not undo an already-inserted completion.
pub async fn create_completion(
    State(db): State<Arc<Database>>,
    Path(challenge_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<CreateCompletionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let award = db
        .find_challenge_points(challenge_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Challenge not found"))?;

    db.find_user(request.user_id)
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    let completion_id = db
        .insert_completion(challenge_id, request.user_id, &request.details)
        .await?;

    db.award_points(request.user_id, award).await?;

    info!(
        "User {} completed challenge {} for {} points",
        request.user_id, challenge_id, award
    );
    Ok((
        StatusCode::CREATED,
        Json(Completion {
            completion_id,
            challenge_id,
            user_id: request.user_id,
            details: request.details,
        }),
    ))
}

/// List the attempts recorded for a challenge
/// GET /challenges/:challenge_id
pub async fn get_challenge_attempts(
    State(db): State<Arc<Database>>,
    Path(challenge_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let attempts = db.list_attempts(challenge_id).await?;

    // An unknown challenge and a challenge with no attempts both land here.
    if attempts.is_empty() {
        return Err(ApiError::not_found("No attempts found"));
    }

    Ok((StatusCode::OK, Json(attempts)))
}
