// Challenge handlers
// HTTP handlers for wellness challenge management operations

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
    models::challenge::{Challenge, CreateChallengeRequest, UpdateChallengeRequest},
};

/// Create a new challenge
/// POST /challenges
pub async fn create_challenge(
    State(db): State<Arc<Database>>,
    ValidatedJson(request): ValidatedJson<CreateChallengeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    info!("Creating new challenge for creator: {}", request.user_id);

    // The creator id is recorded as supplied; it is not checked against the
    // users table.
    let challenge_id = db
        .insert_challenge(request.user_id, &request.description, request.points)
        .await?;

    info!("Successfully created challenge with id: {}", challenge_id);
    Ok((
        StatusCode::CREATED,
        Json(Challenge {
            challenge_id,
            creator_id: request.user_id,
            description: request.description,
            points: request.points,
        }),
    ))
}

/// Get all challenges
/// GET /challenges
pub async fn get_all_challenges(
    State(db): State<Arc<Database>>,
) -> Result<impl IntoResponse, ApiError> {
    let challenges = db.list_challenges().await?;

    info!("Retrieved {} challenges", challenges.len());
    Ok((StatusCode::OK, Json(challenges)))
}

/// Update a challenge, allowed only for its creator
/// PUT /challenges/:challenge_id
pub async fn update_challenge(
    State(db): State<Arc<Database>>,
    Path(challenge_id): Path<i32>,
    ValidatedJson(request): ValidatedJson<UpdateChallengeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let creator_id = db
        .find_challenge_creator(challenge_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Challenge not found"))?;

    if creator_id != request.user_id {
        return Err(ApiError::forbidden("Forbidden: not the owner"));
    }

    db.update_challenge(challenge_id, &request.description, request.points)
        .await?;

    info!("Successfully updated challenge with id: {}", challenge_id);
    Ok((
        StatusCode::OK,
        Json(Challenge {
            challenge_id,
            creator_id: request.user_id,
            description: request.description,
            points: request.points,
        }),
    ))
}

/// Delete a challenge and every completion that references it
/// DELETE /challenges/:challenge_id
pub async fn delete_challenge(
    State(db): State<Arc<Database>>,
    Path(challenge_id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    if !db.challenge_exists(challenge_id).await? {
        return Err(ApiError::not_found("Challenge not found"));
    }

    // Completions go first; without foreign keys nothing at the store level
    // would clean them up after the parent row is gone.
    let removed = db.delete_completions_for_challenge(challenge_id).await?;
    db.delete_challenge(challenge_id).await?;

    info!(
        "Deleted challenge {} and {} associated completions",
        challenge_id, removed
    );
    Ok(StatusCode::NO_CONTENT)
}
