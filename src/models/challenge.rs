use serde::{Deserialize, Serialize};

use crate::middleware::RequiredFields;

/// A wellness challenge. `points` is the award granted to a user who
/// completes it; `creator_id` is the only identity allowed to update it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Challenge {
    pub challenge_id: i32,
    pub creator_id: i32,
    pub description: String,
    pub points: i32,
}

/// Request payload for creating a challenge. The supplied `user_id` is
/// recorded as the creator; it is not checked against the users table.
#[derive(Debug, Deserialize)]
pub struct CreateChallengeRequest {
    pub user_id: i32,
    pub description: String,
    pub points: i32,
}

/// Request payload for updating a challenge. `user_id` is the caller's
/// identity and must match the recorded creator.
#[derive(Debug, Deserialize)]
pub struct UpdateChallengeRequest {
    pub user_id: i32,
    pub description: String,
    pub points: i32,
}

impl RequiredFields for CreateChallengeRequest {
    const REQUIRED: &'static [&'static str] = &["user_id", "description", "points"];
}

impl RequiredFields for UpdateChallengeRequest {
    const REQUIRED: &'static [&'static str] = &["user_id", "description", "points"];
}
