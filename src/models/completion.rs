use serde::{Deserialize, Serialize};

use crate::middleware::RequiredFields;

/// A recorded attempt at a challenge by a user, with free-form details.
/// Completions are never updated; they are deleted only when their parent
/// challenge is deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Completion {
    pub completion_id: i32,
    pub challenge_id: i32,
    pub user_id: i32,
    pub details: String,
}

/// Projection returned when listing a challenge's attempts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionAttempt {
    pub user_id: i32,
    pub details: String,
}

/// Request payload for completing a challenge
#[derive(Debug, Deserialize)]
pub struct CreateCompletionRequest {
    pub user_id: i32,
    pub details: String,
}

impl RequiredFields for CreateCompletionRequest {
    const REQUIRED: &'static [&'static str] = &["user_id", "details"];
}
