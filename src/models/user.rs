use serde::{Deserialize, Serialize};

use crate::middleware::RequiredFields;

/// A registered participant. `points` is the running balance, increased only
/// by challenge-completion awards or an explicit update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: i32,
    pub username: String,
    pub points: i32,
}

/// Request payload for creating a new user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
}

/// Request payload for replacing a user's username and points together.
/// Field presence is checked inline in the handler, not by `ValidatedJson`.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub username: String,
    pub points: i32,
}

impl RequiredFields for CreateUserRequest {
    const REQUIRED: &'static [&'static str] = &["username"];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization() {
        let user = User {
            user_id: 1,
            username: "alice".to_string(),
            points: 10,
        };

        let json = serde_json::to_string(&user).expect("Failed to serialize user");
        assert_eq!(json, r#"{"user_id":1,"username":"alice","points":10}"#);
    }

    #[test]
    fn test_create_user_request_deserialization() {
        let json = r#"{"username":"alice"}"#;

        let request: CreateUserRequest =
            serde_json::from_str(json).expect("Failed to deserialize CreateUserRequest");

        assert_eq!(request.username, "alice");
    }

    #[test]
    fn test_update_user_request_deserialization() {
        let json = r#"{"username":"alice","points":25}"#;

        let request: UpdateUserRequest =
            serde_json::from_str(json).expect("Failed to deserialize UpdateUserRequest");

        assert_eq!(request.username, "alice");
        assert_eq!(request.points, 25);
    }

    #[test]
    fn test_create_user_required_fields() {
        assert_eq!(CreateUserRequest::REQUIRED, &["username"]);
    }
}
