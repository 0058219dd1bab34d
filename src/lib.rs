// Library root for the wellness challenge API

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;

// Re-export commonly used types
pub use db::Database;
pub use error::ApiError;

use axum::{
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;

use handlers::{
    challenges::{create_challenge, delete_challenge, get_all_challenges, update_challenge},
    completions::{create_completion, get_challenge_attempts},
    health_check, route_not_found,
    users::{create_user, get_all_users, get_user_by_id, update_user},
};
use middleware::create_middleware_stack;

/// Create the axum router with all endpoints and middleware. Unmatched
/// paths and unregistered verbs on matched paths both fall through to the
/// generic 404 body.
pub fn create_router(database: Arc<Database>) -> Router {
    Router::new()
        // Health check endpoint
        .route("/health", get(health_check).fallback(route_not_found))
        // User management endpoints
        .route(
            "/users",
            post(create_user).get(get_all_users).fallback(route_not_found),
        )
        .route(
            "/users/:user_id",
            get(get_user_by_id)
                .put(update_user)
                .fallback(route_not_found),
        )
        // Challenge management endpoints, with completions nested on the
        // item path
        .route(
            "/challenges",
            post(create_challenge)
                .get(get_all_challenges)
                .fallback(route_not_found),
        )
        .route(
            "/challenges/:challenge_id",
            put(update_challenge)
                .delete(delete_challenge)
                .post(create_completion)
                .get(get_challenge_attempts)
                .fallback(route_not_found),
        )
        // Basic fallback for unknown routes
        .fallback(route_not_found)
        // Add shared state (database connection)
        .with_state(database)
        // Apply middleware stack
        .layer(create_middleware_stack())
}
