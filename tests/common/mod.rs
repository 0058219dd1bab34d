use std::sync::Arc;
use std::time::Duration;

use wellness_challenge_api::config::DatabaseConfig;
use wellness_challenge_api::create_router;
use wellness_challenge_api::db::Database;

/// Build the app over a pool that never connects. Deadpool hands out
/// connections lazily, so every route that terminates before store access
/// (validation failures, route fallbacks, the health probe) can be
/// exercised without a live PostgreSQL.
#[allow(dead_code)]
pub fn create_test_app() -> axum::Router {
    let config = DatabaseConfig {
        host: "localhost".to_string(),
        port: 5432,
        database: "wellness_test".to_string(),
        username: "postgres".to_string(),
        password: "postgres".to_string(),
        ssl_mode: "disable".to_string(),
        max_connections: 2,
        connection_timeout: Duration::from_secs(1),
    };

    let database = Database::new(config).expect("pool creation performs no I/O");

    create_router(Arc::new(database))
}
