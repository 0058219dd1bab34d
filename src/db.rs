use deadpool_postgres::{Config, Object, Pool, Runtime};
use native_tls::TlsConnector;
use postgres_native_tls::MakeTlsConnector;
use tracing::{error, info, warn};

use crate::config::DatabaseConfig;
use crate::error::ApiError;
use crate::models::challenge::Challenge;
use crate::models::completion::CompletionAttempt;
use crate::models::user::User;

/// Repository over the PostgreSQL connection pool. Each method issues a
/// single parameterized statement; multi-step rules (ownership checks,
/// cascading deletes, point awards) are sequenced by the handlers.
#[derive(Clone)]
pub struct Database {
    pool: Pool,
}

impl Database {
    /// Build the connection pool. Connections are established lazily, so
    /// this performs no I/O; call `health_check` to probe connectivity.
    pub fn new(config: DatabaseConfig) -> Result<Self, ApiError> {
        info!(
            "Creating PostgreSQL connection pool for host: {}:{}",
            config.host, config.port
        );

        let pool = Self::create_pool(config)?;

        Ok(Database { pool })
    }

    fn create_pool(config: DatabaseConfig) -> Result<Pool, ApiError> {
        let mut pg_config = Config::new();

        // Set connection parameters
        pg_config.host = Some(config.host);
        pg_config.port = Some(config.port);
        pg_config.dbname = Some(config.database);
        pg_config.user = Some(config.username);
        pg_config.password = Some(config.password);
        pg_config.connect_timeout = Some(config.connection_timeout);

        // Configure SSL mode
        match config.ssl_mode.as_str() {
            "disable" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Disable);
            }
            "prefer" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Prefer);
            }
            "require" => {
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Require);
            }
            _ => {
                warn!("Unknown SSL mode '{}', defaulting to 'prefer'", config.ssl_mode);
                pg_config.ssl_mode = Some(deadpool_postgres::SslMode::Prefer);
            }
        }

        // Configure connection pool
        pg_config.manager = Some(deadpool_postgres::ManagerConfig {
            recycling_method: deadpool_postgres::RecyclingMethod::Fast,
        });

        pg_config.pool = Some(deadpool_postgres::PoolConfig::new(
            config.max_connections as usize,
        ));

        let tls_connector = TlsConnector::builder().build().map_err(|e| {
            error!("Failed to create TLS connector: {}", e);
            ApiError::Database(format!("TLS connector creation failed: {}", e))
        })?;
        let tls = MakeTlsConnector::new(tls_connector);

        pg_config.create_pool(Some(Runtime::Tokio1), tls).map_err(|e| {
            error!("Failed to create connection pool: {}", e);
            ApiError::Database(format!("Connection pool creation failed: {}", e))
        })
    }

    async fn get_connection(&self) -> Result<Object, ApiError> {
        self.pool.get().await.map_err(ApiError::from)
    }

    /// Connectivity probe, used at startup before serving traffic.
    pub async fn health_check(&self) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client.execute("SELECT 1", &[]).await.map_err(|e| {
            error!("Database health check failed: {}", e);
            ApiError::Database(format!("Health check failed: {}", e))
        })?;

        Ok(())
    }

    /// Idempotent startup DDL. No foreign keys: referential integrity for
    /// completions is maintained by the handler-level checks and the
    /// cascading delete sequence.
    pub async fn migrate(&self) -> Result<(), ApiError> {
        info!("Running database migrations");

        let client = self.get_connection().await?;

        let users_table = r#"
            CREATE TABLE IF NOT EXISTS users (
                user_id SERIAL PRIMARY KEY,
                username VARCHAR(255) UNIQUE NOT NULL,
                points INTEGER NOT NULL DEFAULT 0
            )
        "#;

        client.execute(users_table, &[]).await.map_err(|e| {
            error!("Failed to create users table: {}", e);
            ApiError::Database(format!("Users table creation failed: {}", e))
        })?;

        let challenges_table = r#"
            CREATE TABLE IF NOT EXISTS wellness_challenges (
                challenge_id SERIAL PRIMARY KEY,
                creator_id INTEGER NOT NULL,
                description TEXT NOT NULL,
                points INTEGER NOT NULL
            )
        "#;

        client.execute(challenges_table, &[]).await.map_err(|e| {
            error!("Failed to create wellness_challenges table: {}", e);
            ApiError::Database(format!("Challenges table creation failed: {}", e))
        })?;

        let completions_table = r#"
            CREATE TABLE IF NOT EXISTS user_completions (
                completion_id SERIAL PRIMARY KEY,
                challenge_id INTEGER NOT NULL,
                user_id INTEGER NOT NULL,
                details TEXT NOT NULL
            )
        "#;

        client.execute(completions_table, &[]).await.map_err(|e| {
            error!("Failed to create user_completions table: {}", e);
            ApiError::Database(format!("Completions table creation failed: {}", e))
        })?;

        let completions_challenge_index = "CREATE INDEX IF NOT EXISTS idx_user_completions_challenge_id ON user_completions(challenge_id)";
        client
            .execute(completions_challenge_index, &[])
            .await
            .map_err(|e| {
                error!("Failed to create completions challenge_id index: {}", e);
                ApiError::Database(format!("Completions index creation failed: {}", e))
            })?;

        let completions_user_index = "CREATE INDEX IF NOT EXISTS idx_user_completions_user_id ON user_completions(user_id)";
        client
            .execute(completions_user_index, &[])
            .await
            .map_err(|e| {
                error!("Failed to create completions user_id index: {}", e);
                ApiError::Database(format!("Completions index creation failed: {}", e))
            })?;

        info!("Database migrations completed successfully");
        Ok(())
    }

    // User queries

    /// Insert a user with the default zero point balance. A duplicate
    /// username surfaces as `ApiError::Conflict` via the unique constraint.
    pub async fn insert_user(&self, username: &str) -> Result<i32, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_one(
                "INSERT INTO users (username) VALUES ($1) RETURNING user_id",
                &[&username],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(row.get(0))
    }

    pub async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client
            .query("SELECT user_id, username, points FROM users", &[])
            .await
            .map_err(ApiError::from)?;

        let users = rows
            .iter()
            .map(|row| User {
                user_id: row.get(0),
                username: row.get(1),
                points: row.get(2),
            })
            .collect();

        Ok(users)
    }

    pub async fn find_user(&self, user_id: i32) -> Result<Option<User>, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_opt(
                "SELECT user_id, username, points FROM users WHERE user_id = $1",
                &[&user_id],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(row.map(|row| User {
            user_id: row.get(0),
            username: row.get(1),
            points: row.get(2),
        }))
    }

    /// Replace a user's username and points. The caller is responsible for
    /// checking existence first; this statement alone reports no mismatch.
    pub async fn update_user(
        &self,
        user_id: i32,
        username: &str,
        points: i32,
    ) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client
            .execute(
                "UPDATE users SET username = $1, points = $2 WHERE user_id = $3",
                &[&username, &points, &user_id],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(())
    }

    /// Additive point award. Expressed as `points = points + $1` so two
    /// concurrent awards both land at the statement level.
    pub async fn award_points(&self, user_id: i32, amount: i32) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client
            .execute(
                "UPDATE users SET points = points + $1 WHERE user_id = $2",
                &[&amount, &user_id],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(())
    }

    // Challenge queries

    pub async fn insert_challenge(
        &self,
        creator_id: i32,
        description: &str,
        points: i32,
    ) -> Result<i32, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_one(
                "INSERT INTO wellness_challenges (creator_id, description, points) VALUES ($1, $2, $3) RETURNING challenge_id",
                &[&creator_id, &description, &points],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(row.get(0))
    }

    pub async fn list_challenges(&self) -> Result<Vec<Challenge>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client
            .query(
                "SELECT challenge_id, creator_id, description, points FROM wellness_challenges",
                &[],
            )
            .await
            .map_err(ApiError::from)?;

        let challenges = rows
            .iter()
            .map(|row| Challenge {
                challenge_id: row.get(0),
                creator_id: row.get(1),
                description: row.get(2),
                points: row.get(3),
            })
            .collect();

        Ok(challenges)
    }

    pub async fn find_challenge_creator(&self, challenge_id: i32) -> Result<Option<i32>, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_opt(
                "SELECT creator_id FROM wellness_challenges WHERE challenge_id = $1",
                &[&challenge_id],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(row.map(|row| row.get(0)))
    }

    pub async fn find_challenge_points(&self, challenge_id: i32) -> Result<Option<i32>, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_opt(
                "SELECT points FROM wellness_challenges WHERE challenge_id = $1",
                &[&challenge_id],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(row.map(|row| row.get(0)))
    }

    pub async fn challenge_exists(&self, challenge_id: i32) -> Result<bool, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_opt(
                "SELECT challenge_id FROM wellness_challenges WHERE challenge_id = $1",
                &[&challenge_id],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(row.is_some())
    }

    pub async fn update_challenge(
        &self,
        challenge_id: i32,
        description: &str,
        points: i32,
    ) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client
            .execute(
                "UPDATE wellness_challenges SET description = $1, points = $2 WHERE challenge_id = $3",
                &[&description, &points, &challenge_id],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(())
    }

    pub async fn delete_challenge(&self, challenge_id: i32) -> Result<(), ApiError> {
        let client = self.get_connection().await?;

        client
            .execute(
                "DELETE FROM wellness_challenges WHERE challenge_id = $1",
                &[&challenge_id],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(())
    }

    // Completion queries

    pub async fn insert_completion(
        &self,
        challenge_id: i32,
        user_id: i32,
        details: &str,
    ) -> Result<i32, ApiError> {
        let client = self.get_connection().await?;

        let row = client
            .query_one(
                "INSERT INTO user_completions (challenge_id, user_id, details) VALUES ($1, $2, $3) RETURNING completion_id",
                &[&challenge_id, &user_id, &details],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(row.get(0))
    }

    /// Delete every completion referencing a challenge. Returns the number
    /// of rows removed.
    pub async fn delete_completions_for_challenge(
        &self,
        challenge_id: i32,
    ) -> Result<u64, ApiError> {
        let client = self.get_connection().await?;

        let deleted = client
            .execute(
                "DELETE FROM user_completions WHERE challenge_id = $1",
                &[&challenge_id],
            )
            .await
            .map_err(ApiError::from)?;

        Ok(deleted)
    }

    pub async fn list_attempts(
        &self,
        challenge_id: i32,
    ) -> Result<Vec<CompletionAttempt>, ApiError> {
        let client = self.get_connection().await?;

        let rows = client
            .query(
                "SELECT user_id, details FROM user_completions WHERE challenge_id = $1",
                &[&challenge_id],
            )
            .await
            .map_err(ApiError::from)?;

        let attempts = rows
            .iter()
            .map(|row| CompletionAttempt {
                user_id: row.get(0),
                details: row.get(1),
            })
            .collect();

        Ok(attempts)
    }
}
