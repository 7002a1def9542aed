//! Database repository implementation

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbError;

// Submodules
mod accounts;
mod tokens;

/// Database connection and operations
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Create a new database connection
    pub async fn new(database_url: &str) -> Result<Self, DbError> {
        info!("Connecting to database: {}", database_url);

        let pool = SqlitePool::connect(database_url).await?;
        let db = Self { pool };
        db.run_migrations().await?;
        Ok(db)
    }

    /// Get the underlying pool for advanced usage
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    async fn run_migrations(&self) -> Result<(), DbError> {
        info!("Running database migrations");

        self.create_schema()
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;

        info!("Database migrations completed");
        Ok(())
    }

    async fn create_schema(&self) -> Result<(), sqlx::Error> {
        // The unique constraints on uid and username are the authoritative
        // duplicate-registration guard; application-level checks are a fast
        // path in front of them.
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS accounts (
                uid TEXT PRIMARY KEY,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL,
                password_hash TEXT NOT NULL,
                balance INTEGER NOT NULL,
                phone TEXT NOT NULL,
                role TEXT NOT NULL CHECK (role = 'customer'),
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS session_tokens (
                tid INTEGER PRIMARY KEY AUTOINCREMENT,
                token TEXT NOT NULL,
                uid TEXT NOT NULL REFERENCES accounts(uid) ON DELETE CASCADE,
                expiry TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_session_tokens_uid ON session_tokens(uid)
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE INDEX IF NOT EXISTS idx_session_tokens_expiry ON session_tokens(expiry)
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
