//! Session token audit operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewSessionToken, SessionToken};
use crate::repository::Database;

impl Database {
    /// Record an issued session token
    ///
    /// Pure audit bookkeeping: token verification is self-contained in the
    /// signed token and never consults this table.
    pub async fn insert_session_token(
        &self,
        token: NewSessionToken,
    ) -> Result<SessionToken, DbError> {
        let result = sqlx::query(
            r#"
            INSERT INTO session_tokens (token, uid, expiry)
            VALUES (?, ?, ?)
            RETURNING tid
            "#,
        )
        .bind(&token.token)
        .bind(&token.uid)
        .bind(token.expiry.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let tid: i64 = result.get("tid");

        Ok(SessionToken {
            tid,
            token: token.token,
            uid: token.uid,
            expiry: token.expiry,
        })
    }

    /// Delete audit rows whose expiry has passed
    pub async fn delete_expired_session_tokens(&self) -> Result<u64, DbError> {
        let now = Utc::now();
        let result = sqlx::query("DELETE FROM session_tokens WHERE expiry < ?")
            .bind(now.to_rfc3339())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
