//! Account operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Account, NewAccount};
use crate::repository::Database;

/// True when the error is SQLite reporting a unique-constraint violation.
fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}

impl Database {
    /// Insert a new account
    ///
    /// The existence pre-check is an optimization only; two concurrent
    /// registrations racing past it are still rejected by the table's
    /// unique constraints, which map to [`DbError::Duplicate`] here.
    pub async fn insert_account(&self, account: NewAccount) -> Result<Account, DbError> {
        let now = Utc::now();

        if self.account_exists(&account.username, &account.uid).await? {
            return Err(DbError::Duplicate(format!(
                "Account with uid '{}' or username '{}' already exists",
                account.uid, account.username
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO accounts (uid, username, email, password_hash, balance, phone, role, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&account.uid)
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(account.balance)
        .bind(&account.phone)
        .bind(account.role.as_str())
        .bind(now.to_rfc3339())
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(Account {
                uid: account.uid,
                username: account.username,
                password_hash: account.password_hash,
                balance: account.balance,
                email: account.email,
                phone: account.phone,
                role: account.role,
                created_at: now,
            }),
            Err(e) if is_unique_violation(&e) => Err(DbError::Duplicate(format!(
                "Account with uid '{}' or username '{}' already exists",
                account.uid, account.username
            ))),
            Err(e) => Err(e.into()),
        }
    }

    /// Check whether an account with the given username or uid exists
    pub async fn account_exists(&self, username: &str, uid: &str) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            SELECT 1 FROM accounts WHERE username = ? OR uid = ?
            "#,
        )
        .bind(username)
        .bind(uid)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.is_some())
    }

    /// Get an account by username
    pub async fn get_account_by_username(&self, username: &str) -> Result<Option<Account>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT uid, username, email, password_hash, balance, phone, role, created_at
            FROM accounts
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Account::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get an account's balance by username
    pub async fn get_balance_by_username(&self, username: &str) -> Result<Option<i64>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT balance FROM accounts WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.map(|row| row.get("balance")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountRole;

    async fn test_db(dir: &tempfile::TempDir) -> Database {
        let url = format!("sqlite:{}?mode=rwc", dir.path().join("test.db").display());
        Database::new(&url).await.unwrap()
    }

    fn new_account(uid: &str, username: &str) -> NewAccount {
        NewAccount {
            uid: uid.to_string(),
            username: username.to_string(),
            password_hash: "opaque-digest".to_string(),
            balance: 100_000,
            email: "a@example.com".to_string(),
            phone: "123".to_string(),
            role: AccountRole::Customer,
        }
    }

    #[tokio::test]
    async fn insert_and_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir).await;

        let created = db.insert_account(new_account("u1", "alice")).await.unwrap();
        assert_eq!(created.balance, 100_000);

        let fetched = db.get_account_by_username("alice").await.unwrap().unwrap();
        assert_eq!(fetched.uid, "u1");
        assert_eq!(fetched.username, "alice");
        assert_eq!(fetched.role, AccountRole::Customer);
        assert_eq!(fetched.password_hash, "opaque-digest");

        assert!(db.get_account_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_uid_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir).await;

        db.insert_account(new_account("u1", "alice")).await.unwrap();
        let err = db.insert_account(new_account("u1", "bob")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn duplicate_username_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir).await;

        db.insert_account(new_account("u1", "alice")).await.unwrap();
        let err = db.insert_account(new_account("u2", "alice")).await.unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));
    }

    #[tokio::test]
    async fn balance_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let db = test_db(&dir).await;

        db.insert_account(new_account("u1", "alice")).await.unwrap();
        assert_eq!(db.get_balance_by_username("alice").await.unwrap(), Some(100_000));
        assert_eq!(db.get_balance_by_username("nobody").await.unwrap(), None);
    }
}
