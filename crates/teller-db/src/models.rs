//! Database models

use crate::utils::parse_datetime_or_now;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;
use std::fmt;
use std::str::FromStr;

/// Error type for parsing models from strings
#[derive(Debug, Clone)]
pub enum ParseError {
    InvalidAccountRole(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::InvalidAccountRole(s) => write!(f, "Invalid account role: {}", s),
        }
    }
}

impl std::error::Error for ParseError {}

/// Account role
///
/// `customer` is the only role the service issues; the column CHECK
/// constraint enforces the same at the storage layer.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccountRole {
    Customer,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Customer => "customer",
        }
    }
}

impl FromStr for AccountRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "customer" => Ok(AccountRole::Customer),
            _ => Err(ParseError::InvalidAccountRole(s.to_string())),
        }
    }
}

/// Account model
///
/// `uid` is the client-assigned external identifier; `username` is the
/// principal identity carried in session tokens. Both are immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub uid: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub balance: i64,
    pub email: String,
    pub phone: String,
    pub role: AccountRole,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<&SqliteRow> for Account {
    type Error = ParseError;

    fn try_from(row: &SqliteRow) -> Result<Self, Self::Error> {
        let role: String = row.get("role");
        Ok(Account {
            uid: row.get("uid"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            balance: row.get("balance"),
            email: row.get("email"),
            phone: row.get("phone"),
            role: role.parse()?,
            created_at: parse_datetime_or_now(row.get("created_at")),
        })
    }
}

/// New account (for insertion)
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub uid: String,
    pub username: String,
    pub password_hash: String,
    pub balance: i64,
    pub email: String,
    pub phone: String,
    pub role: AccountRole,
}

/// Audit record of an issued session token
///
/// Write-only bookkeeping: rows are inserted at login and swept after
/// expiry, but token verification never reads them back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionToken {
    pub tid: i64,
    pub token: String,
    pub uid: String,
    pub expiry: DateTime<Utc>,
}

/// New session token audit record (for insertion)
#[derive(Debug, Clone)]
pub struct NewSessionToken {
    pub token: String,
    pub uid: String,
    pub expiry: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn account_role_round_trip() {
        assert_eq!("customer".parse::<AccountRole>().unwrap(), AccountRole::Customer);
        assert_eq!(AccountRole::Customer.as_str(), "customer");
    }

    #[test]
    fn account_role_rejects_unknown_values() {
        assert!("admin".parse::<AccountRole>().is_err());
        assert!("".parse::<AccountRole>().is_err());
    }
}
