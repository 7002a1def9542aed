//! Database error types

use thiserror::Error;

use crate::models::ParseError;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[from] sqlx::Error),

    #[error("Duplicate entry: {0}")]
    Duplicate(String),

    #[error("Invalid stored record: {0}")]
    Parse(#[from] ParseError),

    #[error("Migration error: {0}")]
    Migration(String),
}
