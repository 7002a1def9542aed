//! Request and response types for the account routes

use serde::{Deserialize, Serialize};

/// Registration request body
///
/// Every field is optional at the deserialization layer so that presence
/// checks happen in the handler, before any storage access, with the
/// documented error message.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub uid: Option<String>,
    #[serde(default)]
    pub uname: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request body
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub uname: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

/// Generic message response
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Balance response
#[derive(Debug, Serialize)]
pub struct BalanceResponse {
    pub balance: i64,
}

/// Treat a field as present only when it holds a non-empty value
pub(super) fn presence(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}
