//! Account registration routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::post,
};
use teller_auth::hash_password;
use teller_db::{AccountRole, NewAccount};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{MessageResponse, RegisterRequest, presence};

/// POST /register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let (Some(uid), Some(uname), Some(password), Some(email), Some(phone)) = (
        presence(&request.uid),
        presence(&request.uname),
        presence(&request.password),
        presence(&request.email),
        presence(&request.phone),
    ) else {
        return Err(ApiError::BadRequest(
            "uid, uname, password, email and phone are required".to_string(),
        ));
    };

    // The request may hint a role, but only the one the service issues
    if let Some(role) = presence(&request.role) {
        if role != AccountRole::Customer.as_str() {
            return Err(ApiError::BadRequest(
                "Only role customer is allowed".to_string(),
            ));
        }
    }

    debug!("Registering account: {}", uname);

    let password_hash = hash_password(password)?;

    let account = state
        .db
        .insert_account(NewAccount {
            uid: uid.to_string(),
            username: uname.to_string(),
            password_hash,
            balance: state.initial_balance,
            email: email.to_string(),
            phone: phone.to_string(),
            role: AccountRole::Customer,
        })
        .await?;

    info!("Registered account: {}", account.username);

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: "Registered successfully".to_string(),
        }),
    ))
}

/// Create registration routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/register", post(register))
}
