//! Balance query route

use axum::{Json, Router, extract::State, routing::get};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireSession;
use super::types::BalanceResponse;

/// GET /balance
///
/// Keyed by the identity the verified session carries; raw tokens never
/// reach this handler.
async fn balance(
    RequireSession(claims): RequireSession,
    State(state): State<AppState>,
) -> Result<Json<BalanceResponse>, ApiError> {
    let balance = state
        .db
        .get_balance_by_username(&claims.sub)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    Ok(Json(BalanceResponse { balance }))
}

/// Create balance routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/balance", get(balance))
}
