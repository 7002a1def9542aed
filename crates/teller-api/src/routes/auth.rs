//! Login route and session extractor

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{
        HeaderValue,
        header::{COOKIE, SET_COOKIE},
        request::Parts,
    },
    response::{IntoResponse, Response},
    routing::post,
};
use teller_auth::{AuthError, Claims, build_auth_cookie, extract_auth_cookie, verify_password};
use teller_db::NewSessionToken;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginRequest, MessageResponse, presence};

// ==================== Session Extractor ====================

/// Extractor for a verified session (required)
///
/// Reads the session cookie and validates the token it carries. A missing
/// cookie and an invalid token are distinct failures so the error layer
/// can answer with different messages.
pub struct RequireSession(pub Claims);

impl<S> FromRequestParts<S> for RequireSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token = parts
            .headers
            .get(COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(extract_auth_cookie)
            .ok_or(ApiError::Auth(AuthError::MissingToken))?;

        let claims = app_state.jwt.validate_token(token)?;

        debug!("Authenticated session for {}", claims.sub);
        Ok(RequireSession(claims))
    }
}

// ==================== Login Route ====================

/// Well-formed digest verified when the login name is unknown, so both
/// failure paths do the same work and produce the same answer.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$bG9naW4tcGF0aC1lcXVhbGl6ZXI$AAECAwQFBgcICQoLDA0ODw";

/// POST /login
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Response, ApiError> {
    let (Some(uname), Some(password)) =
        (presence(&request.uname), presence(&request.password))
    else {
        return Err(ApiError::BadRequest(
            "uname and password are required".to_string(),
        ));
    };

    debug!("Login attempt for {}", uname);

    let account = state.db.get_account_by_username(uname).await?;

    let (hash_to_verify, account) = match account {
        Some(a) => (a.password_hash.clone(), Some(a)),
        None => (DUMMY_HASH.to_string(), None),
    };

    let password_ok = verify_password(password, &hash_to_verify)?;

    // One generic answer for unknown user and wrong password alike
    let account = match (account, password_ok) {
        (Some(a), true) => a,
        _ => return Err(ApiError::Unauthorized("Invalid credentials")),
    };

    // A signing failure is an internal fault, not a credential problem
    let (token, expiry) = state
        .jwt
        .issue_token(&account.username, account.role.as_str())
        .map_err(|e| ApiError::Internal(format!("Token signing failed: {}", e)))?;

    // Audit copy of the issued token. The signed token is self-contained,
    // so a failed write must not fail the login.
    if let Err(err) = state
        .db
        .insert_session_token(NewSessionToken {
            token: token.clone(),
            uid: account.uid.clone(),
            expiry,
        })
        .await
    {
        warn!("Failed to record issued token for {}: {}", account.username, err);
    }

    info!("Account {} logged in", account.username);

    let cookie = build_auth_cookie(&token, state.jwt.token_ttl_secs(), state.cookie_policy);
    let mut response = Json(MessageResponse {
        message: "Login successful".to_string(),
    })
    .into_response();
    response.headers_mut().insert(
        SET_COOKIE,
        HeaderValue::from_str(&cookie).map_err(|e| ApiError::Internal(e.to_string()))?,
    );
    Ok(response)
}

/// Create login routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/login", post(login))
}
