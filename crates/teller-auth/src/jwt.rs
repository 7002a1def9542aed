//! JWT session token management

use chrono::{DateTime, Duration, SubsecRound, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// JWT claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (account username)
    pub sub: String,
    /// Account role
    pub role: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
}

/// JWT manager for session token issuance and validation
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl_secs: i64,
}

impl JwtManager {
    /// Create a new JWT manager
    pub fn new(secret: &str, token_ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            token_ttl_secs,
        }
    }

    /// Token lifetime in seconds, as configured at startup
    pub fn token_ttl_secs(&self) -> i64 {
        self.token_ttl_secs
    }

    /// Issue a session token bound to a username and role
    ///
    /// Returns the signed token together with its expiry so callers can
    /// duplicate the exact same instant into the audit record.
    pub fn issue_token(
        &self,
        username: &str,
        role: &str,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        // exp claims carry whole seconds; truncate so the returned expiry
        // matches the embedded one exactly
        let expires_at = (now + Duration::seconds(self.token_ttl_secs)).trunc_subsecs(0);

        let claims = Claims {
            sub: username.to_string(),
            role: role.to_string(),
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        debug!("Issuing session token for {}", username);

        let token = encode(&Header::default(), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    /// Validate a session token and return its claims
    ///
    /// Validity is self-contained: signature plus embedded expiry, nothing
    /// else. An expired token fails with [`AuthError::TokenExpired`] so
    /// callers can log the reason while returning a generic message.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                    _ => AuthError::Jwt(e),
                }
            })?;

        // Default validation allows leeway around exp; the contract here is
        // strict rejection at or past the embedded expiry
        let now = Utc::now().timestamp();
        if now >= token_data.claims.exp {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}
