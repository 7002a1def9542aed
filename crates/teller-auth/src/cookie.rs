//! Credential carrier: the session cookie
//!
//! The token travels in a single well-known cookie. Its security
//! attributes depend on whether the frontend is served from the same
//! origin as the API, which is a deployment decision resolved once at
//! startup via [`CookiePolicy`].

/// Name of the session cookie
pub const AUTH_COOKIE: &str = "auth_token";

/// Cookie security policy for the deployment topology
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CookiePolicy {
    /// Frontend and API share an origin: `SameSite=Lax`
    #[default]
    SameOrigin,
    /// Frontend on another origin: `SameSite=None; Secure`
    CrossOrigin,
}

impl CookiePolicy {
    /// Parse a policy from its configuration spelling
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "same-origin" => Some(CookiePolicy::SameOrigin),
            "cross-origin" => Some(CookiePolicy::CrossOrigin),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CookiePolicy::SameOrigin => "same-origin",
            CookiePolicy::CrossOrigin => "cross-origin",
        }
    }
}

/// Build the `Set-Cookie` value carrying a session token
///
/// Always `HttpOnly` with a max-age matching the token TTL; `SameSite`
/// and `Secure` come from the policy.
pub fn build_auth_cookie(token: &str, max_age_secs: i64, policy: CookiePolicy) -> String {
    match policy {
        CookiePolicy::SameOrigin => format!(
            "{}={}; HttpOnly; Max-Age={}; Path=/; SameSite=Lax",
            AUTH_COOKIE, token, max_age_secs
        ),
        CookiePolicy::CrossOrigin => format!(
            "{}={}; HttpOnly; Max-Age={}; Path=/; SameSite=None; Secure",
            AUTH_COOKIE, token, max_age_secs
        ),
    }
}

/// Extract the session token from a `Cookie` header value
pub fn extract_auth_cookie(header: &str) -> Option<&str> {
    header
        .split(';')
        .map(str::trim)
        .find_map(|pair| pair.strip_prefix(AUTH_COOKIE)?.strip_prefix('='))
}
