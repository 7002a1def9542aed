//! Application state

use std::sync::Arc;
use teller_auth::{CookiePolicy, JwtManager};
use teller_db::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub cookie_policy: CookiePolicy,
    /// Balance granted to every new account
    pub initial_balance: i64,
}

impl AppState {
    pub fn new(
        db: Database,
        jwt: Arc<JwtManager>,
        cookie_policy: CookiePolicy,
        initial_balance: i64,
    ) -> Self {
        Self {
            db,
            jwt,
            cookie_policy,
            initial_balance,
        }
    }
}
