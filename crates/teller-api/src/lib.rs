//! Teller REST API
//!
//! This crate provides the Axum-based HTTP surface for the teller
//! account service: registration, login, and balance queries.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
