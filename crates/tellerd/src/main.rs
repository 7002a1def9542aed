//! tellerd - minimal account service
//!
//! Users register, authenticate, and query a stored balance over HTTP.

use anyhow::{Context, Result, bail};
use axum::http::{HeaderValue, Method, header};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, Mode};
use teller_api::{AppState, create_router};
use teller_auth::{CookiePolicy, JwtManager};
use teller_db::Database;

/// Signing secret used when none is configured in development mode
const DEV_JWT_SECRET: &str = "teller-dev-signing-secret";

/// tellerd - minimal account service
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "TELLER_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "TELLER_PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let args = Args::parse();

    // Load configuration
    let config = Config::load(&args.config)?;

    // Initialize logging
    init_logging(&config.logging.level);

    info!("Starting tellerd v{}", env!("CARGO_PKG_VERSION"));

    let jwt_secret = resolve_jwt_secret(&config)?;
    let cookie_policy = CookiePolicy::parse(&config.auth.cookie_policy)
        .with_context(|| format!("Invalid cookie_policy: {}", config.auth.cookie_policy))?;

    // Create the data directory for the database file
    if let Some(parent) = Path::new(&config.database.path).parent()
        && !parent.as_os_str().is_empty()
    {
        tokio::fs::create_dir_all(parent).await?;
    }

    // Initialize database
    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_url).await?;

    // Initialize JWT manager
    let jwt = Arc::new(JwtManager::new(&jwt_secret, config.auth.token_ttl_secs));

    // Create application state
    let state = AppState::new(
        db.clone(),
        jwt,
        cookie_policy,
        config.accounts.initial_balance,
    );

    // Sweep expired token audit rows in the background
    spawn_token_sweeper(db);

    let cors = CorsLayer::new()
        .allow_origin(
            config
                .server
                .allow_origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid allow_origin: {}", config.server.allow_origin))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    // Create router
    let app = create_router(state, &config.server.path_prefix)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Determine bind address
    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    // Start server
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Resolve the token signing secret for the configured mode
///
/// Production requires an explicit secret; development warns and falls
/// back to the built-in one.
fn resolve_jwt_secret(config: &Config) -> Result<String> {
    match &config.auth.jwt_secret {
        Some(secret) if !secret.is_empty() => Ok(secret.clone()),
        _ => {
            if config.mode == Mode::Production {
                bail!("auth.jwt_secret must be set when mode = \"production\"");
            }
            warn!("auth.jwt_secret not set; using the built-in development secret");
            Ok(DEV_JWT_SECRET.to_string())
        }
    }
}

/// Periodically delete expired token audit rows
///
/// Storage hygiene only: failures are logged and never affect requests,
/// and token verification does not read this table.
fn spawn_token_sweeper(db: Database) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(3600));
        loop {
            interval.tick().await;
            match db.delete_expired_session_tokens().await {
                Ok(0) => {}
                Ok(n) => info!("Swept {} expired session tokens", n),
                Err(err) => warn!("Session token sweep failed: {}", err),
            }
        }
    });
}

/// Initialize logging
fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install CTRL+C handler");
    info!("Shutdown signal received");
}
