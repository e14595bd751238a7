//! fitlog server binary.
//!
//! # Configuration
//!
//! `~/.config/fitlog/config.yaml` plus environment overrides:
//! - `FITLOG_PORT`: port to listen on (default: 7700)
//! - `FITLOG_DATABASE_PATH`: SQLite database location
//! - `FITLOG_JWT_SECRET`: secret for signing session tokens
//! - `FITLOG_COOKIE_SECURE`: mark the session cookie `Secure`

use std::net::SocketAddr;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fitlog::config::Config;
use fitlog::db::init_db;
use fitlog::server::{self, tokens::SessionKeys, AppState};

/// Fallback signing secret for local development only.
const DEV_JWT_SECRET: &str = "fitlog-dev-secret";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fitlog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match Config::load(None) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Database: {}", config.database_path.display());

    let pool = match init_db(&config.database_path).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!("Failed to initialize database: {}", e);
            std::process::exit(1);
        }
    };

    let secret = config.jwt_secret.clone().unwrap_or_else(|| {
        tracing::warn!("No jwt_secret configured, using an insecure development secret");
        DEV_JWT_SECRET.to_string()
    });

    let state = AppState::new(pool, SessionKeys::new(&secret), config.cookie_secure);
    let app = server::router(state).layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
