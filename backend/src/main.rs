//! Backend entry-point: configuration from the environment, store wiring,
//! and server startup.

use std::env;

use actix_web::cookie::SameSite;
use actix_web::web;
use rand::RngCore;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use mesto_backend::inbound::http::health::HealthState;
use mesto_backend::outbound::persistence::{DbPool, PoolConfig, ensure_schema};
use mesto_backend::server::{ServerConfig, create_server};

const DEFAULT_PORT: u16 = 3000;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let secret = load_token_secret()?;

    let port = env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_PORT);

    let cookie_secure = env::var("AUTH_COOKIE_SECURE")
        .map(|v| v != "0")
        .unwrap_or(true);

    let allowed_origins: Vec<String> = env::var("CORS_ALLOWED_ORIGINS")
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|origin| !origin.is_empty())
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let mut config = ServerConfig::new(secret, ([0, 0, 0, 0], port).into())
        .with_cookie_secure(cookie_secure)
        .with_same_site(SameSite::Lax)
        .with_allowed_origins(allowed_origins);

    if let Ok(database_url) = env::var("DATABASE_URL") {
        let pool = DbPool::new(PoolConfig::new(database_url))
            .await
            .map_err(|err| std::io::Error::other(format!("database pool: {err}")))?;
        ensure_schema(&pool)
            .await
            .map_err(|err| std::io::Error::other(format!("schema bootstrap: {err}")))?;
        config = config.with_db_pool(pool);
        info!("using PostgreSQL stores");
    } else {
        warn!("DATABASE_URL not set; using in-memory stores");
    }

    info!(port, "starting server");
    let health_state = web::Data::new(HealthState::new());
    create_server(health_state, config)?.await
}

/// Read the token signing secret from `TOKEN_SECRET_FILE`.
///
/// Development runs may fall back to an ephemeral random secret; every token
/// dies with the process then, which is exactly right for local work and
/// never right for production.
fn load_token_secret() -> std::io::Result<Vec<u8>> {
    let secret_path =
        env::var("TOKEN_SECRET_FILE").unwrap_or_else(|_| "/var/run/secrets/token_secret".into());
    match std::fs::read(&secret_path) {
        Ok(bytes) => Ok(bytes),
        Err(e) => {
            let allow_dev = env::var("TOKEN_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!(path = %secret_path, error = %e, "using ephemeral token secret (dev only)");
                let mut secret = vec![0u8; 64];
                rand::thread_rng().fill_bytes(&mut secret);
                Ok(secret)
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read token secret at {secret_path}: {e}"
                )))
            }
        }
    }
}
