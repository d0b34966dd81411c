//! Server configuration loaded from the environment.
//!
//! Environment variables:
//! - `DATABASE_URL` — PostgreSQL connection URI (required).
//! - `TOKEN_SECRET` — token signing secret; debug builds (or
//!   `TOKEN_ALLOW_DEV_SECRET=1`) fall back to an ephemeral dev secret,
//!   release builds refuse to start without one.
//! - `TOKEN_TTL_HOURS` — token expiry window, default 24.
//! - `PORT` — listening port, default 8000.
//! - `COOKIE_SECURE` — set to `0` to drop the cookie `Secure` attribute
//!   outside production.

use std::env;
use std::net::SocketAddr;

use tracing::warn;

use crate::outbound::persistence::DbPool;

const DEFAULT_PORT: u16 = 8000;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: Vec<u8>,
    pub(crate) token_ttl_hours: i64,
    pub(crate) cookie_secure: bool,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    /// Construct a configuration with explicit values and defaults for the
    /// rest (24 hour tokens, secure cookies).
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_secret: Vec<u8>, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            token_secret,
            token_ttl_hours: crate::domain::DEFAULT_TTL_HOURS,
            cookie_secure: true,
            db_pool,
        }
    }

    /// Override the token expiry window.
    #[must_use]
    pub const fn with_token_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl_hours = hours;
        self
    }

    /// Override whether cookies carry the `Secure` attribute.
    #[must_use]
    pub const fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub const fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }

    /// Build the configuration from the environment plus an already-built
    /// pool.
    ///
    /// # Errors
    /// Fails when no usable token secret is available, or when `PORT` /
    /// `TOKEN_TTL_HOURS` are set but unparseable.
    pub fn from_env(db_pool: DbPool) -> std::io::Result<Self> {
        let port = match env::var("PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| {
                std::io::Error::other(format!("PORT must be a port number, got {raw:?}"))
            })?,
            Err(_) => DEFAULT_PORT,
        };
        let bind_addr = SocketAddr::from(([0, 0, 0, 0], port));

        let token_ttl_hours = match env::var("TOKEN_TTL_HOURS") {
            Ok(raw) => raw.parse::<i64>().ok().filter(|ttl| *ttl > 0).ok_or_else(|| {
                std::io::Error::other(format!(
                    "TOKEN_TTL_HOURS must be a positive integer, got {raw:?}"
                ))
            })?,
            Err(_) => crate::domain::DEFAULT_TTL_HOURS,
        };

        let cookie_secure = env::var("COOKIE_SECURE").map(|v| v != "0").unwrap_or(true);

        Ok(Self {
            bind_addr,
            token_secret: token_secret_from_env()?,
            token_ttl_hours,
            cookie_secure,
            db_pool,
        })
    }
}

/// Read the PostgreSQL connection URI.
///
/// # Errors
/// Fails when `DATABASE_URL` is unset.
pub fn database_url_from_env() -> std::io::Result<String> {
    env::var("DATABASE_URL")
        .map_err(|_| std::io::Error::other("DATABASE_URL must be set to a PostgreSQL URI"))
}

fn token_secret_from_env() -> std::io::Result<Vec<u8>> {
    match env::var("TOKEN_SECRET") {
        Ok(secret) if !secret.trim().is_empty() => Ok(secret.into_bytes()),
        _ => {
            let allow_dev = env::var("TOKEN_ALLOW_DEV_SECRET").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_dev {
                warn!("TOKEN_SECRET unset, using ephemeral dev secret (dev only)");
                Ok(b"dev_secret_123".to_vec())
            } else {
                Err(std::io::Error::other(
                    "TOKEN_SECRET must be set in release builds",
                ))
            }
        }
    }
}
