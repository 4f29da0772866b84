//! Server configuration for the waitlist.
//!
//! Loads configuration from environment variables with sensible defaults.
//! All settings can be overridden via `DROPSET_*` environment variables.
//! The rate-limit policy is fixed in `dropset-core` and is not configurable
//! here.

use std::net::SocketAddr;
use std::time::Duration;

use axum::http::HeaderValue;

/// Default port when neither `DROPSET_BIND_ADDR` nor `PORT` is set.
const DEFAULT_PORT: u16 = 3000;

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind the HTTP listener to.
    pub bind_addr: SocketAddr,
    /// Log level filter (e.g., `info`, `debug`, `warn`).
    pub log_level: String,
    /// Browser origin allowed to call the API. `None` allows any origin.
    pub cors_origin: Option<HeaderValue>,
    /// How long to wait for in-flight requests after a shutdown signal.
    pub shutdown_grace: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            log_level: "info".to_owned(),
            cors_origin: None,
            shutdown_grace: Duration::from_secs(10),
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `PORT` — port to bind on (platform convention, binds to `0.0.0.0`)
    /// - `DROPSET_BIND_ADDR` — full bind address (overrides `PORT`, default: `127.0.0.1:3000`)
    /// - `DROPSET_LOG_LEVEL` — log filter (default: `info`)
    /// - `DROPSET_CORS_ORIGIN` — allowed origin, e.g. `https://dropset.app` (default: any)
    /// - `DROPSET_SHUTDOWN_GRACE_SECS` — drain timeout on shutdown (default: `10`)
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    ///
    /// Unparseable values fall back to their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        // Priority: DROPSET_BIND_ADDR > PORT > default 127.0.0.1:3000
        let bind_addr = if let Some(addr) = lookup("DROPSET_BIND_ADDR") {
            addr.parse().unwrap_or(defaults.bind_addr)
        } else if let Some(port_str) = lookup("PORT") {
            let port: u16 = port_str.parse().unwrap_or(DEFAULT_PORT);
            SocketAddr::from(([0, 0, 0, 0], port))
        } else {
            defaults.bind_addr
        };

        let log_level = lookup("DROPSET_LOG_LEVEL").unwrap_or(defaults.log_level);

        let cors_origin = lookup("DROPSET_CORS_ORIGIN")
            .filter(|origin| !origin.is_empty() && origin != "*")
            .and_then(|origin| origin.parse::<HeaderValue>().ok());

        let shutdown_grace = lookup("DROPSET_SHUTDOWN_GRACE_SECS")
            .and_then(|v| v.parse().ok())
            .map_or(defaults.shutdown_grace, Duration::from_secs);

        Self {
            bind_addr,
            log_level,
            cors_origin,
            shutdown_grace,
        }
    }
}
