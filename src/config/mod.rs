//! Configuration loading from the process environment

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};

/// Runtime configuration for the payables server
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string; absent means the in-memory backend
    pub database_url: Option<String>,
    /// Allowed cross-origin request sources; empty means any origin
    pub allowed_origins: Vec<String>,
    /// Listen address for the HTTP server
    pub bind_addr: String,
}

impl AppConfig {
    /// Load configuration from the environment.
    ///
    /// Reads `DATABASE_URL`, `ALLOWED_ORIGINS` (comma-separated) and
    /// `BIND_ADDR` (default `127.0.0.1:3000`). Unset and empty values mean
    /// "not configured".
    pub fn from_env() -> Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|url| !url.is_empty());

        let allowed_origins = std::env::var("ALLOWED_ORIGINS")
            .map(|raw| parse_origin_list(&raw))
            .unwrap_or_default();

        let bind_addr =
            std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());

        Ok(Self {
            database_url,
            allowed_origins,
            bind_addr,
        })
    }

    /// Build the CORS layer from the configured origin list.
    ///
    /// Configured origins get credential support with methods and headers
    /// mirrored from the request. With no origins configured the layer falls
    /// back to allowing any origin (without credentials).
    pub fn cors_layer(&self) -> Result<CorsLayer> {
        if self.allowed_origins.is_empty() {
            return Ok(CorsLayer::permissive());
        }

        let origins = self
            .allowed_origins
            .iter()
            .map(|origin| {
                origin
                    .parse::<HeaderValue>()
                    .with_context(|| format!("invalid origin in ALLOWED_ORIGINS: '{}'", origin))
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(AllowMethods::mirror_request())
            .allow_headers(AllowHeaders::mirror_request())
            .allow_credentials(true))
    }
}

fn parse_origin_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_string)
        .collect()
}
