//! # Blog Service
//!
//! REST backend for posts, groups and comments with token authentication.
//!
//! ## Routes (under `/api/v1`)
//!
//! - `POST /api-token-auth/` exchanges credentials for a bearer token
//! - `/posts/`, `/posts/{id}/` for posts
//! - `/posts/{post_id}/comments/`, `/posts/{post_id}/comments/{id}/` for comments
//! - `/groups/`, `/groups/{id}/` (read-only)
//!
//! Only an entity's author may update or delete it.

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod services;

pub use config::Config;
pub use db::{EntityStore, InMemoryStore, PgStore, SharedStore};
pub use error::{AppError, Result};

use actix_web::web;

/// Request-independent API settings
#[derive(Debug, Clone, Copy)]
pub struct ApiSettings {
    /// Lifetime of issued access tokens
    pub token_ttl: chrono::Duration,
    /// Largest accepted `limit` for post listings
    pub max_page_size: i64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            token_ttl: chrono::Duration::hours(24),
            max_page_size: 100,
        }
    }
}

impl From<&config::ApiConfig> for ApiSettings {
    fn from(config: &config::ApiConfig) -> Self {
        Self {
            token_ttl: chrono::Duration::hours(config.token_ttl_hours),
            max_page_size: config.max_page_size,
        }
    }
}

/// Shared state handed to every handler
pub struct AppState {
    pub store: SharedStore,
    pub settings: ApiSettings,
}

impl AppState {
    pub fn new(store: SharedStore, settings: ApiSettings) -> Self {
        Self { store, settings }
    }
}

/// Mount health checks, metrics and the versioned API.
///
/// Used by the server and by the integration tests so both see the same
/// routing table.
pub fn configure_app(cfg: &mut web::ServiceConfig) {
    cfg.configure(handlers::health::configure)
        .route("/metrics", web::get().to(metrics::serve_metrics))
        .service(web::scope("/api/v1").configure(handlers::configure));
}
