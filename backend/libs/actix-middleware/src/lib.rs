//! # Actix Middleware Library
//!
//! Middleware shared by the blog HTTP services
//!
//! ## Modules
//! - `jwt_auth`: bearer token authentication and the `UserId` extractor
//! - `metrics`: Prometheus request metrics keyed by route pattern

pub mod jwt_auth;
pub mod metrics;

pub use jwt_auth::{JwtAuthMiddleware, UserId};
pub use metrics::MetricsMiddleware;
