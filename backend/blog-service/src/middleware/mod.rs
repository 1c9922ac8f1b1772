/// HTTP middleware and authorization for blog-service
///
/// Authentication and request metrics come from the shared
/// `actix-middleware` crate; ownership checks live in `permissions`.
pub mod permissions;

pub use actix_middleware::{JwtAuthMiddleware, MetricsMiddleware, UserId};
pub use permissions::{authorize, can_write, Operation, Owned};
