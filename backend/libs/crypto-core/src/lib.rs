//! Shared cryptographic helpers for the blog backend
//!
//! - `jwt`: RS256 bearer token issuance and validation
//! - `password`: Argon2id password hashing for stored credentials

pub mod jwt;
pub mod password;

pub use password::{hash_password, verify_password, PasswordError};
