//! Authentication and authorization module.
//!
//! This module implements:
//! - Argon2id password hashing with server-side pepper
//! - Stateless JWT access tokens (1-hour expiry, no refresh, no revocation)
//! - A declarative capability map from operation to required role set
//!
//! A request's credential is decoded into a [`Principal`] (username + role)
//! by a pure function of the token bytes; the principal is threaded
//! explicitly through call parameters rather than ambient context.

pub mod capabilities;
pub mod errors;
pub mod manager;
pub mod models;
pub mod tokens;

pub use capabilities::{Access, AccessDenied, Operation, authorize};
pub use errors::{AuthError, AuthResult};
pub use manager::AuthManager;
pub use models::{
    AccessTokenClaims, LoginRequest, LoginResponse, Principal, RegisterRequest, Role, User, UserId,
};
pub use tokens::TokenCodec;
