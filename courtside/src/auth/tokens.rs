//! Stateless access token encoding and verification.
//!
//! Token validity is purely a function of signature and expiry at the moment
//! of the call. There is no refresh flow, no revocation list, and no session
//! store; the codec keeps no mutable state.

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};

use super::errors::AuthResult;
use super::models::{AccessTokenClaims, Principal, Role};

/// Signs and verifies bearer credentials.
#[derive(Clone)]
pub struct TokenCodec {
    secret: String,
    ttl: Duration,
}

impl TokenCodec {
    pub fn new(secret: String, ttl: Duration) -> Self {
        Self { secret, ttl }
    }

    /// Issue a signed access token carrying the username as subject and the
    /// account role as a claim.
    pub fn issue(&self, username: &str, role: Role) -> AuthResult<String> {
        let now = Utc::now();
        let claims = AccessTokenClaims {
            sub: username.to_string(),
            role,
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;

        Ok(token)
    }

    /// Decode a credential into the acting principal.
    ///
    /// Returns `None` for a malformed, tampered, or expired token; the guard
    /// layer treats that request as unauthenticated rather than failing it.
    pub fn verify(&self, token: &str) -> Option<Principal> {
        decode::<AccessTokenClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .ok()
        .map(|data| Principal {
            username: data.claims.sub,
            role: data.claims.role,
        })
    }
}
