//! Connection token verification
//!
//! Clients authenticate the WebSocket upgrade with a signed token carried
//! in the query string. Verification happens before the upgrade completes,
//! so an unauthenticated client never gets a socket.

use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Token claims; `sub` is the user id the session is bound to
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("no token provided")]
    Missing,
    #[error("token expired")]
    Expired,
    #[error("invalid token: {0}")]
    Invalid(String),
}

/// HS256 verifier shared by all connections
#[derive(Clone)]
pub struct JwtAuthenticator {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl JwtAuthenticator {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    /// Verify a token and return the user id it is bound to
    pub fn verify(&self, token: &str) -> Result<String, AuthError> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default()).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Invalid(e.to_string()),
            }
        })?;
        Ok(data.claims.sub)
    }

    /// Issue a token for a user id, valid for `ttl_secs` seconds
    pub fn issue(&self, user_id: &str, ttl_secs: i64) -> Result<String, AuthError> {
        let exp = (chrono::Utc::now().timestamp() + ttl_secs) as usize;
        let claims = Claims {
            sub: user_id.to_string(),
            exp,
        };
        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| AuthError::Invalid(e.to_string()))
    }
}
