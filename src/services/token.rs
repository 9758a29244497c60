//! Session tokens
//!
//! Issues and verifies the signed, time-boxed session tokens returned at
//! registration/login. Tokens are HS256 JWTs carrying the user's id in the
//! `sub` claim; there is no refresh or rotation, an expired token simply
//! requires a new login.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;

/// Claims carried in a session token
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's id
    pub sub: i64,
    /// Issued-at timestamp (seconds since epoch)
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch)
    pub exp: i64,
}

/// Error types for token operations
#[derive(Debug, thiserror::Error)]
pub enum TokenServiceError {
    /// Token has passed its expiry window
    #[error("Token expired")]
    Expired,

    /// Token is missing, malformed, or carries a bad signature
    #[error("Invalid token")]
    Invalid,

    /// Signing failed
    #[error("Failed to issue token: {0}")]
    Issue(#[source] jsonwebtoken::errors::Error),
}

/// Issues and verifies session tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl TokenService {
    /// Create a token service from authentication configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            expiry: Duration::days(config.token_expiry_days),
        }
    }

    /// Issue a token bound to the given user id
    pub fn issue(&self, user_id: i64) -> Result<String, TokenServiceError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.expiry).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding_key).map_err(TokenServiceError::Issue)
    }

    /// Verify a token's signature and expiry and return the user id it is
    /// bound to
    pub fn verify(&self, token: &str) -> Result<i64, TokenServiceError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        let data = decode::<Claims>(token, &self.decoding_key, &validation).map_err(|e| {
            match e.kind() {
                ErrorKind::ExpiredSignature => TokenServiceError::Expired,
                _ => TokenServiceError::Invalid,
            }
        })?;

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            token_expiry_days: 7,
        }
    }

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let service = TokenService::new(&test_config());
        let token = service.issue(42).expect("Issue should succeed");
        let user_id = service.verify(&token).expect("Verify should succeed");
        assert_eq!(user_id, 42);
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let service = TokenService::new(&test_config());
        let err = service.verify("not-a-token").unwrap_err();
        assert!(matches!(err, TokenServiceError::Invalid));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let service = TokenService::new(&test_config());
        let other = TokenService::new(&AuthConfig {
            jwt_secret: "different-secret".to_string(),
            token_expiry_days: 7,
        });

        let token = other.issue(42).expect("Issue should succeed");
        let err = service.verify(&token).unwrap_err();
        assert!(matches!(err, TokenServiceError::Invalid));
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let service = TokenService::new(&test_config());

        // Sign a token whose expiry is already in the past
        let now = Utc::now();
        let claims = Claims {
            sub: 42,
            iat: (now - Duration::days(8)).timestamp(),
            exp: (now - Duration::days(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .expect("Encode should succeed");

        let err = service.verify(&token).unwrap_err();
        assert!(matches!(err, TokenServiceError::Expired));
    }
}
