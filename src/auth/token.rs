use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::SecurityConfig;

/// JWT claims carried by every issued token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

/// Authenticated identity derived from a verified token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: Uuid,
    pub email: String,
}

impl From<Claims> for Principal {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            email: claims.email,
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Token expired")]
    Expired,

    #[error("Invalid token: {0}")]
    Invalid(String),
}

/// HS256 signing and verification keys plus the fixed token lifetime.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    pub fn from_config(security: &SecurityConfig) -> Self {
        Self::new(security.jwt_secret.as_bytes(), security.jwt_expiry_secs)
    }

    pub fn issue(&self, principal: &Principal) -> Result<String, JwtError> {
        let now = Utc::now();
        let claims = Claims {
            sub: principal.id,
            email: principal.email.clone(),
            exp: (now + self.ttl).timestamp(),
            iat: now.timestamp(),
        };
        self.sign(&claims)
    }

    pub fn sign(&self, claims: &Claims) -> Result<String, JwtError> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding)
            .map_err(|e| JwtError::TokenGeneration(e.to_string()))
    }

    /// Verify signature and expiry. No clock leeway: a token is rejected
    /// from the second its `exp` passes.
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => JwtError::Expired,
                _ => JwtError::Invalid(e.to_string()),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Principal {
        Principal {
            id: Uuid::new_v4(),
            email: "alice@example.com".to_string(),
        }
    }

    #[test]
    fn issued_token_validates() {
        let keys = TokenKeys::new(b"test-secret", 3600);
        let principal = alice();
        let token = keys.issue(&principal).unwrap();

        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.exp - claims.iat, 3600);
        assert_eq!(Principal::from(claims), principal);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = TokenKeys::new(b"test-secret", 3600);
        let now = Utc::now().timestamp();
        let token = keys
            .sign(&Claims {
                sub: Uuid::new_v4(),
                email: "alice@example.com".to_string(),
                exp: now - 5,
                iat: now - 3605,
            })
            .unwrap();

        assert!(matches!(keys.validate(&token), Err(JwtError::Expired)));
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let ours = TokenKeys::new(b"test-secret", 3600);
        let theirs = TokenKeys::new(b"someone-else", 3600);
        let token = theirs.issue(&alice()).unwrap();

        assert!(matches!(ours.validate(&token), Err(JwtError::Invalid(_))));
        assert!(matches!(ours.validate("not.a.jwt"), Err(JwtError::Invalid(_))));
        assert!(matches!(ours.validate(""), Err(JwtError::Invalid(_))));
    }
}
