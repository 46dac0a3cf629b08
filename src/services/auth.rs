//! Authentication service implementation
//!
//! This service handles password hashing with Argon2 and the bearer tokens
//! issued at signup and login. Tokens are HS256 JWTs carrying the user id and
//! email.

use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::settings::AuthConfig;
use crate::utils::errors::{MadSocialError, Result};

/// Claims carried by every bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: Uuid,
    pub email: String,
    pub iat: i64,
    pub exp: i64,
}

/// Authenticated identity resolved from a token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthContext {
    fn from(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

#[derive(Clone)]
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl: Duration::hours(config.token_ttl_hours),
        }
    }

    /// Hash a plaintext password into a PHC string
    pub fn hash_password(&self, password: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| MadSocialError::PasswordHash(e.to_string()))?;

        Ok(hash.to_string())
    }

    /// Check a plaintext password against a stored hash
    ///
    /// A malformed stored hash is an internal error, a mismatch is `false`.
    pub fn verify_password(&self, password: &str, password_hash: &str) -> Result<bool> {
        let parsed = PasswordHash::new(password_hash)
            .map_err(|e| MadSocialError::PasswordHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Issue a bearer token for a user
    pub fn issue_token(&self, user_id: Uuid, email: &str) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        debug!(user_id = %user_id, exp = claims.exp, "Issuing token");
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Verify a bearer token and resolve the acting user
    pub fn verify_token(&self, token: &str) -> Result<AuthContext> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map_err(|e| {
                warn!(error = %e, "Rejected bearer token");
                MadSocialError::Authentication("Invalid or expired token".to_string())
            })?;

        Ok(data.claims.into())
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("token_ttl", &self.token_ttl)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn service() -> AuthService {
        AuthService::new(&AuthConfig {
            jwt_secret: "test-secret-with-enough-length".to_string(),
            token_ttl_hours: 1,
        })
    }

    #[test]
    fn test_password_roundtrip() {
        let auth = service();
        let hash = auth.hash_password("hunter22").unwrap();

        assert_ne!(hash, "hunter22");
        assert!(auth.verify_password("hunter22", &hash).unwrap());
        assert!(!auth.verify_password("hunter23", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let auth = service();
        assert_ne!(auth.hash_password("same").unwrap(), auth.hash_password("same").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_internal_error() {
        assert_matches!(
            service().verify_password("x", "not-a-phc-string"),
            Err(MadSocialError::PasswordHash(_))
        );
    }

    #[test]
    fn test_token_carries_identity() {
        let auth = service();
        let user_id = Uuid::new_v4();
        let token = auth.issue_token(user_id, "bucky@wisc.edu").unwrap();

        let context = auth.verify_token(&token).unwrap();
        assert_eq!(context.user_id, user_id);
        assert_eq!(context.email, "bucky@wisc.edu");
    }

    #[test]
    fn test_token_from_other_secret_rejected() {
        let other = AuthService::new(&AuthConfig {
            jwt_secret: "a-completely-different-secret".to_string(),
            token_ttl_hours: 1,
        });
        let token = other.issue_token(Uuid::new_v4(), "a@b.edu").unwrap();

        assert_matches!(service().verify_token(&token), Err(MadSocialError::Authentication(_)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let auth = service();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            email: "old@wisc.edu".to_string(),
            iat: (now - Duration::hours(3)).timestamp(),
            exp: (now - Duration::hours(2)).timestamp(),
        };
        let token = encode(&Header::default(), &claims, &auth.encoding_key).unwrap();

        assert_matches!(auth.verify_token(&token), Err(MadSocialError::Authentication(_)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert_matches!(service().verify_token("abc.def.ghi"), Err(MadSocialError::Authentication(_)));
    }
}
