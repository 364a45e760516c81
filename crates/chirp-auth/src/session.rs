//! Short-lived signed session tokens (HS256 JWTs).
//!
//! The signing secret is loaded once at startup into [`SessionKeys`] and
//! never rotated at runtime.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use chirp_types::{Error, Result};

pub const ISSUER: &str = "chirpy";
pub const DEFAULT_TTL_SECS: u64 = 360;

/// Typed claims produced by [`SessionKeys::validate`]. The subject is the
/// user ID, stringified as JWT convention requires.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn user_id(&self) -> Result<u64> {
        self.sub.parse().map_err(|_| Error::Unauthenticated)
    }
}

/// Process-wide signing material plus the validation policy (issuer and
/// expiry, no leeway).
pub struct SessionKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl SessionKeys {
    pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Reads `CHIRP_JWT_SECRET` and `CHIRP_JWT_TTL_SECS`, with development
    /// fallbacks.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("CHIRP_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
        let ttl_secs = std::env::var("CHIRP_JWT_TTL_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_TTL_SECS);
        Self::new(secret.as_bytes(), ttl_secs)
    }

    /// Issues a token asserting `user_id` for the configured window.
    pub fn issue(&self, user_id: u64) -> Result<String> {
        let now = Utc::now();
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|err| Error::Storage(format!("token signing failed: {err}")))
    }

    /// Verifies signature, issuer, and expiry. Every mismatch collapses to
    /// `Unauthenticated`.
    pub fn validate(&self, token: &str) -> Result<Claims> {
        decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims)
            .map_err(|_| Error::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> SessionKeys {
        SessionKeys::new(b"test-secret", DEFAULT_TTL_SECS)
    }

    #[test]
    fn issue_then_validate_roundtrip() {
        let keys = keys();
        let token = keys.issue(42).unwrap();

        let claims = keys.validate(&token).unwrap();
        assert_eq!(claims.iss, ISSUER);
        assert_eq!(claims.user_id().unwrap(), 42);
        assert!(claims.exp - claims.iat == DEFAULT_TTL_SECS as i64);
    }

    #[test]
    fn wrong_secret_is_unauthenticated() {
        let token = keys().issue(42).unwrap();
        let other = SessionKeys::new(b"other-secret", DEFAULT_TTL_SECS);

        let err = other.validate(&token).unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
    }

    #[test]
    fn wrong_issuer_is_unauthenticated() {
        let keys = keys();
        let now = Utc::now();
        let claims = Claims {
            iss: "someone-else".to_string(),
            sub: "42".to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::seconds(300)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = keys.validate(&token).unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let keys = keys();
        let now = Utc::now();
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: "42".to_string(),
            iat: (now - Duration::seconds(700)).timestamp(),
            exp: (now - Duration::seconds(340)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let err = keys.validate(&token).unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
    }

    #[test]
    fn mangled_token_is_unauthenticated() {
        let keys = keys();
        let mut token = keys.issue(42).unwrap();
        token.push('x');

        let err = keys.validate(&token).unwrap_err();
        assert!(matches!(err, Error::Unauthenticated));
    }

    #[test]
    fn non_numeric_subject_fails_claim_extraction() {
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: "not-a-number".to_string(),
            iat: 0,
            exp: 0,
        };
        assert!(matches!(
            claims.user_id().unwrap_err(),
            Error::Unauthenticated
        ));
    }
}
