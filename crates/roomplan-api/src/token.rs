//! Stateless session tokens: HS256 JWTs with a fixed 24h lifetime.
//!
//! There is no server-side session table. A token stays valid until it
//! expires or the signing secret changes.

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use thiserror::Error;
use uuid::Uuid;

use roomplan_types::api::Claims;

pub const TOKEN_TTL_SECS: i64 = 24 * 60 * 60;

/// Who a verified token speaks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token signature does not match")]
    InvalidSignature,
    #[error("token has expired")]
    Expired,
    #[error("token is malformed")]
    Malformed,
    #[error("token declares an unexpected signing algorithm")]
    WrongAlgorithm,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

/// Sole owner of the signing secret.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        // Expiry is checked in `verify_at` against the caller's clock.
        validation.validate_exp = false;

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, identity: &Identity) -> Result<String, TokenError> {
        self.issue_at(identity, chrono::Utc::now().timestamp())
    }

    pub fn issue_at(&self, identity: &Identity, now: i64) -> Result<String, TokenError> {
        let claims = Claims {
            user_id: identity.user_id,
            username: identity.username.clone(),
            iat: now,
            exp: now + TOKEN_TTL_SECS,
            jti: Uuid::new_v4(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Identity, TokenError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// A token is valid up to and including its `exp` second.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Identity, TokenError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => TokenError::InvalidSignature,
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                    TokenError::WrongAlgorithm
                }
                _ => TokenError::Malformed,
            }
        })?;

        if now > data.claims.exp {
            return Err(TokenError::Expired);
        }

        Ok(Identity {
            user_id: data.claims.user_id,
            username: data.claims.username,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_790_000_000;

    fn alice() -> Identity {
        Identity {
            user_id: 7,
            username: "alice".into(),
        }
    }

    #[test]
    fn issued_token_verifies() {
        let svc = TokenService::new("test-secret");
        let token = svc.issue(&alice()).unwrap();
        assert_eq!(svc.verify(&token).unwrap(), alice());
    }

    #[test]
    fn expiry_boundary_is_24_hours() {
        let svc = TokenService::new("test-secret");
        let token = svc.issue_at(&alice(), NOW).unwrap();

        assert_eq!(svc.verify_at(&token, NOW + TOKEN_TTL_SECS).unwrap(), alice());
        assert_eq!(
            svc.verify_at(&token, NOW + TOKEN_TTL_SECS + 1),
            Err(TokenError::Expired)
        );
    }

    #[test]
    fn other_secret_fails_signature() {
        let token = TokenService::new("secret-a").issue(&alice()).unwrap();
        let res = TokenService::new("secret-b").verify(&token);
        assert_eq!(res, Err(TokenError::InvalidSignature));
    }

    #[test]
    fn other_algorithm_is_rejected() {
        let claims = Claims {
            user_id: 7,
            username: "alice".into(),
            iat: NOW,
            exp: NOW + TOKEN_TTL_SECS,
            jti: Uuid::new_v4(),
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        let res = TokenService::new("test-secret").verify_at(&token, NOW);
        assert_eq!(res, Err(TokenError::WrongAlgorithm));
    }

    #[test]
    fn garbage_is_malformed() {
        let svc = TokenService::new("test-secret");
        assert_eq!(svc.verify("not-a-jwt"), Err(TokenError::Malformed));
        assert_eq!(svc.verify(""), Err(TokenError::Malformed));
    }
}
