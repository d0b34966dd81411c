//! Signed, time-limited session tokens.
//!
//! Tokens are HS256 JWTs embedding the user's id, role, and email. Issuance
//! happens at registration and login; verification is synchronous, pure, and
//! collapses every failure mode into [`TokenError::Expired`] or
//! [`TokenError::Invalid`] so read paths can treat a bad token as "no
//! identity" rather than an error.

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::user::{Role, User, UserId};

/// Default token lifetime when the configuration does not override it.
pub const DEFAULT_TTL_HOURS: i64 = 24;

/// Failures raised when issuing or verifying a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token's expiry timestamp has passed.
    #[error("token has expired")]
    Expired,
    /// Signature, structure, or payload was invalid.
    #[error("token is invalid")]
    Invalid,
    /// The signing step itself failed.
    #[error("token could not be issued: {message}")]
    Issue {
        /// Underlying signer message.
        message: String,
    },
}

/// JWT payload carried by every issued token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user id as a UUID string.
    pub sub: String,
    /// Authorization tier at issuance time.
    pub role: Role,
    /// Email address at issuance time.
    pub email: String,
    /// Issued-at (Unix timestamp, seconds).
    pub iat: i64,
    /// Expiry (Unix timestamp, seconds).
    pub exp: i64,
}

/// Identity resolved from a verified token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    /// Stable user identifier.
    pub id: UserId,
    /// Authorization tier embedded in the token.
    pub role: Role,
    /// Email embedded in the token.
    pub email: String,
}

impl AuthenticatedUser {
    /// Whether the resolved identity holds the administrator tier.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Issues and verifies signed session tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenIssuer {
    /// Create an issuer from the shared signing secret and token lifetime.
    #[must_use]
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl,
        }
    }

    /// Issue a token for a freshly authenticated user.
    pub fn issue(&self, user: &User) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user.id().to_string(),
            role: user.role(),
            email: user.email().to_string(),
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|err| TokenError::Issue {
            message: err.to_string(),
        })
    }

    /// Verify a presented token and resolve the identity it encodes.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // No leeway: a token past its expiry fails immediately.
        validation.leeway = 0;

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|err| {
            match err.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            }
        })?;

        let id = UserId::new(&data.claims.sub).map_err(|_| TokenError::Invalid)?;
        Ok(AuthenticatedUser {
            id,
            role: data.claims.role,
            email: data.claims.email,
        })
    }
}
