use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;

/// Default session lifetime in hours.
pub const DEFAULT_TOKEN_LIFETIME_HOURS: i64 = 24;

/// Upper bound on the session lifetime (one year).
pub const MAX_TOKEN_LIFETIME_HOURS: i64 = 24 * 366;

/// Issues and validates stateless session tokens.
///
/// The signing key is fixed at construction and never mutated, so a single
/// issuer can be shared across tasks behind an `Arc`.
pub struct TokenIssuer {
    jwt_handler: JwtHandler,
    lifetime: Duration,
}

/// A freshly issued session token together with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionToken {
    pub token: String,
    pub claims: Claims,
}

impl TokenIssuer {
    /// Create an issuer with the default 24 hour lifetime.
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is empty
    pub fn new(secret: &[u8]) -> Result<Self, JwtError> {
        Self::with_lifetime(secret, Duration::hours(DEFAULT_TOKEN_LIFETIME_HOURS))
    }

    /// Create an issuer with an explicit token lifetime.
    ///
    /// # Errors
    /// * `InvalidKey` - Secret is empty
    /// * `InvalidLifetime` - Lifetime is not positive or exceeds `MAX_TOKEN_LIFETIME_HOURS`
    pub fn with_lifetime(secret: &[u8], lifetime: Duration) -> Result<Self, JwtError> {
        if lifetime <= Duration::zero() || lifetime > Duration::hours(MAX_TOKEN_LIFETIME_HOURS)
        {
            return Err(JwtError::InvalidLifetime(lifetime.num_seconds()));
        }

        Ok(Self {
            jwt_handler: JwtHandler::new(secret)?,
            lifetime,
        })
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Issue a token for `subject`, valid from now for the configured lifetime.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Expiration is not representable
    /// * `EncodingFailed` - Signing failed
    pub fn issue(&self, subject: &str) -> Result<SessionToken, JwtError> {
        self.issue_at(subject, Utc::now())
    }

    /// Issue a token for `subject` as if issued at `issued_at`.
    pub fn issue_at(
        &self,
        subject: &str,
        issued_at: DateTime<Utc>,
    ) -> Result<SessionToken, JwtError> {
        let claims = Claims::new(subject, issued_at, self.lifetime)?;
        let token = self.jwt_handler.encode(&claims)?;

        Ok(SessionToken { token, claims })
    }

    /// Validate a token against the current clock.
    ///
    /// # Errors
    /// * `TokenExpired` - Current time is at or past `exp`
    /// * `InvalidToken` - Signature does not verify
    /// * `DecodingFailed` - Token is malformed
    pub fn validate(&self, token: &str) -> Result<Claims, JwtError> {
        self.validate_at(token, Utc::now())
    }

    /// Validate a token as of `now`.
    ///
    /// Valid iff the signature verifies and `now` is strictly before `exp`.
    pub fn validate_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, JwtError> {
        let claims: Claims = self.jwt_handler.decode(token)?;

        if claims.is_expired(now.timestamp()) {
            return Err(JwtError::TokenExpired);
        }

        Ok(claims)
    }
}
