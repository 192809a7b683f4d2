use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::errors::JwtError;

/// Session token payload.
///
/// Registered RFC 7519 claims only: subject, issued-at and expiration,
/// both timestamps in Unix seconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (account identifier)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

impl Claims {
    /// Create claims for `subject` issued at `issued_at` and valid for `lifetime`.
    ///
    /// # Errors
    /// * `InvalidLifetime` - Expiration falls outside the representable time range
    pub fn new(
        subject: impl ToString,
        issued_at: DateTime<Utc>,
        lifetime: Duration,
    ) -> Result<Self, JwtError> {
        let expiration = issued_at
            .checked_add_signed(lifetime)
            .ok_or(JwtError::InvalidLifetime(lifetime.num_seconds()))?;

        Ok(Self {
            sub: subject.to_string(),
            iat: issued_at.timestamp(),
            exp: expiration.timestamp(),
        })
    }

    /// Create claims for `subject` issued now.
    pub fn for_subject(subject: impl ToString, lifetime: Duration) -> Result<Self, JwtError> {
        Self::new(subject, Utc::now(), lifetime)
    }

    /// Subject as string slice.
    pub fn subject(&self) -> &str {
        &self.sub
    }

    pub fn issued_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.iat, 0)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Check if the token is expired.
    ///
    /// A token is only valid strictly before its expiration instant.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}
