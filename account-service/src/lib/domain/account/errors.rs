use std::fmt;

use thiserror::Error;

/// What a policy check was evaluating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CandidateKind {
    Username,
    Password,
}

impl fmt::Display for CandidateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CandidateKind::Username => f.write_str("username"),
            CandidateKind::Password => f.write_str("password"),
        }
    }
}

/// User-correctable reason a username or password was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("{kind} too short: minimum {min} characters, got {actual}")]
    TooShort {
        kind: CandidateKind,
        min: usize,
        actual: usize,
    },

    #[error("{kind} contains invalid characters (only letters, digits and {allowed} allowed)")]
    InvalidCharacters {
        kind: CandidateKind,
        allowed: &'static str,
    },

    #[error("{kind} is too weak: scored {score} of 5, at least {required} required (use upper and lower case letters, digits and special characters)")]
    TooWeak {
        kind: CandidateKind,
        score: u8,
        required: u8,
    },
}

/// Failures reported by a credential store adapter.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("Identifier already exists: {0}")]
    Conflict(String),

    #[error("Account not found: {0}")]
    NotFound(String),

    #[error("Store call {operation} exceeded {timeout_ms}ms")]
    Timeout {
        operation: &'static str,
        timeout_ms: u128,
    },

    #[error("Database error: {0}")]
    Database(String),
}

/// Top-level error for account operations.
///
/// `Internal` deliberately carries no detail; the cause is logged where the
/// error is created.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AccountError {
    #[error("Validation failed: {0}")]
    Validation(#[from] PolicyViolation),

    #[error("Identifier already registered: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Internal error")]
    Internal,
}

impl AccountError {
    /// Log a collaborator fault with full detail and return the opaque error.
    pub fn internal(context: &str, cause: impl fmt::Display) -> Self {
        tracing::error!(context = context, error = %cause, "Internal failure");
        AccountError::Internal
    }
}
