//! Username and password strength policy.
//!
//! Acceptance is a character-set and length gate. The score counts how many
//! of five strength dimensions a candidate satisfies (length, uppercase,
//! lowercase, digit, special character). For usernames the score is
//! feedback only; for passwords it also gates acceptance.

pub use super::errors::CandidateKind;
use super::errors::PolicyViolation;

/// Special characters accepted alongside ASCII letters and digits.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*()-_=+[]{};:'\",.<>/?\\|`~";

pub const MIN_USERNAME_LENGTH: usize = 6;
pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MAX_SCORE: u8 = 5;
pub const MIN_PASSWORD_SCORE: u8 = 3;

/// Outcome of evaluating one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub accepted: bool,
    pub score: u8,
    pub violation: Option<PolicyViolation>,
}

impl Evaluation {
    /// Human-readable verdict.
    pub fn reason(&self) -> String {
        match &self.violation {
            Some(violation) => violation.to_string(),
            None => format!("accepted with score {} of {}", self.score, MAX_SCORE),
        }
    }

    /// Score on acceptance, violation otherwise.
    pub fn into_result(self) -> Result<u8, PolicyViolation> {
        match self.violation {
            Some(violation) => Err(violation),
            None => Ok(self.score),
        }
    }
}

impl CandidateKind {
    pub fn min_length(self) -> usize {
        match self {
            CandidateKind::Username => MIN_USERNAME_LENGTH,
            CandidateKind::Password => MIN_PASSWORD_LENGTH,
        }
    }
}

/// Evaluate `candidate` as a username or password.
pub fn evaluate(candidate: &str, kind: CandidateKind) -> Evaluation {
    let length = candidate.chars().count();
    let score = score(candidate, kind);

    let violation = if length < kind.min_length() {
        Some(PolicyViolation::TooShort {
            kind,
            min: kind.min_length(),
            actual: length,
        })
    } else if !candidate.chars().all(is_allowed) {
        Some(PolicyViolation::InvalidCharacters {
            kind,
            allowed: SPECIAL_CHARACTERS,
        })
    } else if kind == CandidateKind::Password && score < MIN_PASSWORD_SCORE {
        Some(PolicyViolation::TooWeak {
            kind,
            score,
            required: MIN_PASSWORD_SCORE,
        })
    } else {
        None
    };

    Evaluation {
        accepted: violation.is_none(),
        score,
        violation,
    }
}

/// Number of strength dimensions `candidate` satisfies, in `0..=5`.
pub fn score(candidate: &str, kind: CandidateKind) -> u8 {
    let checks = [
        candidate.chars().count() >= kind.min_length(),
        candidate.chars().any(|c| c.is_ascii_uppercase()),
        candidate.chars().any(|c| c.is_ascii_lowercase()),
        candidate.chars().any(|c| c.is_ascii_digit()),
        candidate.chars().any(is_special),
    ];

    checks.iter().filter(|passed| **passed).count() as u8
}

fn is_special(c: char) -> bool {
    SPECIAL_CHARACTERS.contains(c)
}

fn is_allowed(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_special(c)
}
