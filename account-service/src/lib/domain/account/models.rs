use std::fmt;

use auth::SessionToken;

use crate::account::errors::PolicyViolation;
use crate::account::policy;
use crate::account::policy::CandidateKind;

/// Store-assigned numeric account identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(pub i64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Identifier value type (username or email)
///
/// Case-sensitive. Must satisfy the username policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier(String);

impl Identifier {
    /// Create a new valid identifier.
    ///
    /// # Errors
    /// * `TooShort` - Fewer than 6 characters
    /// * `InvalidCharacters` - Contains characters outside the allowed set
    pub fn new(identifier: String) -> Result<Self, PolicyViolation> {
        policy::evaluate(&identifier, CandidateKind::Username).into_result()?;
        Ok(Self(identifier))
    }

    /// Wrap an identifier read back from storage without re-validating it.
    pub(crate) fn from_stored(identifier: String) -> Self {
        Self(identifier)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Persisted account, including its password digest.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub identifier: Identifier,
    pub password_digest: String,
    pub display_name: Option<String>,
    pub privilege: i32,
}

impl Account {
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            id: self.id,
            identifier: self.identifier.clone(),
        }
    }

    pub fn profile(&self) -> AccountProfile {
        AccountProfile {
            id: self.id,
            identifier: self.identifier.clone(),
            display_name: self.display_name.clone(),
            privilege: self.privilege,
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("identifier", &self.identifier)
            .field("password_digest", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("privilege", &self.privilege)
            .finish()
    }
}

/// Account data handed to the store for insertion.
#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub identifier: Identifier,
    pub password_digest: String,
    pub display_name: Option<String>,
    pub privilege: i32,
}

impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("identifier", &self.identifier)
            .field("password_digest", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("privilege", &self.privilege)
            .finish()
    }
}

/// Public identity returned by register and login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSummary {
    pub id: AccountId,
    pub identifier: Identifier,
}

/// Account fields safe to list; never includes the digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProfile {
    pub id: AccountId,
    pub identifier: Identifier,
    pub display_name: Option<String>,
    pub privilege: i32,
}

/// Command to register a new account.
///
/// Fields are raw; the service validates them in order.
pub struct RegisterCommand {
    pub identifier: String,
    pub password: String,
    pub display_name: Option<String>,
    pub privilege: Option<i32>,
}

impl RegisterCommand {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
            display_name: None,
            privilege: None,
        }
    }

    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn with_privilege(mut self, privilege: i32) -> Self {
        self.privilege = Some(privilege);
        self
    }
}

impl fmt::Debug for RegisterCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterCommand")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .field("display_name", &self.display_name)
            .field("privilege", &self.privilege)
            .finish()
    }
}

/// Login attempt. Lives only for the duration of the call.
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    pub fn new(identifier: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub account: AccountSummary,
    pub session: Option<SessionToken>,
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Authentication {
    pub account: AccountSummary,
    pub session: Option<SessionToken>,
}
