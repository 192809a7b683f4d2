use async_trait::async_trait;
use auth::Claims;
use auth::SessionToken;

use crate::account::errors::AccountError;
use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AccountProfile;
use crate::account::models::Authentication;
use crate::account::models::Credentials;
use crate::account::models::Identifier;
use crate::account::models::NewAccount;
use crate::account::models::RegisterCommand;
use crate::account::models::Registration;

/// Port for account domain service operations.
#[async_trait]
pub trait AccountServicePort: Send + Sync + 'static {
    /// Register a new account.
    ///
    /// # Arguments
    /// * `command` - Identifier, plaintext password, optional display name and privilege
    ///
    /// # Returns
    /// Assigned account identity, plus a session token when enabled
    ///
    /// # Errors
    /// * `Validation` - Identifier or password rejected by policy
    /// * `Conflict` - Identifier is already registered
    /// * `Internal` - Hashing, signing or storage failed
    async fn register(&self, command: RegisterCommand) -> Result<Registration, AccountError>;

    /// Authenticate a login attempt.
    ///
    /// # Errors
    /// * `Unauthorized` - Unknown identifier or wrong password, indistinguishably
    /// * `Internal` - Verification, signing or storage failed
    async fn login(&self, credentials: Credentials) -> Result<Authentication, AccountError>;

    /// Issue a session token for `identifier`.
    ///
    /// Does not check that an account with this identifier exists; callers
    /// must have authenticated the subject already.
    ///
    /// # Errors
    /// * `Internal` - Signing failed
    async fn issue_token(&self, identifier: &str) -> Result<SessionToken, AccountError>;

    /// Validate a session token and return its claims.
    ///
    /// # Errors
    /// * `Unauthorized` - Bad signature, malformed or expired token
    async fn validate_token(&self, token: &str) -> Result<Claims, AccountError>;

    /// List all accounts without their digests.
    ///
    /// # Errors
    /// * `Internal` - Storage failed
    async fn list_accounts(&self) -> Result<Vec<AccountProfile>, AccountError>;
}

/// Persistence operations for account records.
///
/// Implementations must enforce identifier uniqueness themselves; the
/// service's existence pre-check is advisory only.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Check whether an account with this identifier exists.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn exists_by_identifier(&self, identifier: &Identifier) -> Result<bool, StoreError>;

    /// Persist a new account.
    ///
    /// # Returns
    /// Store-assigned account ID
    ///
    /// # Errors
    /// * `Conflict` - Identifier already taken (including a lost insert race)
    /// * `Database` - Storage operation failed
    async fn insert(&self, account: NewAccount) -> Result<AccountId, StoreError>;

    /// Retrieve an account with its digest.
    ///
    /// # Errors
    /// * `NotFound` - No account with this identifier
    /// * `Database` - Storage operation failed
    async fn fetch_by_identifier(&self, identifier: &Identifier) -> Result<Account, StoreError>;

    /// Retrieve all accounts ordered by ID.
    ///
    /// # Errors
    /// * `Database` - Storage operation failed
    async fn list(&self) -> Result<Vec<AccountProfile>, StoreError>;
}
