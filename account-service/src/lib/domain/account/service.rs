use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use auth::Claims;
use auth::PasswordError;
use auth::PasswordHasher;
use auth::SessionToken;
use auth::TokenIssuer;

use crate::account::errors::AccountError;
use crate::account::errors::StoreError;
use crate::account::models::AccountProfile;
use crate::account::models::AccountSummary;
use crate::account::models::Authentication;
use crate::account::models::Credentials;
use crate::account::models::Identifier;
use crate::account::models::NewAccount;
use crate::account::models::RegisterCommand;
use crate::account::models::Registration;
use crate::account::policy;
use crate::account::policy::CandidateKind;
use crate::account::ports::AccountServicePort;
use crate::account::ports::CredentialStore;
use crate::config::AccountsConfig;

/// Plaintext hashed once to give unknown identifiers a digest to verify against.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

/// Per-service behaviour switches.
#[derive(Debug, Clone)]
pub struct AccountServiceOptions {
    pub issue_token_on_register: bool,
    pub issue_token_on_login: bool,
    /// Deadline applied to every credential store call.
    pub store_timeout: Duration,
}

impl Default for AccountServiceOptions {
    fn default() -> Self {
        Self {
            issue_token_on_register: true,
            issue_token_on_login: true,
            store_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&AccountsConfig> for AccountServiceOptions {
    fn from(config: &AccountsConfig) -> Self {
        Self {
            issue_token_on_register: config.issue_token_on_register,
            issue_token_on_login: config.issue_token_on_login,
            store_timeout: config.store_timeout(),
        }
    }
}

/// Domain service implementation for account operations.
///
/// Concrete implementation of AccountServicePort with dependency injection.
/// Holds no mutable state.
pub struct AccountService<S>
where
    S: CredentialStore,
{
    store: Arc<S>,
    password_hasher: PasswordHasher,
    token_issuer: Arc<TokenIssuer>,
    options: AccountServiceOptions,
    decoy_digest: String,
}

impl<S> AccountService<S>
where
    S: CredentialStore,
{
    /// Create a new account service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - Credential persistence implementation
    /// * `password_hasher` - Digest producer and verifier
    /// * `token_issuer` - Session token signer, shared read-only
    /// * `options` - Token issuance switches and store deadline
    ///
    /// Hashes the decoy password up front, so this blocks for one hash.
    pub fn new(
        store: Arc<S>,
        password_hasher: PasswordHasher,
        token_issuer: Arc<TokenIssuer>,
        options: AccountServiceOptions,
    ) -> Result<Self, PasswordError> {
        let decoy_digest = password_hasher.hash(DECOY_PASSWORD)?;

        Ok(Self {
            store,
            password_hasher,
            token_issuer,
            options,
            decoy_digest,
        })
    }

    async fn within_deadline<T, F>(&self, operation: &'static str, call: F) -> Result<T, StoreError>
    where
        F: Future<Output = Result<T, StoreError>> + Send,
        T: Send,
    {
        tokio::time::timeout(self.options.store_timeout, call)
            .await
            .map_err(|_| StoreError::Timeout {
                operation,
                timeout_ms: self.options.store_timeout.as_millis(),
            })?
    }

    async fn hash_password(&self, password: String) -> Result<String, PasswordError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))?
    }

    async fn verify_password(&self, password: String, digest: String) -> Result<bool, PasswordError> {
        let hasher = self.password_hasher.clone();

        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| PasswordError::VerificationFailed(e.to_string()))?
    }

    /// Spend the same verification work as a real login whose password is wrong.
    async fn verify_against_decoy(&self, password: String) {
        if let Err(e) = self
            .verify_password(password, self.decoy_digest.clone())
            .await
        {
            tracing::error!(error = %e, "Decoy password verification failed");
        }
    }

    fn issue_session(&self, subject: &str) -> Result<SessionToken, AccountError> {
        self.token_issuer
            .issue(subject)
            .map_err(|e| AccountError::internal("token signing", e))
    }
}

#[async_trait]
impl<S> AccountServicePort for AccountService<S>
where
    S: CredentialStore,
{
    async fn register(&self, command: RegisterCommand) -> Result<Registration, AccountError> {
        let RegisterCommand {
            identifier,
            password,
            display_name,
            privilege,
        } = command;

        let identifier = Identifier::new(identifier).map_err(|violation| {
            tracing::warn!(reason = %violation, "Registration rejected: invalid identifier");
            AccountError::Validation(violation)
        })?;

        // Advisory only; the store's uniqueness constraint is authoritative.
        let exists = self
            .within_deadline(
                "exists_by_identifier",
                self.store.exists_by_identifier(&identifier),
            )
            .await
            .map_err(|e| AccountError::internal("exists_by_identifier", e))?;

        if exists {
            tracing::warn!(identifier = %identifier, "Registration rejected: identifier taken");
            return Err(AccountError::Conflict(identifier.to_string()));
        }

        let score = policy::evaluate(&password, CandidateKind::Password)
            .into_result()
            .map_err(|violation| {
                tracing::warn!(
                    identifier = %identifier,
                    reason = %violation,
                    "Registration rejected: password policy"
                );
                AccountError::Validation(violation)
            })?;

        let password_digest = self
            .hash_password(password)
            .await
            .map_err(|e| AccountError::internal("password hashing", e))?;

        let new_account = NewAccount {
            identifier: identifier.clone(),
            password_digest,
            display_name,
            privilege: privilege.unwrap_or(0),
        };

        let id = self
            .within_deadline("insert", self.store.insert(new_account))
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    tracing::warn!(
                        identifier = %identifier,
                        "Registration rejected: identifier taken by concurrent insert"
                    );
                    AccountError::Conflict(identifier.to_string())
                }
                other => AccountError::internal("insert", other),
            })?;

        let session = if self.options.issue_token_on_register {
            Some(self.issue_session(identifier.as_str())?)
        } else {
            None
        };

        tracing::info!(
            account_id = %id,
            identifier = %identifier,
            password_score = score,
            "Account registered"
        );

        Ok(Registration {
            account: AccountSummary { id, identifier },
            session,
        })
    }

    async fn login(&self, credentials: Credentials) -> Result<Authentication, AccountError> {
        let Credentials {
            identifier,
            password,
        } = credentials;

        // Identifiers failing policy can never have been registered.
        let identifier = match Identifier::new(identifier) {
            Ok(identifier) => identifier,
            Err(_) => {
                self.verify_against_decoy(password).await;
                tracing::warn!("Login rejected: malformed identifier");
                return Err(AccountError::Unauthorized);
            }
        };

        let account = match self
            .within_deadline(
                "fetch_by_identifier",
                self.store.fetch_by_identifier(&identifier),
            )
            .await
        {
            Ok(account) => account,
            Err(StoreError::NotFound(_)) => {
                self.verify_against_decoy(password).await;
                tracing::warn!(identifier = %identifier, "Login rejected: unknown identifier");
                return Err(AccountError::Unauthorized);
            }
            Err(e) => return Err(AccountError::internal("fetch_by_identifier", e)),
        };

        let matches = self
            .verify_password(password, account.password_digest.clone())
            .await
            .map_err(|e| AccountError::internal("password verification", e))?;

        if !matches {
            tracing::warn!(identifier = %identifier, "Login rejected: password mismatch");
            return Err(AccountError::Unauthorized);
        }

        let session = if self.options.issue_token_on_login {
            Some(self.issue_session(identifier.as_str())?)
        } else {
            None
        };

        tracing::info!(account_id = %account.id, identifier = %identifier, "Login succeeded");

        Ok(Authentication {
            account: account.summary(),
            session,
        })
    }

    /// Signs for `identifier` as given; no account lookup happens here.
    async fn issue_token(&self, identifier: &str) -> Result<SessionToken, AccountError> {
        let session = self.issue_session(identifier)?;
        tracing::info!(
            identifier = identifier,
            expires_at = session.claims.exp,
            "Session token issued"
        );
        Ok(session)
    }

    async fn validate_token(&self, token: &str) -> Result<Claims, AccountError> {
        self.token_issuer.validate(token).map_err(|e| {
            tracing::debug!(error = %e, "Session token rejected");
            AccountError::Unauthorized
        })
    }

    async fn list_accounts(&self) -> Result<Vec<AccountProfile>, AccountError> {
        self.within_deadline("list", self.store.list())
            .await
            .map_err(|e| AccountError::internal("list", e))
    }
}
