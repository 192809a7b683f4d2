use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AccountProfile;
use crate::account::models::Identifier;
use crate::account::models::NewAccount;
use crate::account::ports::CredentialStore;

/// Process-local credential store.
///
/// Uniqueness is enforced under the write lock, so racing inserts for the
/// same identifier resolve to exactly one winner.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    state: RwLock<State>,
}

#[derive(Debug, Default)]
struct State {
    /// Map of identifier -> account
    accounts: HashMap<String, Account>,
    last_id: i64,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.state.read().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn exists_by_identifier(&self, identifier: &Identifier) -> Result<bool, StoreError> {
        Ok(self
            .state
            .read()
            .await
            .accounts
            .contains_key(identifier.as_str()))
    }

    async fn insert(&self, account: NewAccount) -> Result<AccountId, StoreError> {
        let mut state = self.state.write().await;

        if state.accounts.contains_key(account.identifier.as_str()) {
            return Err(StoreError::Conflict(account.identifier.to_string()));
        }

        state.last_id += 1;
        let id = AccountId(state.last_id);

        state.accounts.insert(
            account.identifier.as_str().to_string(),
            Account {
                id,
                identifier: account.identifier,
                password_digest: account.password_digest,
                display_name: account.display_name,
                privilege: account.privilege,
            },
        );

        Ok(id)
    }

    async fn fetch_by_identifier(&self, identifier: &Identifier) -> Result<Account, StoreError> {
        self.state
            .read()
            .await
            .accounts
            .get(identifier.as_str())
            .cloned()
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))
    }

    async fn list(&self) -> Result<Vec<AccountProfile>, StoreError> {
        let state = self.state.read().await;

        let mut profiles: Vec<AccountProfile> =
            state.accounts.values().map(Account::profile).collect();
        profiles.sort_by_key(|profile| profile.id);

        Ok(profiles)
    }
}
