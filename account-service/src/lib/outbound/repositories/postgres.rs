use async_trait::async_trait;
use sqlx::PgPool;

use crate::account::errors::StoreError;
use crate::account::models::Account;
use crate::account::models::AccountId;
use crate::account::models::AccountProfile;
use crate::account::models::Identifier;
use crate::account::models::NewAccount;
use crate::account::ports::CredentialStore;

const IDENTIFIER_UNIQUE_CONSTRAINT: &str = "accounts_identifier_key";

pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    identifier: String,
    password_digest: String,
    display_name: Option<String>,
    privilege: i32,
}

impl From<AccountRow> for Account {
    fn from(row: AccountRow) -> Self {
        Account {
            id: AccountId(row.id),
            identifier: Identifier::from_stored(row.identifier),
            password_digest: row.password_digest,
            display_name: row.display_name,
            privilege: row.privilege,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: i64,
    identifier: String,
    display_name: Option<String>,
    privilege: i32,
}

impl From<ProfileRow> for AccountProfile {
    fn from(row: ProfileRow) -> Self {
        AccountProfile {
            id: AccountId(row.id),
            identifier: Identifier::from_stored(row.identifier),
            display_name: row.display_name,
            privilege: row.privilege,
        }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn exists_by_identifier(&self, identifier: &Identifier) -> Result<bool, StoreError> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(SELECT 1 FROM accounts WHERE identifier = $1)
            "#,
        )
        .bind(identifier.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))
    }

    async fn insert(&self, account: NewAccount) -> Result<AccountId, StoreError> {
        let id = sqlx::query_scalar::<_, i64>(
            r#"
            INSERT INTO accounts (identifier, password_digest, display_name, privilege)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(account.identifier.as_str())
        .bind(&account.password_digest)
        .bind(account.display_name.as_deref())
        .bind(account.privilege)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation()
                    && db_err.constraint() == Some(IDENTIFIER_UNIQUE_CONSTRAINT)
                {
                    return StoreError::Conflict(account.identifier.to_string());
                }
            }
            StoreError::Database(e.to_string())
        })?;

        Ok(AccountId(id))
    }

    async fn fetch_by_identifier(&self, identifier: &Identifier) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, identifier, password_digest, display_name, privilege
            FROM accounts
            WHERE identifier = $1
            "#,
        )
        .bind(identifier.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        row.map(Account::from)
            .ok_or_else(|| StoreError::NotFound(identifier.to_string()))
    }

    async fn list(&self) -> Result<Vec<AccountProfile>, StoreError> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, identifier, display_name, privilege
            FROM accounts
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::Database(e.to_string()))?;

        Ok(rows.into_iter().map(AccountProfile::from).collect())
    }
}
