use std::sync::Arc;
use std::time::Duration;

use auth::PasswordHasher;
use auth::TokenIssuer;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use crate::account::service::AccountService;
use crate::account::service::AccountServiceOptions;
use crate::config::Config;
use crate::config::DatabaseConfig;
use crate::outbound::repositories::PostgresCredentialStore;

/// Open the connection pool and bring the schema up to date.
pub async fn connect_database(config: &DatabaseConfig) -> Result<PgPool, anyhow::Error> {
    let pg_pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
        .connect(&config.url)
        .await?;
    tracing::info!(
        max_connections = config.max_connections,
        database = "postgresql",
        "Database connection pool created"
    );

    sqlx::migrate!("./migrations").run(&pg_pool).await?;
    tracing::info!(database = "postgresql", "Database migrations completed");

    Ok(pg_pool)
}

/// Build the hasher, token issuer and store-independent options from `config`.
pub fn build_components(
    config: &Config,
) -> Result<(PasswordHasher, Arc<TokenIssuer>, AccountServiceOptions), anyhow::Error> {
    let password_hasher = PasswordHasher::with_params(
        config.password.memory_kib,
        config.password.iterations,
        config.password.parallelism,
    )?;

    let lifetime = chrono::Duration::try_hours(config.jwt.expiration_hours).ok_or_else(|| {
        anyhow::anyhow!(
            "jwt.expiration_hours out of range: {}",
            config.jwt.expiration_hours
        )
    })?;
    let token_issuer = Arc::new(TokenIssuer::with_lifetime(
        config.jwt.secret.as_bytes(),
        lifetime,
    )?);

    Ok((
        password_hasher,
        token_issuer,
        AccountServiceOptions::from(&config.accounts),
    ))
}

/// Wire a PostgreSQL-backed account service from loaded configuration.
pub async fn build_service(
    config: &Config,
) -> Result<AccountService<PostgresCredentialStore>, anyhow::Error> {
    let (password_hasher, token_issuer, options) = build_components(config)?;
    let pg_pool = connect_database(&config.database).await?;

    let store = Arc::new(PostgresCredentialStore::new(pg_pool));
    let service = AccountService::new(store, password_hasher, token_issuer, options)?;

    tracing::info!(
        token_lifetime_hours = config.jwt.expiration_hours,
        store_timeout_ms = config.accounts.store_timeout_ms,
        "Account service ready"
    );

    Ok(service)
}
