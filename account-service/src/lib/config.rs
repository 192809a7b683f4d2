use std::env;
use std::time::Duration;

use auth::issuer::MAX_TOKEN_LIFETIME_HOURS;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use config::FileFormat;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
    #[serde(default)]
    pub accounts: AccountsConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

/// Argon2id cost parameters.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AccountsConfig {
    pub issue_token_on_register: bool,
    pub issue_token_on_login: bool,
    pub store_timeout_ms: u64,
}

fn default_max_connections() -> u32 {
    5
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

fn default_expiration_hours() -> i64 {
    auth::issuer::DEFAULT_TOKEN_LIFETIME_HOURS
}

impl Default for PasswordConfig {
    fn default() -> Self {
        // argon2 crate recommended parameters
        Self {
            memory_kib: 19 * 1024,
            iterations: 2,
            parallelism: 1,
        }
    }
}

impl Default for AccountsConfig {
    fn default() -> Self {
        Self {
            issue_token_on_register: true,
            issue_token_on_login: true,
            store_timeout_ms: 5_000,
        }
    }
}

impl AccountsConfig {
    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());
        Self::load_for(&run_mode)
    }

    /// Load configuration for an explicit run mode.
    pub fn load_for(run_mode: &str) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: DATABASE__URL=postgres://... overrides database.url
            .add_source(Environment::default().separator("__"))
            .build()?;

        Self::from_settings(configuration)
    }

    /// Build configuration from a single TOML document.
    ///
    /// Neither config files nor environment variables are consulted.
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let configuration = ConfigBuilder::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;

        Self::from_settings(configuration)
    }

    fn from_settings(configuration: ConfigBuilder) -> Result<Self, ConfigError> {
        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT__SECRET)".to_string(),
            ));
        }
        if self.jwt.expiration_hours <= 0 || self.jwt.expiration_hours > MAX_TOKEN_LIFETIME_HOURS
        {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be between 1 and {}",
                MAX_TOKEN_LIFETIME_HOURS
            )));
        }
        if self.accounts.store_timeout_ms == 0 {
            return Err(ConfigError::Message(
                "accounts.store_timeout_ms must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
