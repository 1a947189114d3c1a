//! Server configuration.
//!
//! Sources, lowest precedence first: an optional TOML file
//! (`config/gudang.toml` or the path in `GUDANG_CONFIG`), `GUDANG_*`
//! environment variables (`GUDANG_SERVER__PORT=9000`), then the flat
//! variable names used by older deployments (`PORT`, `DB_NAME`, ...).

use std::time::Duration;

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File};
use gudang_auth::{AuthConfig, SmtpConfig};
use gudang_db::DbConfig;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/gudang.toml";

/// Flat environment variables and the keys they override.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("PORT", "server.port"),
    ("DB_NAME", "database.name"),
    ("DATABASE_URL", "database.url"),
    ("JWT_SECRET", "auth.jwt_secret"),
    ("SMTP_HOST", "smtp.host"),
    ("SMTP_PORT", "smtp.port"),
    ("SMTP_USERNAME", "smtp.username"),
    ("SMTP_PASSWORD", "smtp.password"),
    ("FROM_EMAIL", "smtp.from_email"),
    ("FROM_NAME", "smtp.from_name"),
];

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub smtp: SmtpSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            request_timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Bare database name, stored as `<name>.db` in the working directory.
    pub name: String,
    /// Full connection URL; takes precedence over `name` when set.
    pub url: Option<String>,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            name: "gudang".into(),
            url: None,
            max_connections: 5,
            acquire_timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub issuer: String,
    pub access_token_lifetime_secs: u64,
    pub min_password_length: usize,
    pub reset_token_lifetime_secs: u64,
    pub reset_url_base: String,
    pub pepper: Option<String>,
}

impl Default for AuthSettings {
    fn default() -> Self {
        let auth = AuthConfig::default();
        Self {
            jwt_secret: auth.jwt_secret,
            issuer: auth.jwt_issuer,
            access_token_lifetime_secs: auth.access_token_lifetime_secs,
            min_password_length: auth.min_password_length,
            reset_token_lifetime_secs: auth.reset_token_lifetime_secs,
            reset_url_base: auth.reset_url_base,
            pepper: auth.pepper,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from_email: String,
    pub from_name: String,
}

impl Default for SmtpSettings {
    fn default() -> Self {
        let smtp = SmtpConfig::default();
        Self {
            host: smtp.host,
            port: smtp.port,
            username: smtp.username,
            password: smtp.password,
            from_email: smtp.from_email,
            from_name: smtp.from_name,
        }
    }
}

impl AppConfig {
    /// Load configuration from the file, `GUDANG_*` and the flat variables.
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var("GUDANG_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let builder = Config::builder()
            .add_source(File::with_name(&path).required(false))
            .add_source(
                Environment::with_prefix("GUDANG")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );
        Self::from_builder(with_legacy_overrides(builder, |key| std::env::var(key).ok())?)
    }

    pub(crate) fn from_builder(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config
            .auth_config()
            .validate()
            .map_err(|e| ConfigError::Message(e.to_string()))?;
        Ok(config)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }

    pub fn db_config(&self) -> DbConfig {
        let base = match self.database.url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => DbConfig {
                url: url.to_string(),
                ..DbConfig::default()
            },
            None => DbConfig::from_name(&self.database.name),
        };
        DbConfig {
            max_connections: self.database.max_connections,
            acquire_timeout: Duration::from_secs(self.database.acquire_timeout_secs),
            ..base
        }
    }

    pub fn auth_config(&self) -> AuthConfig {
        AuthConfig {
            jwt_secret: self.auth.jwt_secret.clone(),
            jwt_issuer: self.auth.issuer.clone(),
            access_token_lifetime_secs: self.auth.access_token_lifetime_secs,
            pepper: self.auth.pepper.clone().filter(|p| !p.is_empty()),
            min_password_length: self.auth.min_password_length,
            reset_token_lifetime_secs: self.auth.reset_token_lifetime_secs,
            reset_url_base: self.auth.reset_url_base.clone(),
        }
    }

    pub fn smtp_config(&self) -> SmtpConfig {
        SmtpConfig {
            host: self.smtp.host.clone(),
            port: self.smtp.port,
            username: self.smtp.username.clone(),
            password: self.smtp.password.clone(),
            from_email: self.smtp.from_email.clone(),
            from_name: self.smtp.from_name.clone(),
        }
    }
}

/// Apply the flat variables found by `lookup` on top of `builder`.
///
/// Empty values are ignored.
pub(crate) fn with_legacy_overrides(
    mut builder: ConfigBuilder<DefaultState>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    for (var, key) in LEGACY_ENV {
        let value = lookup(var).filter(|v| !v.is_empty());
        builder = builder.set_override_option(*key, value)?;
    }
    Ok(builder)
}
