//! Storefront configuration module.
//!
//! Configuration is loaded from environment variables, after an optional
//! `.env` file has been applied.
//!
//! ## Variables
//! ```text
//! ┌──────────────────────────┬──────────┬──────────────────────────────────┐
//! │ Name                     │ Required │ Meaning                          │
//! ├──────────────────────────┼──────────┼──────────────────────────────────┤
//! │ SQL_SERVER               │ yes      │ directory of the database file   │
//! │ SQL_DATABASE             │ yes      │ database file stem (or :memory:) │
//! │ SQL_USERNAME             │ yes      │ unused by the embedded engine    │
//! │ SQL_PASSWORD             │ yes      │ unused by the embedded engine    │
//! │ BLOB_CONNECTION_STRING   │ yes      │ storage account connection       │
//! │ BLOB_CONTAINER_NAME      │ yes      │ container for product images     │
//! │ VITRINE_BIND_ADDR        │ no       │ default 0.0.0.0:8501             │
//! │ VITRINE_LOGIN_REQUIRED   │ no       │ default true                     │
//! │ VITRINE_ADMIN_USER       │ no       │ replaces the placeholder login   │
//! │ VITRINE_ADMIN_PASSWORD   │ with ^   │                                  │
//! │ VITRINE_MAX_UPLOAD_BYTES │ no       │ default 10 MiB                   │
//! └──────────────────────────┴──────────┴──────────────────────────────────┘
//! ```

use secrecy::{ExposeSecret, SecretString};
use std::net::SocketAddr;
use tracing::debug;

use vitrine_core::{CredentialTable, LoginPolicy};
use vitrine_db::DbConfig;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8501";

/// Default request body limit for product forms (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Storefront configuration.
#[derive(Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub bind_addr: SocketAddr,

    /// Directory holding the SQLite file.
    pub sql_server: String,

    /// Database file stem.
    pub sql_database: String,

    pub sql_username: String,
    pub sql_password: SecretString,

    pub blob_connection_string: SecretString,
    pub blob_container: String,

    /// Whether sessions start on the login page.
    pub login_policy: LoginPolicy,

    /// Operator account replacing the placeholder pair.
    pub admin: Option<(String, SecretString)>,

    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("sql_server", &self.sql_server)
            .field("sql_database", &self.sql_database)
            .field("sql_username", &self.sql_username)
            .field("sql_password", &"[REDACTED]")
            .field("blob_connection_string", &"[REDACTED]")
            .field("blob_container", &self.blob_container)
            .field("login_policy", &self.login_policy)
            .field("admin", &self.admin.as_ref().map(|(user, _)| user))
            .field("max_upload_bytes", &self.max_upload_bytes)
            .finish()
    }
}

impl AppConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => debug!("No .env file"),
            Err(e) => return Err(ConfigError::DotEnv(e.to_string())),
        }

        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::MissingRequired(name.to_string()))
        };

        let bind_addr = lookup("VITRINE_BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .map_err(|_| ConfigError::InvalidValue("VITRINE_BIND_ADDR".to_string()))?;

        let login_policy = match lookup("VITRINE_LOGIN_REQUIRED") {
            None => LoginPolicy::Required,
            Some(value) => match parse_bool(&value) {
                Some(true) => LoginPolicy::Required,
                Some(false) => LoginPolicy::Disabled,
                None => return Err(ConfigError::InvalidValue("VITRINE_LOGIN_REQUIRED".to_string())),
            },
        };

        let admin = match lookup("VITRINE_ADMIN_USER").filter(|v| !v.is_empty()) {
            None => None,
            Some(user) => {
                let password = required("VITRINE_ADMIN_PASSWORD")?;
                Some((user, SecretString::from(password)))
            }
        };

        let max_upload_bytes = match lookup("VITRINE_MAX_UPLOAD_BYTES") {
            None => DEFAULT_MAX_UPLOAD_BYTES,
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::InvalidValue("VITRINE_MAX_UPLOAD_BYTES".to_string()))?,
        };

        Ok(AppConfig {
            bind_addr,
            sql_server: required("SQL_SERVER")?,
            sql_database: required("SQL_DATABASE")?,
            sql_username: required("SQL_USERNAME")?,
            sql_password: SecretString::from(required("SQL_PASSWORD")?),
            blob_connection_string: SecretString::from(required("BLOB_CONNECTION_STRING")?),
            blob_container: required("BLOB_CONTAINER_NAME")?,
            login_policy,
            admin,
            max_upload_bytes,
        })
    }

    /// Database settings: `<SQL_SERVER>/<SQL_DATABASE>.db`.
    pub fn db_config(&self) -> DbConfig {
        DbConfig::from_server_and_name(&self.sql_server, &self.sql_database)
    }

    /// Operator credentials: the configured admin, or the placeholder pair.
    pub fn credentials(&self) -> CredentialTable {
        match &self.admin {
            Some((user, password)) => {
                CredentialTable::empty().with_user(user.clone(), password.expose_secret().to_string())
            }
            None => CredentialTable::default(),
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid value for {0}")]
    InvalidValue(String),

    #[error("Could not read .env file: {0}")]
    DotEnv(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("SQL_SERVER", "/srv/data"),
            ("SQL_DATABASE", "loja"),
            ("SQL_USERNAME", "sa"),
            ("SQL_PASSWORD", "hunter2"),
            ("BLOB_CONNECTION_STRING", "UseDevelopmentStorage=true"),
            ("BLOB_CONTAINER_NAME", "imagens"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|name| env.get(name).map(|v| v.to_string()))
    }

    #[test]
    fn test_defaults() {
        let config = load(&base_env()).unwrap();

        assert_eq!(config.bind_addr.to_string(), DEFAULT_BIND_ADDR);
        assert_eq!(config.login_policy, LoginPolicy::Required);
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.blob_container, "imagens");
        assert!(config.admin.is_none());
        assert!(config.credentials().verify("admin", "1234").is_ok());
        assert_eq!(
            config.db_config().database_path,
            std::path::PathBuf::from("/srv/data/loja.db")
        );
    }

    #[test]
    fn test_each_required_variable() {
        for name in base_env().keys() {
            let mut env = base_env();
            env.remove(name);
            match load(&env) {
                Err(ConfigError::MissingRequired(missing)) => assert_eq!(missing, *name),
                other => panic!("expected {name} to be required, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_login_can_be_disabled() {
        let mut env = base_env();
        env.insert("VITRINE_LOGIN_REQUIRED", "false");
        assert_eq!(load(&env).unwrap().login_policy, LoginPolicy::Disabled);

        env.insert("VITRINE_LOGIN_REQUIRED", "maybe");
        assert!(matches!(load(&env), Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn test_admin_override_replaces_placeholder() {
        let mut env = base_env();
        env.insert("VITRINE_ADMIN_USER", "gerente");
        assert!(matches!(
            load(&env),
            Err(ConfigError::MissingRequired(name)) if name == "VITRINE_ADMIN_PASSWORD"
        ));

        env.insert("VITRINE_ADMIN_PASSWORD", "s3nha");
        let credentials = load(&env).unwrap().credentials();
        assert!(credentials.verify("gerente", "s3nha").is_ok());
        assert!(credentials.verify("admin", "1234").is_err());
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let rendered = format!("{:?}", load(&base_env()).unwrap());
        assert!(!rendered.contains("hunter2"));
        assert!(!rendered.contains("UseDevelopmentStorage"));
    }
}
