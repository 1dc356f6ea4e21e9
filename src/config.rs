//! Application configuration.
//!
//! Settings come from an optional `config.toml` plus environment variables.
//! A missing config file is not an error; every field has a default, and
//! `DATABASE_URL` from the environment overrides the file.

use crate::errors::{Error, Result};
use crate::model::{Role, User};
use serde::Deserialize;
use std::{env, fs, path::Path};

const DEFAULT_DATABASE_URL: &str = "sqlite://data/roomledger.sqlite?mode=rwc";

/// Top-level application configuration.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AppConfig {
    /// Connection URL for the backing database
    pub database_url: String,
    /// Bootstrap admin account used when the store holds no users
    pub admin: AdminConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            admin: AdminConfig::default(),
        }
    }
}

/// Credentials for the bootstrap admin account.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct AdminConfig {
    /// Login name
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Display name
    pub name: String,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            username: "popa".to_string(),
            password: "popa".to_string(),
            name: "Administrator".to_string(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from the given TOML file, falling back to
    /// defaults when the file does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let mut config = if path_ref.exists() {
            tracing::debug!("Loading configuration from: {:?}", path_ref);
            let contents = fs::read_to_string(path_ref).map_err(|e| Error::Config {
                message: format!("Failed to read config file {path_ref:?}: {e}"),
            })?;
            toml::from_str(&contents).map_err(|e| Error::Config {
                message: format!("Failed to parse TOML from config file {path_ref:?}: {e}"),
            })?
        } else {
            Self::default()
        };

        if let Ok(url) = env::var("DATABASE_URL") {
            config.database_url = url;
        }
        Ok(config)
    }

    /// The admin account injected when the store carries no users.
    #[must_use]
    pub fn bootstrap_admin(&self) -> User {
        User {
            id: "admin-root".to_string(),
            username: self.admin.username.clone(),
            password: self.admin.password.clone(),
            role: Role::Admin,
            name: self.admin.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn defaults_cover_every_field() {
        let config = AppConfig::default();
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(config.admin.username, "popa");
        assert_eq!(config.admin.password, "popa");
    }

    #[test]
    fn partial_toml_keeps_defaults_for_the_rest() {
        let config: AppConfig = toml::from_str(
            r#"
            [admin]
            username = "warden"
            "#,
        )
        .unwrap();
        assert_eq!(config.admin.username, "warden");
        assert_eq!(config.admin.password, "popa");
        assert_eq!(config.database_url, DEFAULT_DATABASE_URL);
    }

    #[test]
    fn bootstrap_admin_carries_the_configured_credentials() {
        let mut config = AppConfig::default();
        config.admin.username = "warden".to_string();

        let user = config.bootstrap_admin();
        assert_eq!(user.username, "warden");
        assert_eq!(user.role, Role::Admin);
        assert_eq!(user.id, "admin-root");
    }
}
