//! Connection settings.
//!
//! Settings use the keys `DB_NAME`, `DB_USER`, `DB_PASS`, `DB_HOST` and
//! `DB_PORT`, whether they come from the environment, a key/value map or a
//! JSON document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use sqlx::postgres::PgConnectOptions;

use crate::error::{OrmError, Result};

/// Default PostgreSQL port.
pub const DEFAULT_PORT: u16 = 5432;

/// Default host when `DB_HOST` is absent.
pub const DEFAULT_HOST: &str = "localhost";

/// PostgreSQL connection settings.
///
/// # Example
///
/// ```
/// use quill_orm::DatabaseSettings;
///
/// let settings = DatabaseSettings::from_json(
///     r#"{"DB_NAME": "quill", "DB_USER": "postgres", "DB_PASS": "secret"}"#,
/// )
/// .unwrap();
/// assert_eq!(settings.host, "localhost");
/// assert_eq!(settings.port, 5432);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseSettings {
    /// Database name.
    #[serde(rename = "DB_NAME")]
    pub name: String,
    /// Role to connect as.
    #[serde(rename = "DB_USER")]
    pub user: String,
    /// Password, empty for trust/peer authentication.
    #[serde(rename = "DB_PASS", default)]
    pub password: String,
    /// Server host.
    #[serde(rename = "DB_HOST", default = "default_host")]
    pub host: String,
    /// Server port.
    #[serde(rename = "DB_PORT", default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

const fn default_port() -> u16 {
    DEFAULT_PORT
}

impl DatabaseSettings {
    /// Creates settings for `name` as `user` on the default host and port.
    #[must_use]
    pub fn new(name: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user: user.into(),
            password: String::new(),
            host: default_host(),
            port: DEFAULT_PORT,
        }
    }

    #[must_use]
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = password.into();
        self
    }

    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Reads the `DB_*` environment variables.
    ///
    /// # Errors
    ///
    /// [`OrmError::Configuration`] when `DB_NAME` or `DB_USER` is unset or
    /// empty, or `DB_PORT` is not a port number.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings from a map keyed like the environment variables.
    ///
    /// # Errors
    ///
    /// As [`DatabaseSettings::from_env`].
    pub fn from_map(map: &HashMap<String, String>) -> Result<Self> {
        Self::from_lookup(|key| map.get(key).cloned())
    }

    /// Parses a JSON object keyed like the environment variables.
    ///
    /// # Errors
    ///
    /// [`OrmError::Configuration`] when the document does not parse.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| OrmError::Configuration(e.to_string()))
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.is_empty())
                .ok_or_else(|| OrmError::Configuration(format!("{key} is not set")))
        };
        let port = lookup("DB_PORT")
            .map(|port| {
                port.parse::<u16>()
                    .map_err(|_| OrmError::Configuration(format!("invalid DB_PORT: {port}")))
            })
            .transpose()?
            .unwrap_or(DEFAULT_PORT);

        Ok(Self {
            name: required("DB_NAME")?,
            user: required("DB_USER")?,
            password: lookup("DB_PASS").unwrap_or_default(),
            host: lookup("DB_HOST").unwrap_or_else(default_host),
            port,
        })
    }

    /// Builds sqlx connect options.
    #[must_use]
    pub fn to_connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: &[(&str, &str)]) -> HashMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_from_map_with_defaults() {
        let settings = DatabaseSettings::from_map(&map(&[
            ("DB_NAME", "quill"),
            ("DB_USER", "postgres"),
        ]))
        .unwrap();
        assert_eq!(settings, DatabaseSettings::new("quill", "postgres"));
    }

    #[test]
    fn test_from_map_full() {
        let settings = DatabaseSettings::from_map(&map(&[
            ("DB_NAME", "quill"),
            ("DB_USER", "app"),
            ("DB_PASS", "pw"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
        ]))
        .unwrap();
        assert_eq!(
            settings,
            DatabaseSettings::new("quill", "app")
                .password("pw")
                .host("db.internal")
                .port(6543)
        );
    }

    #[test]
    fn test_missing_name_is_a_configuration_error() {
        let err = DatabaseSettings::from_map(&map(&[("DB_USER", "app")])).unwrap_err();
        assert!(matches!(err, OrmError::Configuration(msg) if msg == "DB_NAME is not set"));
    }

    #[test]
    fn test_invalid_port() {
        let err = DatabaseSettings::from_map(&map(&[
            ("DB_NAME", "quill"),
            ("DB_USER", "app"),
            ("DB_PORT", "five"),
        ]))
        .unwrap_err();
        assert!(matches!(err, OrmError::Configuration(_)));
    }

    #[test]
    fn test_json_round_trip_uses_env_keys() {
        let settings = DatabaseSettings::new("quill", "app").password("pw");
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["DB_NAME"], "quill");
        assert_eq!(json["DB_PORT"], 5432);
        let parsed = DatabaseSettings::from_json(&json.to_string()).unwrap();
        assert_eq!(parsed, settings);
    }

    #[test]
    fn test_connect_options() {
        let options = DatabaseSettings::new("quill", "app")
            .host("db.internal")
            .port(6543)
            .to_connect_options();
        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_username(), "app");
        assert_eq!(options.get_database(), Some("quill"));
    }
}
