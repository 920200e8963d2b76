//! Runtime configuration read from the environment
//!
//! Values come from process environment variables, optionally seeded from a
//! `.env` file. Anything missing or unparsable falls back to a default.

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATA_FILE: &str = "data/links.json";
pub const DEFAULT_LOG_FILTER: &str = "quicklink=debug,tower_http=debug";

/// Storage engine holding the link set document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// Pretty-printed JSON file, replaced atomically on every write
    #[default]
    Json,
    /// Embedded redb database file
    Redb,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(Backend::Json),
            "redb" => Ok(Backend::Redb),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub port: u16,
    pub data_file: PathBuf,
    pub backend: Backend,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            data_file: PathBuf::from(DEFAULT_DATA_FILE),
            backend: Backend::default(),
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl Config {
    /// Loads `.env` if present, then reads the process environment
    ///
    /// # Environment Variables
    ///
    /// - `PORT` - Server port number (default: 3000)
    /// - `DATA_FILE` - Path of the persisted link set (default: "data/links.json")
    /// - `STORE_BACKEND` - `json` or `redb` (default: "json")
    /// - `RUST_LOG` - tracing filter directive
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let port = lookup("PORT")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(defaults.port);

        let data_file = lookup("DATA_FILE")
            .filter(|raw| !raw.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.data_file);

        let backend = match lookup("STORE_BACKEND") {
            Some(raw) => raw.parse().unwrap_or_else(|err| {
                warn!("{}, falling back to json", err);
                Backend::Json
            }),
            None => defaults.backend,
        };

        let log_filter = lookup("RUST_LOG")
            .filter(|raw| !raw.trim().is_empty())
            .unwrap_or(defaults.log_filter);

        Self {
            port,
            data_file,
            backend,
            log_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_environment_is_empty() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.backend, Backend::Json);
    }

    #[test]
    fn reads_every_key() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8081"),
            ("DATA_FILE", "/tmp/links.redb"),
            ("STORE_BACKEND", "REDB"),
            ("RUST_LOG", "info"),
        ]));

        assert_eq!(config.port, 8081);
        assert_eq!(config.data_file, PathBuf::from("/tmp/links.redb"));
        assert_eq!(config.backend, Backend::Redb);
        assert_eq!(config.log_filter, "info");
    }

    #[test]
    fn bad_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "not-a-port"),
            ("STORE_BACKEND", "sqlite"),
            ("DATA_FILE", "  "),
        ]));

        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.backend, Backend::Json);
        assert_eq!(config.data_file, PathBuf::from(DEFAULT_DATA_FILE));
    }
}
