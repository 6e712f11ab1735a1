//! Process configuration.
//!
//! # Responsibility
//! - Describe where the document store lives and how logging is set up.
//! - Resolve configuration from environment variables with stable defaults.
//!
//! # Invariants
//! - Resolution never fails; unknown or empty values fall back to defaults.

use crate::logging::default_log_level;
use std::path::PathBuf;

/// Database file used when no path is configured.
pub const DEFAULT_DB_FILE_NAME: &str = "schoolbook.sqlite3";

/// Path value that selects a private in-memory database.
pub const IN_MEMORY_DB_PATH: &str = ":memory:";

pub const ENV_DB_PATH: &str = "SCHOOLBOOK_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "SCHOOLBOOK_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "SCHOOLBOOK_LOG_DIR";

/// Physical location of the document store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// SQLite database file, created on first open.
    File(PathBuf),
    /// Private in-memory database that lives as long as its store.
    Memory,
}

/// Document store settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreConfig {
    pub location: StoreLocation,
}

impl StoreConfig {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            location: StoreLocation::File(path.into()),
        }
    }

    pub fn in_memory() -> Self {
        Self {
            location: StoreLocation::Memory,
        }
    }

    fn from_path_value(value: &str) -> Self {
        match value.trim() {
            "" => Self::default(),
            IN_MEMORY_DB_PATH => Self::in_memory(),
            path => Self::file(path),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::file(DEFAULT_DB_FILE_NAME)
    }
}

/// Full application configuration consumed at process start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub store: StoreConfig,
    /// One of `trace|debug|info|warn|error`.
    pub log_level: String,
    /// Absolute directory for rolling log files. File logging is off when unset.
    pub log_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            store: StoreConfig::default(),
            log_level: default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl AppConfig {
    /// Resolves configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            store: non_empty(ENV_DB_PATH)
                .map(|value| StoreConfig::from_path_value(&value))
                .unwrap_or(defaults.store),
            log_level: non_empty(ENV_LOG_LEVEL)
                .map(|value| value.trim().to_ascii_lowercase())
                .unwrap_or(defaults.log_level),
            log_dir: non_empty(ENV_LOG_DIR).map(|value| PathBuf::from(value.trim())),
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
    fn empty_environment_uses_defaults() {
        let config = AppConfig::from_lookup(|_| None);
        assert_eq!(config, AppConfig::default());
        assert_eq!(
            config.store.location,
            StoreLocation::File(PathBuf::from(DEFAULT_DB_FILE_NAME))
        );
    }

    #[test]
    fn memory_path_selects_in_memory_store() {
        let config = AppConfig::from_lookup(lookup_from(&[(ENV_DB_PATH, ":memory:")]));
        assert_eq!(config.store, StoreConfig::in_memory());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "/var/lib/school/db.sqlite3"),
            (ENV_LOG_LEVEL, " WARN "),
            (ENV_LOG_DIR, "/var/log/school"),
        ]));
        assert_eq!(config.store, StoreConfig::file("/var/lib/school/db.sqlite3"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/school")));
    }

    #[test]
    fn blank_values_are_ignored() {
        let config = AppConfig::from_lookup(lookup_from(&[
            (ENV_DB_PATH, "  "),
            (ENV_LOG_DIR, ""),
        ]));
        assert_eq!(config.store, StoreConfig::default());
        assert!(config.log_dir.is_none());
    }
}
