//! Application configuration and data directory layout
//!
//! Everything lives under one data directory: `HOSTBOOK_HOME` if set, else
//! `~/.hostbook`. It holds `config.json`, the `SQLite` database and the
//! session tree files.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::profile::TypeCatalog;

/// Environment variable overriding the data directory
pub const HOME_ENV: &str = "HOSTBOOK_HOME";

const CONFIG_FILE: &str = "config.json";
const DATABASE_FILE: &str = "hostbook.db";

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors reading or writing `config.json`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("JSON parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Settings read from `config.json`; every field is optional
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Validation setting for profiles with no explicit choice
    pub validate_by_default: bool,
    /// Per-check timeout in seconds
    pub check_timeout_secs: u64,
    /// Directory with extra profile type schemas (`*.json`)
    pub schema_dir: Option<PathBuf>,
    /// Log filter used when `HOSTBOOK_LOG` is not set
    pub log_filter: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            validate_by_default: true,
            check_timeout_secs: 30,
            schema_dir: None,
            log_filter: None,
        }
    }
}

impl AppConfig {
    /// Load `config.json` from a data directory. A missing file yields the
    /// defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed
    pub fn load(data_dir: &Path) -> ConfigResult<Self> {
        let path = data_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::Io {
            path: path.clone(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Parse {
            path,
            message: e.to_string(),
        })
    }

    /// Write `config.json` into a data directory
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save(&self, data_dir: &Path) -> ConfigResult<()> {
        let path = data_dir.join(CONFIG_FILE);
        let io_error = |e: std::io::Error| ConfigError::Io {
            path: path.clone(),
            message: e.to_string(),
        };

        fs::create_dir_all(data_dir).map_err(io_error)?;
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(&path, json).map_err(io_error)
    }

    #[must_use]
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_secs)
    }

    /// Built-in types plus any schemas found in `schema_dir`.
    ///
    /// Schema files that fail to load are returned as warnings.
    #[must_use]
    pub fn type_catalog(&self) -> (TypeCatalog, Vec<String>) {
        let mut catalog = TypeCatalog::with_builtins();
        let warnings = match &self.schema_dir {
            Some(dir) => catalog.load_dir(dir),
            None => Vec::new(),
        };
        (catalog, warnings)
    }
}

/// Resolve the data directory from an override and a home directory
fn resolve_data_dir(override_dir: Option<PathBuf>, home: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = override_dir.filter(|d| !d.as_os_str().is_empty()) {
        return dir;
    }
    if let Some(home) = home {
        return home.join(".hostbook");
    }
    let fallback = std::env::temp_dir().join("hostbook");
    tracing::warn!(path = %fallback.display(), "no home directory, using temporary data directory");
    fallback
}

/// The per-user data directory
#[must_use]
pub fn data_dir() -> PathBuf {
    resolve_data_dir(std::env::var_os(HOME_ENV).map(PathBuf::from), dirs::home_dir())
}

/// Path of the `SQLite` database inside a data directory
#[must_use]
pub fn database_path(data_dir: &Path) -> PathBuf {
    data_dir.join(DATABASE_FILE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig::load(dir.path()).unwrap();
        assert_eq!(config, AppConfig::default());
        assert!(config.validate_by_default);
        assert_eq!(config.check_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE),
            r#"{ "validate_by_default": false }"#,
        )
        .unwrap();

        let config = AppConfig::load(dir.path()).unwrap();
        assert!(!config.validate_by_default);
        assert_eq!(config.check_timeout_secs, 30);
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            check_timeout_secs: 5,
            log_filter: Some("debug".into()),
            ..AppConfig::default()
        };
        config.save(dir.path()).unwrap();
        assert_eq!(AppConfig::load(dir.path()).unwrap(), config);
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "{ nope").unwrap();
        assert!(matches!(
            AppConfig::load(dir.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_resolve_data_dir_precedence() {
        assert_eq!(
            resolve_data_dir(Some("/srv/hb".into()), Some("/home/a".into())),
            PathBuf::from("/srv/hb")
        );
        assert_eq!(
            resolve_data_dir(Some(PathBuf::new()), Some("/home/a".into())),
            PathBuf::from("/home/a/.hostbook")
        );
        assert!(resolve_data_dir(None, None).ends_with("hostbook"));
    }

    #[test]
    fn test_schema_dir_extends_catalog() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("zosmf.json"),
            r#"{ "type": "zosmf", "fields": [{ "name": "host", "type": "string" }] }"#,
        )
        .unwrap();

        let config = AppConfig {
            schema_dir: Some(dir.path().to_path_buf()),
            ..AppConfig::default()
        };
        let (catalog, warnings) = config.type_catalog();
        assert!(warnings.is_empty());
        assert!(catalog.contains("zosmf"));
        assert!(catalog.contains("http"));
    }
}
