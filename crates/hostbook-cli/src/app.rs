//! Application wiring
//!
//! Opens the data directory, the database and the registry, and builds the
//! validator with the built-in checks and persisted settings.

use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;

use hostbook_core::config::{self, AppConfig};
use hostbook_core::consumer::SessionTree;
use hostbook_core::storage::{Database, SqliteProfileStore, ValidationSettingsStore};
use hostbook_core::{ProfileRegistry, ProfileValidator};
use hostbook_providers::register_builtin_checks;

use crate::terminal::ConsoleProgress;

pub struct App {
    pub data_dir: PathBuf,
    pub settings: ValidationSettingsStore,
    pub registry: ProfileRegistry,
}

impl App {
    /// Open everything under the per-user data directory
    pub fn open(config: &AppConfig, data_dir: PathBuf) -> Result<Self, Box<dyn Error>> {
        std::fs::create_dir_all(&data_dir)?;

        let (catalog, warnings) = config.type_catalog();
        for warning in warnings {
            tracing::warn!("{warning}");
        }

        let db = Arc::new(Database::open(&config::database_path(&data_dir))?);
        let store = Arc::new(SqliteProfileStore::new(Arc::clone(&db)));
        let settings = ValidationSettingsStore::new(db);

        let validator = ProfileValidator::new()
            .with_default_enabled(config.validate_by_default)
            .with_timeout(config.check_timeout())
            .with_progress(Arc::new(ConsoleProgress));
        let validator = register_builtin_checks(validator, config.check_timeout())?;
        validator.load_settings(settings.load_all()?);

        let mut registry = ProfileRegistry::new(store, catalog, Arc::new(validator));
        let report = registry.refresh();
        tracing::debug!(
            loaded = report.loaded,
            failed = report.failed_types.len(),
            "profiles loaded"
        );

        Ok(Self {
            data_dir,
            settings,
            registry,
        })
    }

    /// Session trees for every default domain
    pub fn trees(&self) -> Result<Vec<SessionTree>, Box<dyn Error>> {
        Ok(SessionTree::open_defaults(&self.data_dir)?)
    }
}
