//! Persisted validation settings

use chrono::Utc;
use rusqlite::params;
use std::collections::HashMap;
use std::sync::Arc;

use super::db::{Database, StoreResult};

/// Stores the per-profile "validate this profile" flag
#[derive(Clone)]
pub struct ValidationSettingsStore {
    db: Arc<Database>,
}

impl ValidationSettingsStore {
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Load every stored setting
    ///
    /// # Errors
    /// Returns an error if the table cannot be read
    pub fn load_all(&self) -> StoreResult<HashMap<String, bool>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT name, enabled FROM validation_settings")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, bool>(1)?))
            })?;

            let mut settings = HashMap::new();
            for row in rows {
                let (name, enabled) = row?;
                settings.insert(name, enabled);
            }
            Ok(settings)
        })
    }

    /// Insert or replace a setting
    ///
    /// # Errors
    /// Returns an error if the write fails
    pub fn set(&self, name: &str, enabled: bool) -> StoreResult<()> {
        self.db.with_conn(|conn| {
            conn.execute(
                r"
                INSERT INTO validation_settings (name, enabled, updated_at)
                VALUES (?1, ?2, ?3)
                ON CONFLICT(name) DO UPDATE SET enabled = excluded.enabled, updated_at = excluded.updated_at
                ",
                params![name, enabled, Utc::now().to_rfc3339()],
            )?;
            Ok(())
        })
    }

    /// Remove a setting. Returns whether a row was removed.
    ///
    /// # Errors
    /// Returns an error if the write fails
    pub fn remove(&self, name: &str) -> StoreResult<bool> {
        self.db.with_conn(|conn| {
            let removed = conn.execute(
                "DELETE FROM validation_settings WHERE name = ?1",
                params![name],
            )?;
            Ok(removed > 0)
        })
    }
}
