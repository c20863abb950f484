//! Database connection management

use rusqlite::Connection;
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

use super::migrations;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Migration error: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Profile '{name}' of type '{profile_type}' not found")]
    NotFound { profile_type: String, name: String },

    #[error("No default profile for type '{0}'")]
    NoDefault(String),

    #[error("Profile '{0}' already exists")]
    AlreadyExists(String),

    /// The store requires credentials that were not supplied
    #[error("No credentials supplied for profile '{0}'")]
    MissingCredentials(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Whether this error reports an absent record
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::NoDefault(_))
    }
}

/// Database wrapper
///
/// The connection sits behind a mutex so stores built on it can be shared
/// across tasks.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open or create a database at the given path
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for better concurrent read/write performance
        conn.pragma_update(None, "journal_mode", "WAL")?;
        // NORMAL synchronous is safe with WAL and faster than FULL
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.pragma_update(None, "temp_store", "MEMORY")?;

        migrations::run_migrations(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory database (for testing)
    ///
    /// # Errors
    /// Returns an error if the database cannot be created
    pub fn in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        migrations::run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Run a closure with exclusive access to the connection
    pub fn with_conn<T>(&self, f: impl FnOnce(&mut Connection) -> StoreResult<T>) -> StoreResult<T> {
        // Handle mutex poisoning by recovering the lock
        let mut guard = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut *guard)
    }
}
