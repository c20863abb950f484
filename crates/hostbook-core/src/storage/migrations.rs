//! Database migrations

use rusqlite::Connection;

use super::db::StoreError;

const CURRENT_VERSION: i32 = 2;

/// Run all pending migrations
///
/// # Errors
/// Returns an error if migrations fail
pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    if version > CURRENT_VERSION {
        return Err(StoreError::Migration(format!(
            "Database version {version} is newer than supported version {CURRENT_VERSION}"
        )));
    }
    if version < 1 {
        migrate_v1(conn)?;
    }
    if version < 2 {
        migrate_v2(conn)?;
    }

    conn.pragma_update(None, "user_version", CURRENT_VERSION)?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r"
        -- Profiles table
        -- Stores schema-defined fields as a JSON object in the data column
        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            profile_type TEXT NOT NULL,
            data TEXT NOT NULL,
            is_default INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );

        -- Names are unique across all types, ignoring case
        CREATE UNIQUE INDEX IF NOT EXISTS idx_profiles_name ON profiles(name COLLATE NOCASE);
        CREATE INDEX IF NOT EXISTS idx_profiles_type ON profiles(profile_type);
        ",
    )?;

    Ok(())
}

fn migrate_v2(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch(
        r"
        -- Per-profile opt-out of live validation
        CREATE TABLE IF NOT EXISTS validation_settings (
            name TEXT PRIMARY KEY,
            enabled INTEGER NOT NULL,
            updated_at TEXT NOT NULL
        );
        ",
    )?;

    Ok(())
}
