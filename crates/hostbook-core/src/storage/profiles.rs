//! Profile storage operations (CRUD)
//!
//! `ProfileStore` is the backing-store contract the registry and CRUD layer
//! depend on. `SqliteProfileStore` keeps one logical partition per profile
//! type in a single table.

use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use std::sync::Arc;
use uuid::Uuid;

use super::db::{Database, StoreError, StoreResult};
use crate::profile::{FieldValues, Profile};

/// What to load from a type's partition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadRequest<'a> {
    /// The profile with exactly this name
    Named(&'a str),
    /// The type's marked default profile
    Default,
}

/// Backing store contract, one partition per profile type
pub trait ProfileStore: Send + Sync {
    /// Load every profile of a type
    ///
    /// # Errors
    /// Returns an error if the partition cannot be read
    fn load_all(&self, profile_type: &str) -> StoreResult<Vec<Profile>>;

    /// Load one profile by name, or the type's default
    ///
    /// # Errors
    /// Returns `NotFound`/`NoDefault` if absent, or a read error
    fn load(&self, profile_type: &str, request: LoadRequest<'_>) -> StoreResult<Profile>;

    /// Persist a new profile
    ///
    /// # Errors
    /// Returns `AlreadyExists` on a name collision, or a write error
    fn save(&self, profile: &Profile) -> StoreResult<Profile>;

    /// Replace the stored fields of an existing profile
    ///
    /// # Errors
    /// Returns `NotFound` if the profile does not exist, or a write error
    fn update(&self, profile: &Profile) -> StoreResult<Profile>;

    /// Remove a profile, returning what was removed
    ///
    /// # Errors
    /// Returns `NotFound` if the profile does not exist, or a write error
    fn delete(&self, profile: &Profile) -> StoreResult<Profile>;

    /// Mark a profile as its type's default
    ///
    /// # Errors
    /// Returns `NotFound` if the profile does not exist, or a write error
    fn set_default(&self, profile_type: &str, name: &str) -> StoreResult<()>;
}

/// `SQLite`-backed profile store
#[derive(Clone)]
pub struct SqliteProfileStore {
    db: Arc<Database>,
}

impl SqliteProfileStore {
    /// Create a new profile store
    #[must_use]
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

fn encode_fields(fields: &FieldValues) -> StoreResult<String> {
    serde_json::to_string(fields)
        .map_err(|e| StoreError::Serialization(format!("Failed to serialize profile: {e}")))
}

fn decode_row(name: String, profile_type: String, data: &str) -> StoreResult<Profile> {
    let fields: FieldValues = serde_json::from_str(data)
        .map_err(|e| StoreError::Serialization(format!("Failed to parse profile '{name}': {e}")))?;
    Ok(Profile {
        name,
        profile_type,
        fields,
    })
}

fn not_found(profile: &Profile) -> StoreError {
    StoreError::NotFound {
        profile_type: profile.profile_type.clone(),
        name: profile.name.clone(),
    }
}

fn query_one(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> StoreResult<Option<Profile>> {
    let row = conn
        .query_row(sql, params, |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })
        .optional()?;

    row.map(|(name, profile_type, data)| decode_row(name, profile_type, &data))
        .transpose()
}

impl ProfileStore for SqliteProfileStore {
    fn load_all(&self, profile_type: &str) -> StoreResult<Vec<Profile>> {
        self.db.with_conn(|conn| {
            let mut stmt = conn.prepare(
                r"
                SELECT name, profile_type, data FROM profiles
                WHERE profile_type = ?1
                ORDER BY name COLLATE NOCASE
                ",
            )?;

            let rows = stmt.query_map(params![profile_type], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })?;

            let mut profiles = Vec::new();
            for row in rows {
                let (name, profile_type, data) = row?;
                profiles.push(decode_row(name, profile_type, &data)?);
            }
            Ok(profiles)
        })
    }

    fn load(&self, profile_type: &str, request: LoadRequest<'_>) -> StoreResult<Profile> {
        self.db.with_conn(|conn| match request {
            LoadRequest::Named(name) => query_one(
                conn,
                "SELECT name, profile_type, data FROM profiles WHERE profile_type = ?1 AND name = ?2",
                params![profile_type, name],
            )?
            .ok_or_else(|| StoreError::NotFound {
                profile_type: profile_type.to_string(),
                name: name.to_string(),
            }),
            LoadRequest::Default => query_one(
                conn,
                "SELECT name, profile_type, data FROM profiles WHERE profile_type = ?1 AND is_default = 1",
                params![profile_type],
            )?
            .ok_or_else(|| StoreError::NoDefault(profile_type.to_string())),
        })
    }

    fn save(&self, profile: &Profile) -> StoreResult<Profile> {
        let data = encode_fields(&profile.fields)?;
        let now = Utc::now().to_rfc3339();

        self.db.with_conn(|conn| {
            let result = conn.execute(
                r"
                INSERT INTO profiles (id, name, profile_type, data, is_default, created_at, updated_at)
                VALUES (?1, ?2, ?3, ?4, 0, ?5, ?5)
                ",
                params![
                    Uuid::new_v4().to_string(),
                    profile.name,
                    profile.profile_type,
                    data,
                    now,
                ],
            );

            match result {
                Ok(_) => Ok(profile.clone()),
                Err(rusqlite::Error::SqliteFailure(e, _))
                    if e.code == ErrorCode::ConstraintViolation =>
                {
                    Err(StoreError::AlreadyExists(profile.name.clone()))
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn update(&self, profile: &Profile) -> StoreResult<Profile> {
        let data = encode_fields(&profile.fields)?;

        self.db.with_conn(|conn| {
            let updated = conn.execute(
                r"
                UPDATE profiles
                SET data = ?1, updated_at = ?2
                WHERE profile_type = ?3 AND name = ?4
                ",
                params![
                    data,
                    Utc::now().to_rfc3339(),
                    profile.profile_type,
                    profile.name,
                ],
            )?;

            if updated == 0 {
                return Err(not_found(profile));
            }
            Ok(profile.clone())
        })
    }

    fn delete(&self, profile: &Profile) -> StoreResult<Profile> {
        self.db.with_conn(|conn| {
            let existing = query_one(
                conn,
                "SELECT name, profile_type, data FROM profiles WHERE profile_type = ?1 AND name = ?2",
                params![profile.profile_type, profile.name],
            )?
            .ok_or_else(|| not_found(profile))?;

            conn.execute(
                "DELETE FROM profiles WHERE profile_type = ?1 AND name = ?2",
                params![profile.profile_type, profile.name],
            )?;

            Ok(existing)
        })
    }

    fn set_default(&self, profile_type: &str, name: &str) -> StoreResult<()> {
        self.db.with_conn(|conn| {
            let tx = conn.transaction()?;

            tx.execute(
                "UPDATE profiles SET is_default = 0 WHERE profile_type = ?1",
                params![profile_type],
            )?;
            let marked = tx.execute(
                "UPDATE profiles SET is_default = 1 WHERE profile_type = ?1 AND name = ?2",
                params![profile_type, name],
            )?;

            if marked == 0 {
                // Dropping the transaction rolls back the cleared flags
                return Err(StoreError::NotFound {
                    profile_type: profile_type.to_string(),
                    name: name.to_string(),
                });
            }

            tx.commit()?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::fields;

    fn store() -> SqliteProfileStore {
        SqliteProfileStore::new(Arc::new(Database::in_memory().unwrap()))
    }

    #[test]
    fn test_save_and_load_named() {
        let store = store();
        let profile = Profile::new("dev", "http")
            .with_field(fields::HOST, "example.com")
            .with_field(fields::PORT, 443);
        store.save(&profile).unwrap();

        let loaded = store.load("http", LoadRequest::Named("dev")).unwrap();
        assert_eq!(loaded, profile);

        // exact match within the type partition
        assert!(store.load("ssh", LoadRequest::Named("dev")).unwrap_err().is_not_found());
    }

    #[test]
    fn test_save_rejects_case_insensitive_duplicate() {
        let store = store();
        store.save(&Profile::new("Dev", "http")).unwrap();

        let err = store.save(&Profile::new("dev", "ssh")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists(name) if name == "dev"));
    }

    #[test]
    fn test_update_missing_profile() {
        let store = store();
        let err = store.update(&Profile::new("ghost", "http")).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_delete_returns_removed_profile() {
        let store = store();
        let profile = Profile::new("dev", "http").with_field(fields::USER, "alice");
        store.save(&profile).unwrap();

        let removed = store.delete(&Profile::new("dev", "http")).unwrap();
        assert_eq!(removed.user(), Some("alice"));
        assert!(store.load_all("http").unwrap().is_empty());
        assert!(store.delete(&profile).unwrap_err().is_not_found());
    }

    #[test]
    fn test_set_default_moves_marker() {
        let store = store();
        store.save(&Profile::new("a", "http")).unwrap();
        store.save(&Profile::new("b", "http")).unwrap();

        assert!(matches!(
            store.load("http", LoadRequest::Default),
            Err(StoreError::NoDefault(_))
        ));

        store.set_default("http", "a").unwrap();
        assert_eq!(store.load("http", LoadRequest::Default).unwrap().name, "a");

        store.set_default("http", "b").unwrap();
        assert_eq!(store.load("http", LoadRequest::Default).unwrap().name, "b");

        // unknown name leaves the previous default in place
        assert!(store.set_default("http", "zzz").is_err());
        assert_eq!(store.load("http", LoadRequest::Default).unwrap().name, "b");
    }

    #[test]
    fn test_load_all_sorted_by_name() {
        let store = store();
        store.save(&Profile::new("zeta", "ssh")).unwrap();
        store.save(&Profile::new("Alpha", "ssh")).unwrap();
        store.save(&Profile::new("other", "http")).unwrap();

        let names: Vec<_> = store
            .load_all("ssh")
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["Alpha", "zeta"]);
    }
}
