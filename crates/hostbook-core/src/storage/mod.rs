//! Storage layer (`SQLite`)

pub mod db;
pub mod migrations;
pub mod profiles;
pub mod settings;

pub use db::{Database, StoreError, StoreResult};
pub use profiles::{LoadRequest, ProfileStore, SqliteProfileStore};
pub use settings::ValidationSettingsStore;
