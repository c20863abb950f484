//! Consumers holding denormalized references to profiles by name
//!
//! Session trees, favorites and history lists refer to profiles by name
//! only. When a profile is deleted every consumer must drop those
//! references; see [`crate::crud::cascade`].

pub mod tree;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::profile::names_equal;

pub use tree::SessionTree;

/// Result type for consumer operations
pub type ConsumerResult<T> = Result<T, ConsumerError>;

/// Errors raised by a consumer domain
#[derive(Debug, Error)]
pub enum ConsumerError {
    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("JSON parse error in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Consumer '{0}' unavailable")]
    Unavailable(String),
}

/// A domain's persisted configuration blob
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedTreeConfig {
    /// Profile names with a session node
    #[serde(default)]
    pub sessions: Vec<String>,
    /// Favorite entries, formatted `[profile]: label`
    #[serde(default)]
    pub favorites: Vec<String>,
}

/// A subsystem that references profiles by name
pub trait ProfileConsumer {
    /// Domain name, also the key of its persisted configuration
    fn domain(&self) -> &str;

    /// Recently opened entries, formatted `[profile]: path`
    fn file_history(&self) -> Vec<String>;

    /// # Errors
    /// Returns an error if the history cannot be persisted
    fn remove_file_history(&mut self, entry: &str) -> ConsumerResult<()>;

    /// Profile names that have a favorites node
    fn favorite_profiles(&self) -> Vec<String>;

    /// Drop a profile's favorites node and its children
    ///
    /// # Errors
    /// Returns an error if the favorites cannot be updated
    fn remove_favorite_profile(&mut self, name: &str) -> ConsumerResult<()>;

    /// Profile names with a session node
    fn session_names(&self) -> Vec<String>;

    /// Remove a session node from the tree
    ///
    /// # Errors
    /// Returns an error if the node cannot be removed
    fn hide_session(&mut self, name: &str) -> ConsumerResult<()>;

    /// Read the persisted configuration
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be read
    fn load_config(&self) -> ConsumerResult<PersistedTreeConfig>;

    /// Write the persisted configuration
    ///
    /// # Errors
    /// Returns an error if the configuration cannot be written
    fn save_config(&mut self, config: &PersistedTreeConfig) -> ConsumerResult<()>;

    /// Mark the consumer as needing a refresh
    fn refresh(&mut self);
}

/// Format a reference entry, e.g. `[dev]: /u/alice/file.txt`
#[must_use]
pub fn format_reference(profile: &str, label: &str) -> String {
    format!("[{profile}]: {label}")
}

/// Profile name an entry refers to, if it is in `[profile]: label` form
#[must_use]
pub fn referenced_profile(entry: &str) -> Option<&str> {
    let rest = entry.trim().strip_prefix('[')?;
    let end = rest.find(']')?;
    Some(&rest[..end])
}

/// Whether an entry refers to the named profile (ignoring case)
#[must_use]
pub fn references(entry: &str, name: &str) -> bool {
    referenced_profile(entry).is_some_and(|p| names_equal(p.trim(), name))
}
