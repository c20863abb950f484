//! JSON-backed session tree
//!
//! One tree per domain. The file at `<data>/trees/<domain>.json` holds the
//! persisted `sessions` and `favorites` arrays plus the file history. The
//! in-memory nodes are loaded from it on open and diverge until `save`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::{
    format_reference, referenced_profile, references, ConsumerError, ConsumerResult,
    PersistedTreeConfig, ProfileConsumer,
};
use crate::profile::names_equal;

/// Domains shipped with hostbook
pub const DEFAULT_DOMAINS: [&str; 3] = ["datasets", "files", "jobs"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct TreeFile {
    #[serde(default)]
    sessions: Vec<String>,
    #[serde(default)]
    favorites: Vec<String>,
    #[serde(default)]
    history: Vec<String>,
}

/// A session tree for one domain
#[derive(Debug, Clone)]
pub struct SessionTree {
    domain: String,
    path: Option<PathBuf>,
    sessions: Vec<String>,
    favorites: Vec<String>,
    history: Vec<String>,
    // Persisted state used when there is no backing file
    detached: TreeFile,
    needs_refresh: bool,
}

impl SessionTree {
    /// Open the tree for a domain, creating nothing until the first write
    ///
    /// # Errors
    /// Returns an error if an existing file cannot be read or parsed
    pub fn open(domain: impl Into<String>, path: PathBuf) -> ConsumerResult<Self> {
        let file = read_tree_file(&path)?;
        Ok(Self {
            domain: domain.into(),
            sessions: file.sessions.clone(),
            favorites: file.favorites.clone(),
            history: file.history.clone(),
            path: Some(path),
            detached: TreeFile::default(),
            needs_refresh: false,
        })
    }

    /// Open every default domain under `<data_dir>/trees`
    ///
    /// # Errors
    /// Returns an error if any tree file cannot be read
    pub fn open_defaults(data_dir: &Path) -> ConsumerResult<Vec<Self>> {
        DEFAULT_DOMAINS
            .iter()
            .map(|domain| Self::open(*domain, data_dir.join("trees").join(format!("{domain}.json"))))
            .collect()
    }

    /// Tree with no backing file
    pub fn in_memory(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            path: None,
            sessions: Vec::new(),
            favorites: Vec::new(),
            history: Vec::new(),
            detached: TreeFile::default(),
            needs_refresh: false,
        }
    }

    /// Add a session node, ignoring duplicates
    pub fn add_session(&mut self, name: &str) {
        if !self.sessions.iter().any(|s| names_equal(s, name)) {
            self.sessions.push(name.to_string());
        }
    }

    /// Add a favorite under a profile
    pub fn add_favorite(&mut self, profile: &str, label: &str) {
        let entry = format_reference(profile, label);
        if !self.favorites.contains(&entry) {
            self.favorites.push(entry);
        }
    }

    /// Record a history entry, most recent first
    pub fn add_history(&mut self, profile: &str, label: &str) {
        let entry = format_reference(profile, label);
        self.history.retain(|h| h != &entry);
        self.history.insert(0, entry);
    }

    /// Favorite entries currently in the tree
    #[must_use]
    pub fn favorites(&self) -> &[String] {
        &self.favorites
    }

    /// Whether the tree was marked for refresh
    #[must_use]
    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    /// Persist every in-memory node
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub fn save(&mut self) -> ConsumerResult<()> {
        let file = TreeFile {
            sessions: self.sessions.clone(),
            favorites: self.favorites.clone(),
            history: self.history.clone(),
        };
        self.write(&file)
    }

    /// Reload the in-memory nodes from the persisted state
    ///
    /// # Errors
    /// Returns an error if the file cannot be read
    pub fn reload(&mut self) -> ConsumerResult<()> {
        let file = self.read()?;
        self.sessions = file.sessions;
        self.favorites = file.favorites;
        self.history = file.history;
        self.needs_refresh = false;
        Ok(())
    }

    fn read(&self) -> ConsumerResult<TreeFile> {
        match &self.path {
            Some(path) => read_tree_file(path),
            None => Ok(self.detached.clone()),
        }
    }

    fn write(&mut self, file: &TreeFile) -> ConsumerResult<()> {
        let Some(path) = &self.path else {
            self.detached = file.clone();
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| io_error(parent, &e))?;
        }
        let json = serde_json::to_string_pretty(file).map_err(|e| ConsumerError::Parse {
            path: path.clone(),
            message: e.to_string(),
        })?;
        fs::write(path, json).map_err(|e| io_error(path, &e))
    }
}

fn io_error(path: &Path, e: &std::io::Error) -> ConsumerError {
    ConsumerError::Io {
        path: path.to_path_buf(),
        message: e.to_string(),
    }
}

fn read_tree_file(path: &Path) -> ConsumerResult<TreeFile> {
    if !path.exists() {
        return Ok(TreeFile::default());
    }
    let content = fs::read_to_string(path).map_err(|e| io_error(path, &e))?;
    serde_json::from_str(&content).map_err(|e| ConsumerError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

impl ProfileConsumer for SessionTree {
    fn domain(&self) -> &str {
        &self.domain
    }

    fn file_history(&self) -> Vec<String> {
        self.history.clone()
    }

    fn remove_file_history(&mut self, entry: &str) -> ConsumerResult<()> {
        self.history.retain(|h| h != entry);

        // History is persisted as soon as it changes
        let mut file = self.read()?;
        file.history.retain(|h| h != entry);
        self.write(&file)
    }

    fn favorite_profiles(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for entry in &self.favorites {
            if let Some(profile) = referenced_profile(entry) {
                if !names.iter().any(|n| n == profile) {
                    names.push(profile.to_string());
                }
            }
        }
        names
    }

    fn remove_favorite_profile(&mut self, name: &str) -> ConsumerResult<()> {
        self.favorites.retain(|f| !references(f, name));
        Ok(())
    }

    fn session_names(&self) -> Vec<String> {
        self.sessions.clone()
    }

    fn hide_session(&mut self, name: &str) -> ConsumerResult<()> {
        self.sessions.retain(|s| !names_equal(s, name));
        Ok(())
    }

    fn load_config(&self) -> ConsumerResult<PersistedTreeConfig> {
        let file = self.read()?;
        Ok(PersistedTreeConfig {
            sessions: file.sessions,
            favorites: file.favorites,
        })
    }

    fn save_config(&mut self, config: &PersistedTreeConfig) -> ConsumerResult<()> {
        let mut file = self.read()?;
        file.sessions.clone_from(&config.sessions);
        file.favorites.clone_from(&config.favorites);
        self.write(&file)
    }

    fn refresh(&mut self) {
        self.needs_refresh = true;
    }
}
