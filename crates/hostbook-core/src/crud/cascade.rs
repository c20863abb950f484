//! Cascading cleanup of profile references
//!
//! Each step is idempotent: running the cascade again for the same name
//! finds nothing left to remove. A failing step is recorded and the next
//! step still runs.

use std::fmt;

use crate::consumer::{references, ConsumerResult, ProfileConsumer};
use crate::profile::{names_equal, Profile};

/// One cleanup step applied to a consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CascadeStep {
    History,
    Favorites,
    Sessions,
    PersistedConfig,
}

impl fmt::Display for CascadeStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::History => "history",
            Self::Favorites => "favorites",
            Self::Sessions => "sessions",
            Self::PersistedConfig => "persisted config",
        };
        write!(f, "{s}")
    }
}

/// Completion record for one consumer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CascadeReport {
    pub domain: String,
    pub completed: Vec<CascadeStep>,
    pub failed: Vec<(CascadeStep, String)>,
    /// Number of references removed across all steps
    pub removed: usize,
}

impl CascadeReport {
    fn new(domain: &str) -> Self {
        Self {
            domain: domain.to_string(),
            completed: Vec::new(),
            failed: Vec::new(),
            removed: 0,
        }
    }

    fn record(&mut self, step: CascadeStep, outcome: ConsumerResult<usize>) {
        match outcome {
            Ok(removed) => {
                self.removed += removed;
                self.completed.push(step);
            }
            Err(e) => {
                tracing::warn!(domain = %self.domain, step = %step, error = %e, "cascade step failed");
                self.failed.push((step, e.to_string()));
            }
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Outcome of a confirmed delete
#[derive(Debug, Clone, PartialEq)]
pub struct DeleteReport {
    /// The profile as it was removed from the store
    pub profile: Profile,
    pub consumers: Vec<CascadeReport>,
}

impl DeleteReport {
    /// Whether every consumer finished every step
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.consumers.iter().all(CascadeReport::is_complete)
    }
}

fn purge_history(consumer: &mut dyn ProfileConsumer, name: &str) -> ConsumerResult<usize> {
    let stale: Vec<String> = consumer
        .file_history()
        .into_iter()
        .filter(|entry| references(entry, name))
        .collect();
    for entry in &stale {
        consumer.remove_file_history(entry)?;
    }
    Ok(stale.len())
}

fn purge_favorites(consumer: &mut dyn ProfileConsumer, name: &str) -> ConsumerResult<usize> {
    let present = consumer
        .favorite_profiles()
        .iter()
        .any(|p| names_equal(p, name));
    if present {
        consumer.remove_favorite_profile(name)?;
    }
    Ok(usize::from(present))
}

fn purge_sessions(consumer: &mut dyn ProfileConsumer, name: &str) -> ConsumerResult<usize> {
    let stale: Vec<String> = consumer
        .session_names()
        .into_iter()
        .filter(|s| names_equal(s, name))
        .collect();
    for session in &stale {
        consumer.hide_session(session)?;
    }
    Ok(stale.len())
}

fn purge_persisted(consumer: &mut dyn ProfileConsumer, name: &str) -> ConsumerResult<usize> {
    let mut config = consumer.load_config()?;
    let before = config.sessions.len() + config.favorites.len();

    config.sessions.retain(|s| !names_equal(s, name));
    config.favorites.retain(|f| !references(f, name));

    let removed = before - (config.sessions.len() + config.favorites.len());
    if removed > 0 {
        consumer.save_config(&config)?;
    }
    Ok(removed)
}

/// Remove every reference to `name` from one consumer, then mark it for
/// refresh
pub fn purge_references(consumer: &mut dyn ProfileConsumer, name: &str) -> CascadeReport {
    let mut report = CascadeReport::new(consumer.domain());

    report.record(CascadeStep::History, purge_history(consumer, name));
    report.record(CascadeStep::Favorites, purge_favorites(consumer, name));
    report.record(CascadeStep::Sessions, purge_sessions(consumer, name));
    report.record(CascadeStep::PersistedConfig, purge_persisted(consumer, name));

    consumer.refresh();
    tracing::debug!(
        domain = %report.domain,
        profile = %name,
        removed = report.removed,
        "purged profile references"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consumer::SessionTree;

    fn populated_tree() -> SessionTree {
        let mut tree = SessionTree::in_memory("files");
        tree.add_session("dev");
        tree.add_session("prod");
        tree.add_favorite("dev", "/u/alice");
        tree.add_favorite("prod", "/u/bob");
        tree.add_history("DEV", "/u/alice/a.txt");
        tree.add_history("prod", "/u/bob/b.txt");
        tree.save().unwrap();
        tree
    }

    #[test]
    fn test_purge_removes_every_reference() {
        let mut tree = populated_tree();

        let report = purge_references(&mut tree, "dev");

        assert!(report.is_complete());
        assert_eq!(report.completed.len(), 4);
        assert_eq!(tree.session_names(), vec!["prod"]);
        assert_eq!(tree.favorite_profiles(), vec!["prod"]);
        assert_eq!(tree.file_history(), vec!["[prod]: /u/bob/b.txt"]);

        let config = tree.load_config().unwrap();
        assert_eq!(config.sessions, vec!["prod"]);
        assert_eq!(config.favorites, vec!["[prod]: /u/bob"]);
        assert!(tree.needs_refresh());
    }

    #[test]
    fn test_purge_is_idempotent() {
        let mut tree = populated_tree();

        let first = purge_references(&mut tree, "dev");
        let second = purge_references(&mut tree, "dev");

        assert!(first.removed > 0);
        assert_eq!(second.removed, 0);
        assert!(second.is_complete());
    }
}
