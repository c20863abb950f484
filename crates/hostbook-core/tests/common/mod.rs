//! Shared test doubles for integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use hostbook_core::consumer::{ConsumerError, ConsumerResult, PersistedTreeConfig, ProfileConsumer, SessionTree};
use hostbook_core::storage::{Database, LoadRequest, ProfileStore, SqliteProfileStore, StoreError, StoreResult};
use hostbook_core::ui::{InputRequest, MessageLevel, Notifier, PickRequest, Prompter};
use hostbook_core::validation::{
    CheckError, CheckOutcome, Reachability, ReachabilityCheck, SessionHandle,
};
use hostbook_core::{Profile, ProfileRegistry, ProfileValidator, TypeCatalog};

// =============================================================================
// Prompter
// =============================================================================

/// Replays queued answers. An exhausted queue behaves like a dismissed prompt.
#[derive(Default)]
pub struct ScriptedPrompter {
    inputs: VecDeque<Option<String>>,
    picks: VecDeque<Option<usize>>,
    confirms: VecDeque<bool>,
    pub seen_inputs: Vec<InputRequest>,
    pub seen_picks: Vec<PickRequest>,
}

impl ScriptedPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn typed(mut self, value: &str) -> Self {
        self.inputs.push_back(Some(value.to_string()));
        self
    }

    pub fn dismissed(mut self) -> Self {
        self.inputs.push_back(None);
        self
    }

    pub fn picked(mut self, index: usize) -> Self {
        self.picks.push_back(Some(index));
        self
    }

    pub fn no_pick(mut self) -> Self {
        self.picks.push_back(None);
        self
    }

    pub fn confirmed(mut self, answer: bool) -> Self {
        self.confirms.push_back(answer);
        self
    }
}

impl Prompter for ScriptedPrompter {
    fn input(&mut self, request: &InputRequest) -> Option<String> {
        self.seen_inputs.push(request.clone());
        self.inputs.pop_front().flatten()
    }

    fn pick(&mut self, request: &PickRequest) -> Option<usize> {
        self.seen_picks.push(request.clone());
        self.picks.pop_front().flatten()
    }

    fn confirm(&mut self, _message: &str) -> bool {
        self.confirms.pop_front().unwrap_or(false)
    }
}

// =============================================================================
// Notifier
// =============================================================================

#[derive(Default)]
pub struct RecordingNotifier {
    messages: RefCell<Vec<(MessageLevel, String)>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<(MessageLevel, String)> {
        self.messages.borrow().clone()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.borrow().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: MessageLevel, message: &str) {
        self.messages.borrow_mut().push((level, message.to_string()));
    }
}

// =============================================================================
// Reachability checks
// =============================================================================

/// Check with a fixed answer that counts its invocations
pub struct StubCheck {
    reachability: Reachability,
    delay: Option<Duration>,
    fail: bool,
    calls: AtomicUsize,
}

impl StubCheck {
    pub fn active() -> Arc<Self> {
        Arc::new(Self::with(Reachability::Active, None, false))
    }

    pub fn inactive() -> Arc<Self> {
        Arc::new(Self::with(Reachability::Inactive, None, false))
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self::with(Reachability::Inactive, None, true))
    }

    pub fn slow(delay: Duration) -> Arc<Self> {
        Arc::new(Self::with(Reachability::Active, Some(delay), false))
    }

    fn with(reachability: Reachability, delay: Option<Duration>, fail: bool) -> Self {
        Self {
            reachability,
            delay,
            fail,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReachabilityCheck for StubCheck {
    async fn get_status(
        &self,
        profile: &Profile,
        _profile_type: &str,
        _prompt_allowed: bool,
    ) -> Result<CheckOutcome, CheckError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.fail {
            return Err(CheckError::Transport("connection refused".into()));
        }
        Ok(match self.reachability {
            Reachability::Active => CheckOutcome::active(SessionHandle::for_profile(profile)),
            Reachability::Inactive => CheckOutcome::inactive(),
        })
    }
}

// =============================================================================
// Consumers
// =============================================================================

/// Session tree whose session removal always fails
pub struct BrokenSessionsTree {
    pub inner: SessionTree,
}

impl ProfileConsumer for BrokenSessionsTree {
    fn domain(&self) -> &str {
        self.inner.domain()
    }

    fn file_history(&self) -> Vec<String> {
        self.inner.file_history()
    }

    fn remove_file_history(&mut self, entry: &str) -> ConsumerResult<()> {
        self.inner.remove_file_history(entry)
    }

    fn favorite_profiles(&self) -> Vec<String> {
        self.inner.favorite_profiles()
    }

    fn remove_favorite_profile(&mut self, name: &str) -> ConsumerResult<()> {
        self.inner.remove_favorite_profile(name)
    }

    fn session_names(&self) -> Vec<String> {
        self.inner.session_names()
    }

    fn hide_session(&mut self, _name: &str) -> ConsumerResult<()> {
        Err(ConsumerError::Unavailable(self.inner.domain().to_string()))
    }

    fn load_config(&self) -> ConsumerResult<PersistedTreeConfig> {
        self.inner.load_config()
    }

    fn save_config(&mut self, config: &PersistedTreeConfig) -> ConsumerResult<()> {
        self.inner.save_config(config)
    }

    fn refresh(&mut self) {
        self.inner.refresh();
    }
}

// =============================================================================
// Stores
// =============================================================================

/// Store that declines every update for lack of credentials
pub struct NoCredentialsStore {
    pub inner: Arc<SqliteProfileStore>,
}

impl ProfileStore for NoCredentialsStore {
    fn load_all(&self, profile_type: &str) -> StoreResult<Vec<Profile>> {
        self.inner.load_all(profile_type)
    }

    fn load(&self, profile_type: &str, request: LoadRequest<'_>) -> StoreResult<Profile> {
        self.inner.load(profile_type, request)
    }

    fn save(&self, profile: &Profile) -> StoreResult<Profile> {
        self.inner.save(profile)
    }

    fn update(&self, profile: &Profile) -> StoreResult<Profile> {
        Err(StoreError::MissingCredentials(profile.name.clone()))
    }

    fn delete(&self, profile: &Profile) -> StoreResult<Profile> {
        self.inner.delete(profile)
    }

    fn set_default(&self, profile_type: &str, name: &str) -> StoreResult<()> {
        self.inner.set_default(profile_type, name)
    }
}

// =============================================================================
// Registry
// =============================================================================

pub fn store() -> Arc<SqliteProfileStore> {
    Arc::new(SqliteProfileStore::new(Arc::new(Database::in_memory().unwrap())))
}

pub fn registry_with(store: Arc<SqliteProfileStore>, validator: ProfileValidator) -> ProfileRegistry {
    ProfileRegistry::new(store, TypeCatalog::with_builtins(), Arc::new(validator))
}

pub fn registry_over(store: Arc<dyn ProfileStore>) -> ProfileRegistry {
    ProfileRegistry::new(store, TypeCatalog::with_builtins(), Arc::new(ProfileValidator::new()))
}

pub fn empty_registry() -> ProfileRegistry {
    registry_with(store(), ProfileValidator::new())
}
