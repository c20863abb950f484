//! Validation state machine
//!
//! Per profile name the status moves Unverified -> {Active, Inactive} and
//! may re-enter any state on demand. Results are cached by name with
//! last-write-wins semantics; an `Active` entry short-circuits later
//! validations until the cache is cleared.
//!
//! Two concurrent validations of the same name that both miss the cache will
//! both run the check. The later result wins.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::check::{CheckError, Reachability, ReachabilityCheck};
use super::status::{SessionHandle, ValidationResult};
use super::tag::{DisplayTag, ProfileRef};
use crate::error::{ProfileError, ProfileResult};
use crate::profile::Profile;
use crate::ui::Progress;

/// Checks run unattended and never ask for missing credentials
const PROMPT_ALLOWED: bool = false;

/// Caches validation results and settings, and drives checks
pub struct ProfileValidator {
    checkers: HashMap<String, Arc<dyn ReachabilityCheck>>,
    statuses: Mutex<HashMap<String, ValidationResult>>,
    settings: Mutex<HashMap<String, bool>>,
    default_enabled: bool,
    timeout: Option<Duration>,
    progress: Option<Arc<dyn Progress>>,
}

impl Default for ProfileValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileValidator {
    /// Validator with no checkers; every profile validates as `unverified`
    #[must_use]
    pub fn new() -> Self {
        Self {
            checkers: HashMap::new(),
            statuses: Mutex::new(HashMap::new()),
            settings: Mutex::new(HashMap::new()),
            default_enabled: true,
            timeout: None,
            progress: None,
        }
    }

    /// Register the check used for a profile type
    #[must_use]
    pub fn with_checker(mut self, profile_type: &str, checker: Arc<dyn ReachabilityCheck>) -> Self {
        self.checkers.insert(profile_type.to_string(), checker);
        self
    }

    /// Setting reported for names with no stored setting
    #[must_use]
    pub fn with_default_enabled(mut self, enabled: bool) -> Self {
        self.default_enabled = enabled;
        self
    }

    /// Upper bound on a single check
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn Progress>) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Whether a checker is registered for a type
    #[must_use]
    pub fn has_checker(&self, profile_type: &str) -> bool {
        self.checkers.contains_key(profile_type)
    }

    // ------------------------------------------------------------------
    // Settings
    // ------------------------------------------------------------------

    /// Whether live validation is allowed for a profile
    #[must_use]
    pub fn get_validation_setting(&self, name: &str) -> bool {
        let settings = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
        settings.get(name).copied().unwrap_or(self.default_enabled)
    }

    /// Set the flag. Does not trigger a check.
    pub fn set_validation_setting(&self, name: &str, enabled: bool) {
        let mut settings = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
        settings.insert(name.to_string(), enabled);
    }

    /// Replace all settings, e.g. with the persisted ones
    pub fn load_settings(&self, loaded: HashMap<String, bool>) {
        let mut settings = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
        *settings = loaded;
    }

    // ------------------------------------------------------------------
    // Cache
    // ------------------------------------------------------------------

    /// Cached result for a name
    #[must_use]
    pub fn cached_status(&self, name: &str) -> Option<ValidationResult> {
        let statuses = self.statuses.lock().unwrap_or_else(PoisonError::into_inner);
        statuses.get(name).cloned()
    }

    /// Number of cached results
    #[must_use]
    pub fn cache_len(&self) -> usize {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Drop every cached result
    pub fn clear_cache(&self) {
        let mut statuses = self.statuses.lock().unwrap_or_else(PoisonError::into_inner);
        let dropped = statuses.len();
        statuses.clear();
        tracing::debug!(dropped, "cleared validation cache");
    }

    /// Drop the cached result and setting for a name
    pub fn forget(&self, name: &str) {
        self.statuses
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(name);
    }

    fn record(&self, result: ValidationResult) {
        let mut statuses = self.statuses.lock().unwrap_or_else(PoisonError::into_inner);
        statuses.insert(result.name.clone(), result);
    }

    // ------------------------------------------------------------------
    // Checks
    // ------------------------------------------------------------------

    /// Top-level check before a profile's session is used.
    ///
    /// Returns `unverified` without any check when validation is disabled for
    /// the profile. Unexpected errors become `inactive`.
    pub async fn check_current_profile(
        &self,
        profile: &Profile,
        cancel: &CancellationToken,
    ) -> ValidationResult {
        if !self.get_validation_setting(&profile.name) {
            tracing::debug!(profile = %profile.name, "validation disabled, skipping check");
            let result = ValidationResult::unverified(&profile.name);
            self.record(result.clone());
            return result;
        }

        match self.validate(profile, cancel).await {
            Ok(result) => result,
            Err(e) => {
                tracing::warn!(profile = %profile.name, error = %e, "validation failed unexpectedly");
                let result = ValidationResult::inactive(&profile.name);
                self.record(result.clone());
                result
            }
        }
    }

    /// Validate a profile, returning a cached `active` result when present.
    ///
    /// Cancellation yields `unverified`; a failing check yields `inactive`.
    /// Every outcome replaces the cached entry for the name.
    ///
    /// # Errors
    /// Returns `EmptyName` for a profile without a name
    pub async fn validate(
        &self,
        profile: &Profile,
        cancel: &CancellationToken,
    ) -> ProfileResult<ValidationResult> {
        if profile.name.trim().is_empty() {
            return Err(ProfileError::EmptyName);
        }

        if let Some(cached) = self.cached_status(&profile.name) {
            if cached.is_active() {
                tracing::debug!(profile = %profile.name, "validation cache hit");
                return Ok(cached);
            }
        }

        let Some(checker) = self.checkers.get(&profile.profile_type).cloned() else {
            tracing::debug!(profile_type = %profile.profile_type, "no reachability check registered");
            let result = ValidationResult::unverified(&profile.name);
            self.record(result.clone());
            return Ok(result);
        };

        let span = tracing::info_span!(
            "validate_profile",
            profile = %profile.name,
            profile_type = %profile.profile_type
        );

        async {
            let title = format!("Validating profile '{}'", profile.name);
            if let Some(progress) = &self.progress {
                progress.begin(&title);
            }

            let outcome = tokio::select! {
                biased;
                () = cancel.cancelled() => None,
                outcome = self.run_check(checker.as_ref(), profile) => Some(outcome),
            };

            let result = match outcome {
                None => {
                    tracing::info!("validation cancelled");
                    ValidationResult::unverified(&profile.name)
                }
                Some(Ok((Reachability::Active, session))) => ValidationResult::active(
                    &profile.name,
                    session.unwrap_or_else(|| SessionHandle::for_profile(profile)),
                ),
                Some(Ok((Reachability::Inactive, _))) => ValidationResult::inactive(&profile.name),
                Some(Err(e)) => {
                    let failure = ProfileError::ValidationFailure {
                        name: profile.name.clone(),
                        message: e.to_string(),
                    };
                    tracing::warn!(error = %failure, "reachability check failed");
                    ValidationResult::inactive(&profile.name)
                }
            };

            self.record(result.clone());
            if let Some(progress) = &self.progress {
                progress.end(&title);
            }
            tracing::info!(status = %result.status, "validation finished");
            Ok(result)
        }
        .instrument(span)
        .await
    }

    async fn run_check(
        &self,
        checker: &dyn ReachabilityCheck,
        profile: &Profile,
    ) -> Result<(Reachability, Option<SessionHandle>), CheckError> {
        let check = checker.get_status(profile, &profile.profile_type, PROMPT_ALLOWED);
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, check)
                .await
                .map_err(|_| CheckError::Timeout(limit.as_secs()))??,
            None => check.await?,
        };
        Ok((outcome.reachability, outcome.session))
    }

    // ------------------------------------------------------------------
    // Display tags
    // ------------------------------------------------------------------

    /// Current display tag for a name
    #[must_use]
    pub fn display_tag(&self, name: &str) -> DisplayTag {
        DisplayTag::project(
            self.get_validation_setting(name),
            self.cached_status(name).map(|r| r.status),
        )
    }

    /// Turn validation on for a profile reference and recompute its tag
    #[must_use]
    pub fn enable_validation(&self, node: &ProfileRef) -> ProfileRef {
        self.set_validation_setting(&node.name, true);
        let tag = node.tag.enable();
        if tag == node.tag {
            return node.clone();
        }
        node.clone().with_tag(tag)
    }

    /// Turn validation off for a profile reference and recompute its tag
    #[must_use]
    pub fn disable_validation(&self, node: &ProfileRef) -> ProfileRef {
        self.set_validation_setting(&node.name, false);
        let tag = node.tag.disable();
        if tag == node.tag {
            return node.clone();
        }
        node.clone().with_tag(tag)
    }
}
