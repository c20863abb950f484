//! In-memory profile registry
//!
//! Holds every loaded profile, an index by type, and the default profile per
//! type. The store stays the source of truth; `refresh` rebuilds everything
//! from it and invalidates the validation cache.

use std::collections::HashMap;
use std::sync::Arc;

use super::schema::{TypeCatalog, BASE_TYPE};
use super::types::{names_equal, Profile};
use crate::error::{ProfileError, ProfileResult};
use crate::storage::{LoadRequest, ProfileStore, StoreError};
use crate::validation::ProfileValidator;

/// Outcome of a refresh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefreshReport {
    /// Number of profiles loaded across all types
    pub loaded: usize,
    /// Types whose profiles could not be loaded
    pub failed_types: Vec<String>,
    /// Non-fatal problems, one message each
    pub warnings: Vec<String>,
}

/// Registry of all profiles, indexed by type
pub struct ProfileRegistry {
    store: Arc<dyn ProfileStore>,
    catalog: TypeCatalog,
    validator: Arc<ProfileValidator>,
    all_profiles: Vec<Profile>,
    by_type: HashMap<String, Vec<Profile>>,
    defaults: HashMap<String, Profile>,
    base_profile: Option<Profile>,
}

pub(crate) fn store_error(e: StoreError, name: &str) -> ProfileError {
    if e.is_not_found() {
        ProfileError::NotFound {
            name: name.to_string(),
        }
    } else {
        ProfileError::StoreFailure(e)
    }
}

impl ProfileRegistry {
    /// Create an empty registry. Call `refresh` to load profiles.
    pub fn new(
        store: Arc<dyn ProfileStore>,
        catalog: TypeCatalog,
        validator: Arc<ProfileValidator>,
    ) -> Self {
        Self {
            store,
            catalog,
            validator,
            all_profiles: Vec::new(),
            by_type: HashMap::new(),
            defaults: HashMap::new(),
            base_profile: None,
        }
    }

    /// Reload everything from the store.
    ///
    /// A failure for one type only degrades that type. The validation cache
    /// is cleared since cached results may be stale.
    pub fn refresh(&mut self) -> RefreshReport {
        let mut report = RefreshReport::default();

        self.all_profiles.clear();
        self.by_type.clear();
        self.defaults.clear();

        self.base_profile = match self.store.load(BASE_TYPE, LoadRequest::Default) {
            Ok(base) => Some(base),
            Err(e) if e.is_not_found() => None,
            Err(e) => {
                let message = format!("Failed to load base profile: {e}");
                tracing::warn!("{message}");
                report.warnings.push(message);
                None
            }
        };

        for profile_type in self.catalog.types() {
            let profiles = match self.store.load_all(&profile_type) {
                Ok(profiles) => profiles,
                Err(e) => {
                    let message = format!("Failed to load profiles of type '{profile_type}': {e}");
                    tracing::warn!("{message}");
                    report.warnings.push(message);
                    report.failed_types.push(profile_type);
                    continue;
                }
            };

            report.loaded += profiles.len();
            self.all_profiles.extend(profiles.iter().cloned());
            self.by_type.insert(profile_type.clone(), profiles);

            match self.store.load(&profile_type, LoadRequest::Default) {
                Ok(default) => {
                    self.defaults.insert(profile_type, default);
                }
                Err(e) if e.is_not_found() => {
                    tracing::debug!(profile_type = %profile_type, "no default profile");
                }
                Err(e) => {
                    let message =
                        format!("Failed to load default profile of type '{profile_type}': {e}");
                    tracing::warn!("{message}");
                    report.warnings.push(message);
                }
            }
        }

        self.validator.clear_cache();
        tracing::debug!(loaded = report.loaded, "registry refreshed");
        report
    }

    /// Find a profile by exact name, optionally restricted to a type
    ///
    /// # Errors
    /// Returns `NotFound` if no loaded profile matches
    pub fn load_named_profile(&self, name: &str, profile_type: Option<&str>) -> ProfileResult<Profile> {
        self.all_profiles
            .iter()
            .find(|p| p.name == name && profile_type.map_or(true, |t| p.profile_type == t))
            .cloned()
            .ok_or_else(|| ProfileError::NotFound {
                name: name.to_string(),
            })
    }

    /// Find a profile by name ignoring case
    #[must_use]
    pub fn find_by_name(&self, name: &str) -> Option<&Profile> {
        self.all_profiles.iter().find(|p| p.name_matches(name))
    }

    /// Whether any loaded profile has this name (ignoring case)
    #[must_use]
    pub fn contains_name(&self, name: &str) -> bool {
        self.find_by_name(name).is_some()
    }

    /// Loaded profiles of a type, or `None` if the type was never populated
    #[must_use]
    pub fn get_profiles(&self, profile_type: &str) -> Option<&[Profile]> {
        self.by_type.get(profile_type).map(Vec::as_slice)
    }

    /// Loaded profiles across several types, in the order given
    #[must_use]
    pub fn profiles_for_types(&self, types: &[&str]) -> Vec<&Profile> {
        types
            .iter()
            .filter_map(|t| self.get_profiles(t))
            .flatten()
            .collect()
    }

    /// Every loaded profile
    #[must_use]
    pub fn all_profiles(&self) -> &[Profile] {
        &self.all_profiles
    }

    /// Registered profile types
    #[must_use]
    pub fn get_all_types(&self) -> Vec<String> {
        self.catalog.types()
    }

    /// Names of every stored profile of a type, read from the store
    ///
    /// # Errors
    /// Returns an error if the store cannot be read
    pub fn get_names_for_type(&self, profile_type: &str) -> ProfileResult<Vec<String>> {
        let profiles = self.store.load_all(profile_type)?;
        Ok(profiles.into_iter().map(|p| p.name).collect())
    }

    /// Load a profile straight from the store, bypassing the in-memory index
    ///
    /// # Errors
    /// Returns `NotFound` if absent, or a store error
    pub fn direct_load(&self, profile_type: &str, name: &str) -> ProfileResult<Profile> {
        self.store
            .load(profile_type, LoadRequest::Named(name))
            .map_err(|e| store_error(e, name))
    }

    /// Default profile of a type, if one is marked
    #[must_use]
    pub fn default_profile(&self, profile_type: &str) -> Option<&Profile> {
        self.defaults.get(profile_type)
    }

    /// Shared base profile template
    #[must_use]
    pub fn base_profile(&self) -> Option<&Profile> {
        self.base_profile.as_ref()
    }

    /// Mark a profile as its type's default, in the store and in memory
    ///
    /// # Errors
    /// Returns `NotFound` if the profile is not loaded, or a store error
    pub fn set_default(&mut self, name: &str) -> ProfileResult<Profile> {
        let profile = self.load_named_profile(name, None)?;
        self.store
            .set_default(&profile.profile_type, &profile.name)
            .map_err(|e| store_error(e, name))?;
        self.defaults
            .insert(profile.profile_type.clone(), profile.clone());
        tracing::info!(profile = %name, profile_type = %profile.profile_type, "default profile set");
        Ok(profile)
    }

    #[must_use]
    pub fn catalog(&self) -> &TypeCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn validator(&self) -> &Arc<ProfileValidator> {
        &self.validator
    }

    pub(crate) fn store(&self) -> &dyn ProfileStore {
        self.store.as_ref()
    }

    /// Add a freshly persisted profile
    pub(crate) fn insert(&mut self, profile: Profile) {
        self.by_type
            .entry(profile.profile_type.clone())
            .or_default()
            .push(profile.clone());
        self.all_profiles.push(profile);
    }

    /// Replace a loaded profile with its updated copy
    pub(crate) fn replace(&mut self, profile: &Profile) {
        let same = |p: &Profile| p.name == profile.name && p.profile_type == profile.profile_type;
        for slot in self
            .all_profiles
            .iter_mut()
            .chain(self.by_type.values_mut().flatten())
            .filter(|p| same(&**p))
        {
            slot.clone_from(profile);
        }
        if let Some(default) = self.defaults.get_mut(&profile.profile_type) {
            if same(default) {
                default.clone_from(profile);
            }
        }
    }

    /// Drop a profile from every in-memory list
    pub(crate) fn remove(&mut self, name: &str) {
        self.all_profiles.retain(|p| !names_equal(&p.name, name));
        for profiles in self.by_type.values_mut() {
            profiles.retain(|p| !names_equal(&p.name, name));
        }
        self.defaults.retain(|_, p| !names_equal(&p.name, name));
    }
}
