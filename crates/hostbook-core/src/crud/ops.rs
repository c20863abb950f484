//! Create, edit and delete orchestration
//!
//! The registry is only mutated after the store confirms a write, so a
//! failed store call leaves the in-memory view untouched.

use super::cascade::{purge_references, DeleteReport};
use super::collect::FieldCollector;
use crate::consumer::ProfileConsumer;
use crate::error::{ProfileError, ProfileResult};
use crate::profile::registry::store_error;
use crate::profile::{FieldValues, Profile, ProfileRegistry, ProfileSchema};
use crate::storage::StoreError;
use crate::ui::{Notifier, PickRequest, Prompter};

/// CRUD operations over a registry, driven by a prompter
pub struct ProfileCrud<'a> {
    registry: &'a mut ProfileRegistry,
    prompter: &'a mut dyn Prompter,
    notifier: &'a dyn Notifier,
}

impl<'a> ProfileCrud<'a> {
    pub fn new(
        registry: &'a mut ProfileRegistry,
        prompter: &'a mut dyn Prompter,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            registry,
            prompter,
            notifier,
        }
    }

    /// Report a failure to the notifier and hand it back
    fn surface(&self, error: ProfileError) -> ProfileError {
        if error.is_user_error() {
            self.notifier.info(&error.to_string());
        } else {
            self.notifier.error(&error.to_string());
        }
        error
    }

    fn schema_for(&self, profile_type: &str) -> ProfileResult<ProfileSchema> {
        self.registry
            .catalog()
            .schema(profile_type)
            .cloned()
            .ok_or_else(|| ProfileError::UnknownType(profile_type.to_string()))
    }

    fn resolve_type(&mut self, requested: Option<&str>) -> ProfileResult<String> {
        if let Some(profile_type) = requested {
            if !self.registry.catalog().contains(profile_type) {
                return Err(ProfileError::UnknownType(profile_type.to_string()));
            }
            return Ok(profile_type.to_string());
        }

        let types = self.registry.get_all_types();
        let request = PickRequest::new("Select the type of profile to create", types.clone());
        self.prompter
            .pick(&request)
            .and_then(|i| types.get(i).cloned())
            .ok_or_else(|| ProfileError::cancelled("no profile type selected"))
    }

    /// Create and persist a new profile, returning its name.
    ///
    /// Fields are seeded from `template`, else the type's default profile,
    /// else the base profile.
    ///
    /// # Errors
    /// Returns `EmptyName`, `DuplicateName`, `UnknownType`, a collection
    /// error, or a store failure. Every error is also sent to the notifier.
    pub fn create_new_connection(
        &mut self,
        template: Option<&Profile>,
        name: &str,
        profile_type: Option<&str>,
    ) -> ProfileResult<String> {
        self.try_create(template, name, profile_type)
            .map_err(|e| self.surface(e))
    }

    fn try_create(
        &mut self,
        template: Option<&Profile>,
        name: &str,
        profile_type: Option<&str>,
    ) -> ProfileResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ProfileError::EmptyName);
        }
        if self.registry.contains_name(name) {
            return Err(ProfileError::DuplicateName {
                name: name.to_string(),
            });
        }

        let profile_type = self.resolve_type(profile_type)?;
        let schema = self.schema_for(&profile_type)?;

        // Only fields of the target schema carry over from another type
        let seed: FieldValues = template
            .or_else(|| self.registry.default_profile(&profile_type))
            .or_else(|| self.registry.base_profile())
            .map(|p| {
                p.fields
                    .iter()
                    .filter(|(key, _)| schema.field(key).is_some())
                    .map(|(key, value)| (key.clone(), value.clone()))
                    .collect()
            })
            .unwrap_or_default();

        let collected = FieldCollector::new(&mut *self.prompter).collect(&schema, Some(&seed))?;

        let mut profile = Profile::new(name, &profile_type);
        profile.fields = seed;
        profile.apply_fields(&collected);
        profile.strip_empty_optional();

        let saved = self.registry.store().save(&profile).map_err(|e| match e {
            StoreError::AlreadyExists(existing) => ProfileError::DuplicateName { name: existing },
            other => ProfileError::StoreFailure(other),
        })?;

        tracing::info!(profile = %saved.name, profile_type = %saved.profile_type, "profile created");
        self.notifier
            .info(&format!("Profile {} was created.", saved.name));
        let created = saved.name.clone();
        self.registry.insert(saved);
        Ok(created)
    }

    /// Re-collect every field of a profile and persist the update under
    /// `new_name`.
    ///
    /// Returns `None` when the store declined the update because no
    /// credentials were supplied; that case is not reported.
    ///
    /// # Errors
    /// Returns a collection error or a store failure, also sent to the
    /// notifier
    pub fn edit_session(&mut self, profile: &Profile, new_name: &str) -> ProfileResult<Option<Profile>> {
        self.try_edit(profile, new_name).map_err(|e| self.surface(e))
    }

    fn try_edit(&mut self, profile: &Profile, new_name: &str) -> ProfileResult<Option<Profile>> {
        let schema = self.schema_for(&profile.profile_type)?;
        let collected =
            FieldCollector::new(&mut *self.prompter).collect(&schema, Some(&profile.fields))?;

        let mut updated = profile.clone();
        let new_name = new_name.trim();
        if !new_name.is_empty() {
            updated.name = new_name.to_string();
        }
        updated.apply_fields(&collected);
        updated.strip_empty_optional();

        match self.registry.store().update(&updated) {
            Ok(saved) => {
                tracing::info!(profile = %saved.name, "profile updated");
                self.notifier
                    .info(&format!("Profile {} was updated.", saved.name));
                self.registry.replace(&saved);
                Ok(Some(saved))
            }
            Err(StoreError::MissingCredentials(_)) => {
                tracing::debug!(profile = %updated.name, "update skipped, no credentials supplied");
                Ok(None)
            }
            Err(e) => Err(store_error(e, &updated.name)),
        }
    }

    /// Pick a profile to delete from the loaded names
    pub fn get_delete_profile(&mut self) -> Option<Profile> {
        let names: Vec<String> = self
            .registry
            .all_profiles()
            .iter()
            .map(|p| p.name.clone())
            .collect();
        if names.is_empty() {
            self.notifier.info("No profiles available for deletion.");
            return None;
        }

        let request = PickRequest::new("Select the profile you want to delete", names);
        let index = self.prompter.pick(&request)?;
        self.registry.all_profiles().get(index).cloned()
    }

    /// Delete a profile after confirmation and purge every consumer's
    /// references to it.
    ///
    /// Returns `None` when the user declined. Consumer failures do not stop
    /// the cascade; they are listed in the report.
    ///
    /// # Errors
    /// Returns `NotFound` or a store failure if the store delete fails. The
    /// registry and consumers are left untouched in that case.
    pub fn delete_profile(
        &mut self,
        profile: Option<&Profile>,
        consumers: &mut [&mut dyn ProfileConsumer],
    ) -> ProfileResult<Option<DeleteReport>> {
        let profile = match profile {
            Some(p) => p.clone(),
            None => match self.get_delete_profile() {
                Some(p) => p,
                None => {
                    self.notifier.info("Operation cancelled.");
                    return Ok(None);
                }
            },
        };

        let question = format!("Are you sure you want to delete profile {}?", profile.name);
        if !self.prompter.confirm(&question) {
            self.notifier.info("Operation cancelled.");
            return Ok(None);
        }

        let removed = self
            .registry
            .store()
            .delete(&profile)
            .map_err(|e| self.surface(store_error(e, &profile.name)))?;

        let reports = consumers
            .iter_mut()
            .map(|consumer| purge_references(&mut **consumer, &removed.name))
            .collect();

        self.registry.remove(&removed.name);
        self.registry.validator().forget(&removed.name);

        tracing::info!(profile = %removed.name, profile_type = %removed.profile_type, "profile deleted");
        self.notifier
            .info(&format!("Profile {} was deleted.", removed.name));

        Ok(Some(DeleteReport {
            profile: removed,
            consumers: reports,
        }))
    }
}
