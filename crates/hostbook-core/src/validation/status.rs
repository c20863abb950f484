//! Validation status types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::profile::Profile;

/// Rolling judgment of whether a profile's credentials work
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationStatus {
    /// Not checked, either disabled or not yet run
    Unverified,
    /// Last check succeeded
    Active,
    /// Last check failed or errored
    Inactive,
}

impl fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unverified => write!(f, "unverified"),
            Self::Active => write!(f, "active"),
            Self::Inactive => write!(f, "inactive"),
        }
    }
}

/// Live session reference produced by a successful check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionHandle {
    pub profile_name: String,
    pub profile_type: String,
    /// Backend-issued token, when the backend hands one out
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub established_at: DateTime<Utc>,
}

impl SessionHandle {
    #[must_use]
    pub fn for_profile(profile: &Profile) -> Self {
        Self {
            profile_name: profile.name.clone(),
            profile_type: profile.profile_type.clone(),
            token: None,
            established_at: Utc::now(),
        }
    }
}

/// Cached outcome for one profile name. A session is only present when
/// the status is `Active`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub name: String,
    pub status: ValidationStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionHandle>,
}

impl ValidationResult {
    #[must_use]
    pub fn unverified(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ValidationStatus::Unverified,
            session: None,
        }
    }

    #[must_use]
    pub fn inactive(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: ValidationStatus::Inactive,
            session: None,
        }
    }

    #[must_use]
    pub fn active(name: impl Into<String>, session: SessionHandle) -> Self {
        Self {
            name: name.into(),
            status: ValidationStatus::Active,
            session: Some(session),
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ValidationStatus::Active
    }
}
