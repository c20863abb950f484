//! Reachability check capability
//!
//! The validator does not talk to backends itself. Each profile type may
//! register a `ReachabilityCheck`; a type without one is always reported
//! `unverified`.

use async_trait::async_trait;
use thiserror::Error;

use super::status::SessionHandle;
use crate::profile::Profile;

/// Outcome of a completed check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reachability {
    Active,
    Inactive,
}

/// What a check returns on completion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub reachability: Reachability,
    pub session: Option<SessionHandle>,
}

impl CheckOutcome {
    #[must_use]
    pub fn active(session: SessionHandle) -> Self {
        Self {
            reachability: Reachability::Active,
            session: Some(session),
        }
    }

    #[must_use]
    pub fn inactive() -> Self {
        Self {
            reachability: Reachability::Inactive,
            session: None,
        }
    }
}

/// Errors raised by a check
#[derive(Debug, Error)]
pub enum CheckError {
    /// The backend could not be reached
    #[error("Transport error: {0}")]
    Transport(String),

    /// The check did not finish in time
    #[error("Check timed out after {0}s")]
    Timeout(u64),

    /// The profile lacks what the check needs (e.g. no host)
    #[error("Profile cannot be checked: {0}")]
    InvalidProfile(String),

    #[error("{0}")]
    Other(String),
}

/// Per-type capability that checks whether a profile's credentials work
#[async_trait]
pub trait ReachabilityCheck: Send + Sync {
    /// Check a profile.
    ///
    /// `prompt_allowed` tells the implementation whether it may ask the user
    /// for missing credentials.
    ///
    /// # Errors
    /// Returns an error when the check itself fails to run
    async fn get_status(
        &self,
        profile: &Profile,
        profile_type: &str,
        prompt_allowed: bool,
    ) -> Result<CheckOutcome, CheckError>;
}
