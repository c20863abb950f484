//! CLI command handlers
//!
//! One module per top-level subcommand.

pub mod profile;
pub mod tree;
pub mod types;

use std::error::Error;
use std::fmt;

use hostbook_core::ProfileError;

/// An error the user has already been shown through the notifier
#[derive(Debug)]
pub struct Reported(pub ProfileError);

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.0.code())
    }
}

impl Error for Reported {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.0)
    }
}

/// Whether an error was already printed by the notifier
pub fn already_reported(error: &(dyn Error + 'static)) -> bool {
    error
        .downcast_ref::<Reported>()
        .is_some_and(|r| r.0.is_user_error())
}
