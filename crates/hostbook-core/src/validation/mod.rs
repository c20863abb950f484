//! Validation cache, state machine and display tags

pub mod check;
pub mod status;
pub mod tag;
pub mod validator;

pub use check::{CheckError, CheckOutcome, Reachability, ReachabilityCheck};
pub use status::{SessionHandle, ValidationResult, ValidationStatus};
pub use tag::{DisplayTag, ProfileRef, ValidateToggle};
pub use validator::ProfileValidator;
