//! hostbook Providers - Backend reachability checks
//!
//! Each module implements `ReachabilityCheck` for one family of profile
//! types. `register_builtin_checks` wires them into a validator.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod error;
pub mod http;

use std::sync::Arc;
use std::time::Duration;

use hostbook_core::ProfileValidator;

pub use error::{ProviderError, ProviderResult};
pub use http::HttpReachabilityCheck;

/// Profile types answered by the HTTP check
pub const HTTP_TYPES: [&str; 1] = ["http"];

/// Register every built-in check on a validator
///
/// # Errors
/// Returns an error if an HTTP client cannot be built
pub fn register_builtin_checks(
    validator: ProfileValidator,
    timeout: Duration,
) -> ProviderResult<ProfileValidator> {
    let http = Arc::new(HttpReachabilityCheck::new(timeout)?);
    Ok(HTTP_TYPES
        .iter()
        .fold(validator, |v, t| v.with_checker(t, http.clone())))
}
