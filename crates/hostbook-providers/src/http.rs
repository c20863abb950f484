//! HTTP(S) reachability check
//!
//! Sends one GET to `{protocol}://{host}[:{port}]{basePath}` with basic auth
//! when a user is set. Redirects are not followed; a 3xx counts as reachable.

use async_trait::async_trait;
use reqwest::redirect::Policy;
use reqwest::{Client, StatusCode};
use std::time::Duration;

use hostbook_core::profile::fields;
use hostbook_core::validation::{CheckError, CheckOutcome, ReachabilityCheck, SessionHandle};
use hostbook_core::Profile;

use crate::error::{ProviderError, ProviderResult};

const DEFAULT_PROTOCOL: &str = "https";

/// Checks HTTP profiles by requesting their base URL
pub struct HttpReachabilityCheck {
    client: Client,
    // Used when the profile sets rejectUnauthorized=false
    insecure_client: Client,
    timeout: Duration,
}

fn build_client(timeout: Duration, accept_invalid_certs: bool) -> ProviderResult<Client> {
    Client::builder()
        .timeout(timeout)
        .redirect(Policy::none())
        .danger_accept_invalid_certs(accept_invalid_certs)
        .build()
        .map_err(|e| ProviderError::ClientInit(e.to_string()))
}

/// Request URL for a profile
///
/// # Errors
/// Returns `InvalidProfile` when the profile has no host or an unsupported
/// protocol
pub fn request_url(profile: &Profile) -> Result<String, CheckError> {
    let host = profile
        .host()
        .filter(|h| !h.trim().is_empty())
        .ok_or_else(|| CheckError::InvalidProfile(format!("profile '{}' has no host", profile.name)))?;

    let protocol = profile
        .get_str(fields::PROTOCOL)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PROTOCOL)
        .to_ascii_lowercase();
    if protocol != "http" && protocol != "https" {
        return Err(CheckError::InvalidProfile(format!(
            "unsupported protocol '{protocol}'"
        )));
    }

    let port = profile.port().map(|p| format!(":{p}")).unwrap_or_default();
    let path = match profile.base_path() {
        Some(p) if p.starts_with('/') => p.to_string(),
        Some(p) => format!("/{p}"),
        None => String::new(),
    };

    Ok(format!("{protocol}://{host}{port}{path}"))
}

impl HttpReachabilityCheck {
    /// Create a check with a per-request timeout
    ///
    /// # Errors
    /// Returns an error if the HTTP clients cannot be built
    pub fn new(timeout: Duration) -> ProviderResult<Self> {
        Ok(Self {
            client: build_client(timeout, false)?,
            insecure_client: build_client(timeout, true)?,
            timeout,
        })
    }

    fn client_for(&self, profile: &Profile) -> &Client {
        if profile.reject_unauthorized() {
            &self.client
        } else {
            &self.insecure_client
        }
    }
}

#[async_trait]
impl ReachabilityCheck for HttpReachabilityCheck {
    async fn get_status(
        &self,
        profile: &Profile,
        profile_type: &str,
        prompt_allowed: bool,
    ) -> Result<CheckOutcome, CheckError> {
        let url = request_url(profile)?;
        tracing::debug!(url = %url, profile_type, prompt_allowed, "checking HTTP profile");

        let mut request = self.client_for(profile).get(&url);
        if let Some(user) = profile.user() {
            request = request.basic_auth(user, profile.password());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                CheckError::Timeout(self.timeout.as_secs())
            } else {
                CheckError::Transport(e.to_string())
            }
        })?;

        let status = response.status();
        if status.is_success() || status.is_redirection() {
            return Ok(CheckOutcome::active(SessionHandle::for_profile(profile)));
        }
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::info!(status = status.as_u16(), "credentials rejected");
        } else {
            tracing::warn!(status = status.as_u16(), url = %url, "unexpected HTTP status");
        }
        Ok(CheckOutcome::inactive())
    }
}
