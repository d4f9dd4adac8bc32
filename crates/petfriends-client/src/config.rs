// crates/petfriends-client/src/config.rs
// ============================================================================
// Module: Client Configuration
// Description: Base URL, timeout and user agent for the PetFriends client.
// Purpose: Validate service coordinates once, before any request is built.
// Dependencies: url
// ============================================================================

//! ## Overview
//! [`ClientConfig`] holds the service root, request timeout and user agent.
//! The base URL is parsed and normalised when the config is built, so
//! endpoint paths always join below the service root.
//! Invariants:
//! - Only `http` and `https` roots are accepted.
//! - The root path always ends with `/`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::ClientError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Public PetFriends deployment used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://petfriends.skillfactory.ru/";

/// Default end-to-end request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent for outbound requests.
pub const DEFAULT_USER_AGENT: &str = "petfriends-client/0.1";

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Connection settings for [`crate::PetFriendsClient`].
///
/// # Invariants
/// - `base_url` uses `http` or `https` and always ends with `/`, so endpoint
///   paths join below it instead of replacing its last segment.
/// - `timeout` is non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service root, for example `https://petfriends.skillfactory.ru/`.
    pub base_url: Url,
    /// Timeout applied to the full request lifecycle.
    pub timeout: Duration,
    /// User agent header value.
    pub user_agent: String,
}

impl ClientConfig {
    /// Builds a configuration for the given service root.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] when the URL does not parse, uses a
    /// scheme other than `http`/`https`, or cannot carry a path.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let mut url = Url::parse(base_url.trim())
            .map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ClientError::InvalidUrl(format!(
                "{base_url}: scheme must be http or https"
            )));
        }
        if url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(format!("{base_url}: url cannot carry a path")));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            base_url: url,
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        })
    }

    /// Builds a configuration for the public deployment.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if the built-in URL is rejected.
    pub fn public_service() -> Result<Self, ClientError> {
        Self::new(DEFAULT_BASE_URL)
    }

    /// Overrides the request timeout; zero keeps the current value.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if !timeout.is_zero() {
            self.timeout = timeout;
        }
        self
    }
}
