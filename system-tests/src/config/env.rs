// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid silent
//! misconfiguration. Invalid UTF-8 fails closed. Without a base URL the suites
//! run against the in-process stub; with one, credentials become mandatory.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional live service URL; absent selects the stub.
    BaseUrl,
    /// Account email for the live service.
    Email,
    /// Account password for the live service.
    Password,
    /// Optional photo fixture path.
    Photo,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Optional run root override for report artifacts.
    RunRoot,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BaseUrl => "PETFRIENDS_SYSTEM_TEST_BASE_URL",
            Self::Email => "PETFRIENDS_SYSTEM_TEST_EMAIL",
            Self::Password => "PETFRIENDS_SYSTEM_TEST_PASSWORD",
            Self::Photo => "PETFRIENDS_SYSTEM_TEST_PHOTO",
            Self::TimeoutSeconds => "PETFRIENDS_SYSTEM_TEST_TIMEOUT_SEC",
            Self::RunRoot => "PETFRIENDS_SYSTEM_TEST_RUN_ROOT",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Live deployment selected through the environment.
#[derive(Clone, PartialEq, Eq)]
pub struct LiveService {
    /// Service base URL.
    pub base_url: String,
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl fmt::Debug for LiveService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveService")
            .field("base_url", &self.base_url)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Live service, or `None` to run against the stub.
    pub live: Option<LiveService>,
    /// Optional photo fixture; generated when absent.
    pub photo: Option<PathBuf>,
    /// Optional client timeout override.
    pub timeout: Option<Duration>,
    /// Optional run root override.
    pub run_root: Option<PathBuf>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is empty,
    /// fails validation, or when a base URL is given without credentials.
    pub fn load() -> Result<Self, String> {
        let live = match read_env_nonempty(SystemTestEnv::BaseUrl.as_str())? {
            Some(base_url) => Some(LiveService {
                base_url,
                email: require_with_base_url(SystemTestEnv::Email)?,
                password: require_with_base_url(SystemTestEnv::Password)?,
            }),
            None => None,
        };
        let photo = read_env_nonempty(SystemTestEnv::Photo.as_str())?.map(PathBuf::from);
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        Ok(Self {
            live,
            photo,
            timeout,
            run_root,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        Some(value) if value.trim().is_empty() => Err(format!("{name} must not be empty")),
        Some(value) => Ok(Some(value)),
        None => Ok(None),
    }
}

/// Reads a credential that becomes mandatory once a base URL is set.
///
/// # Errors
///
/// Returns an error when the variable is unset, empty, or not UTF-8.
fn require_with_base_url(key: SystemTestEnv) -> Result<String, String> {
    read_env_nonempty(key.as_str())?.ok_or_else(|| {
        format!("{} is required when {} is set", key.as_str(), SystemTestEnv::BaseUrl.as_str())
    })
}

/// Parses a positive timeout value from an environment variable string.
///
/// # Errors
///
/// Returns an error when the value is missing, non-numeric, or zero.
fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(format!("{name} must be a positive integer number of seconds"));
    }
    let secs: u64 = trimmed
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
