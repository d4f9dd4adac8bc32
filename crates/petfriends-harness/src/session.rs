// crates/petfriends-harness/src/session.rs
// ============================================================================
// Module: Session Fixture
// Description: Per-case credential setup, shared context and teardown check.
// Purpose: Acquire one API key per case and hand it to body and teardown.
// Dependencies: petfriends-client, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`SessionFixture::setup`] requests an API key with fixed valid credentials
//! and returns a fresh [`SessionContext`]. The body reads the credential from
//! the context and records observed statuses through it;
//! [`SessionFixture::teardown`] then inspects the last recorded status.
//! Invariants:
//! - One context per case invocation; contexts are never shared or global.
//! - Setup fails with [`SetupFailure`] unless the key request returns 200 and
//!   a `key` field, and the body is not run in that case.
//! - Teardown only compares statuses; it performs no remote calls.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use petfriends_client::ApiResponse;
use petfriends_client::AuthKey;
use petfriends_client::PetApi;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

use crate::outcome::AssertionFailure;
use crate::outcome::ExpectedOutcome;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Status the key request must return for setup to succeed.
pub const SETUP_STATUS: u16 = 200;

/// Payload field carrying the issued key.
pub const KEY_FIELD: &str = "key";

// ============================================================================
// SECTION: Credentials
// ============================================================================

/// Account used to obtain session keys.
///
/// # Invariants
/// - `Debug` output never includes the password.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl Credentials {
    /// Builds credentials from parts.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Credential obtained during setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionCredential {
    /// Issued API key.
    key: AuthKey,
}

impl SessionCredential {
    /// Wraps an issued key.
    #[must_use]
    pub const fn new(key: AuthKey) -> Self {
        Self {
            key,
        }
    }

    /// Returns the API key.
    #[must_use]
    pub const fn key(&self) -> &AuthKey {
        &self.key
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Credential acquisition did not produce a usable key.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("session setup failed: expected {expected}, actual {actual}")]
pub struct SetupFailure {
    /// Expected outcome of the key request.
    pub expected: String,
    /// Observed outcome of the key request.
    pub actual: String,
}

// ============================================================================
// SECTION: Context
// ============================================================================

/// State shared between setup, body and teardown of one case.
#[derive(Debug)]
pub struct SessionContext {
    /// Credential from setup.
    credential: SessionCredential,
    /// Last status recorded by the body.
    last_status: Option<u16>,
}

impl SessionContext {
    /// Builds a context around an already acquired credential.
    #[must_use]
    pub const fn new(credential: SessionCredential) -> Self {
        Self {
            credential,
            last_status: None,
        }
    }

    /// Returns the credential.
    #[must_use]
    pub const fn credential(&self) -> &SessionCredential {
        &self.credential
    }

    /// Returns the API key of the credential.
    #[must_use]
    pub const fn key(&self) -> &AuthKey {
        self.credential.key()
    }

    /// Records a status for the teardown check.
    pub const fn record_status(&mut self, status: u16) {
        self.last_status = Some(status);
    }

    /// Returns the last recorded status.
    #[must_use]
    pub const fn last_status(&self) -> Option<u16> {
        self.last_status
    }

    /// Records the response status, then verifies the response.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] when the response does not match.
    pub fn check(
        &mut self,
        response: &ApiResponse,
        expected: &ExpectedOutcome,
    ) -> Result<(), AssertionFailure> {
        self.record_status(response.status);
        expected.verify(response)
    }
}

// ============================================================================
// SECTION: Fixture
// ============================================================================

/// Setup/teardown wrapper run around every case.
#[derive(Debug, Clone)]
pub struct SessionFixture {
    /// Account used during setup.
    credentials: Credentials,
    /// Status the last recorded call must have at teardown, when set.
    teardown_status: Option<u16>,
}

impl SessionFixture {
    /// Builds a fixture without a teardown status check.
    #[must_use]
    pub const fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            teardown_status: None,
        }
    }

    /// Requires the last recorded status to equal `status` at teardown.
    #[must_use]
    pub fn with_teardown_status(mut self, status: u16) -> Self {
        self.teardown_status = Some(status);
        self
    }

    /// Returns the account used during setup.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Acquires a credential and opens a context.
    ///
    /// # Errors
    ///
    /// Returns [`SetupFailure`] when the request fails, the status is not
    /// [`SETUP_STATUS`], or the payload lacks [`KEY_FIELD`].
    pub fn setup(&self, api: &dyn PetApi) -> Result<SessionContext, SetupFailure> {
        let response =
            api.get_api_key(&self.credentials.email, &self.credentials.password).map_err(|err| {
                SetupFailure {
                    expected: format!("status {SETUP_STATUS} with `{KEY_FIELD}`"),
                    actual: err.to_string(),
                }
            })?;
        let key = AuthKey::from_response(&response).ok_or_else(|| SetupFailure {
            expected: format!("status {SETUP_STATUS} with `{KEY_FIELD}`"),
            actual: format!(
                "status {} with {}",
                response.status,
                if response.payload.contains(KEY_FIELD) { "a `key` field" } else { "no `key` field" }
            ),
        })?;
        debug!(email = %self.credentials.email, "session credential acquired");
        Ok(SessionContext::new(SessionCredential::new(key)))
    }

    /// Runs the teardown check and drops the context.
    ///
    /// A context with no recorded status passes; there is nothing to inspect.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] when a teardown status is configured and
    /// the last recorded status differs from it.
    pub fn teardown(&self, context: SessionContext) -> Result<(), AssertionFailure> {
        let (Some(expected), Some(actual)) = (self.teardown_status, context.last_status()) else {
            if self.teardown_status.is_some() {
                debug!("teardown check skipped: no status recorded");
            }
            return Ok(());
        };
        if expected == actual {
            Ok(())
        } else {
            Err(AssertionFailure::new(
                "teardown status",
                expected.to_string(),
                actual.to_string(),
            ))
        }
    }
}
