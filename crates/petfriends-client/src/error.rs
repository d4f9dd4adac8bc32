// crates/petfriends-client/src/error.rs
// ============================================================================
// Module: Client Errors
// Description: Error taxonomy for the PetFriends HTTP wrapper.
// Purpose: Separate transport and configuration failures from HTTP statuses.
// Dependencies: thiserror, reqwest
// ============================================================================

//! ## Overview
//! A non-2xx status is not an error at this layer; the caller inspects the
//! returned [`crate::ApiResponse`]. The variants below cover the cases where no
//! response could be produced at all, plus payload decoding for the typed
//! helpers.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;

use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by the PetFriends client.
///
/// # Invariants
/// - Variants never embed API keys or passwords.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Base URL or endpoint URL could not be built.
    #[error("invalid service url: {0}")]
    InvalidUrl(String),
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Build(#[source] reqwest::Error),
    /// The request could not be sent or the response body could not be read.
    #[error("{operation} request failed: {source}")]
    Transport {
        /// Operation label, for example `list_pets`.
        operation: &'static str,
        /// Underlying reqwest error.
        #[source]
        source: reqwest::Error,
    },
    /// A photo fixture could not be read from disk.
    #[error("failed to read photo {path}: {source}")]
    Photo {
        /// Path that was requested.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: std::io::Error,
    },
    /// A payload did not match the expected JSON document.
    #[error("unexpected {expected} payload: {message}")]
    Decode {
        /// Name of the document that was expected.
        expected: &'static str,
        /// Decoder message.
        message: String,
    },
}
