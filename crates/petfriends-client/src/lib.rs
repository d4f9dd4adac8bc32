// crates/petfriends-client/src/lib.rs
// ============================================================================
// Module: PetFriends Client
// Description: Blocking HTTP wrapper for the PetFriends REST API.
// Purpose: Give test suites one call per remote operation with raw responses.
// Dependencies: reqwest, serde, serde_json, thiserror, tracing, url
// ============================================================================

//! ## Overview
//! This crate wraps the PetFriends REST API behind the [`PetApi`] trait. Every
//! operation performs exactly one blocking HTTP request and returns the status
//! code together with the decoded payload. HTTP error statuses are ordinary
//! [`ApiResponse`] values; only transport, IO and configuration problems
//! surface as [`ClientError`].
//! Invariants:
//! - One request per call; there is no retry or backoff layer.
//! - Payloads decode as JSON when possible and fall back to raw text.
//! - API keys and passwords never appear in `Debug` output or logs.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod types;


// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use api::PetApi;
pub use client::PetFriendsClient;
pub use config::ClientConfig;
pub use config::DEFAULT_BASE_URL;
pub use error::ClientError;
pub use types::ApiPayload;
pub use types::ApiResponse;
pub use types::AuthKey;
pub use types::FILTER_ALL;
pub use types::FILTER_MY_PETS;
pub use types::NewPet;
pub use types::Pet;
pub use types::PetList;
