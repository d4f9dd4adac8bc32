// system-tests/src/lib.rs
// ============================================================================
// Module: PetFriends System Tests Library
// Description: Shared configuration for system test suites.
// Purpose: Decide which service the suites target and with which settings.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts the environment configuration used by the PetFriends
//! system-test binaries in `system-tests/tests`. Credentials read here are
//! never logged.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
