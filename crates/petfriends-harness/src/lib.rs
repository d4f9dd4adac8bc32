// crates/petfriends-harness/src/lib.rs
// ============================================================================
// Module: PetFriends Harness
// Description: Parametrized case tables, session fixtures and case runner.
// Purpose: Run API checks as independent, individually named cases.
// Dependencies: petfriends-client, serde, serde_json, thiserror, tracing
// ============================================================================

//! ## Overview
//! The harness turns declared parameter axes into a [`CaseTable`], wraps each
//! case in a [`SessionFixture`] that acquires an API key, runs the case body
//! against an [`ExpectedOutcome`], and collects per-case results into a
//! [`SuiteReport`].
//! Invariants:
//! - Expansion is deterministic and finishes before any case runs.
//! - Every case gets its own [`SessionContext`].
//! - A failing case never prevents later cases from running.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod expand;
pub mod logging;
pub mod outcome;
pub mod params;
pub mod runner;
pub mod session;
pub mod steps;

#[cfg(test)]
mod test_api;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use expand::CASE_ID_SEPARATOR;
pub use expand::CaseError;
pub use expand::CaseTable;
pub use expand::ExpandError;
pub use expand::ExpandedCase;
pub use logging::init_test_logging;
pub use outcome::AssertionFailure;
pub use outcome::ExpectedOutcome;
pub use outcome::PayloadShape;
pub use params::IdStrategy;
pub use params::ParamValue;
pub use params::ParameterAxis;
pub use runner::CaseFailure;
pub use runner::CaseOutcome;
pub use runner::CaseReport;
pub use runner::Suite;
pub use runner::SuiteFailure;
pub use runner::SuiteReport;
pub use runner::run_cases;
pub use session::Credentials;
pub use session::SessionContext;
pub use session::SessionCredential;
pub use session::SessionFixture;
pub use session::SetupFailure;
