// crates/petfriends-harness/src/logging.rs
// ============================================================================
// Module: Test Logging
// Description: Tracing subscriber setup for suite binaries.
// Purpose: Route client and runner events into the libtest output capture.
// Dependencies: tracing-subscriber
// ============================================================================

//! ## Overview
//! [`init_test_logging`] installs a `fmt` subscriber writing through the test
//! writer. `RUST_LOG` overrides [`DEFAULT_LOG_FILTER`]. Calling it more than
//! once is harmless; later calls leave the first subscriber in place.

// ============================================================================
// SECTION: Imports
// ============================================================================

use tracing_subscriber::EnvFilter;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Filter used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_LOG_FILTER: &str = "petfriends_client=info,petfriends_harness=info,system_tests=info";

// ============================================================================
// SECTION: Setup
// ============================================================================

/// Installs the global test subscriber once per process.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    // A subscriber from an earlier test in the same binary stays installed.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).with_test_writer().try_init();
}
