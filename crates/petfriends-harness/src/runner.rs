// crates/petfriends-harness/src/runner.rs
// ============================================================================
// Module: Case Runner
// Description: Runs expanded cases through setup, body and teardown.
// Purpose: Record one outcome per case without letting failures cascade.
// Dependencies: petfriends-client, serde, thiserror, tracing
// ============================================================================

//! ## Overview
//! [`Suite`] binds an API and a [`SessionFixture`]; [`Suite::run_table`]
//! executes every case of a [`CaseTable`] in order and returns a
//! [`SuiteReport`]. [`run_cases`] does the same for tables that need no
//! session. Setup failures, assertion failures, panics and teardown
//! mismatches are all recorded on the affected case and the next case still
//! runs.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::any::Any;
use std::fmt::Write as _;
use std::panic;
use std::panic::AssertUnwindSafe;

use petfriends_client::PetApi;
use serde::Serialize;
use thiserror::Error;
use tracing::info;
use tracing::warn;

use crate::expand::CaseTable;
use crate::expand::ExpandedCase;
use crate::outcome::AssertionFailure;
use crate::session::SessionContext;
use crate::session::SessionFixture;
use crate::session::SetupFailure;

// ============================================================================
// SECTION: Outcomes
// ============================================================================

/// Why a case failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", content = "failure", rename_all = "snake_case")]
pub enum CaseFailure {
    /// Session setup failed; the body did not run.
    Setup(SetupFailure),
    /// The body reported a mismatch or panicked.
    Assertion(AssertionFailure),
    /// The body passed but the teardown check did not.
    Teardown(AssertionFailure),
}

impl std::fmt::Display for CaseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Setup(failure) => write!(f, "{failure}"),
            Self::Assertion(failure) => write!(f, "{failure}"),
            Self::Teardown(failure) => write!(f, "teardown: {failure}"),
        }
    }
}

/// Result of one case.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum CaseOutcome {
    /// Setup, body and teardown all succeeded.
    Passed,
    /// Some phase failed.
    Failed(CaseFailure),
    /// The table had no cases to run.
    Skipped(String),
}

/// Outcome of one case, labelled with its test and id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseReport {
    /// Test name.
    pub test: String,
    /// Case id; empty for unparametrized tests.
    pub case_id: String,
    /// Display name, `test[id]`.
    pub name: String,
    /// Case result.
    pub outcome: CaseOutcome,
}

impl CaseReport {
    /// Returns true when the case failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self.outcome, CaseOutcome::Failed(_))
    }
}

// ============================================================================
// SECTION: Reports
// ============================================================================

/// At least one case of a suite failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("suite {suite}: {failed} of {total} cases failed{details}")]
pub struct SuiteFailure {
    /// Suite name.
    pub suite: String,
    /// Number of failed cases.
    pub failed: usize,
    /// Number of reported cases.
    pub total: usize,
    /// One line per failure, each prefixed with a newline.
    pub details: String,
}

/// Outcomes of every case run by a suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuiteReport {
    /// Suite name.
    pub suite: String,
    /// Case reports in execution order.
    pub cases: Vec<CaseReport>,
}

impl SuiteReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new(suite: impl Into<String>) -> Self {
        Self {
            suite: suite.into(),
            cases: Vec::new(),
        }
    }

    /// Appends the cases of another report.
    pub fn extend(&mut self, other: Self) {
        self.cases.extend(other.cases);
    }

    /// Number of passed cases.
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(|outcome| matches!(outcome, CaseOutcome::Passed))
    }

    /// Number of failed cases.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(|outcome| matches!(outcome, CaseOutcome::Failed(_)))
    }

    /// Number of skipped tables.
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, CaseOutcome::Skipped(_)))
    }

    /// Returns the failed cases.
    pub fn failures(&self) -> impl Iterator<Item = &CaseReport> {
        self.cases.iter().filter(|case| case.is_failed())
    }

    /// Returns the report of the case named `name`.
    #[must_use]
    pub fn case(&self, name: &str) -> Option<&CaseReport> {
        self.cases.iter().find(|case| case.name == name)
    }

    /// Returns true when no case failed.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    /// Converts the report into an error listing every failed case.
    ///
    /// # Errors
    ///
    /// Returns [`SuiteFailure`] when at least one case failed.
    pub fn into_result(self) -> Result<Self, SuiteFailure> {
        if self.is_success() {
            return Ok(self);
        }
        let mut details = String::new();
        for case in self.failures() {
            if let CaseOutcome::Failed(failure) = &case.outcome {
                let _ = write!(details, "\n  {}: {failure}", case.name);
            }
        }
        Err(SuiteFailure {
            suite: self.suite.clone(),
            failed: self.failed(),
            total: self.cases.len(),
            details,
        })
    }

    /// Counts cases whose outcome matches `predicate`.
    fn count(&self, predicate: impl Fn(&CaseOutcome) -> bool) -> usize {
        self.cases.iter().filter(|case| predicate(&case.outcome)).count()
    }
}

// ============================================================================
// SECTION: Suite
// ============================================================================

/// API plus session fixture shared by the cases of a suite.
pub struct Suite<'a> {
    /// Suite name used in reports and logs.
    name: String,
    /// API used by the fixture.
    api: &'a dyn PetApi,
    /// Setup/teardown wrapper applied to every case.
    fixture: SessionFixture,
}

impl<'a> Suite<'a> {
    /// Creates a suite.
    #[must_use]
    pub fn new(name: impl Into<String>, api: &'a dyn PetApi, fixture: SessionFixture) -> Self {
        Self {
            name: name.into(),
            api,
            fixture,
        }
    }

    /// Returns the suite name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the session fixture.
    #[must_use]
    pub const fn fixture(&self) -> &SessionFixture {
        &self.fixture
    }

    /// Runs one case: setup, body, teardown.
    pub fn run_case<F>(&self, table: &CaseTable, case: &ExpandedCase, body: F) -> CaseReport
    where
        F: FnOnce(&mut SessionContext, &ExpandedCase) -> Result<(), AssertionFailure>,
    {
        let mut context = match self.fixture.setup(self.api) {
            Ok(context) => context,
            Err(failure) => {
                return self.finish(table, case, CaseOutcome::Failed(CaseFailure::Setup(failure)));
            }
        };
        let body_result = guarded(|| body(&mut context, case));
        let teardown_result = self.fixture.teardown(context);
        let outcome = match (body_result, teardown_result) {
            (Err(failure), teardown) => {
                if let Err(teardown) = teardown {
                    warn!(suite = %self.name, case = %table.display_name(case), %teardown, "teardown also failed");
                }
                CaseOutcome::Failed(CaseFailure::Assertion(failure))
            }
            (Ok(()), Err(teardown)) => CaseOutcome::Failed(CaseFailure::Teardown(teardown)),
            (Ok(()), Ok(())) => CaseOutcome::Passed,
        };
        self.finish(table, case, outcome)
    }

    /// Runs every case of `table` in order.
    pub fn run_table<F>(&self, table: &CaseTable, mut body: F) -> SuiteReport
    where
        F: FnMut(&mut SessionContext, &ExpandedCase) -> Result<(), AssertionFailure>,
    {
        let mut report = SuiteReport::new(self.name.clone());
        if let Some(skipped) = skipped_report(&self.name, table) {
            report.cases.push(skipped);
            return report;
        }
        for case in table.cases() {
            report.cases.push(self.run_case(table, case, |context, case| body(context, case)));
        }
        report
    }

    /// Logs and packages a case outcome.
    fn finish(&self, table: &CaseTable, case: &ExpandedCase, outcome: CaseOutcome) -> CaseReport {
        let report = case_report(table, case, outcome);
        log_outcome(&self.name, &report);
        report
    }
}

/// Runs a table whose cases need no session.
pub fn run_cases<F>(suite: &str, table: &CaseTable, mut body: F) -> SuiteReport
where
    F: FnMut(&ExpandedCase) -> Result<(), AssertionFailure>,
{
    let mut report = SuiteReport::new(suite);
    if let Some(skipped) = skipped_report(suite, table) {
        report.cases.push(skipped);
        return report;
    }
    for case in table.cases() {
        let outcome = match guarded(|| body(case)) {
            Ok(()) => CaseOutcome::Passed,
            Err(failure) => CaseOutcome::Failed(CaseFailure::Assertion(failure)),
        };
        let case_report = case_report(table, case, outcome);
        log_outcome(suite, &case_report);
        report.cases.push(case_report);
    }
    report
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Builds the single skipped report of an empty table.
fn skipped_report(suite: &str, table: &CaseTable) -> Option<CaseReport> {
    let reason = table.skip_reason()?;
    info!(suite, test = table.test(), reason, "table skipped");
    Some(CaseReport {
        test: table.test().to_string(),
        case_id: String::new(),
        name: table.test().to_string(),
        outcome: CaseOutcome::Skipped(reason.to_string()),
    })
}

/// Labels an outcome with the case identity.
fn case_report(table: &CaseTable, case: &ExpandedCase, outcome: CaseOutcome) -> CaseReport {
    CaseReport {
        test: table.test().to_string(),
        case_id: case.id().to_string(),
        name: table.display_name(case),
        outcome,
    }
}

/// Emits one log line per case outcome.
fn log_outcome(suite: &str, report: &CaseReport) {
    match &report.outcome {
        CaseOutcome::Passed => info!(suite, case = %report.name, "case passed"),
        CaseOutcome::Failed(failure) => warn!(suite, case = %report.name, %failure, "case failed"),
        CaseOutcome::Skipped(reason) => info!(suite, case = %report.name, reason, "case skipped"),
    }
}

/// Runs `body`, turning a panic into an [`AssertionFailure`].
fn guarded(body: impl FnOnce() -> Result<(), AssertionFailure>) -> Result<(), AssertionFailure> {
    panic::catch_unwind(AssertUnwindSafe(body)).unwrap_or_else(|payload| {
        Err(AssertionFailure::new(
            "case body",
            "completion without panic",
            format!("panic: {}", panic_message(payload.as_ref())),
        ))
    })
}

/// Extracts the message of a panic payload.
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        return (*message).to_string();
    }
    if let Some(message) = payload.downcast_ref::<String>() {
        return message.clone();
    }
    "non-string panic payload".to_string()
}
