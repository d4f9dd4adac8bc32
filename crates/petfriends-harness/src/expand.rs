// crates/petfriends-harness/src/expand.rs
// ============================================================================
// Module: Case Table Expansion
// Description: Cross-product expansion of parameter axes into concrete cases.
// Purpose: Produce every case and its id up front, before any test runs.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! [`CaseTable::expand`] turns a test name and its declared axes into an
//! ordered list of [`ExpandedCase`]s.
//!
//! Ordering and naming are fixed:
//! - Enumeration is row-major: the first declared axis varies slowest and the
//!   last declared axis varies fastest.
//! - A case id joins the per-axis ids in declaration order with
//!   [`CASE_ID_SEPARATOR`].
//!
//! Axes `x = [1, 2, 3]` and `y = [10, 11]` therefore expand to
//! `1-10, 1-11, 2-10, 2-11, 3-10, 3-11`.
//!
//! Invariants:
//! - Case ids are unique within a table; collisions are errors, never merged.
//! - An empty axis yields an empty table carrying a skip reason.
//! - A test without axes yields exactly one case with the empty id.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::params::ParamValue;
use crate::params::ParameterAxis;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Separator placed between per-axis ids in a composed case id.
pub const CASE_ID_SEPARATOR: &str = "-";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Configuration errors detected while expanding a table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExpandError {
    /// Two axes share a name.
    #[error("test {test}: axis `{axis}` is declared more than once")]
    DuplicateAxis {
        /// Test being expanded.
        test: String,
        /// Repeated axis name.
        axis: String,
    },
    /// Explicit ids do not line up with values.
    #[error("axis `{axis}`: {ids} explicit ids for {values} values")]
    IdCountMismatch {
        /// Axis name.
        axis: String,
        /// Number of explicit ids.
        ids: usize,
        /// Number of values.
        values: usize,
    },
    /// Two cases derived the same id.
    #[error("test {test}: case id `{id}` is produced more than once")]
    DuplicateCaseId {
        /// Test being expanded.
        test: String,
        /// Colliding id.
        id: String,
    },
}

/// Errors raised when a case body reads its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseError {
    /// The case has no parameter with this name.
    #[error("case `{case}` has no parameter `{name}`")]
    MissingParam {
        /// Case id.
        case: String,
        /// Requested parameter.
        name: String,
    },
    /// The parameter exists with a different type.
    #[error("case `{case}`: parameter `{name}` is not {expected}")]
    TypeMismatch {
        /// Case id.
        case: String,
        /// Requested parameter.
        name: String,
        /// Expected kind.
        expected: &'static str,
    },
}

// ============================================================================
// SECTION: Cases
// ============================================================================

/// One concrete combination of parameter values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpandedCase {
    /// Position in the expanded table, starting at zero.
    ordinal: usize,
    /// Composed case id.
    id: String,
    /// `(axis name, value)` pairs in axis declaration order.
    bindings: Vec<(String, ParamValue)>,
}

impl ExpandedCase {
    /// Returns the composed id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the position of the case in its table.
    #[must_use]
    pub const fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Returns the bindings in axis declaration order.
    #[must_use]
    pub fn bindings(&self) -> &[(String, ParamValue)] {
        &self.bindings
    }

    /// Looks up a parameter by axis name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.bindings.iter().find(|(axis, _)| axis == name).map(|(_, value)| value)
    }

    /// Returns a parameter or a [`CaseError::MissingParam`].
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::MissingParam`] when no axis has this name.
    pub fn value(&self, name: &str) -> Result<&ParamValue, CaseError> {
        self.get(name).ok_or_else(|| CaseError::MissingParam {
            case: self.id.clone(),
            name: name.to_string(),
        })
    }

    /// Returns a string parameter.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError`] when the parameter is missing or not a string.
    pub fn str(&self, name: &str) -> Result<&str, CaseError> {
        self.value(name)?.as_str().ok_or_else(|| self.mismatch(name, "a string"))
    }

    /// Returns an integer parameter.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError`] when the parameter is missing or not an integer.
    pub fn int(&self, name: &str) -> Result<i64, CaseError> {
        self.value(name)?.as_int().ok_or_else(|| self.mismatch(name, "an integer"))
    }

    /// Returns a tuple parameter with exactly `arity` elements.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError`] when the parameter is missing, not a tuple, or
    /// has a different arity.
    pub fn tuple(&self, name: &str, arity: usize) -> Result<&[ParamValue], CaseError> {
        match self.value(name)?.as_tuple() {
            Some(items) if items.len() == arity => Ok(items),
            _ => Err(self.mismatch(name, "a tuple of the expected arity")),
        }
    }

    /// Returns any parameter rendered as request text.
    ///
    /// # Errors
    ///
    /// Returns [`CaseError::MissingParam`] when no axis has this name.
    pub fn text(&self, name: &str) -> Result<String, CaseError> {
        Ok(self.value(name)?.render())
    }

    /// Builds a type mismatch error for this case.
    fn mismatch(&self, name: &str, expected: &'static str) -> CaseError {
        CaseError::TypeMismatch {
            case: self.id.clone(),
            name: name.to_string(),
            expected,
        }
    }
}

// ============================================================================
// SECTION: Tables
// ============================================================================

/// Every case generated for one test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaseTable {
    /// Test name.
    test: String,
    /// Cases in enumeration order.
    cases: Vec<ExpandedCase>,
    /// Why the table is empty, when an axis had no values.
    skip_reason: Option<String>,
}

impl CaseTable {
    /// Expands `axes` into the full cross-product.
    ///
    /// # Errors
    ///
    /// Returns [`ExpandError`] when axis names repeat, explicit ids do not
    /// match their values, or two cases derive the same id.
    pub fn expand(test: impl Into<String>, axes: Vec<ParameterAxis>) -> Result<Self, ExpandError> {
        let test = test.into();
        let mut names = BTreeSet::new();
        let mut axis_ids = Vec::with_capacity(axes.len());
        for axis in &axes {
            if !names.insert(axis.name()) {
                return Err(ExpandError::DuplicateAxis {
                    test,
                    axis: axis.name().to_string(),
                });
            }
            axis_ids.push(axis.derive_ids()?);
        }

        if let Some(empty) = axes.iter().find(|axis| axis.is_empty()) {
            let skip_reason = format!("axis `{}` has no values", empty.name());
            return Ok(Self {
                test,
                cases: Vec::new(),
                skip_reason: Some(skip_reason),
            });
        }

        let mut rows: Vec<(Vec<&str>, Vec<(String, ParamValue)>)> = vec![(Vec::new(), Vec::new())];
        for (axis, ids) in axes.iter().zip(&axis_ids) {
            let mut next = Vec::with_capacity(rows.len().saturating_mul(axis.len()));
            for (row_ids, row_bindings) in &rows {
                for (value, id) in axis.values().iter().zip(ids) {
                    let mut composed_ids = row_ids.clone();
                    composed_ids.push(id.as_str());
                    let mut bindings = row_bindings.clone();
                    bindings.push((axis.name().to_string(), value.clone()));
                    next.push((composed_ids, bindings));
                }
            }
            rows = next;
        }

        let mut seen = BTreeSet::new();
        let mut cases = Vec::with_capacity(rows.len());
        for (ordinal, (ids, bindings)) in rows.into_iter().enumerate() {
            let id = ids.join(CASE_ID_SEPARATOR);
            if !seen.insert(id.clone()) {
                return Err(ExpandError::DuplicateCaseId {
                    test,
                    id,
                });
            }
            cases.push(ExpandedCase {
                ordinal,
                id,
                bindings,
            });
        }
        Ok(Self {
            test,
            cases,
            skip_reason: None,
        })
    }

    /// Builds the single-case table of an unparametrized test.
    #[must_use]
    pub fn single(test: impl Into<String>) -> Self {
        Self {
            test: test.into(),
            cases: vec![ExpandedCase {
                ordinal: 0,
                id: String::new(),
                bindings: Vec::new(),
            }],
            skip_reason: None,
        }
    }

    /// Returns the test name.
    #[must_use]
    pub fn test(&self) -> &str {
        &self.test
    }

    /// Returns the cases in enumeration order.
    #[must_use]
    pub fn cases(&self) -> &[ExpandedCase] {
        &self.cases
    }

    /// Returns the composed ids in enumeration order.
    #[must_use]
    pub fn ids(&self) -> Vec<&str> {
        self.cases.iter().map(ExpandedCase::id).collect()
    }

    /// Returns the number of cases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cases.len()
    }

    /// Returns true when no case was generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    /// Returns the skip reason when an axis was empty.
    #[must_use]
    pub fn skip_reason(&self) -> Option<&str> {
        self.skip_reason.as_deref()
    }

    /// Returns the display name of a case, `test[id]` or `test` for the
    /// unparametrized case.
    #[must_use]
    pub fn display_name(&self, case: &ExpandedCase) -> String {
        if case.id().is_empty() {
            self.test.clone()
        } else {
            format!("{}[{}]", self.test, case.id())
        }
    }
}
