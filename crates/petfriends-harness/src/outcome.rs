// crates/petfriends-harness/src/outcome.rs
// ============================================================================
// Module: Expected Outcomes
// Description: Status and payload-shape expectations for API responses.
// Purpose: Compare actual responses to expectations with literal diagnostics.
// Dependencies: petfriends-client, serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! An [`ExpectedOutcome`] is a status code plus zero or more
//! [`PayloadShape`] checks. [`ExpectedOutcome::verify`] checks the status
//! first, then each shape in order, and stops at the first mismatch with an
//! [`AssertionFailure`] that records both the expected and the actual value.

// ============================================================================
// SECTION: Imports
// ============================================================================

use petfriends_client::ApiResponse;
use petfriends_client::ClientError;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::expand::CaseError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Maximum characters of a payload quoted in a failure.
const PAYLOAD_EXCERPT_CHARS: usize = 200;

// ============================================================================
// SECTION: Failures
// ============================================================================

/// An expected outcome did not match the actual one.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{check}: expected {expected}, actual {actual}")]
pub struct AssertionFailure {
    /// What was being checked.
    pub check: String,
    /// Expected value, rendered literally.
    pub expected: String,
    /// Actual value, rendered literally.
    pub actual: String,
}

impl AssertionFailure {
    /// Builds a failure from its parts.
    #[must_use]
    pub fn new(
        check: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            check: check.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

impl From<ClientError> for AssertionFailure {
    fn from(err: ClientError) -> Self {
        Self::new("api call", "a response", err.to_string())
    }
}

impl From<CaseError> for AssertionFailure {
    fn from(err: CaseError) -> Self {
        Self::new("case parameters", "a well-formed case", err.to_string())
    }
}

// ============================================================================
// SECTION: Expectations
// ============================================================================

/// Check applied to a response payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum PayloadShape {
    /// Top-level JSON field equals `value`.
    FieldEquals {
        /// Field name.
        field: String,
        /// Expected JSON value.
        value: Value,
    },
    /// Top-level JSON field is a non-empty array.
    NonEmpty {
        /// Field name.
        field: String,
    },
    /// Field (JSON object) or substring (text) is present.
    Contains {
        /// Field name or substring.
        needle: String,
    },
    /// Field (JSON object) or substring (text) is absent.
    Excludes {
        /// Field name or substring.
        needle: String,
    },
    /// Array field holds no object whose `id` equals `id`.
    ExcludesEntry {
        /// Array field name.
        collection: String,
        /// Identifier that must not be listed.
        id: String,
    },
}

impl PayloadShape {
    /// Checks the shape against a response.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] describing the first mismatch.
    pub fn check(&self, response: &ApiResponse) -> Result<(), AssertionFailure> {
        let payload = &response.payload;
        match self {
            Self::FieldEquals {
                field,
                value,
            } => match payload.field(field) {
                Some(actual) if actual == value => Ok(()),
                Some(actual) => Err(AssertionFailure::new(
                    format!("field `{field}`"),
                    value.to_string(),
                    actual.to_string(),
                )),
                None => Err(AssertionFailure::new(
                    format!("field `{field}`"),
                    value.to_string(),
                    format!("missing in {}", payload.excerpt(PAYLOAD_EXCERPT_CHARS)),
                )),
            },
            Self::NonEmpty {
                field,
            } => match payload.field(field).and_then(Value::as_array) {
                Some(items) if !items.is_empty() => Ok(()),
                Some(_) => Err(AssertionFailure::new(
                    format!("field `{field}`"),
                    "a non-empty list",
                    "an empty list",
                )),
                None => Err(AssertionFailure::new(
                    format!("field `{field}`"),
                    "a non-empty list",
                    payload.excerpt(PAYLOAD_EXCERPT_CHARS),
                )),
            },
            Self::Contains {
                needle,
            } => {
                if payload.contains(needle) {
                    Ok(())
                } else {
                    Err(AssertionFailure::new(
                        "payload",
                        format!("to contain `{needle}`"),
                        payload.excerpt(PAYLOAD_EXCERPT_CHARS),
                    ))
                }
            }
            Self::Excludes {
                needle,
            } => {
                if payload.contains(needle) {
                    Err(AssertionFailure::new(
                        "payload",
                        format!("not to contain `{needle}`"),
                        payload.excerpt(PAYLOAD_EXCERPT_CHARS),
                    ))
                } else {
                    Ok(())
                }
            }
            Self::ExcludesEntry {
                collection,
                id,
            } => {
                let Some(items) = payload.field(collection).and_then(Value::as_array) else {
                    return Err(AssertionFailure::new(
                        format!("field `{collection}`"),
                        "a list",
                        payload.excerpt(PAYLOAD_EXCERPT_CHARS),
                    ));
                };
                let listed = items
                    .iter()
                    .any(|item| item.get("id").and_then(Value::as_str) == Some(id.as_str()));
                if listed {
                    Err(AssertionFailure::new(
                        format!("field `{collection}`"),
                        format!("no entry with id `{id}`"),
                        format!("entry `{id}` still listed"),
                    ))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Status code and payload shapes a response must satisfy.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpectedOutcome {
    /// Expected HTTP status.
    pub status: u16,
    /// Payload checks applied in order after the status matches.
    pub shapes: Vec<PayloadShape>,
}

impl ExpectedOutcome {
    /// Expects `status` with no payload checks.
    #[must_use]
    pub const fn status(status: u16) -> Self {
        Self {
            status,
            shapes: Vec::new(),
        }
    }

    /// Adds a payload check.
    #[must_use]
    pub fn with(mut self, shape: PayloadShape) -> Self {
        self.shapes.push(shape);
        self
    }

    /// Expects a top-level field to equal `value`.
    #[must_use]
    pub fn field_equals(self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.with(PayloadShape::FieldEquals {
            field: field.into(),
            value: value.into(),
        })
    }

    /// Expects a top-level array field to be non-empty.
    #[must_use]
    pub fn non_empty(self, field: impl Into<String>) -> Self {
        self.with(PayloadShape::NonEmpty {
            field: field.into(),
        })
    }

    /// Expects a field or substring to be present.
    #[must_use]
    pub fn contains(self, needle: impl Into<String>) -> Self {
        self.with(PayloadShape::Contains {
            needle: needle.into(),
        })
    }

    /// Expects a field or substring to be absent.
    #[must_use]
    pub fn excludes(self, needle: impl Into<String>) -> Self {
        self.with(PayloadShape::Excludes {
            needle: needle.into(),
        })
    }

    /// Expects an array field to hold no entry with `id`.
    #[must_use]
    pub fn excludes_entry(self, collection: impl Into<String>, id: impl Into<String>) -> Self {
        self.with(PayloadShape::ExcludesEntry {
            collection: collection.into(),
            id: id.into(),
        })
    }

    /// Checks a response against the expectation.
    ///
    /// # Errors
    ///
    /// Returns [`AssertionFailure`] for the first mismatch: status first, then
    /// payload shapes in declaration order.
    pub fn verify(&self, response: &ApiResponse) -> Result<(), AssertionFailure> {
        if response.status != self.status {
            return Err(AssertionFailure::new(
                "status",
                self.status.to_string(),
                format!(
                    "{} ({})",
                    response.status,
                    response.payload.excerpt(PAYLOAD_EXCERPT_CHARS)
                ),
            ));
        }
        self.shapes.iter().try_for_each(|shape| shape.check(response))
    }
}
