// crates/petfriends-harness/src/params.rs
// ============================================================================
// Module: Parameter Axes
// Description: Raw parameter values and the axes that carry them.
// Purpose: Describe one dimension of test variation and how its ids derive.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`ParameterAxis`] is a named, ordered list of [`ParamValue`]s plus an
//! [`IdStrategy`]. Per-axis ids are derived here; composing them across axes
//! is the job of [`crate::expand::CaseTable`].
//! Invariants:
//! - Id derivation is a pure function of the axis; no randomness.
//! - Explicit id lists must match the value count exactly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::expand::CASE_ID_SEPARATOR;
use crate::expand::ExpandError;

// ============================================================================
// SECTION: Values
// ============================================================================

/// Raw value bound to a parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Absent value; renders as `None`.
    Null,
    /// Boolean; renders as `True` or `False`.
    Bool(bool),
    /// Signed integer.
    Int(i64),
    /// Text.
    Str(String),
    /// Ordered group of values consumed together by one case.
    Tuple(Vec<ParamValue>),
}

impl ParamValue {
    /// Returns the text when this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer when this is an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the elements when this is a tuple value.
    #[must_use]
    pub fn as_tuple(&self) -> Option<&[Self]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    /// Renders the value as request text; same as the default case id.
    #[must_use]
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("None"),
            Self::Bool(true) => f.write_str("True"),
            Self::Bool(false) => f.write_str("False"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Str(text) => f.write_str(text),
            Self::Tuple(items) => {
                for (index, item) in items.iter().enumerate() {
                    if index > 0 {
                        f.write_str(CASE_ID_SEPARATOR)?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

impl From<bool> for ParamValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Implements lossless integer conversions into [`ParamValue::Int`].
macro_rules! int_param {
    ($($ty:ty),*) => {
        $(impl From<$ty> for ParamValue {
            fn from(value: $ty) -> Self {
                Self::Int(i64::from(value))
            }
        })*
    };
}

int_param!(i8, i16, i32, i64, u8, u16, u32);

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Vec<Self>> for ParamValue {
    fn from(items: Vec<Self>) -> Self {
        Self::Tuple(items)
    }
}

impl<A, B> From<(A, B)> for ParamValue
where
    A: Into<Self>,
    B: Into<Self>,
{
    fn from((a, b): (A, B)) -> Self {
        Self::Tuple(vec![a.into(), b.into()])
    }
}

impl<A, B, C> From<(A, B, C)> for ParamValue
where
    A: Into<Self>,
    B: Into<Self>,
    C: Into<Self>,
{
    fn from((a, b, c): (A, B, C)) -> Self {
        Self::Tuple(vec![a.into(), b.into(), c.into()])
    }
}

// ============================================================================
// SECTION: Id Strategies
// ============================================================================

/// Function mapping a raw value to its display id.
pub type IdFn = Arc<dyn Fn(&ParamValue) -> String + Send + Sync>;

/// How an axis names its values.
#[derive(Clone, Default)]
pub enum IdStrategy {
    /// Stringify each value (tuples element-wise, joined with `-`).
    #[default]
    Default,
    /// Positional ids, one per value.
    Explicit(Vec<String>),
    /// Ids computed from each value.
    Function(IdFn),
}

impl fmt::Debug for IdStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Explicit(ids) => f.debug_tuple("Explicit").field(ids).finish(),
            Self::Function(_) => f.write_str("Function(..)"),
        }
    }
}

// ============================================================================
// SECTION: Axes
// ============================================================================

/// One named dimension of variation for a test.
#[derive(Debug, Clone)]
pub struct ParameterAxis {
    /// Name the body uses to look the value up.
    name: String,
    /// Values in declaration order.
    values: Vec<ParamValue>,
    /// Id derivation policy.
    ids: IdStrategy,
}

impl ParameterAxis {
    /// Declares an axis with default ids.
    pub fn new<I, V>(name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<ParamValue>,
    {
        Self {
            name: name.into(),
            values: values.into_iter().map(Into::into).collect(),
            ids: IdStrategy::Default,
        }
    }

    /// Uses explicit positional ids.
    #[must_use]
    pub fn with_ids<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ids = IdStrategy::Explicit(ids.into_iter().map(Into::into).collect());
        self
    }

    /// Uses an id-generating function.
    #[must_use]
    pub fn with_id_fn<F>(mut self, id_fn: F) -> Self
    where
        F: Fn(&ParamValue) -> String + Send + Sync + 'static,
    {
        self.ids = IdStrategy::Function(Arc::new(id_fn));
        self
    }

    /// Returns the axis name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the values in declaration order.
    #[must_use]
    pub fn values(&self) -> &[ParamValue] {
        &self.values
    }

    /// Returns the id strategy.
    #[must_use]
    pub const fn id_strategy(&self) -> &IdStrategy {
        &self.ids
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true when the axis has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Derives one id per value according to the axis strategy.
    ///
    /// # Errors
    ///
    /// Returns [`ExpandError::IdCountMismatch`] when an explicit id list has a
    /// different length than the value list.
    pub fn derive_ids(&self) -> Result<Vec<String>, ExpandError> {
        match &self.ids {
            IdStrategy::Default => Ok(self.values.iter().map(ParamValue::render).collect()),
            IdStrategy::Explicit(ids) => {
                if ids.len() != self.values.len() {
                    return Err(ExpandError::IdCountMismatch {
                        axis: self.name.clone(),
                        ids: ids.len(),
                        values: self.values.len(),
                    });
                }
                Ok(ids.clone())
            }
            IdStrategy::Function(id_fn) => Ok(self.values.iter().map(|value| id_fn(value)).collect()),
        }
    }
}
