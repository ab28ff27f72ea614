//! Literal values and comparison operators used by leaf predicates.

use std::{cmp::Ordering, fmt};

/// Literal values accepted by comparison filters.
#[derive(Clone, Debug, PartialEq)]
pub enum ScalarValue {
    /// Represents SQL/Arrow `NULL`.
    Null,
    /// Boolean literal.
    Boolean(bool),
    /// Signed 64-bit integer.
    Int64(i64),
    /// Unsigned 64-bit integer.
    UInt64(u64),
    /// 64-bit floating point.
    Float64(f64),
    /// UTF-8 string.
    Utf8(String),
}

impl ScalarValue {
    /// Returns true when the literal is the `Null` variant.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, ScalarValue::Null)
    }

    /// Widens integer literals so they compare against any integer column.
    pub(crate) fn as_i128(&self) -> Option<i128> {
        match self {
            ScalarValue::Int64(v) => Some(i128::from(*v)),
            ScalarValue::UInt64(v) => Some(i128::from(*v)),
            _ => None,
        }
    }

    pub(crate) fn as_f64(&self) -> Option<f64> {
        match self {
            ScalarValue::Float64(v) => Some(*v),
            _ => None,
        }
    }

    /// True for the literals that compare against integer and float columns.
    pub(crate) fn is_numeric(&self) -> bool {
        self.as_i128().is_some() || self.as_f64().is_some()
    }

    pub(crate) fn as_str(&self) -> Option<&str> {
        match self {
            ScalarValue::Utf8(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub(crate) fn as_bool(&self) -> Option<bool> {
        match self {
            ScalarValue::Boolean(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<bool> for ScalarValue {
    fn from(value: bool) -> Self {
        ScalarValue::Boolean(value)
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int64(value)
    }
}

impl From<u64> for ScalarValue {
    fn from(value: u64) -> Self {
        ScalarValue::UInt64(value)
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float64(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Utf8(value.to_owned())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Utf8(value)
    }
}

/// Comparison operator used by binary predicates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ComparisonOp {
    /// Equals (`=`).
    Equal,
    /// Not equals (`!=`).
    NotEqual,
    /// Less than (`<`).
    LessThan,
    /// Less than or equal to (`<=`).
    LessThanOrEqual,
    /// Greater than (`>`).
    GreaterThan,
    /// Greater than or equal to (`>=`).
    GreaterThanOrEqual,
}

impl ComparisonOp {
    /// Returns a textual representation of the operator.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ComparisonOp::Equal => "=",
            ComparisonOp::NotEqual => "!=",
            ComparisonOp::LessThan => "<",
            ComparisonOp::LessThanOrEqual => "<=",
            ComparisonOp::GreaterThan => ">",
            ComparisonOp::GreaterThanOrEqual => ">=",
        }
    }

    /// Evaluates the operator against `column_value.cmp(literal)`.
    ///
    /// Incomparable values (`None`, e.g. NaN) never match.
    #[must_use]
    pub fn test_ordering(self, ordering: Option<Ordering>) -> bool {
        let Some(ordering) = ordering else {
            return false;
        };
        match self {
            ComparisonOp::Equal => ordering == Ordering::Equal,
            ComparisonOp::NotEqual => ordering != Ordering::Equal,
            ComparisonOp::LessThan => ordering == Ordering::Less,
            ComparisonOp::LessThanOrEqual => ordering != Ordering::Greater,
            ComparisonOp::GreaterThan => ordering == Ordering::Greater,
            ComparisonOp::GreaterThanOrEqual => ordering != Ordering::Less,
        }
    }
}

/// Orders an integer against a float without rounding either side.
///
/// Casting the integer to `f64` would merge neighbours above 2^53, so the float
/// is split into its floor and fraction instead. NaN is incomparable.
pub(crate) fn compare_int_float(int: i128, float: f64) -> Option<Ordering> {
    if float.is_nan() {
        return None;
    }
    // 2^127 is exact in f64 and lies above every i128.
    const BOUND: f64 = 170_141_183_460_469_231_731_687_303_715_884_105_728.0;
    if float >= BOUND {
        return Some(Ordering::Less);
    }
    if float < -BOUND {
        return Some(Ordering::Greater);
    }
    let floor = float.floor();
    let ordering = match int.cmp(&(floor as i128)) {
        Ordering::Equal if float > floor => Ordering::Less,
        ordering => ordering,
    };
    Some(ordering)
}

impl fmt::Display for ComparisonOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
