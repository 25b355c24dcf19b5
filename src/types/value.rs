use std::fmt;
use std::str::FromStr;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

/// Semantic tag for a declared scalar type.
///
/// The adaptor registry and the implicit-cast table are keyed by this tag,
/// which keeps the supported-type set auditable in one place.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Int,
    Decimal,
    Date,
    Text,
    /// A domain-specific numeric wrapper (e.g. a money or rate type),
    /// identified by its unit name and keyed on its decimal amount.
    DomainNumeric(String),
}

impl fmt::Display for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarType::Int => write!(f, "Int"),
            ScalarType::Decimal => write!(f, "Decimal"),
            ScalarType::Date => write!(f, "Date"),
            ScalarType::Text => write!(f, "Text"),
            ScalarType::DomainNumeric(unit) => write!(f, "DomainNumeric({unit})"),
        }
    }
}

/// A runtime scalar value: a stored rule parameter or a live input.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Decimal(BigDecimal),
    Date(NaiveDate),
    Text(String),
    DomainNumeric(String, BigDecimal),
}

impl Value {
    /// The scalar type tag of this value.
    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            Value::Int(_) => ScalarType::Int,
            Value::Decimal(_) => ScalarType::Decimal,
            Value::Date(_) => ScalarType::Date,
            Value::Text(_) => ScalarType::Text,
            Value::DomainNumeric(unit, _) => ScalarType::DomainNumeric(unit.clone()),
        }
    }

    /// Convenience constructor for decimal values from literal text.
    ///
    /// # Panics
    ///
    /// Panics if `s` is not a valid decimal literal; intended for
    /// construction from trusted table sources and tests.
    #[must_use]
    pub fn decimal(s: &str) -> Value {
        Value::Decimal(BigDecimal::from_str(s).expect("valid decimal literal"))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<BigDecimal> for Value {
    fn from(v: BigDecimal) -> Self {
        Value::Decimal(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Value::Date(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Decimal(v) => write!(f, "{v}"),
            Value::Date(v) => write!(f, "{v}"),
            Value::Text(v) => write!(f, "\"{v}\""),
            Value::DomainNumeric(unit, v) => write!(f, "{v} {unit}"),
        }
    }
}
