use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use num_bigint::BigInt;

use super::error::AdaptError;
use super::value::{ScalarType, Value};

/// An ordered, hashable comparison key produced by a type adaptor.
///
/// Every key inside one evaluator is produced by the same adaptor and so
/// carries the same variant; the derived cross-variant ordering is never
/// exercised.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum IndexKey {
    Int(i64),
    Decimal(BigDecimal),
    Date(NaiveDate),
    Text(String),
}

impl Hash for IndexKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            IndexKey::Int(v) => {
                0u8.hash(state);
                v.hash(state);
            }
            IndexKey::Decimal(v) => {
                // Hash the normalized representation so numerically equal
                // decimals of different scale collide (1.5 == 1.50).
                let (digits, exponent) = v.normalized().as_bigint_and_exponent();
                1u8.hash(state);
                digits.hash(state);
                exponent.hash(state);
            }
            IndexKey::Date(v) => {
                2u8.hash(state);
                v.hash(state);
            }
            IndexKey::Text(v) => {
                3u8.hash(state);
                v.hash(state);
            }
        }
    }
}

/// Per-scalar-type conversion to an ordered key, plus the "next
/// representable value" used to normalize inclusive bounds into
/// half-open form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeAdaptor {
    Int,
    Decimal,
    Date,
    Text,
    DomainNumeric(String),
}

impl TypeAdaptor {
    /// The scalar type this adaptor serves.
    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        match self {
            TypeAdaptor::Int => ScalarType::Int,
            TypeAdaptor::Decimal => ScalarType::Decimal,
            TypeAdaptor::Date => ScalarType::Date,
            TypeAdaptor::Text => ScalarType::Text,
            TypeAdaptor::DomainNumeric(unit) => ScalarType::DomainNumeric(unit.clone()),
        }
    }

    /// Convert a value of the advertised type into its comparison key.
    ///
    /// # Errors
    ///
    /// Returns [`AdaptError::TypeMismatch`] if the value does not belong
    /// to this adaptor's type.
    pub fn convert(&self, value: &Value) -> Result<IndexKey, AdaptError> {
        match (self, value) {
            (TypeAdaptor::Int, Value::Int(v)) => Ok(IndexKey::Int(*v)),
            (TypeAdaptor::Decimal, Value::Decimal(v)) => Ok(IndexKey::Decimal(v.clone())),
            (TypeAdaptor::Date, Value::Date(v)) => Ok(IndexKey::Date(*v)),
            (TypeAdaptor::Text, Value::Text(v)) => Ok(IndexKey::Text(v.clone())),
            (TypeAdaptor::DomainNumeric(unit), Value::DomainNumeric(value_unit, amount))
                if unit == value_unit =>
            {
                Ok(IndexKey::Decimal(amount.clone()))
            }
            _ => Err(AdaptError::TypeMismatch {
                value: value.to_string(),
                ty: self.scalar_type(),
            }),
        }
    }

    /// Whether this adaptor defines a "next value". Types without one
    /// (text) can only serve bounds that need no increment.
    #[must_use]
    pub fn supports_increment(&self) -> bool {
        !matches!(self, TypeAdaptor::Text)
    }

    /// The smallest meaningful increment for a key of this type:
    /// integers step by one, decimals by one unit in the last place of
    /// the key's own scale, dates by one calendar day.
    ///
    /// # Errors
    ///
    /// [`AdaptError::NoIncrement`] for text keys and
    /// [`AdaptError::IncrementOverflow`] at the type's upper edge.
    pub fn increment(&self, key: IndexKey) -> Result<IndexKey, AdaptError> {
        match key {
            IndexKey::Int(v) => v
                .checked_add(1)
                .map(IndexKey::Int)
                .ok_or(AdaptError::IncrementOverflow {
                    ty: ScalarType::Int,
                }),
            IndexKey::Decimal(v) => {
                let (digits, exponent) = v.as_bigint_and_exponent();
                Ok(IndexKey::Decimal(BigDecimal::new(
                    digits + BigInt::from(1),
                    exponent,
                )))
            }
            IndexKey::Date(v) => v
                .succ_opt()
                .map(IndexKey::Date)
                .ok_or(AdaptError::IncrementOverflow {
                    ty: ScalarType::Date,
                }),
            IndexKey::Text(_) => Err(AdaptError::NoIncrement {
                ty: ScalarType::Text,
            }),
        }
    }
}

/// Immutable table mapping scalar-type tags to their adaptors.
///
/// Populated once at startup; domain numeric units are registered at
/// construction time and the table is never mutated afterwards, so it is
/// freely shareable across request threads.
#[derive(Debug, Clone)]
pub struct AdaptorRegistry {
    adaptors: HashMap<ScalarType, TypeAdaptor>,
}

impl AdaptorRegistry {
    /// The standard registry covering integers, decimals, dates, and text.
    #[must_use]
    pub fn standard() -> Self {
        let mut adaptors = HashMap::new();
        adaptors.insert(ScalarType::Int, TypeAdaptor::Int);
        adaptors.insert(ScalarType::Decimal, TypeAdaptor::Decimal);
        adaptors.insert(ScalarType::Date, TypeAdaptor::Date);
        adaptors.insert(ScalarType::Text, TypeAdaptor::Text);
        Self { adaptors }
    }

    /// Extend the registry with a domain numeric unit (consumes and
    /// returns the registry; registration happens before first use).
    #[must_use]
    pub fn with_domain_numeric(mut self, unit: &str) -> Self {
        self.adaptors.insert(
            ScalarType::DomainNumeric(unit.to_owned()),
            TypeAdaptor::DomainNumeric(unit.to_owned()),
        );
        self
    }

    /// Look up the adaptor for a scalar type.
    ///
    /// # Errors
    ///
    /// [`AdaptError::NoAdaptor`] if the type was never registered.
    pub fn adaptor_for(&self, ty: &ScalarType) -> Result<&TypeAdaptor, AdaptError> {
        self.adaptors
            .get(ty)
            .ok_or_else(|| AdaptError::NoAdaptor { ty: ty.clone() })
    }
}
