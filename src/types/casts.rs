use bigdecimal::BigDecimal;

use super::error::AdaptError;
use super::value::{ScalarType, Value};

/// A single implicit conversion between scalar types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CastFn {
    Identity,
    IntToDecimal,
    DomainToDecimal,
}

impl CastFn {
    fn apply(self, value: &Value) -> Option<Value> {
        match (self, value) {
            (CastFn::Identity, v) => Some(v.clone()),
            (CastFn::IntToDecimal, Value::Int(v)) => Some(Value::Decimal(BigDecimal::from(*v))),
            (CastFn::DomainToDecimal, Value::DomainNumeric(_, amount)) => {
                Some(Value::Decimal(amount.clone()))
            }
            _ => None,
        }
    }
}

/// The implicit conversions that exist from one scalar type to another.
///
/// The table is deliberately small and lossless: integer widening into
/// decimals and unwrapping domain numerics into their decimal amount.
/// Narrowing and cross-kind conversions do not exist.
fn implicit_cast(from: &ScalarType, to: &ScalarType) -> Option<CastFn> {
    if from == to {
        return Some(CastFn::Identity);
    }
    match (from, to) {
        (ScalarType::Int, ScalarType::Decimal) => Some(CastFn::IntToDecimal),
        (ScalarType::DomainNumeric(_), ScalarType::Decimal) => Some(CastFn::DomainToDecimal),
        _ => None,
    }
}

/// Which implicit casts exist between a condition's declared parameter
/// type and the dispatch field's type.
///
/// Optimization requires at least one direction; the shared comparison
/// space is the condition type when the field side can be brought into
/// it, otherwise the field type.
#[derive(Debug, Clone)]
pub struct ConditionCasts {
    condition_type: ScalarType,
    field_type: ScalarType,
    to_condition: Option<CastFn>,
    to_field: Option<CastFn>,
}

impl ConditionCasts {
    /// Resolve cast availability for a `(conditionType, fieldType)` pair.
    #[must_use]
    pub fn resolve(condition_type: ScalarType, field_type: ScalarType) -> Self {
        let to_condition = implicit_cast(&field_type, &condition_type);
        let to_field = implicit_cast(&condition_type, &field_type);
        Self {
            condition_type,
            field_type,
            to_condition,
            to_field,
        }
    }

    /// Whether any implicit cast exists in either direction.
    #[must_use]
    pub fn at_least_one_exists(&self) -> bool {
        self.to_condition.is_some() || self.to_field.is_some()
    }

    /// The type both sides are compared in.
    #[must_use]
    pub fn comparison_type(&self) -> &ScalarType {
        if self.to_condition.is_some() {
            &self.condition_type
        } else {
            &self.field_type
        }
    }

    /// Cast a value into the condition's declared parameter type.
    ///
    /// Values already of the condition type pass through unchanged.
    ///
    /// # Errors
    ///
    /// [`AdaptError::NoCast`] when no implicit conversion applies.
    pub fn cast_to_condition_type(&self, value: &Value) -> Result<Value, AdaptError> {
        Self::cast_with(value, &self.condition_type, self.to_condition)
    }

    /// Cast a value into the dispatch field's type.
    ///
    /// # Errors
    ///
    /// [`AdaptError::NoCast`] when no implicit conversion applies.
    pub fn cast_to_input_type(&self, value: &Value) -> Result<Value, AdaptError> {
        Self::cast_with(value, &self.field_type, self.to_field)
    }

    /// Cast a value (from either side of the comparison) into the shared
    /// comparison type.
    ///
    /// # Errors
    ///
    /// [`AdaptError::NoCast`] when no implicit conversion applies.
    pub fn cast_to_comparison_type(&self, value: &Value) -> Result<Value, AdaptError> {
        if self.to_condition.is_some() {
            self.cast_to_condition_type(value)
        } else {
            self.cast_to_input_type(value)
        }
    }

    fn cast_with(
        value: &Value,
        target: &ScalarType,
        cast: Option<CastFn>,
    ) -> Result<Value, AdaptError> {
        let from = value.scalar_type();
        if &from == target {
            return Ok(value.clone());
        }
        cast.and_then(|c| c.apply(value))
            .ok_or_else(|| AdaptError::NoCast {
                from,
                to: target.clone(),
            })
    }
}
