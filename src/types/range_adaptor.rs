use super::adaptor::{IndexKey, TypeAdaptor};
use super::casts::ConditionCasts;
use super::error::AdaptError;
use super::factory::RangeFactory;
use super::relation::BoundSide;
use super::value::Value;

/// Bridges a classified range factory, a type adaptor, and the resolved
/// casts into bound computation for the range evaluators.
///
/// A pure function bundle: no mutable state, safe to share across
/// request threads. Raw values from either side of the comparison are
/// cast into the shared comparison type, converted to keys, and
/// incremented where the factory normalizes an inclusive bound into
/// half-open `[min, max)` form.
#[derive(Debug, Clone)]
pub struct RangeAdaptor {
    factory: RangeFactory,
    adaptor: TypeAdaptor,
    casts: ConditionCasts,
}

impl RangeAdaptor {
    /// Build the adaptor, verifying up front that every bound the
    /// factory requires an increment for is served by a type that
    /// defines one.
    ///
    /// # Errors
    ///
    /// [`AdaptError::NoIncrement`] when the factory needs an increment
    /// the type cannot provide (e.g. an open boundary over text keys).
    pub fn new(
        factory: RangeFactory,
        adaptor: TypeAdaptor,
        casts: ConditionCasts,
    ) -> Result<Self, AdaptError> {
        let needs_increment = (factory.has_min() && factory.needs_increment(BoundSide::Lower))
            || (factory.has_max() && factory.needs_increment(BoundSide::Upper));
        if needs_increment && !adaptor.supports_increment() {
            return Err(AdaptError::NoIncrement {
                ty: adaptor.scalar_type(),
            });
        }
        Ok(Self {
            factory,
            adaptor,
            casts,
        })
    }

    #[must_use]
    pub fn factory(&self) -> &RangeFactory {
        &self.factory
    }

    /// The inclusive lower bound key for `raw`, or `None` when `raw` is
    /// absent or the factory has no lower bound.
    ///
    /// # Errors
    ///
    /// Propagates cast and conversion failures.
    pub fn get_min(&self, raw: Option<&Value>) -> Result<Option<IndexKey>, AdaptError> {
        self.bound(raw, BoundSide::Lower)
    }

    /// The exclusive upper bound key for `raw`, or `None` when `raw` is
    /// absent or the factory has no upper bound.
    ///
    /// # Errors
    ///
    /// Propagates cast and conversion failures.
    pub fn get_max(&self, raw: Option<&Value>) -> Result<Option<IndexKey>, AdaptError> {
        self.bound(raw, BoundSide::Upper)
    }

    /// Convert a raw value (stored rule parameter or live input) into
    /// its comparison key, without bound normalization.
    ///
    /// # Errors
    ///
    /// Propagates cast and conversion failures.
    pub fn adapt_value(&self, raw: &Value) -> Result<IndexKey, AdaptError> {
        let value = self.casts.cast_to_comparison_type(raw)?;
        self.adaptor.convert(&value)
    }

    fn bound(
        &self,
        raw: Option<&Value>,
        side: BoundSide,
    ) -> Result<Option<IndexKey>, AdaptError> {
        let has_bound = match side {
            BoundSide::Lower => self.factory.has_min(),
            BoundSide::Upper => self.factory.has_max(),
        };
        let Some(raw) = raw else { return Ok(None) };
        if !has_bound {
            return Ok(None);
        }
        let mut key = self.adapt_value(raw)?;
        if self.factory.needs_increment(side) {
            key = self.adaptor.increment(key)?;
        }
        Ok(Some(key))
    }
}
