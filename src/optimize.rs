//! Condition optimization: classification, cast resolution, and index
//! evaluator construction.
//!
//! This is the binding-time entry point. It never fails the caller:
//! every outcome is either a built evaluator or `None`, with a binding
//! diagnostic reported only for the failures that indicate a genuine
//! source problem. Rules that decline here simply stay on the
//! unoptimized evaluation path.

use tracing::debug;

use crate::classify::{classify_condition, Classification};
use crate::index::{
    CombinedRangeIndexEvaluator, EqualsIndexedEvaluator, EqualsVariant, IndexedEvaluator,
    SingleRangeIndexEvaluator,
};
use crate::types::{
    AdaptError, AdaptorRegistry, Condition, ConditionCasts, Diagnostics, EvaluatorFactory,
    RangeAdaptor, RangeFactory, ScalarType, Signature, TypeAdaptor,
};

/// Attempt to build an index evaluator for one condition.
///
/// Returns `None` when the condition is not indexable or construction
/// fails; genuine source problems (a computed array index, a type pair
/// with no implicit cast, an unregistered type) additionally report a
/// diagnostic. Never panics.
pub fn optimize_condition(
    condition: &Condition,
    signature: &Signature,
    registry: &AdaptorRegistry,
    diagnostics: &mut Diagnostics,
) -> Option<IndexedEvaluator> {
    let Classification {
        factory,
        field_type,
    } = classify_condition(condition, signature, diagnostics)?;

    let evaluator = match factory {
        EvaluatorFactory::Equals(factory) => {
            let (column, parameter) = condition.parameter(&factory.condition_parameter)?;
            let casts = resolve_casts(
                parameter.scalar_type().clone(),
                field_type,
                condition,
                diagnostics,
            )?;
            let adaptor = lookup_adaptor(registry, &casts, condition, diagnostics)?;
            let variant = if condition.empty_row_count() > 1 {
                EqualsVariant::V2
            } else {
                EqualsVariant::V1
            };
            let built = EqualsIndexedEvaluator::build(
                factory,
                variant,
                condition.rows(),
                column,
                adaptor,
                casts,
            );
            IndexedEvaluator::Equals(checked(built, condition, diagnostics)?)
        }
        EvaluatorFactory::Range(RangeFactory::OneSided(factory)) => {
            let (column, parameter) = condition.parameter(&factory.condition_parameter)?;
            let casts = resolve_casts(
                parameter.scalar_type().clone(),
                field_type,
                condition,
                diagnostics,
            )?;
            let adaptor = lookup_adaptor(registry, &casts, condition, diagnostics)?;
            let range = checked(
                RangeAdaptor::new(RangeFactory::OneSided(factory), adaptor, casts),
                condition,
                diagnostics,
            )?;
            let built = SingleRangeIndexEvaluator::build(range, condition.rows(), column);
            IndexedEvaluator::Range(checked(built, condition, diagnostics)?)
        }
        EvaluatorFactory::Range(RangeFactory::TwoSided(factory)) => {
            let (lo_column, lo_parameter) = condition.parameter(&factory.lo_parameter)?;
            let (hi_column, hi_parameter) = condition.parameter(&factory.hi_parameter)?;
            if lo_parameter.scalar_type() != hi_parameter.scalar_type() {
                debug!(
                    lo = %lo_parameter.scalar_type(),
                    hi = %hi_parameter.scalar_type(),
                    "interval bound parameters have different declared types"
                );
                return None;
            }
            let casts = resolve_casts(
                lo_parameter.scalar_type().clone(),
                field_type,
                condition,
                diagnostics,
            )?;
            let adaptor = lookup_adaptor(registry, &casts, condition, diagnostics)?;
            let range = checked(
                RangeAdaptor::new(RangeFactory::TwoSided(factory), adaptor, casts),
                condition,
                diagnostics,
            )?;
            let built =
                CombinedRangeIndexEvaluator::build(range, condition.rows(), lo_column, hi_column);
            IndexedEvaluator::Combined(checked(built, condition, diagnostics)?)
        }
    };

    debug!(
        formal = evaluator.formal_source(condition),
        optimized = %evaluator.optimized_source(),
        "condition index built"
    );
    Some(evaluator)
}

fn resolve_casts(
    condition_type: ScalarType,
    field_type: ScalarType,
    condition: &Condition,
    diagnostics: &mut Diagnostics,
) -> Option<ConditionCasts> {
    let casts = ConditionCasts::resolve(condition_type.clone(), field_type.clone());
    if !casts.at_least_one_exists() {
        diagnostics.report(
            AdaptError::NoCast {
                from: field_type,
                to: condition_type,
            }
            .to_string(),
            condition.location(),
        );
        return None;
    }
    Some(casts)
}

fn lookup_adaptor(
    registry: &AdaptorRegistry,
    casts: &ConditionCasts,
    condition: &Condition,
    diagnostics: &mut Diagnostics,
) -> Option<TypeAdaptor> {
    match registry.adaptor_for(casts.comparison_type()) {
        Ok(adaptor) => Some(adaptor.clone()),
        Err(err) => {
            diagnostics.report(err.to_string(), condition.location());
            None
        }
    }
}

/// Convert a construction failure into a diagnostic plus fallback.
fn checked<T>(
    result: Result<T, AdaptError>,
    condition: &Condition,
    diagnostics: &mut Diagnostics,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            diagnostics.report(err.to_string(), condition.location());
            None
        }
    }
}
