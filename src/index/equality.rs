use std::collections::HashMap;

use tracing::warn;

use crate::types::{
    AdaptError, Condition, ConditionCasts, ConditionRow, EqualsFactory, IndexKey, TypeAdaptor,
    Value,
};

/// Which wildcard-accumulation path the evaluator was built with.
///
/// V1 serves conditions with at most one wildcard row; V2 accumulates
/// any number. Lookup behavior is identical either way: the hash hit
/// united with every wildcard row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualsVariant {
    V1,
    V2,
}

/// Hash-keyed equality index: stored condition values mapped to the rule
/// rows that carry them, with wildcard rows tracked separately.
///
/// Built once during table binding, immutable and lock-free afterwards.
#[derive(Debug)]
pub struct EqualsIndexedEvaluator {
    factory: EqualsFactory,
    variant: EqualsVariant,
    index: HashMap<IndexKey, Vec<usize>>,
    wildcard_rows: Vec<usize>,
    adaptor: TypeAdaptor,
    casts: ConditionCasts,
}

impl EqualsIndexedEvaluator {
    pub(crate) fn build(
        factory: EqualsFactory,
        variant: EqualsVariant,
        rows: &[ConditionRow],
        column: usize,
        adaptor: TypeAdaptor,
        casts: ConditionCasts,
    ) -> Result<Self, AdaptError> {
        let mut index: HashMap<IndexKey, Vec<usize>> = HashMap::new();
        let mut wildcard_rows = Vec::new();
        for (rule, row) in rows.iter().enumerate() {
            match row.value(column) {
                Some(stored) => {
                    let key = adaptor.convert(&casts.cast_to_comparison_type(stored)?)?;
                    index.entry(key).or_default().push(rule);
                }
                None => wildcard_rows.push(rule),
            }
        }
        Ok(Self {
            factory,
            variant,
            index,
            wildcard_rows,
            adaptor,
            casts,
        })
    }

    /// The candidate rule rows for a live input value: the exact-match
    /// hit (if any) united with every wildcard row, in table row order.
    #[must_use]
    pub fn lookup(&self, input: Option<&Value>) -> Vec<usize> {
        let Some(input) = input else {
            return self.wildcard_rows.clone();
        };
        let key = self
            .casts
            .cast_to_comparison_type(input)
            .and_then(|v| self.adaptor.convert(&v));
        let hit = match key {
            Ok(key) => self.index.get(&key).map(Vec::as_slice).unwrap_or_default(),
            Err(err) => {
                warn!(input = %input, %err, "equality lookup input not adaptable");
                &[]
            }
        };
        let mut result = Vec::with_capacity(hit.len() + self.wildcard_rows.len());
        result.extend_from_slice(hit);
        result.extend_from_slice(&self.wildcard_rows);
        result.sort_unstable();
        result.dedup();
        result
    }

    #[must_use]
    pub fn variant(&self) -> EqualsVariant {
        self.variant
    }

    /// The reconstructed canonical expression, for tracing.
    #[must_use]
    pub fn optimized_source(&self) -> String {
        format!(
            "{} == {}",
            self.factory.condition_parameter, self.factory.expression_path
        )
    }

    /// The original condition source, for user-facing diagnostics.
    #[must_use]
    pub fn formal_source<'a>(&self, condition: &'a Condition) -> &'a str {
        condition.source()
    }
}
