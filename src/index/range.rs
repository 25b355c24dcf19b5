use tracing::warn;

use crate::types::{AdaptError, Condition, ConditionRow, IndexKey, RangeAdaptor, Value};

/// Sorted index over one-sided range conditions.
///
/// Each non-wildcard rule row contributes the adapted key of its stored
/// parameter value. At query time the live input is turned into a
/// half-open `[min, max)` window by the range adaptor (one side is
/// always unbounded for a one-sided relation) and a binary search
/// returns the rules whose stored keys fall inside it. Wildcard rows
/// match every input.
#[derive(Debug)]
pub struct SingleRangeIndexEvaluator {
    adaptor: RangeAdaptor,
    /// Stored keys sorted ascending, ties in table row order.
    keys: Vec<IndexKey>,
    /// Rule row per key, parallel to `keys`.
    rules: Vec<usize>,
    /// Wildcard rows, ascending.
    always: Vec<usize>,
}

impl SingleRangeIndexEvaluator {
    pub(crate) fn build(
        adaptor: RangeAdaptor,
        rows: &[ConditionRow],
        column: usize,
    ) -> Result<Self, AdaptError> {
        let mut entries = Vec::new();
        let mut always = Vec::new();
        for (rule, row) in rows.iter().enumerate() {
            match row.value(column) {
                Some(stored) => entries.push((adaptor.adapt_value(stored)?, rule)),
                None => always.push(rule),
            }
        }
        entries.sort();
        let (keys, rules) = entries.into_iter().unzip();
        Ok(Self {
            adaptor,
            keys,
            rules,
            always,
        })
    }

    /// The candidate rule rows whose stored parameter satisfies the
    /// classified relation against the live input, united with the
    /// wildcard rows. Ascending row order.
    #[must_use]
    pub fn query(&self, input: Option<&Value>) -> Vec<usize> {
        let window = self
            .adaptor
            .get_min(input)
            .and_then(|min| self.adaptor.get_max(input).map(|max| (min, max)));
        let (min, max) = match window {
            Ok(bounds) => bounds,
            Err(err) => {
                if let Some(input) = input {
                    warn!(input = %input, %err, "range query input not adaptable");
                }
                return self.always.clone();
            }
        };
        let lower = min.map_or(0, |m| self.keys.partition_point(|k| *k < m));
        let upper = max.map_or(self.keys.len(), |m| self.keys.partition_point(|k| *k < m));
        let mut result: Vec<usize> = if lower < upper {
            self.rules[lower..upper].to_vec()
        } else {
            Vec::new()
        };
        result.extend_from_slice(&self.always);
        result.sort_unstable();
        result.dedup();
        result
    }

    /// The reconstructed canonical expression, for tracing.
    #[must_use]
    pub fn optimized_source(&self) -> String {
        self.adaptor.factory().optimized_source()
    }

    /// The original condition source, for user-facing diagnostics.
    #[must_use]
    pub fn formal_source<'a>(&self, condition: &'a Condition) -> &'a str {
        condition.source()
    }
}
