use tracing::warn;

use crate::types::{AdaptError, Condition, ConditionRow, IndexKey, RangeAdaptor, Value};

/// Combined index over two-parameter interval conditions
/// (`lo REL1 field REL2 hi`).
///
/// Per rule row the range adaptor turns the stored parameter pair into a
/// half-open `[min, max)` interval over the input domain; an absent
/// parameter leaves that side unbounded. Rather than a two-dimensional
/// structure, the evaluator keeps two sorted boundary lists and answers a
/// query by running the one-dimensional range query twice: restrict by
/// the lower boundary, then intersect with the upper one. Table sizes
/// are modest and intersecting two sorted results is cheap.
#[derive(Debug)]
pub struct CombinedRangeIndexEvaluator {
    adaptor: RangeAdaptor,
    /// `(lower bound, rule)` sorted ascending.
    mins: Vec<(IndexKey, usize)>,
    /// Rules unbounded below, ascending.
    no_min: Vec<usize>,
    /// `(upper bound, rule)` sorted ascending.
    maxs: Vec<(IndexKey, usize)>,
    /// Rules unbounded above, ascending.
    no_max: Vec<usize>,
}

impl CombinedRangeIndexEvaluator {
    pub(crate) fn build(
        adaptor: RangeAdaptor,
        rows: &[ConditionRow],
        lo_column: usize,
        hi_column: usize,
    ) -> Result<Self, AdaptError> {
        let mut mins = Vec::new();
        let mut no_min = Vec::new();
        let mut maxs = Vec::new();
        let mut no_max = Vec::new();
        for (rule, row) in rows.iter().enumerate() {
            match adaptor.get_min(row.value(lo_column))? {
                Some(min) => mins.push((min, rule)),
                None => no_min.push(rule),
            }
            match adaptor.get_max(row.value(hi_column))? {
                Some(max) => maxs.push((max, rule)),
                None => no_max.push(rule),
            }
        }
        mins.sort();
        maxs.sort();
        Ok(Self {
            adaptor,
            mins,
            no_min,
            maxs,
            no_max,
        })
    }

    /// The rule rows whose interval contains the live input, ascending.
    #[must_use]
    pub fn query(&self, input: Option<&Value>) -> Vec<usize> {
        let key = match input {
            Some(input) => match self.adaptor.adapt_value(input) {
                Ok(key) => Some(key),
                Err(err) => {
                    warn!(input = %input, %err, "combined range query input not adaptable");
                    None
                }
            },
            None => None,
        };
        let Some(key) = key else {
            // Only rows unbounded on both sides match an absent input.
            return intersect_sorted(&sorted(self.no_min.clone()), &sorted(self.no_max.clone()));
        };

        // Pass 1: rules whose lower bound admits the key (min <= key).
        let cut = self.mins.partition_point(|(k, _)| *k <= key);
        let mut lower_pass: Vec<usize> = self.mins[..cut].iter().map(|&(_, r)| r).collect();
        lower_pass.extend_from_slice(&self.no_min);
        lower_pass.sort_unstable();

        // Pass 2: rules whose upper bound admits the key (key < max).
        let cut = self.maxs.partition_point(|(k, _)| *k <= key);
        let mut upper_pass: Vec<usize> = self.maxs[cut..].iter().map(|&(_, r)| r).collect();
        upper_pass.extend_from_slice(&self.no_max);
        upper_pass.sort_unstable();

        intersect_sorted(&lower_pass, &upper_pass)
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

fn sorted(mut rows: Vec<usize>) -> Vec<usize> {
    rows.sort_unstable();
    rows
}

fn intersect_sorted(a: &[usize], b: &[usize]) -> Vec<usize> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        ConditionCasts, RangeFactory, RelationType, ScalarType, TwoSidedRangeFactory, TypeAdaptor,
        Value,
    };

    fn evaluator(
        lo_relation: RelationType,
        hi_relation: RelationType,
        rows: Vec<ConditionRow>,
    ) -> CombinedRangeIndexEvaluator {
        let factory = RangeFactory::TwoSided(TwoSidedRangeFactory {
            root_parameter: "age".into(),
            expression_path: "age".into(),
            lo_parameter: "lo".into(),
            lo_relation,
            hi_parameter: "hi".into(),
            hi_relation,
        });
        let adaptor = RangeAdaptor::new(
            factory,
            TypeAdaptor::Int,
            ConditionCasts::resolve(ScalarType::Int, ScalarType::Int),
        )
        .unwrap();
        CombinedRangeIndexEvaluator::build(adaptor, &rows, 0, 1).unwrap()
    }

    fn int_pair(lo: i64, hi: i64) -> ConditionRow {
        ConditionRow::pair(Some(Value::Int(lo)), Some(Value::Int(hi)))
    }

    #[test]
    fn half_open_interval_semantics() {
        // lo <= age && age < hi
        let eval = evaluator(
            RelationType::Le,
            RelationType::Lt,
            vec![int_pair(18, 65), int_pair(40, 80)],
        );
        assert_eq!(eval.query(Some(&Value::Int(17))), Vec::<usize>::new());
        assert_eq!(eval.query(Some(&Value::Int(18))), vec![0]);
        assert_eq!(eval.query(Some(&Value::Int(64))), vec![0, 1]);
        assert_eq!(eval.query(Some(&Value::Int(65))), vec![1]);
        assert_eq!(eval.query(Some(&Value::Int(80))), Vec::<usize>::new());
    }

    #[test]
    fn strict_lower_and_inclusive_upper() {
        // lo < age && age <= hi
        let eval = evaluator(RelationType::Lt, RelationType::Le, vec![int_pair(18, 65)]);
        assert_eq!(eval.query(Some(&Value::Int(18))), Vec::<usize>::new());
        assert_eq!(eval.query(Some(&Value::Int(19))), vec![0]);
        assert_eq!(eval.query(Some(&Value::Int(65))), vec![0]);
        assert_eq!(eval.query(Some(&Value::Int(66))), Vec::<usize>::new());
    }

    #[test]
    fn absent_parameter_is_unbounded_on_that_side() {
        let eval = evaluator(
            RelationType::Le,
            RelationType::Lt,
            vec![
                ConditionRow::pair(None, Some(Value::Int(18))),
                ConditionRow::pair(Some(Value::Int(18)), Some(Value::Int(65))),
                ConditionRow::pair(Some(Value::Int(65)), None),
            ],
        );
        assert_eq!(eval.query(Some(&Value::Int(17))), vec![0]);
        assert_eq!(eval.query(Some(&Value::Int(18))), vec![1]);
        assert_eq!(eval.query(Some(&Value::Int(64))), vec![1]);
        assert_eq!(eval.query(Some(&Value::Int(65))), vec![2]);
        assert_eq!(eval.query(Some(&Value::Int(100))), vec![2]);
    }

    #[test]
    fn wildcard_row_matches_everything() {
        let eval = evaluator(
            RelationType::Le,
            RelationType::Lt,
            vec![int_pair(18, 65), ConditionRow::empty()],
        );
        assert_eq!(eval.query(Some(&Value::Int(5))), vec![1]);
        assert_eq!(eval.query(Some(&Value::Int(20))), vec![0, 1]);
    }

    #[test]
    fn null_input_matches_fully_unbounded_rows_only() {
        let eval = evaluator(
            RelationType::Le,
            RelationType::Lt,
            vec![int_pair(18, 65), ConditionRow::empty()],
        );
        assert_eq!(eval.query(None), vec![1]);
    }

    #[test]
    fn decimal_inputs_against_integer_bounds() {
        let factory = RangeFactory::TwoSided(TwoSidedRangeFactory {
            root_parameter: "age".into(),
            expression_path: "age".into(),
            lo_parameter: "lo".into(),
            lo_relation: RelationType::Le,
            hi_parameter: "hi".into(),
            hi_relation: RelationType::Lt,
        });
        // Decimal condition parameters against an integer field.
        let adaptor = RangeAdaptor::new(
            factory,
            TypeAdaptor::Decimal,
            ConditionCasts::resolve(ScalarType::Decimal, ScalarType::Int),
        )
        .unwrap();
        let rows = vec![ConditionRow::pair(
            Some(Value::decimal("18")),
            Some(Value::decimal("65")),
        )];
        let eval = CombinedRangeIndexEvaluator::build(adaptor, &rows, 0, 1).unwrap();
        assert_eq!(eval.query(Some(&Value::decimal("64.999"))), vec![0]);
        assert_eq!(eval.query(Some(&Value::decimal("65"))), Vec::<usize>::new());
        assert_eq!(eval.query(Some(&Value::Int(18))), vec![0]);
    }

    #[test]
    fn optimized_source_is_canonical() {
        let eval = evaluator(RelationType::Le, RelationType::Lt, vec![int_pair(1, 2)]);
        assert_eq!(eval.optimized_source(), "lo <= age && age < hi");
    }
}
