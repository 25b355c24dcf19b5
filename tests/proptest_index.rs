
use proptest::prelude::*;
use rowdex::{optimize_condition, AdaptorRegistry, Diagnostics, IndexedEvaluator, Value};
use strategies::{arb_equals, arb_interval, arb_one_sided, arb_region, table_signature};

fn build(condition: &rowdex::Condition) -> IndexedEvaluator {
    let mut diagnostics = Diagnostics::new();
    let evaluator = optimize_condition(
        condition,
        &table_signature(),
        &AdaptorRegistry::standard(),
        &mut diagnostics,
    )
    .expect("generated condition should classify");
    assert!(diagnostics.is_empty(), "unexpected diagnostics");
    evaluator
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// The one-sided index returns exactly the rows a linear scan of the
    /// stored values would select.
    #[test]
    fn one_sided_matches_linear_scan(gen in arb_one_sided(), input in -60_i64..60) {
        let evaluator = build(&gen.condition());
        prop_assert_eq!(
            evaluator.query(Some(&Value::Int(input))),
            gen.matching_rows(input)
        );
    }

    /// The combined interval index agrees with a per-row bounds check.
    #[test]
    fn interval_matches_linear_scan(gen in arb_interval(), input in -60_i64..60) {
        let evaluator = build(&gen.condition());
        prop_assert_eq!(
            evaluator.query(Some(&Value::Int(input))),
            gen.matching_rows(input)
        );
    }

    /// The equality index agrees with a row-by-row comparison, including
    /// inputs no stored row carries.
    #[test]
    fn equality_matches_linear_scan(gen in arb_equals(), input in arb_region()) {
        let evaluator = build(&gen.condition());
        prop_assert_eq!(
            evaluator.query(Some(&Value::from(input.as_str()))),
            gen.matching_rows(&input)
        );
    }

    /// An absent input never panics: one-sided ranges degrade to an
    /// unbounded window, equality to its wildcard rows.
    #[test]
    fn null_input_never_panics(range in arb_one_sided(), eq in arb_equals()) {
        let all: Vec<usize> = (0..range.rows.len()).collect();
        prop_assert_eq!(build(&range.condition()).query(None), all);

        let wildcards: Vec<usize> = eq
            .rows
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(build(&eq.condition()).query(None), wildcards);
    }

    /// A wrongly-typed live input degrades to the safe superset (wildcard
    /// rows for equality) instead of panicking.
    #[test]
    fn mistyped_input_degrades(gen in arb_equals()) {
        let evaluator = build(&gen.condition());
        let wildcards: Vec<usize> = gen
            .rows
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_none())
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(evaluator.query(Some(&Value::Int(7))), wildcards);
    }

    /// Query results are always sorted ascending with no duplicates.
    #[test]
    fn results_are_sorted_and_unique(gen in arb_interval(), input in -60_i64..60) {
        let result = build(&gen.condition()).query(Some(&Value::Int(input)));
        let mut expected = result.clone();
        expected.sort_unstable();
        expected.dedup();
        prop_assert_eq!(result, expected);
    }
}
