//! Pattern matching over bound condition expression trees.
//!
//! Classification inspects a condition's expression and recognizes the
//! three indexable shapes: equality dispatch, a one-sided relational
//! comparison, and a chained two-sided interval. Everything else
//! declines quietly; the caller keeps the unoptimized evaluation path
//! and behavior is unchanged. Only two failures indicate a genuine
//! source problem and report a binding diagnostic: a computed array
//! index in a dispatch path, and (later, during cast resolution) a type
//! pair with no implicit conversion.

use tracing::debug;

use crate::types::{
    Condition, Diagnostics, EqualsFactory, EvaluatorFactory, ExprNode, OneSidedRangeFactory,
    RangeFactory, RelationType, ScalarType, Signature, TwoSidedRangeFactory, Value,
};

/// A recognized condition shape: the evaluator factory in canonical
/// orientation plus the resolved type of the dispatch field.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub factory: EvaluatorFactory,
    pub field_type: ScalarType,
}

/// Classify a condition's expression against the table signature.
///
/// Returns `None` whenever the shape is not indexable; the condition
/// then stays on the unoptimized path. Never panics.
pub fn classify_condition(
    condition: &Condition,
    signature: &Signature,
    diagnostics: &mut Diagnostics,
) -> Option<Classification> {
    if condition.has_formulas() {
        debug!(source = condition.source(), "condition has per-rule formulas, not indexable");
        return None;
    }
    if condition.expression().references_rule_id() {
        debug!(
            source = condition.source(),
            "condition references the rule-identity variable, not indexable"
        );
        return None;
    }
    match unwrap_body(condition.expression()) {
        ExprNode::Binary { op, left, right } => {
            one_parameter(op, left, right, condition, signature, diagnostics)
        }
        ExprNode::And(first, second) => match (unwrap_body(first), unwrap_body(second)) {
            (
                ExprNode::Binary {
                    op: op1,
                    left: l1,
                    right: r1,
                },
                ExprNode::Binary {
                    op: op2,
                    left: l2,
                    right: r2,
                },
            ) => {
                let a = less_than_triple(op1, l1, r1, condition, signature, diagnostics)?;
                let b = less_than_triple(op2, l2, r2, condition, signature, diagnostics)?;
                interval(a, b)
            }
            _ => {
                debug!(source = condition.source(), "conjunction is not a pair of comparisons");
                None
            }
        },
        other => {
            debug!(source = condition.source(), expr = %other, "unrecognized condition shape");
            None
        }
    }
}

/// Strip the `Block[Block[body]]` wrapper the binder puts around a
/// condition body.
fn unwrap_body(expr: &ExprNode) -> &ExprNode {
    match expr {
        ExprNode::Block(stmts) if stmts.len() == 1 => unwrap_body(&stmts[0]),
        other => other,
    }
}

/// One side of a recognized comparison.
#[derive(Debug, Clone, PartialEq)]
enum Operand {
    /// A declared condition parameter.
    ConditionParam(String),
    /// A field-access path resolved against the table signature.
    Field {
        path: String,
        root: String,
        ty: ScalarType,
    },
}

enum PathError {
    /// An index expression that is not an integer or string literal.
    ComputedIndex,
    /// A node kind that cannot appear in a field-access chain.
    Unrecognized,
}

/// Rebuild the textual access path of a field chain (`driver.age`,
/// `rates[0]`). Index positions must hold literals; a computed index is
/// a genuine source problem and reported by the caller.
fn reconstruct_path(expr: &ExprNode) -> Result<String, PathError> {
    match expr {
        ExprNode::Param(name) => Ok(name.clone()),
        ExprNode::Field { target, name } => {
            Ok(format!("{}.{}", reconstruct_path(target)?, name))
        }
        ExprNode::Index { target, index } => {
            let target = reconstruct_path(target)?;
            match index.as_ref() {
                ExprNode::Literal {
                    value: Value::Int(i),
                    ..
                } => Ok(format!("{target}[{i}]")),
                ExprNode::Literal {
                    value: Value::Text(s),
                    ..
                } => Ok(format!("{target}[{s}]")),
                _ => Err(PathError::ComputedIndex),
            }
        }
        _ => Err(PathError::Unrecognized),
    }
}

fn operand(
    expr: &ExprNode,
    condition: &Condition,
    signature: &Signature,
    diagnostics: &mut Diagnostics,
) -> Option<Operand> {
    if let ExprNode::Param(name) = expr {
        if condition.parameter(name).is_some() {
            return Some(Operand::ConditionParam(name.clone()));
        }
    }
    let path = match reconstruct_path(expr) {
        Ok(path) => path,
        Err(PathError::ComputedIndex) => {
            diagnostics.report("cannot parse array index", condition.location());
            return None;
        }
        Err(PathError::Unrecognized) => {
            debug!(expr = %expr, "operand is neither a condition parameter nor a field path");
            return None;
        }
    };
    let Some((index, ty)) = signature.resolve(&path) else {
        debug!(path, "field path does not resolve against the table signature");
        return None;
    };
    Some(Operand::Field {
        path,
        root: signature.parameters()[index].name().to_owned(),
        ty,
    })
}

fn one_parameter(
    op: &str,
    left: &ExprNode,
    right: &ExprNode,
    condition: &Condition,
    signature: &Signature,
    diagnostics: &mut Diagnostics,
) -> Option<Classification> {
    let Some(relation) = RelationType::from_op_tag(op) else {
        debug!(op, "operator tag is not an indexable relation");
        return None;
    };
    let lhs = operand(left, condition, signature, diagnostics)?;
    let rhs = operand(right, condition, signature, diagnostics)?;
    // Canonical orientation puts the condition parameter on the left.
    let (parameter, relation, path, root, ty) = match (lhs, rhs) {
        (Operand::ConditionParam(p), Operand::Field { path, root, ty }) => {
            (p, relation, path, root, ty)
        }
        (Operand::Field { path, root, ty }, Operand::ConditionParam(p)) => {
            (p, relation.opposite(), path, root, ty)
        }
        (lhs, rhs) => {
            debug!(?lhs, ?rhs, "comparison does not pair a condition parameter with a field");
            return None;
        }
    };
    let factory = if relation == RelationType::Eq {
        EvaluatorFactory::Equals(EqualsFactory {
            root_parameter: root,
            expression_path: path,
            condition_parameter: parameter,
        })
    } else {
        EvaluatorFactory::Range(RangeFactory::OneSided(OneSidedRangeFactory {
            root_parameter: root,
            expression_path: path,
            condition_parameter: parameter,
            relation,
        }))
    };
    Some(Classification {
        factory,
        field_type: ty,
    })
}

/// A comparison rewritten into less-than form: `low REL high` with
/// `REL` one of `<`, `<=`.
struct LessThanTriple {
    low: Operand,
    relation: RelationType,
    high: Operand,
}

fn less_than_triple(
    op: &str,
    left: &ExprNode,
    right: &ExprNode,
    condition: &Condition,
    signature: &Signature,
    diagnostics: &mut Diagnostics,
) -> Option<LessThanTriple> {
    let Some(relation) = RelationType::from_op_tag(op) else {
        debug!(op, "operator tag is not an indexable relation");
        return None;
    };
    if relation == RelationType::Eq {
        debug!("equality inside a conjunction is not an interval bound");
        return None;
    }
    let lhs = operand(left, condition, signature, diagnostics)?;
    let rhs = operand(right, condition, signature, diagnostics)?;
    if relation.is_less_than() {
        Some(LessThanTriple {
            low: lhs,
            relation,
            high: rhs,
        })
    } else {
        Some(LessThanTriple {
            low: rhs,
            relation: relation.opposite(),
            high: lhs,
        })
    }
}

/// Combine two less-than triples into a chained interval
/// `loParam REL1 field REL2 hiParam` over a single field path.
fn interval(a: LessThanTriple, b: LessThanTriple) -> Option<Classification> {
    let (lower, upper) = match (&a.low, &a.high) {
        (Operand::ConditionParam(_), Operand::Field { .. }) => (a, b),
        (Operand::Field { .. }, Operand::ConditionParam(_)) => (b, a),
        (low, high) => {
            debug!(?low, ?high, "conjunct does not pair a condition parameter with a field");
            return None;
        }
    };
    let (
        Operand::ConditionParam(lo_parameter),
        Operand::Field { path, root, ty },
    ) = (lower.low, lower.high)
    else {
        debug!("both conjuncts bound the field from the same side");
        return None;
    };
    let (Operand::Field { path: upper_path, .. }, Operand::ConditionParam(hi_parameter)) =
        (upper.low, upper.high)
    else {
        debug!("both conjuncts bound the field from the same side");
        return None;
    };
    if upper_path != path {
        debug!(lower = path, upper = upper_path, "conjuncts compare different field paths");
        return None;
    }
    if lo_parameter == hi_parameter {
        debug!(parameter = lo_parameter, "both interval bounds use the same parameter");
        return None;
    }
    Some(Classification {
        factory: EvaluatorFactory::Range(RangeFactory::TwoSided(TwoSidedRangeFactory {
            root_parameter: root,
            expression_path: path,
            lo_parameter,
            lo_relation: lower.relation,
            hi_parameter,
            hi_relation: upper.relation,
        })),
        field_type: ty,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Parameter;

    fn driver_signature() -> Signature {
        Signature::new(vec![
            Parameter::new("driver", ScalarType::Text).with_member("age", ScalarType::Int),
            Parameter::new("region", ScalarType::Text),
        ])
    }

    fn age_field() -> ExprNode {
        ExprNode::field(ExprNode::param("driver"), "age")
    }

    fn classify(condition: &Condition) -> (Option<Classification>, Diagnostics) {
        let mut diagnostics = Diagnostics::new();
        let result = classify_condition(condition, &driver_signature(), &mut diagnostics);
        (result, diagnostics)
    }

    #[test]
    fn equality_dispatch() {
        let condition = Condition::new(
            vec![Parameter::new("expected", ScalarType::Text)],
            ExprNode::condition_body(ExprNode::binary(
                "op.binary.eq",
                ExprNode::param("expected"),
                ExprNode::param("region"),
            )),
            "expected == region",
        );
        let (result, diagnostics) = classify(&condition);
        let classification = result.unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(classification.field_type, ScalarType::Text);
        assert_eq!(
            classification.factory.optimized_source(),
            "expected == region"
        );
    }

    #[test]
    fn field_on_left_is_flipped_into_canonical_orientation() {
        // driver.age > limit reads as limit < driver.age.
        let condition = Condition::new(
            vec![Parameter::new("limit", ScalarType::Int)],
            ExprNode::condition_body(ExprNode::binary(
                "op.binary.gt",
                age_field(),
                ExprNode::param("limit"),
            )),
            "driver.age > limit",
        );
        let (result, _) = classify(&condition);
        let classification = result.unwrap();
        assert_eq!(classification.field_type, ScalarType::Int);
        assert_eq!(
            classification.factory.optimized_source(),
            "limit < driver.age"
        );
    }

    #[test]
    fn chained_interval() {
        let condition = Condition::new(
            vec![
                Parameter::new("lo", ScalarType::Int),
                Parameter::new("hi", ScalarType::Int),
            ],
            ExprNode::condition_body(ExprNode::and(
                ExprNode::binary("op.binary.le", ExprNode::param("lo"), age_field()),
                ExprNode::binary("op.binary.lt", age_field(), ExprNode::param("hi")),
            )),
            "lo <= driver.age && driver.age < hi",
        );
        let (result, _) = classify(&condition);
        assert_eq!(
            result.unwrap().factory.optimized_source(),
            "lo <= driver.age && driver.age < hi"
        );
    }

    #[test]
    fn interval_conjuncts_in_any_orientation() {
        // driver.age >= lo && hi > driver.age reads as
        // lo <= driver.age && driver.age < hi.
        let condition = Condition::new(
            vec![
                Parameter::new("lo", ScalarType::Int),
                Parameter::new("hi", ScalarType::Int),
            ],
            ExprNode::condition_body(ExprNode::and(
                ExprNode::binary("op.binary.ge", age_field(), ExprNode::param("lo")),
                ExprNode::binary("op.binary.gt", ExprNode::param("hi"), age_field()),
            )),
            "driver.age >= lo && hi > driver.age",
        );
        let (result, _) = classify(&condition);
        assert_eq!(
            result.unwrap().factory.optimized_source(),
            "lo <= driver.age && driver.age < hi"
        );
    }

    #[test]
    fn string_relational_tags_decline() {
        let condition = Condition::new(
            vec![Parameter::new("limit", ScalarType::Text)],
            ExprNode::condition_body(ExprNode::binary(
                "op.binary.string_le",
                ExprNode::param("limit"),
                ExprNode::param("region"),
            )),
            "limit string<= region",
        );
        let (result, diagnostics) = classify(&condition);
        assert!(result.is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn rule_identity_reference_declines() {
        let condition = Condition::new(
            vec![Parameter::new("limit", ScalarType::Int)],
            ExprNode::condition_body(ExprNode::binary(
                "op.binary.lt",
                ExprNode::param("limit"),
                ExprNode::index(ExprNode::param("driver"), ExprNode::RuleId),
            )),
            "limit < driver[$rule]",
        );
        let (result, diagnostics) = classify(&condition);
        assert!(result.is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn per_rule_formulas_decline() {
        let condition = Condition::new(
            vec![Parameter::new("limit", ScalarType::Int)],
            ExprNode::condition_body(ExprNode::binary(
                "op.binary.lt",
                ExprNode::param("limit"),
                age_field(),
            )),
            "limit < driver.age",
        )
        .with_formulas();
        let (result, _) = classify(&condition);
        assert!(result.is_none());
    }

    #[test]
    fn computed_array_index_reports_a_diagnostic() {
        let condition = Condition::new(
            vec![Parameter::new("limit", ScalarType::Int)],
            ExprNode::condition_body(ExprNode::binary(
                "op.binary.lt",
                ExprNode::param("limit"),
                ExprNode::index(ExprNode::param("driver"), ExprNode::param("slot")),
            )),
            "limit < driver[slot]",
        );
        let (result, diagnostics) = classify(&condition);
        assert!(result.is_none());
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics.iter().next().unwrap().message,
            "cannot parse array index"
        );
    }

    #[test]
    fn literal_index_resolves_as_a_path() {
        let signature = Signature::new(vec![
            Parameter::new("rates", ScalarType::Text).with_member("[0]", ScalarType::Decimal)
        ]);
        let condition = Condition::new(
            vec![Parameter::new("limit", ScalarType::Decimal)],
            ExprNode::condition_body(ExprNode::binary(
                "op.binary.lt",
                ExprNode::param("limit"),
                ExprNode::index(
                    ExprNode::param("rates"),
                    ExprNode::literal(0_i64, crate::types::LiteralKind::Numeric),
                ),
            )),
            "limit < rates[0]",
        );
        let mut diagnostics = Diagnostics::new();
        let classification = classify_condition(&condition, &signature, &mut diagnostics).unwrap();
        assert!(diagnostics.is_empty());
        assert_eq!(classification.field_type, ScalarType::Decimal);
        assert_eq!(classification.factory.expression_path(), "rates[0]");
    }

    #[test]
    fn unresolvable_path_declines_silently() {
        let condition = Condition::new(
            vec![Parameter::new("limit", ScalarType::Int)],
            ExprNode::condition_body(ExprNode::binary(
                "op.binary.lt",
                ExprNode::param("limit"),
                ExprNode::field(ExprNode::param("vehicle"), "age"),
            )),
            "limit < vehicle.age",
        );
        let (result, diagnostics) = classify(&condition);
        assert!(result.is_none());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn equality_inside_conjunction_declines() {
        let condition = Condition::new(
            vec![
                Parameter::new("lo", ScalarType::Int),
                Parameter::new("hi", ScalarType::Int),
            ],
            ExprNode::condition_body(ExprNode::and(
                ExprNode::binary("op.binary.eq", ExprNode::param("lo"), age_field()),
                ExprNode::binary("op.binary.lt", age_field(), ExprNode::param("hi")),
            )),
            "lo == driver.age && driver.age < hi",
        );
        let (result, _) = classify(&condition);
        assert!(result.is_none());
    }

    #[test]
    fn conjuncts_over_different_fields_decline() {
        let condition = Condition::new(
            vec![
                Parameter::new("lo", ScalarType::Int),
                Parameter::new("hi", ScalarType::Text),
            ],
            ExprNode::condition_body(ExprNode::and(
                ExprNode::binary("op.binary.le", ExprNode::param("lo"), age_field()),
                ExprNode::binary("op.binary.lt", ExprNode::param("region"), ExprNode::param("hi")),
            )),
            "lo <= driver.age && region < hi",
        );
        let (result, _) = classify(&condition);
        assert!(result.is_none());
    }

    #[test]
    fn same_side_conjuncts_decline() {
        // Both bounds below the field: lo <= age && hi <= age.
        let condition = Condition::new(
            vec![
                Parameter::new("lo", ScalarType::Int),
                Parameter::new("hi", ScalarType::Int),
            ],
            ExprNode::condition_body(ExprNode::and(
                ExprNode::binary("op.binary.le", ExprNode::param("lo"), age_field()),
                ExprNode::binary("op.binary.le", ExprNode::param("hi"), age_field()),
            )),
            "lo <= driver.age && hi <= driver.age",
        );
        let (result, _) = classify(&condition);
        assert!(result.is_none());
    }

    #[test]
    fn literal_operand_declines() {
        let condition = Condition::new(
            vec![Parameter::new("limit", ScalarType::Int)],
            ExprNode::condition_body(ExprNode::binary(
                "op.binary.lt",
                ExprNode::literal(18_i64, crate::types::LiteralKind::Numeric),
                age_field(),
            )),
            "18 < driver.age",
        );
        let (result, _) = classify(&condition);
        assert!(result.is_none());
    }
}
