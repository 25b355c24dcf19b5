use super::relation::{BoundSide, RelationType};

/// Equality dispatch: `conditionParam == field`. Carries no bound or
/// increment semantics; those queries are unrepresentable on this
/// variant by construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EqualsFactory {
    pub root_parameter: String,
    pub expression_path: String,
    pub condition_parameter: String,
}

/// A single comparison `conditionParam REL field` in canonical
/// orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneSidedRangeFactory {
    pub root_parameter: String,
    pub expression_path: String,
    pub condition_parameter: String,
    pub relation: RelationType,
}

/// A chained interval `loParam REL1 field REL2 hiParam`; both relations
/// are less-than-like after canonicalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwoSidedRangeFactory {
    pub root_parameter: String,
    pub expression_path: String,
    pub lo_parameter: String,
    pub lo_relation: RelationType,
    pub hi_parameter: String,
    pub hi_relation: RelationType,
}

impl OneSidedRangeFactory {
    #[must_use]
    pub fn has_min(&self) -> bool {
        !self.relation.is_less_than()
    }

    #[must_use]
    pub fn has_max(&self) -> bool {
        self.relation.is_less_than()
    }

    #[must_use]
    pub fn needs_increment(&self, bound: BoundSide) -> bool {
        self.relation.inc_bound() == Some(bound)
    }
}

impl TwoSidedRangeFactory {
    #[must_use]
    pub fn has_min(&self) -> bool {
        true
    }

    #[must_use]
    pub fn has_max(&self) -> bool {
        true
    }

    #[must_use]
    pub fn needs_increment(&self, bound: BoundSide) -> bool {
        match bound {
            BoundSide::Lower => self.lo_relation == RelationType::Lt,
            BoundSide::Upper => self.hi_relation == RelationType::Le,
        }
    }
}

/// The range-capable factory variants consumed by the range adaptor and
/// the range evaluators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RangeFactory {
    OneSided(OneSidedRangeFactory),
    TwoSided(TwoSidedRangeFactory),
}

impl RangeFactory {
    #[must_use]
    pub fn has_min(&self) -> bool {
        match self {
            RangeFactory::OneSided(f) => f.has_min(),
            RangeFactory::TwoSided(f) => f.has_min(),
        }
    }

    #[must_use]
    pub fn has_max(&self) -> bool {
        match self {
            RangeFactory::OneSided(f) => f.has_max(),
            RangeFactory::TwoSided(f) => f.has_max(),
        }
    }

    #[must_use]
    pub fn needs_increment(&self, bound: BoundSide) -> bool {
        match self {
            RangeFactory::OneSided(f) => f.needs_increment(bound),
            RangeFactory::TwoSided(f) => f.needs_increment(bound),
        }
    }

    /// The reconstructed canonical source of the classified comparison.
    #[must_use]
    pub fn optimized_source(&self) -> String {
        match self {
            RangeFactory::OneSided(f) => format!(
                "{} {} {}",
                f.condition_parameter, f.relation, f.expression_path
            ),
            RangeFactory::TwoSided(f) => format!(
                "{} {} {} && {} {} {}",
                f.lo_parameter,
                f.lo_relation,
                f.expression_path,
                f.expression_path,
                f.hi_relation,
                f.hi_parameter
            ),
        }
    }
}

/// The immutable outcome of classification: built once during table
/// binding and owned by the evaluator that consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluatorFactory {
    Equals(EqualsFactory),
    Range(RangeFactory),
}

impl EvaluatorFactory {
    /// The table signature parameter the dispatch field is rooted in.
    #[must_use]
    pub fn root_parameter(&self) -> &str {
        match self {
            EvaluatorFactory::Equals(f) => &f.root_parameter,
            EvaluatorFactory::Range(RangeFactory::OneSided(f)) => &f.root_parameter,
            EvaluatorFactory::Range(RangeFactory::TwoSided(f)) => &f.root_parameter,
        }
    }

    /// The reconstructed field-access path under test.
    #[must_use]
    pub fn expression_path(&self) -> &str {
        match self {
            EvaluatorFactory::Equals(f) => &f.expression_path,
            EvaluatorFactory::Range(RangeFactory::OneSided(f)) => &f.expression_path,
            EvaluatorFactory::Range(RangeFactory::TwoSided(f)) => &f.expression_path,
        }
    }

    /// Bound introspection for diagnostic tooling; `None` for equality
    /// factories, which have no bound semantics.
    #[must_use]
    pub fn range_bounds(&self) -> Option<&RangeFactory> {
        match self {
            EvaluatorFactory::Equals(_) => None,
            EvaluatorFactory::Range(f) => Some(f),
        }
    }

    /// The reconstructed canonical source of the classified condition.
    #[must_use]
    pub fn optimized_source(&self) -> String {
        match self {
            EvaluatorFactory::Equals(f) => {
                format!("{} == {}", f.condition_parameter, f.expression_path)
            }
            EvaluatorFactory::Range(f) => f.optimized_source(),
        }
    }
}
