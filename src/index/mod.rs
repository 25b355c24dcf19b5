mod combined;
mod equality;
mod range;

pub use combined::CombinedRangeIndexEvaluator;
pub use equality::{EqualsIndexedEvaluator, EqualsVariant};
pub use range::SingleRangeIndexEvaluator;

use crate::types::{Condition, Value};

/// An index evaluator produced by condition optimization.
///
/// All variants share the same runtime contract: queries take an
/// optional live input value and return the candidate rule rows in
/// ascending table order, never panicking and never excluding a row the
/// original expression would have matched.
#[derive(Debug)]
pub enum IndexedEvaluator {
    Equals(EqualsIndexedEvaluator),
    Range(SingleRangeIndexEvaluator),
    Combined(CombinedRangeIndexEvaluator),
}

impl IndexedEvaluator {
    /// The candidate rule rows for a live input value, ascending.
    #[must_use]
    pub fn query(&self, input: Option<&Value>) -> Vec<usize> {
        match self {
            IndexedEvaluator::Equals(e) => e.lookup(input),
            IndexedEvaluator::Range(e) => e.query(input),
            IndexedEvaluator::Combined(e) => e.query(input),
        }
    }

    /// The reconstructed canonical expression, for tracing.
    #[must_use]
    pub fn optimized_source(&self) -> String {
        match self {
            IndexedEvaluator::Equals(e) => e.optimized_source(),
            IndexedEvaluator::Range(e) => e.optimized_source(),
            IndexedEvaluator::Combined(e) => e.optimized_source(),
        }
    }

    /// The original condition source, for user-facing diagnostics.
    #[must_use]
    pub fn formal_source<'a>(&self, condition: &'a Condition) -> &'a str {
        match self {
            IndexedEvaluator::Equals(e) => e.formal_source(condition),
            IndexedEvaluator::Range(e) => e.formal_source(condition),
            IndexedEvaluator::Combined(e) => e.formal_source(condition),
        }
    }
}
