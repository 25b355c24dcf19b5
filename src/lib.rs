mod classify;
mod index;
mod optimize;
mod types;

pub use classify::{classify_condition, Classification};
pub use index::{
    CombinedRangeIndexEvaluator, EqualsIndexedEvaluator, EqualsVariant, IndexedEvaluator,
    SingleRangeIndexEvaluator,
};
pub use optimize::optimize_condition;
pub use types::{
    AdaptError, AdaptorRegistry, BindingDiagnostic, BoundSide, Condition, ConditionCasts,
    ConditionRow, Diagnostics, EqualsFactory, EvaluatorFactory, ExprNode, IndexKey, LiteralKind,
    OneSidedRangeFactory, Parameter, RangeAdaptor, RangeFactory, RelationType, ScalarType,
    Signature, SourceLocation, TwoSidedRangeFactory, TypeAdaptor, Value,
};
