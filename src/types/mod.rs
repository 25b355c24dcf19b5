mod adaptor;
mod casts;
mod condition;
mod diagnostics;
mod error;
mod expr;
mod factory;
mod range_adaptor;
mod relation;
mod value;

pub use adaptor::{AdaptorRegistry, IndexKey, TypeAdaptor};
pub use casts::ConditionCasts;
pub use condition::{Condition, ConditionRow, Parameter, Signature};
pub use diagnostics::{BindingDiagnostic, Diagnostics, SourceLocation};
pub use error::AdaptError;
pub use expr::{ExprNode, LiteralKind};
pub use factory::{
    EqualsFactory, EvaluatorFactory, OneSidedRangeFactory, RangeFactory, TwoSidedRangeFactory,
};
pub use range_adaptor::RangeAdaptor;
pub use relation::{BoundSide, RelationType};
pub use value::{ScalarType, Value};
