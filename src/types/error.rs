use thiserror::Error;

use super::value::ScalarType;

/// Failures raised while adapting values into comparable index keys.
///
/// During evaluator construction these are caught at the
/// [`optimize_condition`](crate::optimize_condition) boundary and turned
/// into a binding diagnostic plus fallback; they never escape to the
/// table-compilation driver.
#[derive(Debug, Error)]
pub enum AdaptError {
    #[error("cannot convert from '{from}' to '{to}'")]
    NoCast { from: ScalarType, to: ScalarType },

    #[error("no increment defined for type '{ty}'")]
    NoIncrement { ty: ScalarType },

    #[error("no type adaptor registered for '{ty}'")]
    NoAdaptor { ty: ScalarType },

    #[error("value {value} does not belong to type '{ty}'")]
    TypeMismatch { value: String, ty: ScalarType },

    #[error("increment overflows type '{ty}'")]
    IncrementOverflow { ty: ScalarType },
}
