use std::fmt;

/// Which side of a half-open `[min, max)` interval a bound belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundSide {
    Lower,
    Upper,
}

/// Relational operators recognized by the pattern matcher.
///
/// A classified comparison is always stored in canonical orientation,
/// `conditionParam REL signatureField`. Flipping the operand order maps a
/// relation to its [`opposite`](RelationType::opposite).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationType {
    Lt,
    Le,
    Ge,
    Gt,
    Eq,
}

impl RelationType {
    /// The textual operator for this relation.
    #[must_use]
    pub fn token(self) -> &'static str {
        match self {
            RelationType::Lt => "<",
            RelationType::Le => "<=",
            RelationType::Ge => ">=",
            RelationType::Gt => ">",
            RelationType::Eq => "==",
        }
    }

    /// The relation obtained by swapping the operand order.
    /// `a R b` holds exactly when `b R.opposite() a` holds.
    #[must_use]
    pub fn opposite(self) -> RelationType {
        match self {
            RelationType::Lt => RelationType::Gt,
            RelationType::Le => RelationType::Ge,
            RelationType::Ge => RelationType::Le,
            RelationType::Gt => RelationType::Lt,
            RelationType::Eq => RelationType::Eq,
        }
    }

    /// Whether the relation orders its left operand below its right operand.
    #[must_use]
    pub fn is_less_than(self) -> bool {
        matches!(self, RelationType::Lt | RelationType::Le)
    }

    /// The interval side whose bound must be incremented when normalizing
    /// to half-open `[min, max)` form.
    ///
    /// `Le` closes the upper bound (`k <= x` becomes `k < x + 1`), `Gt`
    /// opens the lower bound (`k > x` becomes `k >= x + 1`). `Lt`, `Ge`,
    /// and `Eq` are already in half-open form.
    #[must_use]
    pub fn inc_bound(self) -> Option<BoundSide> {
        match self {
            RelationType::Le => Some(BoundSide::Upper),
            RelationType::Gt => Some(BoundSide::Lower),
            RelationType::Lt | RelationType::Ge | RelationType::Eq => None,
        }
    }

    /// Parse a bound binary-operator tag (e.g. `"op.binary.le"`).
    ///
    /// Only the final tag segment is considered, and string-comparison
    /// tags (`string_le` and friends) are rejected: string relational
    /// comparisons are never index-optimized.
    #[must_use]
    pub fn from_op_tag(tag: &str) -> Option<RelationType> {
        let last = tag.rsplit('.').next()?;
        if last.starts_with("string") {
            return None;
        }
        match last {
            "lt" => Some(RelationType::Lt),
            "le" => Some(RelationType::Le),
            "ge" => Some(RelationType::Ge),
            "gt" => Some(RelationType::Gt),
            "eq" => Some(RelationType::Eq),
            _ => None,
        }
    }
}

impl fmt::Display for RelationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}
