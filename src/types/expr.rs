use std::fmt;

use super::value::Value;

/// Literal kind tag, distinguishing numeric from textual literals in
/// index positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Numeric,
    Textual,
}

/// A condition's type-bound expression tree, as handed over by the
/// external binder.
///
/// This is a closed set of node kinds: the pattern matcher classifies by
/// exhaustive matching, and any shape outside the recognized ones falls
/// into a default arm that declines optimization. Compared trees arrive
/// already bound, so every leaf chain is rooted at a named parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum ExprNode {
    /// A block/sequence of statements.
    Block(Vec<ExprNode>),
    /// A binary operator with a textual operator tag (e.g. `"op.binary.le"`).
    Binary {
        op: String,
        left: Box<ExprNode>,
        right: Box<ExprNode>,
    },
    /// Logical conjunction.
    And(Box<ExprNode>, Box<ExprNode>),
    /// Field access on a target chain (`target.name`).
    Field {
        target: Box<ExprNode>,
        name: String,
    },
    /// Array/map access on a target chain (`target[index]`).
    Index {
        target: Box<ExprNode>,
        index: Box<ExprNode>,
    },
    /// A literal value.
    Literal { value: Value, kind: LiteralKind },
    /// A reference to a named parameter (table signature or condition).
    Param(String),
    /// The rule-identity pseudo-variable; its presence disqualifies
    /// optimization.
    RuleId,
}

impl ExprNode {
    pub fn binary(op: &str, left: ExprNode, right: ExprNode) -> ExprNode {
        ExprNode::Binary {
            op: op.to_owned(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: ExprNode, right: ExprNode) -> ExprNode {
        ExprNode::And(Box::new(left), Box::new(right))
    }

    pub fn field(target: ExprNode, name: &str) -> ExprNode {
        ExprNode::Field {
            target: Box::new(target),
            name: name.to_owned(),
        }
    }

    pub fn index(target: ExprNode, index: ExprNode) -> ExprNode {
        ExprNode::Index {
            target: Box::new(target),
            index: Box::new(index),
        }
    }

    pub fn param(name: &str) -> ExprNode {
        ExprNode::Param(name.to_owned())
    }

    pub fn literal(value: impl Into<Value>, kind: LiteralKind) -> ExprNode {
        ExprNode::Literal {
            value: value.into(),
            kind,
        }
    }

    /// The conventional `Block[Block[body]]` wrapper produced by the
    /// binder for a condition body.
    pub fn condition_body(body: ExprNode) -> ExprNode {
        ExprNode::Block(vec![ExprNode::Block(vec![body])])
    }

    /// Whether the tree references the rule-identity pseudo-variable
    /// anywhere.
    #[must_use]
    pub fn references_rule_id(&self) -> bool {
        match self {
            ExprNode::RuleId => true,
            ExprNode::Block(stmts) => stmts.iter().any(ExprNode::references_rule_id),
            ExprNode::Binary { left, right, .. } | ExprNode::And(left, right) => {
                left.references_rule_id() || right.references_rule_id()
            }
            ExprNode::Field { target, .. } => target.references_rule_id(),
            ExprNode::Index { target, index } => {
                target.references_rule_id() || index.references_rule_id()
            }
            ExprNode::Literal { .. } | ExprNode::Param(_) => false,
        }
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Block(stmts) => {
                write!(f, "{{")?;
                for (i, s) in stmts.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{s}")?;
                }
                write!(f, "}}")
            }
            ExprNode::Binary { op, left, right } => write!(f, "({left} {op} {right})"),
            ExprNode::And(a, b) => write!(f, "({a} && {b})"),
            ExprNode::Field { target, name } => write!(f, "{target}.{name}"),
            ExprNode::Index { target, index } => write!(f, "{target}[{index}]"),
            ExprNode::Literal { value, .. } => write!(f, "{value}"),
            ExprNode::Param(name) => write!(f, "{name}"),
            ExprNode::RuleId => write!(f, "$rule"),
        }
    }
}
