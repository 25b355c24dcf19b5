use std::collections::HashMap;

use super::diagnostics::SourceLocation;
use super::expr::ExprNode;
use super::value::{ScalarType, Value};

/// A named, typed parameter: either a table signature input or a
/// condition's declared parameter.
///
/// Signature parameters may additionally declare the types of nested
/// members (`driver.age`, `rates[0]`) so that cast resolution has a field
/// type for dispatch paths below the root; a path with no registered
/// member type falls back to the root type.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    name: String,
    ty: ScalarType,
    members: HashMap<String, ScalarType>,
}

impl Parameter {
    #[must_use]
    pub fn new(name: &str, ty: ScalarType) -> Self {
        Self {
            name: name.to_owned(),
            ty,
            members: HashMap::new(),
        }
    }

    /// Declare the type of a nested member, keyed by the path remainder
    /// after the parameter name (`"age"` for `driver.age`, `"[0]"` for
    /// `rates[0]`).
    #[must_use]
    pub fn with_member(mut self, member: &str, ty: ScalarType) -> Self {
        self.members.insert(member.to_owned(), ty);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn scalar_type(&self) -> &ScalarType {
        &self.ty
    }

    /// The type at `path`, which must be this parameter's name or a
    /// member access below it.
    #[must_use]
    pub fn type_at(&self, path: &str) -> Option<ScalarType> {
        if path == self.name {
            return Some(self.ty.clone());
        }
        let rest = path.strip_prefix(self.name.as_str())?;
        if !(rest.starts_with('.') || rest.starts_with('[')) {
            return None;
        }
        let member = rest.strip_prefix('.').unwrap_or(rest);
        Some(
            self.members
                .get(member)
                .cloned()
                .unwrap_or_else(|| self.ty.clone()),
        )
    }
}

/// The table's input signature: the ordered, named, typed parameters
/// conditions are tested against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Signature {
    parameters: Vec<Parameter>,
}

impl Signature {
    #[must_use]
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Resolve a reconstructed field path to the signature parameter it
    /// is rooted in, by exact name or by name prefix followed by a field
    /// or index access. Returns the parameter index and the field type
    /// at that path.
    #[must_use]
    pub fn resolve(&self, path: &str) -> Option<(usize, ScalarType)> {
        self.parameters
            .iter()
            .enumerate()
            .find_map(|(i, p)| p.type_at(path).map(|ty| (i, ty)))
    }
}

/// Per-rule stored parameter values for one condition. An absent value
/// leaves that bound open; a row with no values at all is a wildcard
/// ("always match") row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConditionRow {
    values: Vec<Option<Value>>,
}

impl ConditionRow {
    /// A wildcard row: no condition value specified, matches any input.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn of(values: Vec<Option<Value>>) -> Self {
        Self { values }
    }

    /// Single-parameter convenience constructor.
    #[must_use]
    pub fn single(value: impl Into<Value>) -> Self {
        Self {
            values: vec![Some(value.into())],
        }
    }

    /// Two-parameter convenience constructor; `None` leaves that side
    /// unbounded.
    #[must_use]
    pub fn pair(lo: Option<Value>, hi: Option<Value>) -> Self {
        Self {
            values: vec![lo, hi],
        }
    }

    #[must_use]
    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index).and_then(Option::as_ref)
    }

    /// Whether this row is a wildcard for its condition.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.values.iter().all(Option::is_none)
    }
}

/// A decision-table condition: declared parameters, the type-bound
/// expression body shared by all rule rows, and the per-row stored
/// parameter values.
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    parameters: Vec<Parameter>,
    expression: ExprNode,
    rows: Vec<ConditionRow>,
    source: String,
    location: SourceLocation,
    has_formulas: bool,
}

impl Condition {
    #[must_use]
    pub fn new(parameters: Vec<Parameter>, expression: ExprNode, source: &str) -> Self {
        Self {
            parameters,
            expression,
            rows: Vec::new(),
            source: source.to_owned(),
            location: SourceLocation::default(),
            has_formulas: false,
        }
    }

    #[must_use]
    pub fn with_rows(mut self, rows: Vec<ConditionRow>) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn with_location(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Mark the condition as carrying per-rule overridden expression
    /// bodies, which disqualifies it from optimization.
    #[must_use]
    pub fn with_formulas(mut self) -> Self {
        self.has_formulas = true;
        self
    }

    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Position and declaration of the parameter with the given name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<(usize, &Parameter)> {
        self.parameters
            .iter()
            .enumerate()
            .find(|(_, p)| p.name() == name)
    }

    #[must_use]
    pub fn expression(&self) -> &ExprNode {
        &self.expression
    }

    #[must_use]
    pub fn rows(&self) -> &[ConditionRow] {
        &self.rows
    }

    /// Number of wildcard rule rows; drives the V1/V2 equality evaluator
    /// selection.
    #[must_use]
    pub fn empty_row_count(&self) -> usize {
        self.rows.iter().filter(|r| r.is_wildcard()).count()
    }

    /// The original condition source text, for user-facing diagnostics.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[must_use]
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    #[must_use]
    pub fn has_formulas(&self) -> bool {
        self.has_formulas
    }
}
