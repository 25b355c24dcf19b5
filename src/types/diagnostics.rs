use std::fmt;

/// Location of a condition cell in its source table, for user-facing
/// binding diagnostics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    #[must_use]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// One non-fatal binding error reported during classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDiagnostic {
    pub message: String,
    pub location: SourceLocation,
}

impl fmt::Display for BindingDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.message, self.location)
    }
}

/// Collector sink for binding diagnostics.
///
/// Classification failures that indicate genuine source problems (a
/// computed array index, a type pair with no implicit cast) report here
/// exactly once and then degrade to the fallback path; shapes that are
/// merely unrecognized report nothing.
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<BindingDiagnostic>,
}

impl Diagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, message: impl Into<String>, location: &SourceLocation) {
        self.entries.push(BindingDiagnostic {
            message: message.into(),
            location: location.clone(),
        });
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BindingDiagnostic> {
        self.entries.iter()
    }
}
