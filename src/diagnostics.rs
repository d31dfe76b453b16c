//! Diagnostic reporting for the semantic traversals.
//!
//! Traversals never abort on a bad node. They report what they found to a
//! [`DiagnosticSink`] supplied by the caller and carry on.

use crate::expression::error::{GroupingError, SchemaError, TypeMismatch};
use std::fmt;

/// A single problem found while analysing a tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    Schema(SchemaError),
    Type(TypeMismatch),
    Grouping(GroupingError),
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::Schema(e) => write!(f, "{}", e),
            Diagnostic::Type(e) => write!(f, "{}", e),
            Diagnostic::Grouping(e) => write!(f, "{}", e),
        }
    }
}

impl From<SchemaError> for Diagnostic {
    fn from(e: SchemaError) -> Self {
        Diagnostic::Schema(e)
    }
}

impl From<TypeMismatch> for Diagnostic {
    fn from(e: TypeMismatch) -> Self {
        Diagnostic::Type(e)
    }
}

impl From<GroupingError> for Diagnostic {
    fn from(e: GroupingError) -> Self {
        Diagnostic::Grouping(e)
    }
}

/// Receiver for diagnostics emitted during analysis
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Collects diagnostics for later inspection
#[derive(Debug, Default)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
    /// Also forward each entry to the `log` facade
    log: bool,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// A collector that also logs every entry at warn level
    pub fn logging() -> Self {
        Self {
            entries: Vec::new(),
            log: true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl DiagnosticSink for Diagnostics {
    fn report(&mut self, diagnostic: Diagnostic) {
        if self.log {
            log::warn!("{}", diagnostic);
        }
        self.entries.push(diagnostic);
    }
}

/// Forwards diagnostics to the `log` facade without keeping them
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        log::warn!("{}", diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink() {
        let mut sink = Diagnostics::new();
        assert!(sink.is_empty());

        sink.report(
            SchemaError::TableNotFound {
                table: "missing".to_string(),
            }
            .into(),
        );
        sink.report(
            GroupingError::ColumnNotGrouped {
                table: "t".to_string(),
                attribute: "a".to_string(),
            }
            .into(),
        );

        assert_eq!(sink.len(), 2);
        let messages: Vec<String> = sink.iter().map(|d| d.to_string()).collect();
        assert_eq!(
            messages,
            vec![
                "table missing doesn't exist",
                "t.a is not in the grouping clause"
            ]
        );
    }

    #[test]
    fn test_vec_and_log_sinks() {
        let mut entries: Vec<Diagnostic> = Vec::new();
        entries.report(Diagnostic::Schema(SchemaError::TableNotFound {
            table: "x".to_string(),
        }));
        assert_eq!(entries.len(), 1);

        // Nothing to observe beyond not panicking
        LogSink.report(entries[0].clone());
    }
}
