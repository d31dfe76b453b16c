pub mod analyzer;
pub mod catalog;
pub mod diagnostics;
pub mod expression;
pub mod types;

pub use analyzer::{AnalysisError, AnalysisReport, Analyzer, AnalyzerConfig};
pub use catalog::{Catalog, Grouped, InMemoryCatalog};
pub use diagnostics::{Diagnostic, DiagnosticSink, Diagnostics, LogSink};
pub use expression::{check_grouping, in_group_clause, infer_type, validate, ExprNode};
pub use types::{OperandType, SqlType};
