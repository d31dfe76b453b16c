//! Semantic analysis driver.
//!
//! Runs the three traversals in the order the planner needs them: schema
//! validation, type inference and, for aggregated queries, the GROUP BY check.

use crate::catalog::Catalog;
use crate::diagnostics::{Diagnostic, Diagnostics};
use crate::expression::error::{GroupingError, SchemaError, TypeMismatch, TypeResult};
use crate::expression::expr::ExprNode;
use crate::expression::grouping::GroupingChecker;
use crate::expression::type_checker::TypeChecker;
use crate::expression::validator::Validator;
use crate::types::SqlType;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use thiserror::Error;

/// Analyzer configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyzerConfig {
    /// Skip type inference and the grouping check once validation has failed.
    pub skip_inference_on_schema_errors: bool,
    /// Forward every diagnostic to the `log` facade.
    pub log_diagnostics: bool,
    /// Keep validating siblings after a failing child.
    pub validate_all_children: bool,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        AnalyzerConfig {
            skip_inference_on_schema_errors: true,
            log_diagnostics: true,
            validate_all_children: true,
        }
    }
}

/// Failure of a full analysis
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("invalid expression: {}", join(.errors))]
    Schema { errors: Vec<SchemaError> },

    #[error(transparent)]
    Type(#[from] TypeMismatch),

    #[error("invalid grouping: {}", join(.errors))]
    Grouping { errors: Vec<GroupingError> },

    #[error("predicate must be bool, found {actual}")]
    NotAPredicate { actual: SqlType },
}

fn join<E: Display>(errors: &[E]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Outcome of analysing one expression
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisReport {
    pub valid: bool,
    /// `None` when inference was skipped
    pub resolved_type: Option<TypeResult<SqlType>>,
    /// `None` unless the query is grouped and the check ran
    pub grouping_ok: Option<bool>,
    pub diagnostics: Vec<Diagnostic>,
}

impl AnalysisReport {
    pub fn is_ok(&self) -> bool {
        self.valid
            && matches!(self.resolved_type, Some(Ok(_)))
            && self.grouping_ok != Some(false)
    }

    pub fn into_result(self) -> Result<SqlType, AnalysisError> {
        if !self.valid {
            let errors = self
                .diagnostics
                .iter()
                .filter_map(|d| match d {
                    Diagnostic::Schema(e) => Some(e.clone()),
                    _ => None,
                })
                .collect();
            return Err(AnalysisError::Schema { errors });
        }

        let resolved = match self.resolved_type {
            Some(result) => result?,
            None => return Err(AnalysisError::Schema { errors: Vec::new() }),
        };

        if self.grouping_ok == Some(false) {
            let errors = self
                .diagnostics
                .into_iter()
                .filter_map(|d| match d {
                    Diagnostic::Grouping(e) => Some(e),
                    _ => None,
                })
                .collect();
            return Err(AnalysisError::Grouping { errors });
        }

        Ok(resolved)
    }
}

/// Runs validation, inference and grouping checks against one catalog
pub struct Analyzer<'a> {
    catalog: &'a dyn Catalog,
    config: AnalyzerConfig,
}

impl<'a> Analyzer<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self::with_config(catalog, AnalyzerConfig::default())
    }

    pub fn with_config(catalog: &'a dyn Catalog, config: AnalyzerConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// Analyse `node`. `grouped` says whether the enclosing query has a
    /// GROUP BY clause.
    pub fn analyze(&self, node: &ExprNode, grouped: bool) -> AnalysisReport {
        let mut sink = if self.config.log_diagnostics {
            Diagnostics::logging()
        } else {
            Diagnostics::new()
        };

        let mut validator = Validator::new(self.catalog);
        if !self.config.validate_all_children {
            validator = validator.short_circuit();
        }
        let valid = validator.validate(node, &mut sink);
        let proceed = valid || !self.config.skip_inference_on_schema_errors;

        let resolved_type = if proceed {
            Some(TypeChecker::new(self.catalog).check(node, &mut sink))
        } else {
            None
        };

        let grouping_ok = if grouped && proceed {
            Some(GroupingChecker::new(self.catalog).check(node, &mut sink))
        } else {
            None
        };

        log::debug!(
            "analyzed {}: valid={} type={:?} grouping={:?}",
            node,
            valid,
            resolved_type,
            grouping_ok
        );

        AnalysisReport {
            valid,
            resolved_type,
            grouping_ok,
            diagnostics: sink.into_vec(),
        }
    }

    /// Analyse a WHERE or HAVING predicate, which must resolve to bool
    pub fn analyze_predicate(&self, node: &ExprNode, grouped: bool) -> Result<(), AnalysisError> {
        match self.analyze(node, grouped).into_result()? {
            SqlType::Bool => Ok(()),
            actual => Err(AnalysisError::NotAPredicate { actual }),
        }
    }
}
