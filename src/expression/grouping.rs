//! GROUP BY membership checks.
//!
//! In an aggregated query every column used outside an aggregate must be
//! listed in the grouping clause.

use crate::catalog::Catalog;
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::expression::error::GroupingError;
use crate::expression::expr::ExprNode;
use crate::expression::operator::UnaryOperator;

pub struct GroupingChecker<'a> {
    catalog: &'a dyn Catalog,
}

impl<'a> GroupingChecker<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog }
    }

    pub fn check(&self, node: &ExprNode, sink: &mut dyn DiagnosticSink) -> bool {
        match node {
            ExprNode::Literal(_) => true,

            ExprNode::Identifier(ident) => {
                let grouped = self
                    .catalog
                    .is_grouping_column(ident.table_name(), ident.attribute_name());
                if !grouped {
                    sink.report(
                        GroupingError::ColumnNotGrouped {
                            table: ident.table_name().to_string(),
                            attribute: ident.attribute_name().to_string(),
                        }
                        .into(),
                    );
                }
                grouped
            }

            ExprNode::BinaryOp { lhs, rhs, .. } => {
                let left = self.check(lhs, sink);
                let right = self.check(rhs, sink);
                left && right
            }

            // NOT does not look at its operand
            ExprNode::UnaryOp {
                op: UnaryOperator::Not,
                ..
            } => true,

            // Aggregated columns need not be grouped
            ExprNode::Aggregate { .. } => true,
        }
    }
}

/// Whether every bare column reference in `node` is a grouping column
pub fn in_group_clause(
    node: &ExprNode,
    catalog: &dyn Catalog,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let grouped = GroupingChecker::new(catalog).check(node, sink);
    log::debug!("in_group_clause {} -> {}", node, grouped);
    grouped
}

/// Like [`in_group_clause`], returning the first offending column as an error
pub fn check_grouping(
    node: &ExprNode,
    catalog: &dyn Catalog,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), GroupingError> {
    let mut found: Vec<Diagnostic> = Vec::new();
    let grouped = GroupingChecker::new(catalog).check(node, &mut found);
    let first = found.iter().find_map(|d| match d {
        Diagnostic::Grouping(e) => Some(e.clone()),
        _ => None,
    });
    for diagnostic in found {
        sink.report(diagnostic);
    }

    match first {
        Some(e) if !grouped => Err(e),
        _ => Ok(()),
    }
}
