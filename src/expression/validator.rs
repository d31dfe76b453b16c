//! Schema validation of expression trees.

use crate::catalog::Catalog;
use crate::diagnostics::DiagnosticSink;
use crate::expression::error::SchemaError;
use crate::expression::expr::{ExprNode, Identifier};

/// Checks that every column reference in a tree names a known table and attribute
pub struct Validator<'a> {
    catalog: &'a dyn Catalog,
    /// Visit every child even after one has failed
    visit_all: bool,
}

impl<'a> Validator<'a> {
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self {
            catalog,
            visit_all: true,
        }
    }

    /// Stop at the first failing child instead of reporting every error
    pub fn short_circuit(mut self) -> Self {
        self.visit_all = false;
        self
    }

    pub fn validate(&self, node: &ExprNode, sink: &mut dyn DiagnosticSink) -> bool {
        match node {
            ExprNode::Literal(_) => true,
            ExprNode::Identifier(ident) => self.validate_identifier(ident, sink),
            ExprNode::BinaryOp { .. } | ExprNode::UnaryOp { .. } | ExprNode::Aggregate { .. } => {
                let children = node.children();
                if self.visit_all {
                    children
                        .into_iter()
                        .fold(true, |ok, child| self.validate(child, sink) && ok)
                } else {
                    children
                        .into_iter()
                        .all(|child| self.validate(child, sink))
                }
            }
        }
    }

    fn validate_identifier(&self, ident: &Identifier, sink: &mut dyn DiagnosticSink) -> bool {
        let table = ident.table_name();
        let attribute = ident.attribute_name();

        if !self.catalog.table_exists(table) {
            sink.report(
                SchemaError::TableNotFound {
                    table: table.to_string(),
                }
                .into(),
            );
            return false;
        }

        // Attributes may be registered under the alias or the full table name
        let found = self.catalog.attribute_type(table, attribute).is_some()
            || self
                .catalog
                .attribute_type(&self.catalog.canonical_name(table), attribute)
                .is_some();
        if !found {
            sink.report(
                SchemaError::AttributeNotFound {
                    table: table.to_string(),
                    attribute: attribute.to_string(),
                }
                .into(),
            );
        }
        found
    }
}

/// Helper function to validate a tree against a catalog
pub fn validate(node: &ExprNode, catalog: &dyn Catalog, sink: &mut dyn DiagnosticSink) -> bool {
    let valid = Validator::new(catalog).validate(node, sink);
    log::debug!("validate {} -> {}", node, valid);
    valid
}
