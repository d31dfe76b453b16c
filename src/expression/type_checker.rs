//! Type inference for expressions.

use crate::catalog::Catalog;
use crate::diagnostics::DiagnosticSink;
use crate::expression::error::{TypeMismatch, TypeResult};
use crate::expression::expr::{ExprNode, Identifier, StaticKind};
use crate::expression::operator::OperatorClass;
use crate::types::SqlType;

/// Type checker for expressions
pub struct TypeChecker<'a> {
    catalog: &'a dyn Catalog,
}

impl<'a> TypeChecker<'a> {
    /// Create a new type checker resolving columns through the given catalog
    pub fn new(catalog: &'a dyn Catalog) -> Self {
        Self { catalog }
    }

    /// Type check an expression and return its output type.
    ///
    /// Mismatches are reported to `sink` where they originate. An operator
    /// whose operand already failed returns a mismatch carrying
    /// [`OperandType::Unresolved`](crate::types::OperandType::Unresolved)
    /// without reporting it again.
    pub fn check(&self, node: &ExprNode, sink: &mut dyn DiagnosticSink) -> TypeResult<SqlType> {
        match node {
            ExprNode::Literal(lit) => Ok(lit.sql_type()),

            ExprNode::Identifier(ident) => match self.column_type(ident) {
                Some(t) => Ok(t),
                None => Err(report(
                    TypeMismatch::UnresolvedColumn {
                        table: ident.table_name().to_string(),
                        attribute: ident.attribute_name().to_string(),
                    },
                    sink,
                )),
            },

            ExprNode::BinaryOp { op, lhs, rhs } => {
                // Both sides are inferred so each reports its own failures
                let left = self.operand_type(lhs, sink);
                let right = self.operand_type(rhs, sink);

                let (l, r) = match (left, right) {
                    (Some(l), Some(r)) => (l, r),
                    _ => {
                        return Err(TypeMismatch::Binary {
                            op: *op,
                            lhs: left.into(),
                            rhs: right.into(),
                        })
                    }
                };

                let kinds_allowed = match op.class() {
                    OperatorClass::Logical => {
                        accepts_bool(lhs.static_kind()) && accepts_bool(rhs.static_kind())
                    }
                    OperatorClass::Arithmetic | OperatorClass::Comparison => true,
                };

                match op.output_type(l, r) {
                    Some(output_type) if kinds_allowed => Ok(output_type),
                    _ => Err(report(
                        TypeMismatch::Binary {
                            op: *op,
                            lhs: left.into(),
                            rhs: right.into(),
                        },
                        sink,
                    )),
                }
            }

            ExprNode::UnaryOp { op, operand } => {
                let operand_type = self.operand_type(operand, sink);
                match operand_type {
                    Some(ot) => match op.output_type(ot) {
                        Some(output_type) => Ok(output_type),
                        None => Err(report(
                            TypeMismatch::Unary {
                                op: *op,
                                operand: operand_type.into(),
                            },
                            sink,
                        )),
                    },
                    None => Err(TypeMismatch::Unary {
                        op: *op,
                        operand: operand_type.into(),
                    }),
                }
            }

            ExprNode::Aggregate { func, operand } => {
                let operand_type = self.operand_type(operand, sink);
                match operand_type {
                    Some(ot) => match func.output_type(ot) {
                        Some(output_type) => Ok(output_type),
                        None => Err(report(
                            TypeMismatch::Aggregate {
                                func: *func,
                                operand: operand_type.into(),
                            },
                            sink,
                        )),
                    },
                    None => Err(TypeMismatch::Aggregate {
                        func: *func,
                        operand: operand_type.into(),
                    }),
                }
            }
        }
    }

    /// Resolve the type of an operand: literals carry a fixed type,
    /// identifiers go through the catalog and compound nodes recurse.
    fn operand_type(&self, node: &ExprNode, sink: &mut dyn DiagnosticSink) -> Option<SqlType> {
        let resolved = match node {
            ExprNode::Literal(lit) => Some(lit.sql_type()),
            _ => self.check(node, sink).ok(),
        };
        if resolved.is_none() {
            log::debug!("operand {} did not resolve", node);
        }
        resolved
    }

    /// Look up a column under its own table reference, then under the
    /// canonical table name
    pub fn column_type(&self, ident: &Identifier) -> Option<SqlType> {
        let table = ident.table_name();
        let attribute = ident.attribute_name();
        self.catalog
            .attribute_type(table, attribute)
            .or_else(|| {
                self.catalog
                    .attribute_type(&self.catalog.canonical_name(table), attribute)
            })
    }
}

/// Static kinds that can stand as an operand of a logical connective.
/// A bare column reference is not one, even when its column is bool.
fn accepts_bool(kind: StaticKind) -> bool {
    match kind {
        StaticKind::LiteralBool | StaticKind::Compound => true,
        StaticKind::Identifier | StaticKind::LiteralNumeric | StaticKind::LiteralString => false,
    }
}

fn report(mismatch: TypeMismatch, sink: &mut dyn DiagnosticSink) -> TypeMismatch {
    sink.report(mismatch.clone().into());
    mismatch
}

/// Helper function to infer the type of an expression
pub fn infer_type(
    node: &ExprNode,
    catalog: &dyn Catalog,
    sink: &mut dyn DiagnosticSink,
) -> TypeResult<SqlType> {
    let result = TypeChecker::new(catalog).check(node, sink);
    log::debug!("infer_type {} -> {:?}", node, result);
    result
}
