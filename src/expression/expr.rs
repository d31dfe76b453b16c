//! Expression tree definitions and canonical rendering.

use crate::expression::operator::{AggregateFunction, BinaryOperator, UnaryOperator};
use crate::types::SqlType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse classification of a node, fixed at construction.
///
/// Selects which inference rule applies to an operand. This is not the
/// resolved SQL type; see [`SqlType`] for that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaticKind {
    LiteralBool,
    LiteralNumeric,
    LiteralString,
    Identifier,
    Compound,
}

/// Literal constant value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Literal {
    Bool(bool),
    Int(i64),
    Double(f64),
    String(String),
}

impl Literal {
    /// Build a string literal from lexer text, stripping one pair of
    /// matching `'` or `"` delimiters if present.
    pub fn quoted(raw: &str) -> Self {
        let stripped = ['\'', '"']
            .iter()
            .find_map(|q| raw.strip_prefix(*q).and_then(|s| s.strip_suffix(*q)))
            .unwrap_or(raw);
        Literal::String(stripped.to_string())
    }

    /// The fixed SQL type of this literal
    pub fn sql_type(&self) -> SqlType {
        match self {
            Literal::Bool(_) => SqlType::Bool,
            Literal::Int(_) => SqlType::Int,
            Literal::Double(_) => SqlType::Double,
            Literal::String(_) => SqlType::String,
        }
    }

    pub fn static_kind(&self) -> StaticKind {
        match self {
            Literal::Bool(_) => StaticKind::LiteralBool,
            Literal::Int(_) | Literal::Double(_) => StaticKind::LiteralNumeric,
            Literal::String(_) => StaticKind::LiteralString,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Bool(v) => write!(f, "bool[{}]", v),
            Literal::Int(v) => write!(f, "int[{}]", v),
            Literal::Double(v) => write!(f, "double[{:.6}]", v),
            Literal::String(v) => write!(f, "string[{}]", v),
        }
    }
}

/// Column reference qualified by a table name or alias
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
    table: String,
    attribute: String,
}

impl Identifier {
    pub fn new(table: impl Into<String>, attribute: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            attribute: attribute.into(),
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table
    }

    pub fn attribute_name(&self) -> &str {
        &self.attribute
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}_{}]", self.table, self.attribute)
    }
}

/// Expression tree node.
///
/// Every node owns its children; trees are built bottom-up and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExprNode {
    /// Literal constant value
    Literal(Literal),

    /// Column reference
    Identifier(Identifier),

    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        lhs: Box<ExprNode>,
        rhs: Box<ExprNode>,
    },

    /// Unary operation
    UnaryOp {
        op: UnaryOperator,
        operand: Box<ExprNode>,
    },

    /// Aggregate call
    Aggregate {
        func: AggregateFunction,
        operand: Box<ExprNode>,
    },
}

impl ExprNode {
    pub fn bool_literal(value: bool) -> Self {
        ExprNode::Literal(Literal::Bool(value))
    }

    pub fn int_literal(value: i64) -> Self {
        ExprNode::Literal(Literal::Int(value))
    }

    pub fn double_literal(value: f64) -> Self {
        ExprNode::Literal(Literal::Double(value))
    }

    /// Create a string literal from quoted lexer text such as `'abc'`
    pub fn string_literal(raw: &str) -> Self {
        ExprNode::Literal(Literal::quoted(raw))
    }

    pub fn identifier(table: impl Into<String>, attribute: impl Into<String>) -> Self {
        ExprNode::Identifier(Identifier::new(table, attribute))
    }

    /// Create a binary operation expression
    pub fn binary_op(op: BinaryOperator, lhs: ExprNode, rhs: ExprNode) -> Self {
        ExprNode::BinaryOp {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    /// Create a unary operation expression
    pub fn unary_op(op: UnaryOperator, operand: ExprNode) -> Self {
        ExprNode::UnaryOp {
            op,
            operand: Box::new(operand),
        }
    }

    /// Create an aggregate expression
    pub fn aggregate(func: AggregateFunction, operand: ExprNode) -> Self {
        ExprNode::Aggregate {
            func,
            operand: Box::new(operand),
        }
    }

    pub fn plus(lhs: ExprNode, rhs: ExprNode) -> Self {
        Self::binary_op(BinaryOperator::Plus, lhs, rhs)
    }

    pub fn minus(lhs: ExprNode, rhs: ExprNode) -> Self {
        Self::binary_op(BinaryOperator::Minus, lhs, rhs)
    }

    pub fn times(lhs: ExprNode, rhs: ExprNode) -> Self {
        Self::binary_op(BinaryOperator::Times, lhs, rhs)
    }

    pub fn divide(lhs: ExprNode, rhs: ExprNode) -> Self {
        Self::binary_op(BinaryOperator::Divide, lhs, rhs)
    }

    pub fn gt(lhs: ExprNode, rhs: ExprNode) -> Self {
        Self::binary_op(BinaryOperator::Gt, lhs, rhs)
    }

    pub fn lt(lhs: ExprNode, rhs: ExprNode) -> Self {
        Self::binary_op(BinaryOperator::Lt, lhs, rhs)
    }

    pub fn eq(lhs: ExprNode, rhs: ExprNode) -> Self {
        Self::binary_op(BinaryOperator::Eq, lhs, rhs)
    }

    pub fn neq(lhs: ExprNode, rhs: ExprNode) -> Self {
        Self::binary_op(BinaryOperator::Neq, lhs, rhs)
    }

    pub fn or(lhs: ExprNode, rhs: ExprNode) -> Self {
        Self::binary_op(BinaryOperator::Or, lhs, rhs)
    }

    pub fn not(operand: ExprNode) -> Self {
        Self::unary_op(UnaryOperator::Not, operand)
    }

    pub fn sum(operand: ExprNode) -> Self {
        Self::aggregate(AggregateFunction::Sum, operand)
    }

    pub fn avg(operand: ExprNode) -> Self {
        Self::aggregate(AggregateFunction::Avg, operand)
    }

    /// Canonical textual form, e.g. `> ([orders_amount], int[100])`
    pub fn render(&self) -> String {
        self.to_string()
    }

    pub fn static_kind(&self) -> StaticKind {
        match self {
            ExprNode::Literal(lit) => lit.static_kind(),
            ExprNode::Identifier(_) => StaticKind::Identifier,
            ExprNode::BinaryOp { .. } | ExprNode::UnaryOp { .. } | ExprNode::Aggregate { .. } => {
                StaticKind::Compound
            }
        }
    }

    pub fn as_identifier(&self) -> Option<&Identifier> {
        match self {
            ExprNode::Identifier(ident) => Some(ident),
            _ => None,
        }
    }

    /// Direct children, left to right
    pub fn children(&self) -> Vec<&ExprNode> {
        match self {
            ExprNode::Literal(_) | ExprNode::Identifier(_) => Vec::new(),
            ExprNode::BinaryOp { lhs, rhs, .. } => vec![&**lhs, &**rhs],
            ExprNode::UnaryOp { operand, .. } | ExprNode::Aggregate { operand, .. } => {
                vec![&**operand]
            }
        }
    }

    /// Check if this expression is a constant (contains no column references)
    pub fn is_constant(&self) -> bool {
        match self {
            ExprNode::Literal(_) => true,
            ExprNode::Identifier(_) => false,
            _ => self.children().into_iter().all(ExprNode::is_constant),
        }
    }

    pub fn contains_aggregate(&self) -> bool {
        match self {
            ExprNode::Aggregate { .. } => true,
            _ => self
                .children()
                .into_iter()
                .any(ExprNode::contains_aggregate),
        }
    }

    /// All column references in the tree, in left-to-right order
    pub fn column_refs(&self) -> Vec<&Identifier> {
        let mut refs = Vec::new();
        self.collect_column_refs(&mut refs);
        refs
    }

    fn collect_column_refs<'a>(&'a self, refs: &mut Vec<&'a Identifier>) {
        match self {
            ExprNode::Identifier(ident) => refs.push(ident),
            _ => {
                for child in self.children() {
                    child.collect_column_refs(refs);
                }
            }
        }
    }
}

impl fmt::Display for ExprNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExprNode::Literal(lit) => write!(f, "{}", lit),
            ExprNode::Identifier(ident) => write!(f, "{}", ident),
            ExprNode::BinaryOp { op, lhs, rhs } => write!(f, "{} ({}, {})", op, lhs, rhs),
            ExprNode::UnaryOp { op, operand } => write!(f, "{}({})", op, operand),
            ExprNode::Aggregate { func, operand } => write!(f, "{}({})", func, operand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_literal_rendering() {
        assert_eq!(ExprNode::bool_literal(true).render(), "bool[true]");
        assert_eq!(ExprNode::bool_literal(false).render(), "bool[false]");
        assert_eq!(ExprNode::int_literal(42).render(), "int[42]");
        assert_eq!(ExprNode::double_literal(3.5).render(), "double[3.500000]");
        assert_eq!(ExprNode::string_literal("'abc'").render(), "string[abc]");
    }

    #[test]
    fn test_string_literal_quotes() {
        assert_eq!(
            ExprNode::string_literal("'a'"),
            ExprNode::Literal(Literal::String("a".to_string()))
        );
        assert_eq!(Literal::quoted("\"x y\""), Literal::String("x y".to_string()));
        assert_eq!(Literal::quoted("''"), Literal::String(String::new()));
        // Unquoted or mismatched text is kept as-is
        assert_eq!(Literal::quoted("abc"), Literal::String("abc".to_string()));
        assert_eq!(Literal::quoted("'abc\""), Literal::String("'abc\"".to_string()));
    }

    #[test]
    fn test_compound_rendering() {
        let expr = ExprNode::gt(
            ExprNode::identifier("orders", "amount"),
            ExprNode::int_literal(100),
        );
        assert_eq!(expr.render(), "> ([orders_amount], int[100])");

        let expr = ExprNode::or(
            ExprNode::eq(ExprNode::int_literal(1), ExprNode::int_literal(2)),
            ExprNode::neq(
                ExprNode::string_literal("'a'"),
                ExprNode::string_literal("'b'"),
            ),
        );
        assert_eq!(
            expr.render(),
            "|| (== (int[1], int[2]), != (string[a], string[b]))"
        );

        let expr = ExprNode::not(ExprNode::lt(
            ExprNode::identifier("t", "a"),
            ExprNode::double_literal(0.25),
        ));
        assert_eq!(expr.render(), "!(< ([t_a], double[0.250000]))");

        let expr = ExprNode::divide(
            ExprNode::sum(ExprNode::identifier("t", "a")),
            ExprNode::avg(ExprNode::times(
                ExprNode::identifier("t", "b"),
                ExprNode::minus(ExprNode::int_literal(2), ExprNode::int_literal(1)),
            )),
        );
        assert_eq!(
            expr.render(),
            "/ (sum([t_a]), avg(* ([t_b], - (int[2], int[1]))))"
        );

        let expr = ExprNode::plus(ExprNode::int_literal(1), ExprNode::int_literal(2));
        assert_eq!(expr.render(), "+ (int[1], int[2])");
    }

    #[test]
    fn test_static_kind() {
        assert_eq!(ExprNode::bool_literal(true).static_kind(), StaticKind::LiteralBool);
        assert_eq!(ExprNode::int_literal(1).static_kind(), StaticKind::LiteralNumeric);
        assert_eq!(
            ExprNode::double_literal(1.0).static_kind(),
            StaticKind::LiteralNumeric
        );
        assert_eq!(
            ExprNode::string_literal("'s'").static_kind(),
            StaticKind::LiteralString
        );
        assert_eq!(
            ExprNode::identifier("t", "a").static_kind(),
            StaticKind::Identifier
        );
        assert_eq!(
            ExprNode::not(ExprNode::bool_literal(true)).static_kind(),
            StaticKind::Compound
        );
        assert_eq!(
            ExprNode::sum(ExprNode::int_literal(1)).static_kind(),
            StaticKind::Compound
        );
    }

    #[test]
    fn test_identifier_accessors() {
        let expr = ExprNode::identifier("o", "amount");
        let ident = expr.as_identifier().unwrap();
        assert_eq!(ident.table_name(), "o");
        assert_eq!(ident.attribute_name(), "amount");
        assert!(ExprNode::int_literal(1).as_identifier().is_none());
    }

    #[test]
    fn test_structural_helpers() {
        let expr = ExprNode::plus(
            ExprNode::identifier("t", "a"),
            ExprNode::sum(ExprNode::identifier("t", "b")),
        );
        assert!(!expr.is_constant());
        assert!(expr.contains_aggregate());
        let refs: Vec<String> = expr.column_refs().iter().map(|i| i.to_string()).collect();
        assert_eq!(refs, vec!["[t_a]", "[t_b]"]);
        assert_eq!(expr.children().len(), 2);

        let constant = ExprNode::not(ExprNode::bool_literal(false));
        assert!(constant.is_constant());
        assert!(!constant.contains_aggregate());
        assert!(constant.column_refs().is_empty());
    }

    #[test]
    fn test_serde_roundtrip_of_tree() {
        let expr = ExprNode::gt(
            ExprNode::identifier("orders", "amount"),
            ExprNode::int_literal(100),
        );
        let json = serde_json::to_string(&expr).unwrap();
        let back: ExprNode = serde_json::from_str(&json).unwrap();
        assert_eq!(back, expr);
    }
}
