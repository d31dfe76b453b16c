//! Error types for semantic analysis of expressions.

use crate::expression::operator::{AggregateFunction, BinaryOperator, UnaryOperator};
use crate::types::OperandType;
use thiserror::Error;

/// A reference to schema objects the catalog does not know
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("table {table} doesn't exist")]
    TableNotFound { table: String },

    #[error("attribute {attribute} not found in table {table}")]
    AttributeNotFound { table: String, attribute: String },
}

/// Incompatible operand types for an operator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TypeMismatch {
    #[error("type mismatch: {lhs} {op} {rhs} can not be matched")]
    Binary {
        op: BinaryOperator,
        lhs: OperandType,
        rhs: OperandType,
    },

    #[error("type mismatch: {op}({operand}) can not be matched")]
    Unary {
        op: UnaryOperator,
        operand: OperandType,
    },

    #[error("type mismatch: {func}({operand}) can not be matched")]
    Aggregate {
        func: AggregateFunction,
        operand: OperandType,
    },

    /// Column without a catalog type; only reachable on trees that fail validation
    #[error("column {table}.{attribute} has no type in the catalog")]
    UnresolvedColumn { table: String, attribute: String },
}

/// A bare column reference outside the GROUP BY list
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GroupingError {
    #[error("{table}.{attribute} is not in the grouping clause")]
    ColumnNotGrouped { table: String, attribute: String },
}

/// Result type for type inference
pub type TypeResult<T> = Result<T, TypeMismatch>;
