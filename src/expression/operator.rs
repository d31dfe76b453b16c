//! Operator definitions for expressions.

use crate::types::SqlType;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    // Arithmetic
    Plus,
    Minus,
    Times,
    Divide,

    // Comparison
    Gt,
    Lt,
    Eq,
    Neq,

    // Logical
    Or,
}

/// Coarse grouping of binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorClass {
    Arithmetic,
    Comparison,
    Logical,
}

impl BinaryOperator {
    pub fn class(&self) -> OperatorClass {
        match self {
            BinaryOperator::Plus
            | BinaryOperator::Minus
            | BinaryOperator::Times
            | BinaryOperator::Divide => OperatorClass::Arithmetic,
            BinaryOperator::Gt | BinaryOperator::Lt | BinaryOperator::Eq | BinaryOperator::Neq => {
                OperatorClass::Comparison
            }
            BinaryOperator::Or => OperatorClass::Logical,
        }
    }

    /// Get the output type of this operator given input types
    pub fn output_type(&self, left: SqlType, right: SqlType) -> Option<SqlType> {
        match self {
            // Plus doubles as string concatenation
            BinaryOperator::Plus => match (left, right) {
                (SqlType::String, SqlType::String) => Some(SqlType::String),
                _ => SqlType::promote(left, right),
            },

            BinaryOperator::Minus | BinaryOperator::Times | BinaryOperator::Divide => {
                SqlType::promote(left, right)
            }

            BinaryOperator::Gt | BinaryOperator::Lt | BinaryOperator::Eq | BinaryOperator::Neq => {
                if SqlType::comparable(left, right) {
                    Some(SqlType::Bool)
                } else {
                    None
                }
            }

            BinaryOperator::Or => match (left, right) {
                (SqlType::Bool, SqlType::Bool) => Some(SqlType::Bool),
                _ => None,
            },
        }
    }

    /// Get the display string for this operator
    pub fn as_str(&self) -> &'static str {
        match self {
            BinaryOperator::Plus => "+",
            BinaryOperator::Minus => "-",
            BinaryOperator::Times => "*",
            BinaryOperator::Divide => "/",
            BinaryOperator::Gt => ">",
            BinaryOperator::Lt => "<",
            BinaryOperator::Eq => "==",
            BinaryOperator::Neq => "!=",
            BinaryOperator::Or => "||",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unary operators supported in expressions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryOperator {
    Not,
}

impl UnaryOperator {
    /// Get the output type of this operator given input type
    pub fn output_type(&self, operand: SqlType) -> Option<SqlType> {
        match self {
            UnaryOperator::Not => match operand {
                SqlType::Bool => Some(SqlType::Bool),
                _ => None,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UnaryOperator::Not => "!",
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregate functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AggregateFunction {
    Sum,
    Avg,
}

impl AggregateFunction {
    /// Get the output type of this aggregate given its argument type.
    ///
    /// SUM always yields Int, even over a Double argument.
    pub fn output_type(&self, operand: SqlType) -> Option<SqlType> {
        if !operand.is_numeric() {
            return None;
        }
        match self {
            AggregateFunction::Sum => Some(SqlType::Int),
            AggregateFunction::Avg => Some(SqlType::Double),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AggregateFunction::Sum => "sum",
            AggregateFunction::Avg => "avg",
        }
    }
}

impl fmt::Display for AggregateFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
