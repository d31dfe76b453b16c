//! SQL types produced by type inference and stored in the catalog.

use serde::{Deserialize, Serialize};
use std::fmt;

/// SQL types known to the semantic layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SqlType {
    Bool,
    Int,
    Double,
    String,
}

impl SqlType {
    /// Int and Double take part in arithmetic
    pub fn is_numeric(self) -> bool {
        matches!(self, SqlType::Int | SqlType::Double)
    }

    /// Promote a pair of numeric types. Double wins over Int.
    ///
    /// Returns `None` if either side is not numeric.
    pub fn promote(left: SqlType, right: SqlType) -> Option<SqlType> {
        match (left, right) {
            (SqlType::Int, SqlType::Int) => Some(SqlType::Int),
            (SqlType::Int | SqlType::Double, SqlType::Int | SqlType::Double) => {
                Some(SqlType::Double)
            }
            _ => None,
        }
    }

    /// Whether two types may be compared with `>`, `<`, `==` or `!=`
    pub fn comparable(left: SqlType, right: SqlType) -> bool {
        match (left, right) {
            (SqlType::String, SqlType::String) => true,
            (l, r) => l.is_numeric() && r.is_numeric(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SqlType::Bool => "bool",
            SqlType::Int => "int",
            SqlType::Double => "double",
            SqlType::String => "string",
        }
    }
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type of an operand as seen by a failing operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandType {
    Resolved(SqlType),
    /// The operand itself failed to type check
    Unresolved,
}

impl From<Option<SqlType>> for OperandType {
    fn from(value: Option<SqlType>) -> Self {
        match value {
            Some(t) => OperandType::Resolved(t),
            None => OperandType::Unresolved,
        }
    }
}

impl fmt::Display for OperandType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperandType::Resolved(t) => write!(f, "{}", t),
            OperandType::Unresolved => f.write_str("unresolved"),
        }
    }
}
