//! Expression trees and the semantic traversals over them.
//!
//! This module provides:
//! - The expression tree and its canonical rendering
//! - Schema validation against a catalog
//! - Type inference over the bool/int/double/string lattice
//! - GROUP BY membership checks

pub mod error;
pub mod expr;
pub mod grouping;
pub mod operator;
pub mod type_checker;
pub mod validator;

pub use error::{GroupingError, SchemaError, TypeMismatch, TypeResult};
pub use expr::{ExprNode, Identifier, Literal, StaticKind};
pub use grouping::{check_grouping, in_group_clause, GroupingChecker};
pub use operator::{AggregateFunction, BinaryOperator, OperatorClass, UnaryOperator};
pub use type_checker::{infer_type, TypeChecker};
pub use validator::{validate, Validator};
