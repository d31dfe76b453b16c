//! Column information and metadata structures.

use crate::types::SqlType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub column_name: String,
    pub column_type: SqlType,
}

impl ColumnInfo {
    pub fn new(column_name: impl Into<String>, column_type: SqlType) -> Self {
        Self {
            column_name: column_name.into(),
            column_type,
        }
    }
}
