//! Table information and metadata structures.

use crate::catalog::column_info::ColumnInfo;
use crate::types::SqlType;
use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableInfo {
    pub table_name: String,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

impl TableInfo {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            columns: Vec::new(),
        }
    }

    /// Append a column, rejecting duplicate names
    pub fn add_column(&mut self, column: ColumnInfo) -> Result<()> {
        if self.column(&column.column_name).is_some() {
            bail!(
                "Duplicate column name {} in table {}",
                column.column_name,
                self.table_name
            );
        }
        self.columns.push(column);
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&ColumnInfo> {
        self.columns.iter().find(|c| c.column_name == name)
    }

    pub fn column_type(&self, name: &str) -> Option<SqlType> {
        self.column(name).map(|c| c.column_type)
    }
}
