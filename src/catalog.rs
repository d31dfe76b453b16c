//! Schema catalog consulted by the semantic traversals.
//!
//! The analyzer only depends on the [`Catalog`] trait. [`InMemoryCatalog`] is
//! a thread-safe implementation used by the planner front end and in tests.

pub mod column_info;
pub mod table_info;

pub use column_info::ColumnInfo;
pub use table_info::TableInfo;

use crate::types::SqlType;
use anyhow::{bail, Result};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Schema facts needed to analyse an expression
pub trait Catalog {
    /// True for registered table names and aliases
    fn table_exists(&self, name: &str) -> bool;

    /// Map an alias or raw table reference to its registered name.
    /// Unknown names map to themselves.
    fn canonical_name(&self, alias: &str) -> String;

    /// Type of `attribute` registered under exactly `table`
    fn attribute_type(&self, table: &str, attribute: &str) -> Option<SqlType>;

    /// Whether `table.attribute` appears in the current GROUP BY list
    fn is_grouping_column(&self, table: &str, attribute: &str) -> bool;
}

/// Serializable description of a catalog's tables and aliases
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub tables: Vec<TableInfo>,
    /// alias -> table name
    #[serde(default)]
    pub aliases: BTreeMap<String, String>,
}

#[derive(Debug, Default)]
struct CatalogState {
    tables: HashMap<String, TableInfo>,
    aliases: HashMap<String, String>,
    grouping: HashSet<(String, String)>,
}

impl CatalogState {
    fn canonical_name(&self, name: &str) -> String {
        self.aliases
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }
}

/// In-memory catalog with interior locking
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    state: RwLock<CatalogState>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from a snapshot, registering tables before aliases
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Result<Self> {
        let catalog = Self::new();
        for table in snapshot.tables {
            catalog.create_table(&table.table_name, table.columns)?;
        }
        for (alias, table) in snapshot.aliases {
            catalog.register_alias(&alias, &table)?;
        }
        Ok(catalog)
    }

    pub fn snapshot(&self) -> CatalogSnapshot {
        let state = self.state.read();
        let mut tables: Vec<TableInfo> = state.tables.values().cloned().collect();
        tables.sort_by(|a, b| a.table_name.cmp(&b.table_name));
        CatalogSnapshot {
            tables,
            aliases: state
                .aliases
                .iter()
                .map(|(a, t)| (a.clone(), t.clone()))
                .collect(),
        }
    }

    pub fn create_table(&self, name: &str, columns: Vec<ColumnInfo>) -> Result<()> {
        let mut state = self.state.write();
        if state.tables.contains_key(name) || state.aliases.contains_key(name) {
            bail!("Table {} already exists", name);
        }

        let mut table = TableInfo::new(name);
        for column in columns {
            table.add_column(column)?;
        }
        log::debug!(
            "registered table {} with {} columns",
            name,
            table.columns.len()
        );
        state.tables.insert(name.to_string(), table);
        Ok(())
    }

    pub fn add_column(&self, table: &str, column: ColumnInfo) -> Result<()> {
        let mut state = self.state.write();
        match state.tables.get_mut(table) {
            Some(info) => info.add_column(column),
            None => bail!("Table {} doesn't exist", table),
        }
    }

    /// Make `alias` resolve to the registered table `table`
    pub fn register_alias(&self, alias: &str, table: &str) -> Result<()> {
        let mut state = self.state.write();
        if !state.tables.contains_key(table) {
            bail!("Cannot alias {} to unknown table {}", alias, table);
        }
        if state.tables.contains_key(alias) {
            bail!("Alias {} collides with a table name", alias);
        }
        state.aliases.insert(alias.to_string(), table.to_string());
        Ok(())
    }

    pub fn get_table(&self, name: &str) -> Option<TableInfo> {
        let state = self.state.read();
        let canonical = state.canonical_name(name);
        state.tables.get(&canonical).cloned()
    }

    pub fn list_tables(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.read().tables.keys().cloned().collect();
        names.sort();
        names
    }

    /// Replace the catalog-wide GROUP BY list.
    ///
    /// Table references are stored under their canonical name. The list is
    /// shared by every reader; use [`Grouped`] when queries with different
    /// lists are analysed concurrently.
    pub fn set_grouping_columns<I, T, A>(&self, columns: I)
    where
        I: IntoIterator<Item = (T, A)>,
        T: AsRef<str>,
        A: Into<String>,
    {
        let mut state = self.state.write();
        let grouping: HashSet<(String, String)> = columns
            .into_iter()
            .map(|(t, a)| (state.canonical_name(t.as_ref()), a.into()))
            .collect();
        state.grouping = grouping;
    }

    pub fn clear_grouping_columns(&self) {
        self.state.write().grouping.clear();
    }
}

impl Catalog for InMemoryCatalog {
    fn table_exists(&self, name: &str) -> bool {
        let state = self.state.read();
        state.tables.contains_key(name) || state.aliases.contains_key(name)
    }

    fn canonical_name(&self, alias: &str) -> String {
        self.state.read().canonical_name(alias)
    }

    fn attribute_type(&self, table: &str, attribute: &str) -> Option<SqlType> {
        self.state.read().tables.get(table)?.column_type(attribute)
    }

    fn is_grouping_column(&self, table: &str, attribute: &str) -> bool {
        let state = self.state.read();
        let key = (state.canonical_name(table), attribute.to_string());
        state.grouping.contains(&key)
    }
}

/// Per-query view of a catalog carrying that query's GROUP BY list.
///
/// Schema lookups go to the borrowed catalog. The grouping list lives in the
/// view, so analyses of different queries can share one catalog.
pub struct Grouped<'a, C: Catalog + ?Sized> {
    inner: &'a C,
    columns: HashSet<(String, String)>,
}

impl<'a, C: Catalog + ?Sized> Grouped<'a, C> {
    /// Table references are stored under their canonical name
    pub fn new<I, T, A>(inner: &'a C, columns: I) -> Self
    where
        I: IntoIterator<Item = (T, A)>,
        T: AsRef<str>,
        A: Into<String>,
    {
        let columns = columns
            .into_iter()
            .map(|(t, a)| (inner.canonical_name(t.as_ref()), a.into()))
            .collect();
        Self { inner, columns }
    }
}

impl<C: Catalog + ?Sized> Catalog for Grouped<'_, C> {
    fn table_exists(&self, name: &str) -> bool {
        self.inner.table_exists(name)
    }

    fn canonical_name(&self, alias: &str) -> String {
        self.inner.canonical_name(alias)
    }

    fn attribute_type(&self, table: &str, attribute: &str) -> Option<SqlType> {
        self.inner.attribute_type(table, attribute)
    }

    fn is_grouping_column(&self, table: &str, attribute: &str) -> bool {
        let key = (self.inner.canonical_name(table), attribute.to_string());
        self.columns.contains(&key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders_catalog() -> InMemoryCatalog {
        let catalog = InMemoryCatalog::new();
        catalog
            .create_table(
                "orders",
                vec![
                    ColumnInfo::new("amount", SqlType::Double),
                    ColumnInfo::new("quantity", SqlType::Int),
                ],
            )
            .unwrap();
        catalog.register_alias("o", "orders").unwrap();
        catalog
    }

    #[test]
    fn test_table_exists_and_aliases() {
        let catalog = orders_catalog();
        assert!(catalog.table_exists("orders"));
        assert!(catalog.table_exists("o"));
        assert!(!catalog.table_exists("customers"));

        assert_eq!(catalog.canonical_name("o"), "orders");
        assert_eq!(catalog.canonical_name("orders"), "orders");
        assert_eq!(catalog.canonical_name("unknown"), "unknown");
    }

    #[test]
    fn test_attribute_type_uses_exact_key() {
        let catalog = orders_catalog();
        assert_eq!(
            catalog.attribute_type("orders", "amount"),
            Some(SqlType::Double)
        );
        assert_eq!(catalog.attribute_type("o", "amount"), None);
        assert_eq!(catalog.attribute_type("orders", "missing"), None);

        catalog
            .add_column("orders", ColumnInfo::new("note", SqlType::String))
            .unwrap();
        assert_eq!(
            catalog.attribute_type("orders", "note"),
            Some(SqlType::String)
        );
        assert_eq!(
            catalog.get_table("o").unwrap().column_type("note"),
            Some(SqlType::String)
        );
    }

    #[test]
    fn test_registration_errors() {
        let catalog = orders_catalog();
        assert!(catalog.create_table("orders", vec![]).is_err());
        assert!(catalog.create_table("o", vec![]).is_err());
        assert!(catalog.register_alias("c", "customers").is_err());
        assert!(catalog.register_alias("orders", "orders").is_err());
        assert!(catalog
            .add_column("customers", ColumnInfo::new("id", SqlType::Int))
            .is_err());
        assert!(catalog
            .create_table(
                "dup",
                vec![
                    ColumnInfo::new("a", SqlType::Int),
                    ColumnInfo::new("a", SqlType::Int)
                ]
            )
            .is_err());
    }

    #[test]
    fn test_grouping_columns_are_canonicalised() {
        let catalog = orders_catalog();
        catalog.set_grouping_columns([("o", "quantity")]);

        assert!(catalog.is_grouping_column("orders", "quantity"));
        assert!(catalog.is_grouping_column("o", "quantity"));
        assert!(!catalog.is_grouping_column("orders", "amount"));

        catalog.clear_grouping_columns();
        assert!(!catalog.is_grouping_column("orders", "quantity"));
    }

    #[test]
    fn test_grouped_view_keeps_its_own_list() {
        let catalog = orders_catalog();
        catalog.set_grouping_columns([("orders", "amount")]);

        let by_quantity = Grouped::new(&catalog, [("o", "quantity")]);
        let by_nothing = Grouped::new(&catalog, Vec::<(String, String)>::new());

        assert!(by_quantity.is_grouping_column("orders", "quantity"));
        assert!(by_quantity.is_grouping_column("o", "quantity"));
        assert!(!by_quantity.is_grouping_column("orders", "amount"));
        assert!(!by_nothing.is_grouping_column("orders", "quantity"));
        // The shared list is untouched
        assert!(catalog.is_grouping_column("orders", "amount"));

        assert!(by_quantity.table_exists("o"));
        assert_eq!(by_quantity.canonical_name("o"), "orders");
        assert_eq!(
            by_quantity.attribute_type("orders", "amount"),
            Some(SqlType::Double)
        );
        assert_eq!(by_quantity.attribute_type("o", "amount"), None);
    }

    #[test]
    fn test_snapshot_roundtrip() {
        let catalog = orders_catalog();
        let snapshot = catalog.snapshot();
        assert_eq!(snapshot.tables.len(), 1);
        assert_eq!(snapshot.aliases.get("o").map(String::as_str), Some("orders"));

        let rebuilt = InMemoryCatalog::from_snapshot(snapshot).unwrap();
        assert_eq!(rebuilt.list_tables(), vec!["orders".to_string()]);
        assert_eq!(rebuilt.canonical_name("o"), "orders");
    }

    #[test]
    fn test_snapshot_from_json() {
        let json = r#"{
            "tables": [
                {"table_name": "emp", "columns": [
                    {"column_name": "salary", "column_type": "int"},
                    {"column_name": "name", "column_type": "string"}
                ]}
            ],
            "aliases": {"e": "emp"}
        }"#;
        let snapshot: CatalogSnapshot = serde_json::from_str(json).unwrap();
        let catalog = InMemoryCatalog::from_snapshot(snapshot).unwrap();
        assert_eq!(catalog.attribute_type("emp", "salary"), Some(SqlType::Int));
        assert!(catalog.table_exists("e"));

        let bad: CatalogSnapshot =
            serde_json::from_str(r#"{"aliases": {"x": "nowhere"}}"#).unwrap();
        assert!(InMemoryCatalog::from_snapshot(bad).is_err());
    }
}
