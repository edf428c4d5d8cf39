//! Schema snapshots
//!
//! A snapshot records the rendered column types of every table planned in a
//! generation run. The next run diffs its plan against the prior snapshot to
//! decide which ALTER statements (and conversions) to emit.

use crate::statement::TableDefinition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Recorded column types of a prior generation run, table by table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    /// table name → column name → rendered SQL type
    pub tables: BTreeMap<String, BTreeMap<String, String>>,
}

impl SchemaSnapshot {
    /// Record a planned table
    pub fn record_table(&mut self, table: &TableDefinition) {
        let columns = table
            .columns
            .iter()
            .map(|c| (c.name.clone(), c.sql_type.clone()))
            .collect();
        self.tables.insert(table.name.clone(), columns);
    }

    /// Columns of a recorded table
    pub fn table(&self, name: &str) -> Option<&BTreeMap<String, String>> {
        self.tables.get(name)
    }

    /// Rendered type of a recorded column
    pub fn column_type(&self, table: &str, column: &str) -> Option<&str> {
        self.tables.get(table)?.get(column).map(String::as_str)
    }
}
