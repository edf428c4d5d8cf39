//! Migration emission
//!
//! Walks the type catalog and the per-type column plan to produce an ordered
//! statement sequence: one primary and one history table per concrete
//! resource type, the four shared lookup tables once per run, index
//! statements, and, when a prior snapshot is supplied, ALTER statements
//! with explicit conversions for columns whose planned type changed.

use crate::column::{plan_column, ColumnType};
use crate::convert::conversion_expression;
use crate::lookup::{classify, LookupKind};
use crate::snapshot::SchemaSnapshot;
use crate::statement::{ColumnDefinition, IndexDefinition, Statement, TableDefinition};
use crate::PlannerConfig;
use galena_catalog::{SearchFieldIndex, TypeCatalog, TypeDefinition};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Root fields every concrete resource type declares
const CANONICAL_ROOT_FIELDS: [&str; 4] = ["id", "meta", "implicitRules", "language"];

/// Search codes that would collide with the fixed system columns
const RESERVED_COLUMNS: [&str; 4] = ["id", "content", "lastUpdated", "compartments"];

/// Type carrying unique-user-identity semantics, and its identifying column
const USER_IDENTITY_TYPE: &str = "User";
const USER_IDENTITY_COLUMN: &str = "email";

/// Result of a generation run
#[derive(Debug, Clone)]
pub struct Migration {
    /// Ordered schema statements
    pub statements: Vec<Statement>,
    /// Snapshot of the planned schema, input to the next run's diff
    pub snapshot: SchemaSnapshot,
}

impl Migration {
    /// Render the statement sequence as a migration script.
    pub fn render(&self) -> String {
        crate::statement::render_script(&self.statements)
    }
}

/// Schema generator over an indexed catalog
pub struct SchemaGenerator<'a> {
    catalog: &'a TypeCatalog,
    search: &'a SearchFieldIndex,
    config: PlannerConfig,
}

/// One planned table plus the indexes it owns
struct PlannedTable {
    table: TableDefinition,
    indexes: Vec<IndexDefinition>,
}

impl<'a> SchemaGenerator<'a> {
    pub fn new(catalog: &'a TypeCatalog, search: &'a SearchFieldIndex, config: PlannerConfig) -> Self {
        Self {
            catalog,
            search,
            config,
        }
    }

    /// Emit the migration for the current catalog, diffed against a prior
    /// snapshot when one is given. With no prior snapshot every table is
    /// created from scratch; with an identical prior plan the statement
    /// sequence is empty.
    pub fn emit(&self, prior: Option<&SchemaSnapshot>) -> Migration {
        let mut planned = Vec::new();

        for name in self.catalog.type_names_sorted() {
            let Some(type_def) = self.catalog.get(name) else {
                continue;
            };
            if !is_concrete_resource(type_def) {
                continue;
            }

            planned.push(self.build_resource_table(type_def));
            planned.push(build_history_table(name));
        }

        for kind in LookupKind::ALL {
            planned.push(build_lookup_table(kind));
        }

        let mut statements = Vec::new();
        let mut snapshot = SchemaSnapshot::default();

        for PlannedTable { table, indexes } in planned {
            snapshot.record_table(&table);

            match prior.and_then(|p| p.table(&table.name)) {
                None => {
                    statements.push(Statement::CreateTable(table));
                    statements.extend(indexes.into_iter().map(Statement::CreateIndex));
                }
                Some(prior_columns) => {
                    self.diff_table(&table, prior_columns, &indexes, &mut statements);
                }
            }
        }

        Migration {
            statements,
            snapshot,
        }
    }

    /// Emit ADD COLUMN / ALTER COLUMN statements for a table that already
    /// existed in the prior snapshot.
    fn diff_table(
        &self,
        table: &TableDefinition,
        prior_columns: &BTreeMap<String, String>,
        indexes: &[IndexDefinition],
        statements: &mut Vec<Statement>,
    ) {
        for column in &table.columns {
            match prior_columns.get(&column.name) {
                None => {
                    statements.push(Statement::AddColumn {
                        table: table.name.clone(),
                        column: column.clone(),
                    });
                    // A fresh column also gets its index.
                    statements.extend(
                        indexes
                            .iter()
                            .filter(|i| i.columns == [column.name.clone()])
                            .cloned()
                            .map(Statement::CreateIndex),
                    );
                }
                Some(old_type) if *old_type != column.sql_type => {
                    self.alter_column(table, column, old_type, statements);
                }
                Some(_) => {}
            }
        }
    }

    fn alter_column(
        &self,
        table: &TableDefinition,
        column: &ColumnDefinition,
        old_type: &str,
        statements: &mut Vec<Statement>,
    ) {
        let conversion = match (ColumnType::parse(old_type), ColumnType::parse(&column.sql_type)) {
            (Some(old), Some(new)) => conversion_expression(old, new, &column.name),
            _ => None,
        };

        match conversion {
            Some(using) => statements.push(Statement::AlterColumnType {
                table: table.name.clone(),
                column: column.name.clone(),
                sql_type: column.sql_type.clone(),
                using: Some(using),
            }),
            None => {
                // No ALTER for unmapped pairs; the column keeps its old type.
                warn!(
                    table = %table.name,
                    column = %column.name,
                    old = %old_type,
                    new = %column.sql_type,
                    "unknown conversion, column left unconverted"
                );
            }
        }
    }

    /// Primary table for one concrete resource type: the four fixed system
    /// columns, then one column per non-lookup search field in declaration
    /// order, duplicates collapsing last-write-wins by column name.
    fn build_resource_table(&self, type_def: &TypeDefinition) -> PlannedTable {
        let name = type_def.name.as_str();
        let mut table = TableDefinition {
            name: name.to_string(),
            columns: vec![
                ColumnDefinition::new("id", "UUID").primary_key(),
                ColumnDefinition::new("content", "TEXT").not_null(),
                ColumnDefinition::new("lastUpdated", "TIMESTAMPTZ").not_null(),
                ColumnDefinition::new("compartments", "UUID[]"),
            ],
        };
        let mut indexes: Vec<IndexDefinition> = Vec::new();

        for field in self.search.fields_for(name) {
            if classify(field).is_some() {
                // Stored in a shared lookup table, no inline column.
                continue;
            }

            if RESERVED_COLUMNS.contains(&field.code.as_str()) {
                debug!(
                    base = name,
                    code = %field.code,
                    "search code collides with a system column, skipping"
                );
                continue;
            }

            let Some(spec) = plan_column(self.catalog, name, field, &self.config) else {
                continue;
            };

            let column = ColumnDefinition::new(spec.name.as_str(), spec.column_type.render());
            let index = if spec.column_type.array {
                IndexDefinition::gin(name, spec.name.as_str())
            } else {
                IndexDefinition::btree(name, spec.name.as_str())
            };

            match table.columns.iter_mut().find(|c| c.name == spec.name) {
                Some(existing) => {
                    *existing = column;
                    if let Some(existing_index) =
                        indexes.iter_mut().find(|i| i.columns == [spec.name.clone()])
                    {
                        *existing_index = index;
                    }
                }
                None => {
                    table.columns.push(column);
                    indexes.push(index);
                }
            }
        }

        if name == USER_IDENTITY_TYPE {
            match indexes
                .iter_mut()
                .find(|i| i.columns == [USER_IDENTITY_COLUMN.to_string()])
            {
                Some(index) => index.unique = true,
                None => {
                    indexes.push(IndexDefinition::btree(name, USER_IDENTITY_COLUMN).unique())
                }
            }
        }

        PlannedTable { table, indexes }
    }
}

/// A concrete, emittable resource type: not a nested sub-type, and declaring
/// the four canonical root fields.
fn is_concrete_resource(type_def: &TypeDefinition) -> bool {
    type_def.parent.is_none()
        && CANONICAL_ROOT_FIELDS
            .iter()
            .all(|field| type_def.property(field).is_some())
}

/// Companion history table; rows are opaque, no search columns.
fn build_history_table(resource_type: &str) -> PlannedTable {
    let name = format!("{}_History", resource_type);
    PlannedTable {
        table: TableDefinition {
            name: name.clone(),
            columns: vec![
                ColumnDefinition::new("versionId", "UUID").primary_key(),
                ColumnDefinition::new("id", "UUID").not_null(),
                ColumnDefinition::new("content", "TEXT").not_null(),
                ColumnDefinition::new("lastUpdated", "TIMESTAMPTZ").not_null(),
            ],
        },
        indexes: vec![
            IndexDefinition::btree(name.clone(), "id"),
            IndexDefinition::btree(name, "lastUpdated"),
        ],
    }
}

/// Shared lookup table for one composite kind, emitted once per run.
fn build_lookup_table(kind: LookupKind) -> PlannedTable {
    let name = kind.table_name();
    let mut columns = vec![
        ColumnDefinition::new("id", "UUID").primary_key(),
        ColumnDefinition::new("resourceId", "UUID").not_null(),
        ColumnDefinition::new("index", "INTEGER").not_null(),
        ColumnDefinition::new("content", "TEXT").not_null(),
    ];
    let mut indexes = Vec::new();

    for column in kind.value_columns() {
        columns.push(ColumnDefinition::new(*column, "TEXT"));
        indexes.push(IndexDefinition::btree(name, *column));
    }

    PlannedTable {
        table: TableDefinition {
            name: name.to_string(),
            columns,
        },
        indexes,
    }
}
