//! Schema statement tree
//!
//! Migration output is built as a small statement IR and rendered to
//! Postgres-flavored DDL by one printer, so planning stays free of
//! formatting concerns and emission can be tested structurally.

use std::fmt::Write;

/// A column within a table definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: String,
    /// Rendered SQL type ("UUID", "TEXT[]", ...)
    pub sql_type: String,
    pub primary_key: bool,
    pub not_null: bool,
}

impl ColumnDefinition {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            primary_key: false,
            not_null: false,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.not_null = true;
        self
    }
}

/// A table definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableDefinition {
    pub name: String,
    pub columns: Vec<ColumnDefinition>,
}

/// Index access method
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexMethod {
    BTree,
    Gin,
}

/// An index definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDefinition {
    pub table: String,
    pub columns: Vec<String>,
    pub method: IndexMethod,
    pub unique: bool,
}

impl IndexDefinition {
    pub fn btree(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: vec![column.into()],
            method: IndexMethod::BTree,
            unique: false,
        }
    }

    pub fn gin(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: vec![column.into()],
            method: IndexMethod::Gin,
            unique: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Derived index name: table and columns joined with underscores
    pub fn name(&self) -> String {
        format!("{}_{}_idx", self.table, self.columns.join("_"))
    }
}

/// A single schema-definition statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    CreateTable(TableDefinition),
    CreateIndex(IndexDefinition),
    AddColumn {
        table: String,
        column: ColumnDefinition,
    },
    AlterColumnType {
        table: String,
        column: String,
        sql_type: String,
        /// Data-preserving conversion expression, rendered as a USING clause
        using: Option<String>,
    },
}

impl Statement {
    /// Render this statement as DDL text (no trailing semicolon).
    pub fn render(&self) -> String {
        match self {
            Statement::CreateTable(table) => render_create_table(table),
            Statement::CreateIndex(index) => render_create_index(index),
            Statement::AddColumn { table, column } => format!(
                "ALTER TABLE IF EXISTS {} ADD COLUMN IF NOT EXISTS {}",
                quote(table),
                render_column(column)
            ),
            Statement::AlterColumnType {
                table,
                column,
                sql_type,
                using,
            } => {
                let mut out = format!(
                    "ALTER TABLE IF EXISTS {} ALTER COLUMN {} TYPE {}",
                    quote(table),
                    quote(column),
                    sql_type
                );
                if let Some(expression) = using {
                    out.push_str(" USING ");
                    out.push_str(expression);
                }
                out
            }
        }
    }
}

/// Render a statement sequence as a migration script.
pub fn render_script(statements: &[Statement]) -> String {
    let mut out = String::new();
    for statement in statements {
        out.push_str(&statement.render());
        out.push_str(";\n");
    }
    out
}

fn render_create_table(table: &TableDefinition) -> String {
    let mut out = format!("CREATE TABLE IF NOT EXISTS {} (\n", quote(&table.name));
    for (i, column) in table.columns.iter().enumerate() {
        if i > 0 {
            out.push_str(",\n");
        }
        let _ = write!(out, "  {}", render_column(column));
    }
    out.push_str("\n)");
    out
}

fn render_column(column: &ColumnDefinition) -> String {
    let mut out = format!("{} {}", quote(&column.name), column.sql_type);
    if column.primary_key {
        out.push_str(" PRIMARY KEY");
    }
    if column.not_null && !column.primary_key {
        out.push_str(" NOT NULL");
    }
    out
}

fn render_create_index(index: &IndexDefinition) -> String {
    let mut out = String::from("CREATE ");
    if index.unique {
        out.push_str("UNIQUE ");
    }
    let _ = write!(
        out,
        "INDEX IF NOT EXISTS {} ON {}",
        quote(&index.name()),
        quote(&index.table)
    );
    if index.method == IndexMethod::Gin {
        out.push_str(" USING GIN");
    }
    let columns: Vec<String> = index.columns.iter().map(|c| quote(c)).collect();
    let _ = write!(out, " ({})", columns.join(", "));
    out
}

/// Quote a mixed-case identifier
fn quote(identifier: &str) -> String {
    format!("\"{}\"", identifier)
}
