//! Storage-schema planning and migration emission
//!
//! Derives the relational storage layout for an indexed type catalog and its
//! search fields, then emits the migration as a statement tree:
//!
//! 1. [`column::plan_column`] decides each search field's storage column.
//! 2. [`lookup::classify`] routes composite field kinds (address, contact
//!    point, identifier, person name) into shared side tables instead.
//! 3. [`SchemaGenerator::emit`] walks the catalog and produces the ordered
//!    statement sequence, diffing against a prior [`SchemaSnapshot`] to emit
//!    data-preserving column conversions between versions.
//!
//! Generation is a single-threaded, offline batch step. Non-fatal conditions
//! (unresolvable fields, unknown conversions) are logged through `tracing`
//! and skipped; nothing here aborts a run.

pub mod column;
pub mod convert;
pub mod emitter;
pub mod lookup;
pub mod snapshot;
pub mod statement;

pub use column::{ColumnKind, ColumnSpec, ColumnType};
pub use emitter::{Migration, SchemaGenerator};
pub use lookup::LookupKind;
pub use snapshot::SchemaSnapshot;
pub use statement::{ColumnDefinition, IndexDefinition, IndexMethod, Statement, TableDefinition};

/// Options for column planning
#[derive(Debug, Clone, Copy, Default)]
pub struct PlannerConfig {
    /// Resolve array-ness by walking the full field-path expression through
    /// nested types, instead of the legacy direct-property shortcut on the
    /// base type. Off by default; the shortcut under-detects array-ness for
    /// nested paths but matches the historically emitted schema.
    pub full_path_cardinality: bool,
}
