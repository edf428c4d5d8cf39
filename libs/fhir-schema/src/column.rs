//! Column type planning
//!
//! Decides, per (base type, search field) pair, the storage column a field
//! needs: its name (the field code, case-preserved), its kind, and whether
//! it is array-valued.

use crate::PlannerConfig;
use galena_catalog::TypeCatalog;
use galena_defs::{SearchFieldDescription, SearchFieldKind};
use tracing::{debug, warn};

/// Scalar storage kind of a search column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Boolean,
    Date,
    Number,
    Text,
}

impl ColumnKind {
    /// SQL spelling of the scalar kind
    pub fn sql(&self) -> &'static str {
        match self {
            ColumnKind::Boolean => "BOOLEAN",
            ColumnKind::Date => "DATE",
            ColumnKind::Number => "DOUBLE PRECISION",
            ColumnKind::Text => "TEXT",
        }
    }

    fn from_sql(s: &str) -> Option<Self> {
        match s {
            "BOOLEAN" => Some(ColumnKind::Boolean),
            "DATE" => Some(ColumnKind::Date),
            "DOUBLE PRECISION" => Some(ColumnKind::Number),
            "TEXT" => Some(ColumnKind::Text),
            _ => None,
        }
    }
}

/// Full storage type of a search column: scalar kind plus array-ness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnType {
    pub kind: ColumnKind,
    pub array: bool,
}

impl ColumnType {
    pub fn new(kind: ColumnKind, array: bool) -> Self {
        Self { kind, array }
    }

    /// Rendered SQL type ("DATE", "TEXT[]", ...)
    pub fn render(&self) -> String {
        if self.array {
            format!("{}[]", self.kind.sql())
        } else {
            self.kind.sql().to_string()
        }
    }

    /// Parse a rendered SQL type back into a column type.
    ///
    /// Returns None for types outside the search-column vocabulary
    /// (system columns such as UUID or TIMESTAMPTZ).
    pub fn parse(s: &str) -> Option<Self> {
        match s.strip_suffix("[]") {
            Some(base) => ColumnKind::from_sql(base).map(|kind| Self::new(kind, true)),
            None => ColumnKind::from_sql(s).map(|kind| Self::new(kind, false)),
        }
    }
}

/// A planned search column
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column name: the search field code, case-preserved
    pub name: String,
    pub column_type: ColumnType,
}

/// Plan the storage column for one search field on one base type.
///
/// Returns None (with a logged diagnostic) when the base type is absent
/// from the catalog or, under full-path cardinality, when the field path
/// does not resolve; generation continues without the field.
pub fn plan_column(
    catalog: &TypeCatalog,
    base: &str,
    field: &SearchFieldDescription,
    config: &PlannerConfig,
) -> Option<ColumnSpec> {
    if catalog.get(base).is_none() {
        warn!(
            base,
            code = %field.code,
            "search field references a base type absent from the catalog, skipping"
        );
        return None;
    }

    let kind = match field.kind {
        SearchFieldKind::Boolean => ColumnKind::Boolean,
        SearchFieldKind::Date => ColumnKind::Date,
        SearchFieldKind::Number | SearchFieldKind::Quantity => ColumnKind::Number,
        _ => ColumnKind::Text,
    };

    let array = match field.expression.as_deref() {
        Some(expression) if config.full_path_cardinality => {
            match walk_path_cardinality(catalog, base, expression) {
                Some(array) => array,
                None => {
                    warn!(
                        base,
                        code = %field.code,
                        expression,
                        "field path does not resolve, skipping"
                    );
                    return None;
                }
            }
        }
        _ => direct_property_cardinality(catalog, base, field),
    };

    Some(ColumnSpec {
        name: field.code.clone(),
        column_type: ColumnType::new(kind, array),
    })
}

/// Legacy array-ness resolution: the property whose name equals the column
/// name, looked up directly on the base type. Paths that traverse nested
/// types under-resolve to scalar here; `PlannerConfig::full_path_cardinality`
/// opts into the full walk.
fn direct_property_cardinality(
    catalog: &TypeCatalog,
    base: &str,
    field: &SearchFieldDescription,
) -> bool {
    match catalog.resolve_property(base, &field.code) {
        Some(property) => property.cardinality.is_array(),
        None => {
            debug!(
                base,
                code = %field.code,
                "no direct property for column, assuming scalar"
            );
            false
        }
    }
}

/// Walk the field-path expression through nested types; array iff any
/// traversed property is repeating. None when a component fails to resolve.
fn walk_path_cardinality(catalog: &TypeCatalog, base: &str, expression: &str) -> Option<bool> {
    // Union expressions are resolved against their first branch.
    let branch = expression.split('|').next()?.trim();
    let relative = branch
        .strip_prefix(base)
        .and_then(|rest| rest.strip_prefix('.'))
        .unwrap_or(branch);

    let mut current = base.to_string();
    let mut array = false;

    let components: Vec<&str> = relative.split('.').collect();
    for (i, component) in components.iter().enumerate() {
        let property = catalog.resolve_property(&current, component)?;
        array = array || property.cardinality.is_array();

        if i + 1 < components.len() {
            // Descend into the first declared type; primitive leaves cannot
            // be traversed further.
            let next = property.types.first()?;
            catalog.get(next)?;
            current = next.clone();
        }
    }

    Some(array)
}
