//! Column type conversions
//!
//! Fixed table of data-preserving conversion expressions for columns whose
//! storage kind changed between schema versions. Pairs absent from the
//! table yield None; the emitter logs the pair and leaves the column
//! untouched.

use crate::column::{ColumnKind, ColumnType};

/// Conversion expression (USING clause body) for an old → new column type
/// change, or None when no data-preserving conversion is known.
pub fn conversion_expression(old: ColumnType, new: ColumnType, column: &str) -> Option<String> {
    let quoted = format!("\"{}\"", column);

    match (old.kind, old.array, new.kind, new.array) {
        // Scalar to array of the same kind: wrap in a one-element array.
        (o, false, n, true) if o == n => Some(format!("ARRAY[{}]", quoted)),

        // Text to a primitive scalar: direct cast.
        (ColumnKind::Text, false, kind, false) if is_primitive(kind) => {
            Some(format!("{}::{}", quoted, kind.sql()))
        }

        // Text to a primitive array: wrap, then cast.
        (ColumnKind::Text, false, kind, true) if is_primitive(kind) => {
            Some(format!("ARRAY[{}]::{}[]", quoted, kind.sql()))
        }

        _ => None,
    }
}

fn is_primitive(kind: ColumnKind) -> bool {
    matches!(
        kind,
        ColumnKind::Boolean | ColumnKind::Date | ColumnKind::Number
    )
}
