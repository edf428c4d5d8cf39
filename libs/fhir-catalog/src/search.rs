//! Search-field grouping
//!
//! Groups searchable-field descriptions by every base type they declare.
//! This pass is read-only over its input and performs no validation against
//! the type catalog; cross-referencing happens during column planning.

use galena_defs::SearchFieldDescription;
use std::collections::HashMap;

/// Search-field descriptions grouped by base type name
#[derive(Debug, Clone, Default)]
pub struct SearchFieldIndex {
    by_base: HashMap<String, Vec<SearchFieldDescription>>,
}

impl SearchFieldIndex {
    /// Group a collection of search-field descriptions by base type.
    ///
    /// A field with no declared base types is excluded. Duplicates are kept
    /// as-is; the emitter collapses duplicate column definitions by name,
    /// last write wins.
    pub fn index(fields: &[SearchFieldDescription]) -> Self {
        let mut by_base: HashMap<String, Vec<SearchFieldDescription>> = HashMap::new();

        for field in fields {
            for base in &field.base {
                by_base.entry(base.clone()).or_default().push(field.clone());
            }
        }

        Self { by_base }
    }

    /// Fields declared for the given base type, in declaration order
    pub fn fields_for(&self, base: &str) -> &[SearchFieldDescription] {
        self.by_base.get(base).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Base type names present in the index
    pub fn base_types(&self) -> impl Iterator<Item = &str> {
        self.by_base.keys().map(String::as_str)
    }
}
