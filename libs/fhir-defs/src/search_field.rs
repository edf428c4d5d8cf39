//! Declarative searchable-field descriptions
//!
//! One `SearchFieldDescription` per independently queryable property. Fields
//! bind a code to one or more base types plus a field-path expression; the
//! storage representation is decided later by galena-schema.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A declarative searchable-field description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchFieldDescription {
    /// Field identity (e.g., "individual-name", "clinical-date")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Query code, case-preserved (e.g., "birthdate", "address-city")
    pub code: String,

    /// Classification of the field's value space
    #[serde(rename = "type")]
    pub kind: SearchFieldKind,

    /// Base type names this field applies to
    #[serde(default)]
    pub base: Vec<String>,

    /// Field-path expression relative to the base type's root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,

    /// Additional content beyond core fields
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// Classification of a searchable field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchFieldKind {
    String,
    Boolean,
    Date,
    Number,
    Quantity,
    Reference,
    Token,
    Uri,
    Composite,
    Special,
}

impl SearchFieldDescription {
    /// Field identity used by classification rules: the declared id when
    /// present, otherwise the code itself.
    pub fn identity(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.code)
    }
}
