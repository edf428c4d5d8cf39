//! Declarative type descriptions
//!
//! The raw, already-parsed form of the versioned type catalog: one
//! `TypeDescription` per named record kind, each listing its elements with
//! cardinality and declared type codes. These are indexed into a
//! `TypeCatalog` by galena-catalog; nothing here is validated beyond shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A single declarative type description
///
/// Describes a named record kind (resource, datatype, or nested backbone
/// element) together with its elements.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeDescription {
    /// Type name (e.g., "Patient", "Encounter_Participant")
    pub name: String,

    /// Parent type name, for nested/backbone sub-types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base: Option<String>,

    /// Human-readable description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Element descriptions, in declaration order
    #[serde(default)]
    pub elements: Vec<ElementDescription>,

    /// Additional content beyond core fields
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

/// A single element within a type description
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementDescription {
    /// Dotted path of the element (e.g., "Patient.name", "Observation.value[x]")
    pub path: String,

    /// Minimum cardinality
    #[serde(default)]
    pub min: u32,

    /// Maximum cardinality ("1", "2", ... or "*" for unbounded)
    #[serde(default = "default_max")]
    pub max: String,

    /// Declared type codes; more than one marks a choice-of-type element
    #[serde(default, rename = "type")]
    pub types: Vec<ElementType>,

    /// Additional content beyond core fields
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

fn default_max() -> String {
    "1".to_string()
}

/// A declared type for an element
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ElementType {
    /// Type code (e.g., "string", "dateTime", "CodeableConcept")
    pub code: String,
}

impl ElementDescription {
    /// Last component of the dotted path, i.e. the property name
    /// (including a trailing `[x]` placeholder when present).
    pub fn property_name(&self) -> &str {
        self.path.rsplit('.').next().unwrap_or(&self.path)
    }

    /// Whether this element declares more than one type code.
    pub fn is_choice(&self) -> bool {
        self.types.len() > 1
    }
}
