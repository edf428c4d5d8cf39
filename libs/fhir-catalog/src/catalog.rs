//! Type catalog indexing
//!
//! Turns a collection of declarative `TypeDescription`s into an immutable
//! in-memory catalog keyed by type name. The catalog is built once per
//! generation run and passed by reference into planning and emission.

use crate::error::{Error, Result};
use galena_defs::TypeDescription;
use heck::ToUpperCamelCase;
use std::collections::HashMap;

/// Suffix marking a choice-of-type element ("value[x]")
pub const CHOICE_SUFFIX: &str = "[x]";

/// Structural placeholder types that only play abstract base roles and are
/// never emitted as storage tables.
const ABSTRACT_ROOTS: [&str; 4] = [
    "Resource",
    "DomainResource",
    "BackboneElement",
    "MetadataResource",
];

/// Cardinality of a property (min..max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cardinality {
    /// Minimum occurrences
    pub min: u32,
    /// Maximum occurrences (None means unbounded/"*")
    pub max: Option<u32>,
}

impl Cardinality {
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Whether the property is repeating (max is unbounded or > 1)
    pub fn is_array(&self) -> bool {
        self.max.map(|m| m > 1).unwrap_or(true)
    }

    pub fn is_required(&self) -> bool {
        self.min > 0
    }
}

/// A property within an indexed type
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDefinition {
    /// Property name, last path component (a `[x]` placeholder is retained)
    pub name: String,
    /// Full dotted path as declared
    pub path: String,
    /// Cardinality
    pub cardinality: Cardinality,
    /// Declared type codes; more than one marks a choice-of-type property
    pub types: Vec<String>,
}

impl PropertyDefinition {
    /// Whether this property is a choice-of-type slot.
    pub fn is_choice(&self) -> bool {
        self.name.ends_with(CHOICE_SUFFIX)
    }

    /// Expanded property names, one per declared type code.
    ///
    /// The placeholder is replaced with the capitalized type code, so
    /// `value[x]` with codes `Quantity` and `dateTime` expands to
    /// `valueQuantity` and `valueDateTime`. Non-choice properties expand
    /// to their own name.
    pub fn expanded_names(&self) -> Vec<String> {
        if !self.is_choice() {
            return vec![self.name.clone()];
        }

        let stem = &self.name[..self.name.len() - CHOICE_SUFFIX.len()];
        self.types
            .iter()
            .map(|code| format!("{}{}", stem, code.to_upper_camel_case()))
            .collect()
    }

    /// Whether the given expanded name addresses this choice property
    /// (e.g., `valueDateTime` addresses `value[x]` declaring `dateTime`).
    fn matches_expanded(&self, property_name: &str) -> bool {
        if !self.is_choice() {
            return false;
        }

        let stem = &self.name[..self.name.len() - CHOICE_SUFFIX.len()];
        match property_name.strip_prefix(stem) {
            Some(suffix) if !suffix.is_empty() => self
                .types
                .iter()
                .any(|code| code.to_upper_camel_case() == suffix),
            _ => false,
        }
    }
}

/// An indexed type definition
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDefinition {
    /// Type name (unique key within the catalog)
    pub name: String,
    /// Parent type name, for nested/backbone sub-types
    pub parent: Option<String>,
    /// Properties in declaration order
    pub properties: Vec<PropertyDefinition>,
}

impl TypeDefinition {
    /// Look up a property by its declared name (exact match only).
    pub fn property(&self, name: &str) -> Option<&PropertyDefinition> {
        self.properties.iter().find(|p| p.name == name)
    }
}

/// Immutable catalog of indexed types, keyed by name
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: HashMap<String, TypeDefinition>,
}

impl TypeCatalog {
    /// Index a collection of type descriptions.
    ///
    /// Abstract structural roles and lowercase-named internal helper types
    /// are skipped. Later entries for the same type name overwrite earlier
    /// ones, so a base pass can be followed by an extension pass.
    ///
    /// Fails only on structural corruption of a description (an element
    /// without a path, or without any declared type).
    pub fn index(descriptions: &[TypeDescription]) -> Result<Self> {
        let mut types = HashMap::new();

        for description in descriptions {
            if let Some(type_def) = index_type(description)? {
                types.insert(type_def.name.clone(), type_def);
            }
        }

        Ok(Self { types })
    }

    /// Get a type by name
    pub fn get(&self, name: &str) -> Option<&TypeDefinition> {
        self.types.get(name)
    }

    /// Resolve a property on a type by name.
    ///
    /// Exact names are matched first; otherwise an expanded choice name
    /// (`valueDateTime`) is resolved against its placeholder (`value[x]`).
    pub fn resolve_property(
        &self,
        type_name: &str,
        property_name: &str,
    ) -> Option<&PropertyDefinition> {
        let type_def = self.types.get(type_name)?;
        type_def.property(property_name).or_else(|| {
            type_def
                .properties
                .iter()
                .find(|p| p.matches_expanded(property_name))
        })
    }

    /// Iterate over all indexed types
    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    /// Names of all indexed types, sorted for deterministic iteration
    pub fn type_names_sorted(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.types.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

/// Index a single description, or None when it is skipped.
fn index_type(description: &TypeDescription) -> Result<Option<TypeDefinition>> {
    let name = description.name.as_str();

    if ABSTRACT_ROOTS.contains(&name) {
        return Ok(None);
    }

    // Lowercase-named types are internal helpers (primitives), never emitted.
    if name.chars().next().is_some_and(|c| c.is_lowercase()) {
        return Ok(None);
    }

    if name.is_empty() {
        return Err(Error::InvalidTypeDescription {
            type_name: "<unnamed>".to_string(),
            reason: "missing type name".to_string(),
        });
    }

    let mut properties = Vec::with_capacity(description.elements.len());
    for element in &description.elements {
        if element.path.is_empty() {
            return Err(Error::InvalidTypeDescription {
                type_name: name.to_string(),
                reason: "element with empty path".to_string(),
            });
        }

        // The root element describes the type itself, not a property.
        if element.path == name {
            continue;
        }

        if element.types.is_empty() {
            return Err(Error::InvalidTypeDescription {
                type_name: name.to_string(),
                reason: format!("element '{}' declares no types", element.path),
            });
        }

        let cardinality = Cardinality::new(element.min, parse_max(&element.max));

        properties.push(PropertyDefinition {
            name: element.property_name().to_string(),
            path: element.path.clone(),
            cardinality,
            types: element.types.iter().map(|t| t.code.clone()).collect(),
        });
    }

    Ok(Some(TypeDefinition {
        name: name.to_string(),
        parent: description.base.clone(),
        properties,
    }))
}

/// Parse a max-cardinality string ("*" means unbounded).
fn parse_max(max: &str) -> Option<u32> {
    if max == "*" {
        None
    } else {
        // Unparseable max degrades to 1 rather than corrupting array-ness.
        Some(max.parse().unwrap_or(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use galena_defs::TypeDescription;
    use serde_json::{from_value, json};

    fn patient_description() -> TypeDescription {
        from_value(json!({
            "name": "Patient",
            "elements": [
                { "path": "Patient.id", "min": 0, "max": "1", "type": [{ "code": "id" }] },
                { "path": "Patient.active", "min": 0, "max": "1", "type": [{ "code": "boolean" }] },
                { "path": "Patient.name", "min": 0, "max": "*", "type": [{ "code": "HumanName" }] },
                {
                    "path": "Patient.deceased[x]",
                    "min": 0,
                    "max": "1",
                    "type": [{ "code": "boolean" }, { "code": "dateTime" }]
                }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn indexes_properties_in_order() {
        let catalog = TypeCatalog::index(&[patient_description()]).unwrap();
        let patient = catalog.get("Patient").unwrap();

        let names: Vec<&str> = patient.properties.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["id", "active", "name", "deceased[x]"]);
        assert!(patient.property("name").unwrap().cardinality.is_array());
        assert!(!patient.property("active").unwrap().cardinality.is_array());
    }

    #[test]
    fn skips_abstract_roots_and_primitives() {
        let descriptions: Vec<TypeDescription> = vec![
            from_value(json!({ "name": "Resource", "elements": [] })).unwrap(),
            from_value(json!({ "name": "DomainResource", "elements": [] })).unwrap(),
            from_value(json!({ "name": "string", "elements": [] })).unwrap(),
            patient_description(),
        ];

        let catalog = TypeCatalog::index(&descriptions).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("Patient").is_some());
    }

    #[test]
    fn last_write_wins_on_duplicate_names() {
        let base: TypeDescription = from_value(json!({
            "name": "Patient",
            "elements": [
                { "path": "Patient.id", "type": [{ "code": "id" }] }
            ]
        }))
        .unwrap();

        let catalog = TypeCatalog::index(&[base, patient_description()]).unwrap();
        assert_eq!(catalog.get("Patient").unwrap().properties.len(), 4);
    }

    #[test]
    fn resolves_expanded_choice_names() {
        let catalog = TypeCatalog::index(&[patient_description()]).unwrap();

        let resolved = catalog.resolve_property("Patient", "deceasedDateTime").unwrap();
        assert_eq!(resolved.name, "deceased[x]");

        assert!(catalog.resolve_property("Patient", "deceasedQuantity").is_none());
        assert!(catalog.resolve_property("Patient", "deceased").is_none());
    }

    #[test]
    fn expanded_names_capitalize_type_codes() {
        let catalog = TypeCatalog::index(&[patient_description()]).unwrap();
        let deceased = catalog.get("Patient").unwrap().property("deceased[x]").unwrap();

        assert_eq!(
            deceased.expanded_names(),
            vec!["deceasedBoolean".to_string(), "deceasedDateTime".to_string()]
        );
    }

    #[test]
    fn element_without_types_is_structural_error() {
        let broken: TypeDescription = from_value(json!({
            "name": "Patient",
            "elements": [{ "path": "Patient.active" }]
        }))
        .unwrap();

        let err = TypeCatalog::index(&[broken]).unwrap_err();
        assert!(err.to_string().contains("Patient.active"));
    }
}
