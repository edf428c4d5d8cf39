//! Resource bundle model
//!
//! A minimal container for collections of heterogeneous resource instances,
//! as returned by a search or compartment read. The care-date filter in
//! galena-chart operates on this type in place.

use super::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// A container for a collection of resources
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bundle {
    /// Resource type - always "Bundle"
    #[serde(default = "default_resource_type")]
    pub resource_type: String,

    /// Logical id of this artifact
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Purpose of the bundle (searchset, collection, ...)
    #[serde(rename = "type")]
    pub bundle_type: BundleType,

    /// If search, the total number of matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u32>,

    /// Entries, each carrying a resource instance
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<Vec<BundleEntry>>,

    /// Additional content beyond core fields
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

fn default_resource_type() -> String {
    "Bundle".to_string()
}

/// Purpose of a bundle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BundleType {
    Document,
    Message,
    Transaction,
    #[serde(rename = "transaction-response")]
    TransactionResponse,
    Batch,
    #[serde(rename = "batch-response")]
    BatchResponse,
    History,
    Searchset,
    Collection,
}

/// Entry in a bundle
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BundleEntry {
    /// Full URL for the entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_url: Option<String>,

    /// The resource carried by this entry
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,

    /// Additional content beyond core fields
    #[serde(flatten)]
    pub extensions: HashMap<String, Value>,
}

impl Bundle {
    /// Create an empty bundle of the given type
    pub fn new(bundle_type: BundleType) -> Self {
        Self {
            resource_type: default_resource_type(),
            id: None,
            bundle_type,
            total: None,
            entry: None,
            extensions: HashMap::new(),
        }
    }

    /// Parse from a JSON value
    pub fn from_value(value: &Value) -> Result<Self> {
        serde_json::from_value(value.clone()).map_err(Error::from)
    }

    /// Convert to a JSON value
    pub fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(Error::from)
    }

    /// Number of entries
    pub fn entry_count(&self) -> usize {
        self.entry.as_ref().map(|e| e.len()).unwrap_or(0)
    }

    /// Entries as a slice
    pub fn entries(&self) -> &[BundleEntry] {
        self.entry.as_deref().unwrap_or(&[])
    }

    /// Append an entry holding the given resource
    pub fn push_resource(&mut self, resource: Value) {
        self.entry.get_or_insert_with(Vec::new).push(BundleEntry {
            full_url: None,
            resource: Some(resource),
            extensions: HashMap::new(),
        });
    }
}
