//! In-memory catalogs for declarative definitions
//!
//! Two indexing passes run once at generation time:
//!
//! - [`TypeCatalog::index`] turns nested type descriptions into an immutable
//!   catalog keyed by type name, with choice-of-type expansion at lookup.
//! - [`SearchFieldIndex::index`] groups searchable-field descriptions by
//!   every base type they declare.
//!
//! Both results are owned values passed by reference into planning and
//! emission, so independent runs never share mutable state.

pub mod catalog;
pub mod error;
pub mod search;

pub use catalog::{Cardinality, PropertyDefinition, TypeCatalog, TypeDefinition, CHOICE_SUFFIX};
pub use error::{Error, Result};
pub use search::SearchFieldIndex;
