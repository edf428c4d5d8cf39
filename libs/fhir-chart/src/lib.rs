//! Care-date resolution
//!
//! Extracts one canonical date per resource instance, via a fixed
//! per-resource-type field-path table, and range-filters bundles of
//! heterogeneous resources on it.
//!
//! Resolution is pure and synchronous: the only shared state is the static
//! path table, so concurrent calls are safe. [`filter_by_care_date`] mutates
//! a single caller-owned bundle; callers sharing a bundle across threads
//! need their own synchronization.

pub mod filter;
pub mod paths;
pub mod resolve;

pub use filter::filter_by_care_date;
pub use paths::care_date_path;
pub use resolve::{care_date, resolve_path};
