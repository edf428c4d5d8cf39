//! Error types for catalog indexing

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid type description '{type_name}': {reason}")]
    InvalidTypeDescription { type_name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
