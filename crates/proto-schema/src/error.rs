//! Error types for proto-schema crate.

use thiserror::Error;

/// Errors that can occur while loading protobuf schemas.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("Protobuf parse error: {0}")]
    Parse(String),

    #[error("Descriptor build error: {0}")]
    Descriptor(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for proto-schema operations.
pub type Result<T> = std::result::Result<T, SchemaError>;
