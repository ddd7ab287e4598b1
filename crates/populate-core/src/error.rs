//! Error types for populate-core crate.

use thiserror::Error;

/// Errors that can occur while populating a message from an input value.
///
/// Every variant carries the data needed to locate the failure, so callers
/// can inspect it without parsing the rendered message.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PopulateError {
    /// The input names a key the message type does not declare (strict mode).
    #[error("'{key}' not described in the '{message_type}' message")]
    MissingKey { key: String, message_type: String },

    /// The input shape does not fit the field (e.g. a mapping for a string field).
    #[error("'{key}' is wrong type. Expected type {expected} but got value: {value}")]
    KeyType {
        key: String,
        expected: String,
        value: String,
    },

    /// The field rejected the value.
    #[error("Error setting '{key}' to {value}: {reason}")]
    Assignment {
        key: String,
        value: String,
        reason: String,
    },

    /// A message can only be populated from a mapping.
    #[error("Cannot populate '{message_type}' from non-mapping value: {value}")]
    NotAMapping { message_type: String, value: String },

    #[error("Message type not found in registry: {0}")]
    UnknownMessageType(String),

    /// The registry resolved a type that is not the field's declared type.
    #[error("Registered type '{registered}' does not match field '{key}' of type '{field_type}'")]
    RegistryMismatch {
        key: String,
        field_type: String,
        registered: String,
    },
}

impl PopulateError {
    /// The input key the error refers to, if any.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::MissingKey { key, .. }
            | Self::KeyType { key, .. }
            | Self::Assignment { key, .. }
            | Self::RegistryMismatch { key, .. } => Some(key),
            Self::NotAMapping { .. } | Self::UnknownMessageType(_) => None,
        }
    }
}

/// Result type alias for populate-core operations.
pub type Result<T> = std::result::Result<T, PopulateError>;
