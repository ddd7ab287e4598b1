//! Runtime protobuf schema loading.
//!
//! This crate turns `.proto` sources into runtime [`FileDescriptor`]s using the
//! pure-Rust parser from `protobuf-parse`. The resulting descriptors back
//! dynamic messages, so data can be converted into message types for which no
//! code was generated.
//!
//! # Example
//!
//! ```ignore
//! use proto_schema::ProtoSchema;
//!
//! let schema = ProtoSchema::from_file("schemas/example.proto")?;
//! let example = schema.message("example.Example").unwrap();
//! let instance = example.new_instance();
//! ```
//!
//! [`FileDescriptor`]: protobuf::reflect::FileDescriptor

pub mod error;
pub mod parser;

pub use error::{Result, SchemaError};
pub use parser::ProtoSchema;
