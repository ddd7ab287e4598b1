//! dict-to-protobuf library
//!
//! Converts untyped JSON, YAML and TOML documents into protobuf messages
//! described by `.proto` files, without generated code.
//!
//! # Crates
//!
//! - `populate_core` - the recursive conversion of an untyped value tree into a message
//! - `proto_schema` - loading `.proto` sources into runtime descriptors
//!
//! # CLI Usage
//!
//! ```bash
//! # Convert a JSON document, printing protobuf text format
//! dict-to-protobuf convert --proto schemas/example.proto --message example.Example \
//!   --input example.json
//!
//! # Reject keys the schema does not describe, write binary wire format
//! dict-to-protobuf convert --proto schemas/example.proto --message example.Example \
//!   --input example.yaml --strict --output-format binary --output example.bin
//!
//! # List the message types a schema defines
//! dict-to-protobuf list-messages --proto schemas/example.proto
//! ```

use anyhow::Context;
use clap::Parser;
use populate_core::{convert_new, SchemaRegistry};
use proto_schema::ProtoSchema;
use protobuf::MessageDyn;
use std::path::PathBuf;

pub mod input;
pub mod output;

pub use input::{parse_input, read_input, InputFormat};
pub use output::{render, write_output, OutputFormat};

#[derive(Parser, Clone, Debug)]
pub struct SchemaOpts {
    /// .proto files describing the target message types
    #[arg(long = "proto", value_name = "FILE", required = true, env = "DICT2PB_PROTO", value_delimiter = ',')]
    pub protos: Vec<PathBuf>,

    /// Extra directories searched for imports
    #[arg(long = "include", value_name = "DIR", env = "DICT2PB_INCLUDE", value_delimiter = ',')]
    pub includes: Vec<PathBuf>,
}

impl SchemaOpts {
    /// Parse the schema files and build a registry over every message.
    pub fn load(&self) -> anyhow::Result<(ProtoSchema, SchemaRegistry)> {
        let schema = ProtoSchema::from_files(&self.protos, &self.includes)
            .context("Failed to load protobuf schema")?;
        let registry = SchemaRegistry::from_files(schema.files());
        tracing::debug!(
            "Registered {} message types from {} files",
            registry.len(),
            schema.files().len()
        );
        Ok((schema, registry))
    }
}

#[derive(Parser, Clone, Debug)]
pub struct ConvertOpts {
    #[command(flatten)]
    pub schema: SchemaOpts,

    /// Fully qualified name of the message to build (e.g. "example.Example")
    #[arg(long, env = "DICT2PB_MESSAGE")]
    pub message: String,

    /// Input document; stdin when omitted or "-"
    #[arg(long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Input format; inferred from the file extension when omitted
    #[arg(long, value_enum)]
    pub format: Option<InputFormat>,

    /// Fail on keys that the schema does not describe
    #[arg(long, env = "DICT2PB_STRICT")]
    pub strict: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output_format: OutputFormat,

    /// Output file; stdout when omitted
    #[arg(long, value_name = "FILE")]
    pub output: Option<PathBuf>,
}

/// Load the schema and the input document and build the requested message.
pub fn convert_document(opts: &ConvertOpts) -> anyhow::Result<Box<dyn MessageDyn>> {
    let (_schema, registry) = opts.schema.load()?;
    let data = read_input(opts.input.as_deref(), opts.format)?;

    tracing::info!(
        "Converting input into {} (strict: {})",
        opts.message,
        opts.strict
    );
    let message = convert_new(&registry, &opts.message, &data, opts.strict)
        .with_context(|| format!("Failed to convert input into {}", opts.message))?;
    Ok(message)
}

/// Run a full conversion: load, convert, render and write.
pub fn run_convert(opts: &ConvertOpts) -> anyhow::Result<()> {
    let message = convert_document(opts)?;
    let bytes = render(&*message, opts.output_format)?;
    write_output(&bytes, opts.output.as_deref())?;
    tracing::info!("Conversion completed successfully");
    Ok(())
}

/// Names of every message type defined by the schema, sorted.
pub fn list_messages(opts: &SchemaOpts) -> anyhow::Result<Vec<String>> {
    let (schema, _registry) = opts.load()?;
    Ok(schema.list_messages())
}
