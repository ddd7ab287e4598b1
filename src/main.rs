//! Command-line interface for dict-to-protobuf
//!
//! # Usage Examples
//!
//! ## Convert
//! ```bash
//! # JSON document to protobuf text format on stdout
//! dict-to-protobuf convert \
//!   --proto schemas/example.proto \
//!   --message example.Example \
//!   --input example.json
//!
//! # YAML from stdin, strict key checking, binary output
//! cat example.yaml | dict-to-protobuf convert \
//!   --proto schemas/example.proto --include schemas/common \
//!   --message example.Example --format yaml --strict \
//!   --output-format binary --output example.bin
//! ```
//!
//! ## Inspect
//! ```bash
//! dict-to-protobuf list-messages --proto schemas/example.proto
//! ```
//!
//! Logging is controlled with `RUST_LOG` (e.g. `RUST_LOG=debug` reports keys
//! dropped by non-strict conversions).

use clap::{Parser, Subcommand};
use dict_to_protobuf::{list_messages, run_convert, ConvertOpts, SchemaOpts};

#[derive(Parser)]
#[command(name = "dict-to-protobuf")]
#[command(about = "Convert untyped JSON, YAML and TOML documents into protobuf messages")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a message from an input document
    Convert(ConvertOpts),

    /// List the message types defined by the given .proto files
    ListMessages(SchemaOpts),
}

fn main() -> anyhow::Result<()> {
    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Convert(opts) => run_convert(&opts)?,
        Commands::ListMessages(opts) => {
            for name in list_messages(&opts)? {
                println!("{name}");
            }
        }
    }

    Ok(())
}
