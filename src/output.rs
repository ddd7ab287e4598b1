//! Rendering of populated messages.

use anyhow::Context;
use clap::ValueEnum;
use protobuf::MessageDyn;
use std::io::Write;
use std::path::Path;

/// How a populated message is written out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Protobuf text format
    #[default]
    Text,
    /// Protobuf binary wire format
    Binary,
}

/// Render a message in the given format.
pub fn render(message: &dyn MessageDyn, format: OutputFormat) -> anyhow::Result<Vec<u8>> {
    match format {
        OutputFormat::Text => {
            Ok(protobuf::text_format::print_to_string_pretty(message).into_bytes())
        }
        OutputFormat::Binary => message
            .write_to_bytes_dyn()
            .context("Failed to encode message"),
    }
}

/// Write rendered bytes to `path`, or to stdout when no path is given.
pub fn write_output(bytes: &[u8], path: Option<&Path>) -> anyhow::Result<()> {
    match path {
        Some(p) => std::fs::write(p, bytes)
            .with_context(|| format!("Failed to write output file: {}", p.display())),
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes).context("Failed to write to stdout")?;
            stdout.flush().context("Failed to flush stdout")
        }
    }
}
