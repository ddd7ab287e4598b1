//! Input document loading.
//!
//! Documents are parsed with the format's own serde crate and turned into
//! an [`InputValue`] tree.

use anyhow::Context;
use clap::ValueEnum;
use populate_core::InputValue;
use std::io::Read;
use std::path::Path;

/// Supported input document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Json,
    Yaml,
    Toml,
}

impl InputFormat {
    /// Infer the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Parse document text in the given format.
pub fn parse_input(text: &str, format: InputFormat) -> anyhow::Result<InputValue> {
    let value = match format {
        InputFormat::Json => serde_json::from_str::<serde_json::Value>(text)
            .map(InputValue::from)
            .context("Invalid JSON input")?,
        InputFormat::Yaml => serde_yaml::from_str::<serde_yaml::Value>(text)
            .map(InputValue::from)
            .context("Invalid YAML input")?,
        InputFormat::Toml => toml::from_str::<toml::Value>(text)
            .map(InputValue::from)
            .context("Invalid TOML input")?,
    };
    Ok(value)
}

/// Read and parse a document from `path`, or from stdin when the path is
/// absent or `-`.
///
/// An explicit `format` wins; otherwise it is inferred from the extension,
/// falling back to JSON.
pub fn read_input(path: Option<&Path>, format: Option<InputFormat>) -> anyhow::Result<InputValue> {
    let path = path.filter(|p| p.as_os_str() != "-");

    let text = match path {
        Some(p) => std::fs::read_to_string(p)
            .with_context(|| format!("Failed to read input file: {}", p.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read input from stdin")?;
            buffer
        }
    };

    let format = format
        .or_else(|| path.and_then(InputFormat::from_path))
        .unwrap_or(InputFormat::Json);
    tracing::debug!("Parsing input as {:?}", format);

    parse_input(&text, format)
}
