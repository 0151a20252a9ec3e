//! Document loading and writing

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::cli::DocumentFormat;

/// Pick the document format from a file extension, defaulting to JSON
pub fn detect_format(path: &Path) -> DocumentFormat {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("yaml" | "yml") => DocumentFormat::Yaml,
        _ => DocumentFormat::Json,
    }
}

/// Read a JSON or YAML document
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    match detect_format(path) {
        DocumentFormat::Yaml => serde_yaml_ng::from_str(&text)
            .with_context(|| format!("Failed to parse YAML in {}", path.display())),
        DocumentFormat::Json => serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse JSON in {}", path.display())),
    }
}

/// Serialize a value in the requested format
pub fn to_document<T: Serialize>(value: &T, format: DocumentFormat) -> Result<String> {
    match format {
        DocumentFormat::Yaml => {
            serde_yaml_ng::to_string(value).context("Failed to serialize YAML")
        }
        DocumentFormat::Json => {
            serde_json::to_string_pretty(value).context("Failed to serialize JSON")
        }
    }
}

/// Write a value to `path`, choosing the format from its extension
pub fn write_document<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let text = to_document(value, detect_format(path))?;
    fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}
