//! Reading records and values from the command line.

use std::io::{self, Read};
use std::path::Path;

use anyhow::{bail, Context, Result};
use fieldkit_fields::FormData;
use serde_json::Value;

/// Read a JSON record from a file, or from stdin when `source` is `-`.
pub fn read_form_data(source: &str) -> Result<FormData> {
    let raw = if source == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(Path::new(source))
            .with_context(|| format!("failed to read record from {source}"))?
    };
    parse_form_data(&raw)
}

/// Parse a JSON record. Empty input is an empty record.
pub fn parse_form_data(raw: &str) -> Result<FormData> {
    let raw = raw.trim();
    if raw.is_empty() {
        tracing::warn!("empty record input");
        return Ok(FormData::new());
    }
    // Deserialize straight into the record so keys keep their input order.
    serde_json::from_str(raw).context("record is not a valid JSON object")
}

/// Parse a command-line value: JSON when it parses, otherwise a plain string.
pub fn parse_value(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Split a `name=value` override.
pub fn parse_assignment(raw: &str) -> Result<(String, Value)> {
    let Some((name, value)) = raw.split_once('=') else {
        bail!("expected NAME=VALUE, got '{raw}'");
    };
    let name = name.trim();
    if name.is_empty() {
        bail!("missing field name in '{raw}'");
    }
    Ok((name.to_string(), parse_value(value)))
}
