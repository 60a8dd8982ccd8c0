//! Serialized output shared by the commands.

use anyhow::Result;
use serde::Serialize;

use crate::cli::OutputFormat;

/// Render `value` as pretty JSON or YAML.
///
/// `Table` falls back to JSON; commands draw their own tables.
pub fn render_serialized<T: Serialize>(value: &T, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Yaml => Ok(serde_yaml_ng::to_string(value)?),
        OutputFormat::Json | OutputFormat::Table => Ok(serde_json::to_string_pretty(value)?),
    }
}
