//! fieldkit fields - list the form schema.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use fieldkit_fields::{FieldDescriptor, FieldRegistry};

use crate::cli::OutputFormat;
use crate::output::render_serialized;

/// Render every field in declaration order.
pub fn render_fields(registry: &FieldRegistry, format: OutputFormat) -> Result<String> {
    if format != OutputFormat::Table {
        return render_serialized(&registry.list_fields(), format);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["#", "Name", "Type", "Label", "Behavior"]);

    for (idx, field) in registry.list_fields().iter().enumerate() {
        table.add_row(vec![
            (idx + 1).to_string(),
            field.name.clone(),
            field.type_.to_string(),
            field.label.clone().unwrap_or_default(),
            behavior_summary(field),
        ]);
    }

    Ok(table.to_string())
}

/// Short tags for the hooks a field carries.
fn behavior_summary(field: &FieldDescriptor) -> String {
    let mut tags = Vec::new();
    if field.rule().is_some() {
        tags.push("rule");
    }
    if field.is_conditional() {
        tags.push("conditional");
    }
    if field.refinement().is_some() {
        tags.push("refined");
    }
    if field.derivation().is_some() {
        tags.push("derives");
    }
    tags.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldkit_profile::profile_form;

    #[test]
    fn table_lists_every_field() {
        let out = render_fields(profile_form(), OutputFormat::Table).unwrap();
        for field in profile_form().list_fields() {
            assert!(out.contains(&field.name), "missing {}", field.name);
        }
        assert!(out.contains("conditional"));
        assert!(out.contains("derives"));
    }

    #[test]
    fn json_keeps_order_and_metadata() {
        let out = render_fields(profile_form(), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        let fields = value.as_array().unwrap();
        assert_eq!(fields.len(), 13);
        assert_eq!(fields[0]["name"], "username");
        assert_eq!(fields[0]["constraints"]["max_length"], 20);
        assert_eq!(fields[12]["type"], "multiselect");
    }

    #[test]
    fn yaml_output() {
        let out = render_fields(profile_form(), OutputFormat::Yaml).unwrap();
        assert!(out.contains("name: username"));
    }
}
