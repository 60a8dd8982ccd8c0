//! fieldkit visible - evaluate visibility predicates for a record.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use fieldkit_fields::{FieldDescriptor, FieldRegistry, FormData};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::output::render_serialized;

/// Visible and hidden field names, each in declaration order.
#[derive(Debug, Serialize)]
pub struct VisibilityReport {
    pub visible: Vec<String>,
    pub hidden: Vec<String>,
}

impl VisibilityReport {
    pub fn new(registry: &FieldRegistry, data: &FormData) -> Self {
        Self {
            visible: names(registry.visible_fields(data)),
            hidden: names(registry.hidden_fields(data)),
        }
    }
}

fn names(fields: Vec<&FieldDescriptor>) -> Vec<String> {
    fields.into_iter().map(|f| f.name.clone()).collect()
}

pub fn render_visible(
    registry: &FieldRegistry,
    data: &FormData,
    format: OutputFormat,
) -> Result<String> {
    let report = VisibilityReport::new(registry, data);
    if format != OutputFormat::Table {
        return render_serialized(&report, format);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Name", "Type", "Visible"]);
    for field in registry.list_fields() {
        let visible = if report.visible.contains(&field.name) {
            "yes"
        } else {
            "no"
        };
        table.add_row(vec![field.name.as_str(), field.type_.as_str(), visible]);
    }
    Ok(table.to_string())
}
