//! fieldkit validate - check a record against the form.

use anyhow::Result;
use comfy_table::{presets::UTF8_FULL, Table};
use fieldkit_config::FormSettings;
use fieldkit_fields::{FieldRegistry, FormData, FormSession, FormValidation};
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::output::render_serialized;

/// Apply `name=value` overrides as edits, then validate every visible field.
///
/// Each override goes through a [`FormSession`], so derivations and the
/// hidden-value policy apply just as they would for a user edit.
pub fn validate_record(
    registry: &FieldRegistry,
    settings: &FormSettings,
    data: FormData,
    overrides: Vec<(String, Value)>,
) -> Result<FormValidation> {
    let mut session = FormSession::with_data(registry, settings.clone(), data);
    for (name, value) in overrides {
        session.set_value(&name, value)?;
    }
    Ok(session.validate())
}

pub fn render_validation(result: &FormValidation, format: OutputFormat) -> Result<String> {
    if format != OutputFormat::Table {
        return render_serialized(result, format);
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Valid", "Errors"]);
    for field in result.fields.values() {
        table.add_row(vec![
            field.name.clone(),
            (if field.is_valid { "✓" } else { "✗" }).to_string(),
            field.errors.join("; "),
        ]);
    }

    let summary = if result.is_form_valid {
        "Form is valid".to_string()
    } else {
        format!("Form is invalid: {} field(s) failed", result.error_count())
    };
    Ok(format!("{table}\n{summary}"))
}
