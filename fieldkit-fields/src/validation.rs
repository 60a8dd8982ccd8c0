//! Validation engine: runs rules and refinements over visible fields.
//!
//! Hidden fields are skipped entirely. A field with neither a rule nor a
//! refinement always passes. Failures come back as data, never as `Err`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use fieldkit_config::FormSettings;
use indexmap::IndexMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::Result;
use crate::form_data::FormData;
use crate::registry::FieldRegistry;
use crate::rule::RuleError;
use crate::types::FieldDescriptor;

/// Outcome for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldValidation {
    pub name: String,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl FieldValidation {
    pub fn valid(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_valid: true,
            errors: Vec::new(),
        }
    }

    pub fn from_errors(name: impl Into<String>, errors: Vec<String>) -> Self {
        Self {
            name: name.into(),
            is_valid: errors.is_empty(),
            errors,
        }
    }

    /// First error message, the one a renderer shows under the input.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Outcome for a whole form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormValidation {
    /// Visible fields, in declaration order.
    pub fields: IndexMap<String, FieldValidation>,
    /// Names skipped because their predicate was false.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub hidden: Vec<String>,
    pub is_form_valid: bool,
}

impl FormValidation {
    /// Failing fields, in declaration order.
    pub fn errors(&self) -> impl Iterator<Item = &FieldValidation> {
        self.fields.values().filter(|f| !f.is_valid)
    }

    pub fn field(&self, name: &str) -> Option<&FieldValidation> {
        self.fields.get(name)
    }

    pub fn error_count(&self) -> usize {
        self.errors().count()
    }
}

/// Evaluates field rules and cross-field refinements against a record.
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    settings: FormSettings,
}

impl ValidationEngine {
    pub fn new(settings: FormSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    /// Validate every visible field. The form is valid iff all of them pass.
    pub fn validate(&self, registry: &FieldRegistry, data: &FormData) -> FormValidation {
        let mut fields = IndexMap::new();
        let mut hidden = Vec::new();

        for field in registry.list_fields() {
            if !field.is_visible(data) {
                hidden.push(field.name.clone());
                continue;
            }
            fields.insert(field.name.clone(), self.check_field(field, data));
        }

        let is_form_valid = fields.values().all(|f| f.is_valid);
        debug!(
            visible = fields.len(),
            hidden = hidden.len(),
            is_form_valid,
            "form validated"
        );

        FormValidation {
            fields,
            hidden,
            is_form_valid,
        }
    }

    /// Validate a single field by name. Hidden fields pass.
    pub fn validate_field(
        &self,
        registry: &FieldRegistry,
        name: &str,
        data: &FormData,
    ) -> Result<FieldValidation> {
        let field = registry.get_field(name)?;
        if !field.is_visible(data) {
            return Ok(FieldValidation::valid(name));
        }
        Ok(self.check_field(field, data))
    }

    fn check_field(&self, field: &FieldDescriptor, data: &FormData) -> FieldValidation {
        let mut errors = Vec::new();

        if let Some(rule) = field.rule() {
            let value = data.get(&field.name);
            let outcome = catch_unwind(AssertUnwindSafe(|| rule.validate(value)))
                .unwrap_or_else(|_| Err(RuleError::unexpected("rule panicked")));

            match outcome {
                Ok(()) => {}
                Err(RuleError::Invalid { messages }) => errors.extend(messages),
                Err(RuleError::Unexpected { reason }) => {
                    warn!(field = %field.name, %reason, "rule failed unexpectedly");
                    errors.push(self.settings.unexpected_error_message.clone());
                }
            }
        }

        if let Some(refinement) = field.refinement() {
            let passed = catch_unwind(AssertUnwindSafe(|| refinement.check(data)))
                .unwrap_or_else(|_| {
                    warn!(field = %field.name, "refinement panicked");
                    false
                });
            if !passed {
                errors.push(
                    refinement
                        .message()
                        .unwrap_or(&self.settings.refinement_message)
                        .to_string(),
                );
            }
        }

        FieldValidation::from_errors(field.name.clone(), errors)
    }
}
