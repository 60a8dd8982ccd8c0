//! Core field types for the schema registry.
//!
//! A [`FieldDescriptor`] is plain metadata (type, name, display strings,
//! choices, advisory constraints) plus up to four behavior hooks: a rule,
//! a visibility predicate, a cross-field refinement and an on-change
//! derivation. Metadata serializes via serde; hooks are skipped.

use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::derivation::ChangeScope;
use crate::error::Result;
use crate::form_data::FormData;
use crate::rule::Validator;

/// Predicate over the whole form record deciding whether a field is shown.
pub type VisibilityFn = dyn Fn(&FormData) -> bool + Send + Sync;

/// Predicate over the whole form record validating one field against others.
pub type RefinementFn = dyn Fn(&FormData) -> bool + Send + Sync;

/// Hook fired when a field's value changes; may stage writes to other fields.
pub type DerivationFn = dyn Fn(&Value, &mut ChangeScope<'_>) -> Result<()> + Send + Sync;

/// The kind of input. Selects the widget and the default value shape.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum FieldType {
    Text,
    Email,
    Password,
    Textarea,
    Select,
    Multiselect,
    Checkbox,
    Radio,
    Number,
    Date,
}

impl FieldType {
    /// Widget selection key
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Email => "email",
            FieldType::Password => "password",
            FieldType::Textarea => "textarea",
            FieldType::Select => "select",
            FieldType::Multiselect => "multiselect",
            FieldType::Checkbox => "checkbox",
            FieldType::Radio => "radio",
            FieldType::Number => "number",
            FieldType::Date => "date",
        }
    }

    /// Whether a descriptor of this type must carry options.
    pub fn requires_options(&self) -> bool {
        matches!(self, FieldType::Select | FieldType::Multiselect)
    }

    /// Value a fresh form starts with when the descriptor has no default.
    pub fn empty_value(&self) -> Value {
        match self {
            FieldType::Text
            | FieldType::Email
            | FieldType::Password
            | FieldType::Textarea
            | FieldType::Select
            | FieldType::Radio => Value::String(String::new()),
            FieldType::Multiselect => Value::Array(Vec::new()),
            FieldType::Checkbox => Value::Bool(false),
            FieldType::Number | FieldType::Date => Value::Null,
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One choice in a select, multiselect or radio field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOption {
    pub value: String,
    pub text: String,
}

impl SelectOption {
    pub fn new(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            text: text.into(),
        }
    }
}

/// Renderer hints. Not enforced; rules do the enforcing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Constraints {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        self.min_length.is_none() && self.max_length.is_none() && self.rows.is_none()
    }
}

/// Cross-field check attached to one field.
#[derive(Clone)]
pub struct Refinement {
    check: Arc<RefinementFn>,
    message: Option<String>,
}

impl Refinement {
    pub fn new(check: impl Fn(&FormData) -> bool + Send + Sync + 'static) -> Self {
        Self {
            check: Arc::new(check),
            message: None,
        }
    }

    /// Message reported on failure instead of the configured fallback.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn check(&self, data: &FormData) -> bool {
        (self.check)(data)
    }
}

/// The complete schema for a single form input.
#[derive(Clone, Serialize)]
pub struct FieldDescriptor {
    #[serde(rename = "type")]
    pub type_: FieldType,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(skip_serializing_if = "Constraints::is_empty")]
    pub constraints: Constraints,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(skip)]
    rule: Option<Arc<dyn Validator>>,
    #[serde(skip)]
    visibility: Option<Arc<VisibilityFn>>,
    #[serde(skip)]
    refinement: Option<Refinement>,
    #[serde(skip)]
    derivation: Option<Arc<DerivationFn>>,
}

impl FieldDescriptor {
    pub fn new(type_: FieldType, name: impl Into<String>) -> Self {
        Self {
            type_,
            name: name.into(),
            label: None,
            placeholder: None,
            options: Vec::new(),
            constraints: Constraints::default(),
            default_value: None,
            rule: None,
            visibility: None,
            refinement: None,
            derivation: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Append one choice.
    pub fn with_option(mut self, value: impl Into<String>, text: impl Into<String>) -> Self {
        self.options.push(SelectOption::new(value, text));
        self
    }

    pub fn with_options(mut self, options: Vec<SelectOption>) -> Self {
        self.options = options;
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.constraints.min_length = Some(min_length);
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.constraints.max_length = Some(max_length);
        self
    }

    pub fn with_rows(mut self, rows: u32) -> Self {
        self.constraints.rows = Some(rows);
        self
    }

    pub fn with_default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Bind a validator to this field's value.
    pub fn with_rule(mut self, rule: impl Validator + 'static) -> Self {
        self.rule = Some(Arc::new(rule));
        self
    }

    /// Show (and validate) the field only while `predicate` holds.
    pub fn when(mut self, predicate: impl Fn(&FormData) -> bool + Send + Sync + 'static) -> Self {
        self.visibility = Some(Arc::new(predicate));
        self
    }

    /// Validate this field against the whole record.
    pub fn refine(mut self, check: impl Fn(&FormData) -> bool + Send + Sync + 'static) -> Self {
        self.refinement = Some(Refinement::new(check));
        self
    }

    pub fn with_refinement(mut self, refinement: Refinement) -> Self {
        self.refinement = Some(refinement);
        self
    }

    /// Derive other fields when this one changes.
    pub fn on_change(
        mut self,
        hook: impl Fn(&Value, &mut ChangeScope<'_>) -> Result<()> + Send + Sync + 'static,
    ) -> Self {
        self.derivation = Some(Arc::new(hook));
        self
    }

    pub fn rule(&self) -> Option<&dyn Validator> {
        self.rule.as_deref()
    }

    pub fn refinement(&self) -> Option<&Refinement> {
        self.refinement.as_ref()
    }

    pub fn derivation(&self) -> Option<&DerivationFn> {
        self.derivation.as_deref()
    }

    pub fn is_conditional(&self) -> bool {
        self.visibility.is_some()
    }

    /// Fields without a predicate are always visible.
    ///
    /// A predicate that panics counts as visible, so the field is still
    /// validated.
    pub fn is_visible(&self, data: &FormData) -> bool {
        self.visibility.as_ref().is_none_or(|predicate| {
            catch_unwind(AssertUnwindSafe(|| predicate(data))).unwrap_or_else(|_| {
                warn!(field = %self.name, "visibility predicate panicked");
                true
            })
        })
    }

    /// Value a fresh record holds for this field.
    pub fn initial_value(&self) -> Value {
        self.default_value
            .clone()
            .unwrap_or_else(|| self.type_.empty_value())
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("type", &self.type_)
            .field("name", &self.name)
            .field("label", &self.label)
            .field("placeholder", &self.placeholder)
            .field("options", &self.options)
            .field("constraints", &self.constraints)
            .field("default_value", &self.default_value)
            .field("has_rule", &self.rule.is_some())
            .field("conditional", &self.visibility.is_some())
            .field("has_refinement", &self.refinement.is_some())
            .field("has_derivation", &self.derivation.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::Rule;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(FieldType::Text, "text", json!(""))]
    #[case(FieldType::Email, "email", json!(""))]
    #[case(FieldType::Password, "password", json!(""))]
    #[case(FieldType::Textarea, "textarea", json!(""))]
    #[case(FieldType::Select, "select", json!(""))]
    #[case(FieldType::Multiselect, "multiselect", json!([]))]
    #[case(FieldType::Checkbox, "checkbox", json!(false))]
    #[case(FieldType::Radio, "radio", json!(""))]
    #[case(FieldType::Number, "number", json!(null))]
    #[case(FieldType::Date, "date", json!(null))]
    fn field_type_key_and_empty_value(
        #[case] field_type: FieldType,
        #[case] key: &str,
        #[case] empty: Value,
    ) {
        assert_eq!(field_type.as_str(), key);
        assert_eq!(field_type.to_string(), key);
        assert_eq!(field_type.empty_value(), empty);
        let serialized = serde_json::to_value(field_type).unwrap();
        assert_eq!(serialized, json!(key));
    }

    #[test]
    fn only_select_kinds_require_options() {
        assert!(FieldType::Select.requires_options());
        assert!(FieldType::Multiselect.requires_options());
        assert!(!FieldType::Radio.requires_options());
        assert!(!FieldType::Text.requires_options());
    }

    #[test]
    fn descriptor_serializes_metadata_and_skips_hooks() {
        let field = FieldDescriptor::new(FieldType::Password, "password")
            .with_label("Password")
            .with_min_length(6)
            .with_rule(Rule::string().min(6, "too short"))
            .on_change(|_, _| Ok(()));

        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "password",
                "name": "password",
                "label": "Password",
                "constraints": { "min_length": 6 }
            })
        );
    }

    #[test]
    fn descriptor_serializes_options_in_order() {
        let field = FieldDescriptor::new(FieldType::Select, "gender")
            .with_option("male", "Male")
            .with_option("female", "Female");
        let value = serde_json::to_value(&field).unwrap();
        assert_eq!(
            value["options"],
            json!([
                { "value": "male", "text": "Male" },
                { "value": "female", "text": "Female" }
            ])
        );
    }

    #[test]
    fn visibility_defaults_to_true() {
        let data = FormData::new();
        let plain = FieldDescriptor::new(FieldType::Text, "a");
        assert!(!plain.is_conditional());
        assert!(plain.is_visible(&data));

        let conditional = FieldDescriptor::new(FieldType::Text, "b").when(|d| d.contains("a"));
        assert!(conditional.is_conditional());
        assert!(!conditional.is_visible(&data));
    }

    #[test]
    fn initial_value_prefers_default() {
        let checkbox = FieldDescriptor::new(FieldType::Checkbox, "subscribe");
        assert_eq!(checkbox.initial_value(), json!(false));

        let radio = FieldDescriptor::new(FieldType::Radio, "newsletter").with_default_value("yes");
        assert_eq!(radio.initial_value(), json!("yes"));
    }

    #[test]
    fn refinement_message_is_optional() {
        let bare = Refinement::new(|_| true);
        assert!(bare.message().is_none());
        let with = Refinement::new(|_| false).with_message("needs first name");
        assert_eq!(with.message(), Some("needs first name"));
        assert!(!with.check(&FormData::new()));
    }

    #[test]
    fn debug_reports_hook_presence() {
        let field = FieldDescriptor::new(FieldType::Text, "lastName").refine(|_| true);
        let debug = format!("{field:?}");
        assert!(debug.contains("has_refinement: true"));
        assert!(debug.contains("has_rule: false"));
    }
}
