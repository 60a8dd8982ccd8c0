//! One live form instance: a record plus the engines that act on it.

use fieldkit_config::{FormSettings, HiddenValuePolicy};
use serde_json::Value;
use tracing::debug;

use crate::derivation::DerivationDispatcher;
use crate::error::Result;
use crate::form_data::FormData;
use crate::registry::FieldRegistry;
use crate::types::FieldDescriptor;
use crate::validation::{FormValidation, ValidationEngine};

/// Owns the [`FormData`] of one form against a shared registry.
///
/// Edits go through [`FormSession::set_value`], which assigns the value,
/// runs the field's derivation hook and then applies the hidden-value policy.
#[derive(Debug)]
pub struct FormSession<'r> {
    registry: &'r FieldRegistry,
    data: FormData,
    settings: FormSettings,
    validator: ValidationEngine,
    dispatcher: DerivationDispatcher,
}

impl<'r> FormSession<'r> {
    /// Start from every field's initial value.
    pub fn new(registry: &'r FieldRegistry, settings: FormSettings) -> Self {
        Self::with_data(registry, settings, FormData::initial(registry))
    }

    /// Start from an existing record.
    pub fn with_data(registry: &'r FieldRegistry, settings: FormSettings, data: FormData) -> Self {
        Self {
            registry,
            data,
            validator: ValidationEngine::new(settings.clone()),
            dispatcher: DerivationDispatcher::new(&settings),
            settings,
        }
    }

    pub fn registry(&self) -> &FieldRegistry {
        self.registry
    }

    pub fn settings(&self) -> &FormSettings {
        &self.settings
    }

    pub fn data(&self) -> &FormData {
        &self.data
    }

    pub fn into_data(self) -> FormData {
        self.data
    }

    /// Apply one user edit. Returns the fields derived from it.
    ///
    /// If the hook fails, the edit itself is rolled back as well.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<Vec<String>> {
        self.registry.get_field(name)?;
        let value = value.into();

        let previous = self.data.set(name, value.clone());
        let derived = match self
            .dispatcher
            .on_field_changed(self.registry, name, &value, &mut self.data)
        {
            Ok(derived) => derived,
            Err(err) => {
                match previous {
                    Some(previous) => {
                        self.data.set(name, previous);
                    }
                    None => {
                        self.data.remove(name);
                    }
                }
                return Err(err);
            }
        };

        debug!(field = %name, derived = derived.len(), "value set");
        self.apply_hidden_policy();
        Ok(derived)
    }

    pub fn visible_fields(&self) -> Vec<&FieldDescriptor> {
        self.registry.visible_fields(&self.data)
    }

    pub fn validate(&self) -> FormValidation {
        self.validator.validate(self.registry, &self.data)
    }

    /// Clearing one value can hide a field that depends on it, so repeat
    /// until no hidden field holds a value. Each pass clears at least one.
    fn apply_hidden_policy(&mut self) {
        if self.settings.hidden_values != HiddenValuePolicy::Clear {
            return;
        }
        for _ in 0..=self.registry.len() {
            let hidden: Vec<String> = self
                .registry
                .hidden_fields(&self.data)
                .into_iter()
                .filter(|f| self.data.contains(&f.name))
                .map(|f| f.name.clone())
                .collect();
            if hidden.is_empty() {
                return;
            }
            for name in hidden {
                self.data.remove(&name);
                debug!(field = %name, "cleared hidden value");
            }
        }
    }
}
