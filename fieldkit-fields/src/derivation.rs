//! Derivation dispatcher: runs a field's on-change hook after its value changes.
//!
//! Hooks never touch [`FormData`] directly. They receive a [`ChangeScope`]
//! that reads through to the record and stages writes; the dispatcher
//! commits the staged writes only when the whole change event succeeds.

use std::collections::{HashSet, VecDeque};
use std::panic::{catch_unwind, AssertUnwindSafe};

use fieldkit_config::FormSettings;
use indexmap::IndexMap;
use serde_json::Value;
use tracing::{debug, trace};

use crate::error::{FieldsError, Result};
use crate::form_data::FormData;
use crate::registry::FieldRegistry;

/// Handle passed to a derivation hook.
pub struct ChangeScope<'a> {
    registry: &'a FieldRegistry,
    data: &'a FormData,
    field: &'a str,
    origin: &'a str,
    staged: IndexMap<String, Value>,
}

impl<'a> ChangeScope<'a> {
    fn new(registry: &'a FieldRegistry, data: &'a FormData, field: &'a str, origin: &'a str) -> Self {
        Self {
            registry,
            data,
            field,
            origin,
            staged: IndexMap::new(),
        }
    }

    /// Field whose hook is running.
    pub fn field(&self) -> &str {
        self.field
    }

    /// Field the user changed to start this event.
    pub fn origin(&self) -> &str {
        self.origin
    }

    /// Current value of a field, including writes staged by this hook.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.staged.get(name).or_else(|| self.data.get(name))
    }

    /// String value of a field, if it holds one.
    pub fn str_value(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// The record as it was when the hook started.
    pub fn data(&self) -> &FormData {
        self.data
    }

    /// Stage a write to another field.
    ///
    /// Fails for fields the registry does not declare, and for the hook's
    /// own field or the field that started the event.
    pub fn set(&mut self, name: &str, value: impl Into<Value>) -> Result<()> {
        if name == self.field || name == self.origin {
            return Err(FieldsError::SelfDerivation {
                field: name.to_string(),
            });
        }
        if !self.registry.contains(name) {
            return Err(FieldsError::FieldNotFound {
                name: name.to_string(),
            });
        }
        let value = value.into();
        trace!(from = %self.field, to = %name, %value, "derivation staged");
        self.staged.insert(name.to_string(), value);
        Ok(())
    }

    /// Writes staged so far, in the order they were made.
    pub fn staged(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.staged.iter()
    }

    fn into_writes(self) -> IndexMap<String, Value> {
        self.staged
    }
}

/// Dispatches on-change hooks for one registry.
#[derive(Debug, Clone)]
pub struct DerivationDispatcher {
    allow_chained: bool,
    max_depth: usize,
}

impl Default for DerivationDispatcher {
    fn default() -> Self {
        Self::new(&FormSettings::default())
    }
}

impl DerivationDispatcher {
    pub fn new(settings: &FormSettings) -> Self {
        Self {
            allow_chained: settings.allow_chained_derivations,
            max_depth: settings.max_derivation_depth,
        }
    }

    /// Run the hook of `name` for `new_value` and apply its writes to `data`.
    ///
    /// The changed field's own entry is left alone; assigning it is the
    /// caller's job. Returns the names of fields written, in write order.
    /// On any error `data` is unchanged.
    ///
    /// With chaining enabled, fields written by a hook fire their own hooks
    /// breadth-first, each hook at most once per event.
    pub fn on_field_changed(
        &self,
        registry: &FieldRegistry,
        name: &str,
        new_value: &Value,
        data: &mut FormData,
    ) -> Result<Vec<String>> {
        registry.get_field(name)?;

        let mut working = data.clone();
        let mut written: Vec<String> = Vec::new();
        let mut fired: HashSet<String> = HashSet::from([name.to_string()]);
        let mut queue: VecDeque<(String, Value, usize)> =
            VecDeque::from([(name.to_string(), new_value.clone(), 0)]);

        while let Some((field_name, value, depth)) = queue.pop_front() {
            let field = registry.get_field(&field_name)?;
            let Some(hook) = field.derivation() else {
                continue;
            };

            debug!(field = %field_name, origin = %name, depth, "derivation hook fired");

            let writes = {
                let mut scope = ChangeScope::new(registry, &working, &field_name, name);
                let outcome = catch_unwind(AssertUnwindSafe(|| hook(&value, &mut scope)))
                    .unwrap_or_else(|_| Err(FieldsError::derivation(&field_name, "hook panicked")));
                outcome.map_err(|err| hook_error(&field_name, err))?;
                scope.into_writes()
            };

            for (target, target_value) in writes {
                if self.allow_chained && !fired.contains(&target) {
                    let has_hook = registry
                        .get_field(&target)
                        .is_ok_and(|f| f.derivation().is_some());
                    if has_hook {
                        if depth + 1 > self.max_depth {
                            return Err(FieldsError::DerivationDepthExceeded {
                                field: name.to_string(),
                                max_depth: self.max_depth,
                            });
                        }
                        fired.insert(target.clone());
                        queue.push_back((target.clone(), target_value.clone(), depth + 1));
                    }
                }
                working.set(target.clone(), target_value);
                if !written.contains(&target) {
                    written.push(target);
                }
            }
        }

        *data = working;
        Ok(written)
    }
}

fn hook_error(field: &str, err: FieldsError) -> FieldsError {
    match err {
        FieldsError::SelfDerivation { .. }
        | FieldsError::FieldNotFound { .. }
        | FieldsError::DerivationFailed { .. } => err,
        other => FieldsError::derivation(field, other.to_string()),
    }
}
