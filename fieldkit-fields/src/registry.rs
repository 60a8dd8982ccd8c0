//! The ordered, immutable set of field descriptors for one form.
//!
//! Declaration order is render/tab order. The registry is built once through
//! [`FieldRegistryBuilder`], which enforces the invariants the descriptors
//! cannot check on their own, and is read-only afterwards.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{FieldsError, Result};
use crate::form_data::FormData;
use crate::types::FieldDescriptor;

/// Collects descriptors in declaration order. Created by [`FieldRegistry::builder`].
#[derive(Default)]
pub struct FieldRegistryBuilder {
    fields: Vec<FieldDescriptor>,
}

impl FieldRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a field descriptor.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.fields.push(field);
        self
    }

    /// Append several descriptors, keeping their order.
    pub fn fields(mut self, fields: impl IntoIterator<Item = FieldDescriptor>) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Access the descriptors collected so far.
    pub fn pending(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Check invariants and freeze the registry.
    ///
    /// Fails on empty or duplicate names and on select/multiselect fields
    /// without options.
    pub fn build(self) -> Result<FieldRegistry> {
        let mut name_index = HashMap::with_capacity(self.fields.len());

        for (idx, field) in self.fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(FieldsError::InvalidDescriptor {
                    message: format!("field at position {idx} has an empty name"),
                });
            }
            if field.type_.requires_options() && field.options.is_empty() {
                return Err(FieldsError::MissingOptions {
                    name: field.name.clone(),
                    field_type: field.type_.to_string(),
                });
            }
            if name_index.insert(field.name.clone(), idx).is_some() {
                return Err(FieldsError::DuplicateFieldName {
                    name: field.name.clone(),
                });
            }
        }

        debug!(fields = self.fields.len(), "field registry built");

        Ok(FieldRegistry {
            fields: self.fields,
            name_index,
        })
    }
}

/// Ordered, immutable field schema for one form.
///
/// ```rust,ignore
/// let registry = FieldRegistry::builder()
///     .field(FieldDescriptor::new(FieldType::Text, "username"))
///     .field(FieldDescriptor::new(FieldType::Text, "initials"))
///     .build()?;
/// ```
#[derive(Debug)]
pub struct FieldRegistry {
    fields: Vec<FieldDescriptor>,
    name_index: HashMap<String, usize>,
}

impl FieldRegistry {
    pub fn builder() -> FieldRegistryBuilder {
        FieldRegistryBuilder::new()
    }

    /// All descriptors, in declaration order.
    pub fn list_fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Look up a descriptor by its unique name.
    pub fn get_field(&self, name: &str) -> Result<&FieldDescriptor> {
        self.name_index
            .get(name)
            .map(|&i| &self.fields[i])
            .ok_or_else(|| FieldsError::FieldNotFound {
                name: name.to_string(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.name_index.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Declaration position of a field.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    /// Fields whose visibility predicate holds for `data`, in declaration order.
    pub fn visible_fields(&self, data: &FormData) -> Vec<&FieldDescriptor> {
        self.fields
            .iter()
            .filter(|field| {
                let visible = field.is_visible(data);
                trace!(field = %field.name, visible, "visibility evaluated");
                visible
            })
            .collect()
    }

    /// Fields currently hidden by their predicate, in declaration order.
    pub fn hidden_fields(&self, data: &FormData) -> Vec<&FieldDescriptor> {
        self.fields
            .iter()
            .filter(|field| !field.is_visible(data))
            .collect()
    }

    /// Whether a named field is visible for `data`.
    pub fn is_visible(&self, name: &str, data: &FormData) -> Result<bool> {
        Ok(self.get_field(name)?.is_visible(data))
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.name.as_str())
    }
}
