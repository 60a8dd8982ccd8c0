//! Error types for the field schema

use thiserror::Error;

/// Result type for field schema operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur in registry lookups, construction and derivation.
///
/// Validation failures are not errors: they come back as data from
/// [`ValidationEngine`](crate::ValidationEngine).
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Field not found by name
    #[error("field not found: {name}")]
    FieldNotFound { name: String },

    /// Duplicate field name
    #[error("duplicate field name: {name}")]
    DuplicateFieldName { name: String },

    /// Select or multiselect declared without choices
    #[error("field '{name}' of type {field_type} requires options")]
    MissingOptions { name: String, field_type: String },

    /// Descriptor is malformed (empty name and similar)
    #[error("invalid field descriptor: {message}")]
    InvalidDescriptor { message: String },

    /// A derivation hook tried to write the field that triggered it
    #[error("derivation hook of '{field}' cannot write its own value")]
    SelfDerivation { field: String },

    /// A derivation hook returned an error; no writes were applied
    #[error("derivation hook of '{field}' failed: {message}")]
    DerivationFailed { field: String, message: String },

    /// Chained derivations went deeper than allowed
    #[error("derivation chain starting at '{field}' exceeded depth {max_depth}")]
    DerivationDepthExceeded { field: String, max_depth: usize },

    /// Form data could not be built from the given JSON
    #[error("invalid form data: {message}")]
    InvalidFormData { message: String },
}

impl FieldsError {
    /// Build a `DerivationFailed` for use inside hooks.
    pub fn derivation(field: impl Into<String>, message: impl Into<String>) -> Self {
        FieldsError::DerivationFailed {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FieldsError::FieldNotFound {
            name: "nickname".into(),
        };
        assert_eq!(err.to_string(), "field not found: nickname");
    }

    #[test]
    fn test_missing_options_display() {
        let err = FieldsError::MissingOptions {
            name: "gender".into(),
            field_type: "select".into(),
        };
        assert_eq!(
            err.to_string(),
            "field 'gender' of type select requires options"
        );
    }

    #[test]
    fn test_derivation_helper() {
        let err = FieldsError::derivation("username", "bad input");
        assert!(err.to_string().contains("username"));
        assert!(err.to_string().contains("bad input"));
    }
}
