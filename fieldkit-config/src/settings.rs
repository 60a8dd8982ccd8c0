//! Evaluation settings shared by the validation engine and derivation dispatcher.

use serde::{Deserialize, Serialize};

use crate::{ConfigError, ConfigResult};

/// Message reported when a rule fails for a reason outside its declared domain.
pub const DEFAULT_UNEXPECTED_ERROR_MESSAGE: &str = "Invalid value";

/// Message reported when a cross-field refinement fails without its own message.
pub const DEFAULT_REFINEMENT_MESSAGE: &str = "Invalid input";

/// Upper bound on chained derivation rounds per change event.
pub const DEFAULT_MAX_DERIVATION_DEPTH: usize = 8;

/// What happens to a field's stored value when its visibility predicate turns false.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HiddenValuePolicy {
    /// Keep the stale value in the record.
    #[default]
    Retain,
    /// Drop the value from the record once the field is hidden.
    Clear,
}

impl HiddenValuePolicy {
    /// Get the string representation of this policy
    pub fn as_str(&self) -> &'static str {
        match self {
            HiddenValuePolicy::Retain => "retain",
            HiddenValuePolicy::Clear => "clear",
        }
    }
}

/// Tunables for form evaluation.
///
/// Every field has a default, so an empty settings file (or none at all)
/// yields the same behavior as [`FormSettings::default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormSettings {
    /// Message used when a rule hits an unexpected error (type mismatch, panic)
    pub unexpected_error_message: String,

    /// Fallback message for cross-field refinements that carry none
    pub refinement_message: String,

    /// Policy for values of fields that become hidden
    pub hidden_values: HiddenValuePolicy,

    /// Whether a derivation hook's writes may fire the written fields' own hooks
    pub allow_chained_derivations: bool,

    /// Maximum number of chained derivation rounds in one change event
    pub max_derivation_depth: usize,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            unexpected_error_message: DEFAULT_UNEXPECTED_ERROR_MESSAGE.to_string(),
            refinement_message: DEFAULT_REFINEMENT_MESSAGE.to_string(),
            hidden_values: HiddenValuePolicy::default(),
            allow_chained_derivations: false,
            max_derivation_depth: DEFAULT_MAX_DERIVATION_DEPTH,
        }
    }
}

impl FormSettings {
    /// Create settings with all defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the hidden value policy
    pub fn with_hidden_values(mut self, policy: HiddenValuePolicy) -> Self {
        self.hidden_values = policy;
        self
    }

    /// Enable or disable chained derivations
    pub fn with_chained_derivations(mut self, allow: bool) -> Self {
        self.allow_chained_derivations = allow;
        self
    }

    /// Set the chained derivation depth bound
    pub fn with_max_derivation_depth(mut self, depth: usize) -> Self {
        self.max_derivation_depth = depth;
        self
    }

    /// Set the message used for unexpected rule errors
    pub fn with_unexpected_error_message(mut self, message: impl Into<String>) -> Self {
        self.unexpected_error_message = message.into();
        self
    }

    /// Set the fallback message for refinements
    pub fn with_refinement_message(mut self, message: impl Into<String>) -> Self {
        self.refinement_message = message.into();
        self
    }

    /// Check value ranges that serde cannot express.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.max_derivation_depth == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_derivation_depth".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.unexpected_error_message.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "unexpected_error_message".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        if self.refinement_message.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "refinement_message".to_string(),
                message: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}
