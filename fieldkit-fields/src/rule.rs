//! Field rules: the validator capability and a chainable built-in rule.
//!
//! Anything implementing [`Validator`] can be bound to a field, including
//! plain closures. [`Rule`] covers the common cases with a small builder:
//!
//! ```
//! use fieldkit_fields::{Rule, Validator};
//! use serde_json::json;
//!
//! let password = Rule::string()
//!     .min(6, "Password must be at least 6 characters")
//!     .min(1, "Password is required");
//! let err = password.validate(Some(&json!("ab"))).unwrap_err();
//! assert_eq!(err.messages(), ["Password must be at least 6 characters"]);
//! ```

use std::sync::{Arc, OnceLock};

use chrono::{DateTime, NaiveDate};
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::form_data::json_kind;

/// Reported for absent or null values.
pub const REQUIRED_MESSAGE: &str = "Required";

/// Reported for date strings that do not parse.
pub const INVALID_DATE_MESSAGE: &str = "Invalid date";

const POSITIVE_MESSAGE: &str = "Number must be greater than 0";
const INT_MESSAGE: &str = "Expected integer, received float";

/// Email address pattern
const EMAIL_PATTERN: &str = r"^[^@\s]+@[^@\s]+\.[^@\s]+$";

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("Failed to compile email regex"))
}

/// Why a value did not pass a rule.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The value is outside the rule's declared domain.
    #[error("{}", .messages.join("; "))]
    Invalid { messages: Vec<String> },

    /// The rule could not evaluate the value at all (wrong JSON type,
    /// unsupported check). Reported to users with a generic message.
    #[error("unexpected rule error: {reason}")]
    Unexpected { reason: String },
}

impl RuleError {
    pub fn invalid(message: impl Into<String>) -> Self {
        RuleError::Invalid {
            messages: vec![message.into()],
        }
    }

    pub fn unexpected(reason: impl Into<String>) -> Self {
        RuleError::Unexpected {
            reason: reason.into(),
        }
    }

    /// Failure messages; empty for unexpected errors.
    pub fn messages(&self) -> &[String] {
        match self {
            RuleError::Invalid { messages } => messages,
            RuleError::Unexpected { .. } => &[],
        }
    }
}

/// Validation capability bound to a single field's value.
///
/// `value` is `None` when the record has no entry for the field.
pub trait Validator: Send + Sync {
    fn validate(&self, value: Option<&Value>) -> Result<(), RuleError>;
}

impl<F> Validator for F
where
    F: Fn(Option<&Value>) -> Result<(), RuleError> + Send + Sync,
{
    fn validate(&self, value: Option<&Value>) -> Result<(), RuleError> {
        self(value)
    }
}

#[derive(Clone)]
enum RuleKind {
    String,
    Number,
    Boolean,
    Date,
    Array(Box<Rule>),
}

impl RuleKind {
    fn name(&self) -> &'static str {
        match self {
            RuleKind::String => "string",
            RuleKind::Number => "number",
            RuleKind::Boolean => "boolean",
            RuleKind::Date => "date",
            RuleKind::Array(_) => "array",
        }
    }
}

#[derive(Clone)]
enum Check {
    Min { bound: f64, message: String },
    Max { bound: f64, message: String },
    Email { message: String },
    Pattern { regex: Regex, message: String },
    Positive,
    Int,
    Custom {
        predicate: Arc<dyn Fn(&Value) -> bool + Send + Sync>,
        message: String,
    },
}

impl Check {
    fn name(&self) -> &'static str {
        match self {
            Check::Min { .. } => "min",
            Check::Max { .. } => "max",
            Check::Email { .. } => "email",
            Check::Pattern { .. } => "pattern",
            Check::Positive => "positive",
            Check::Int => "int",
            Check::Custom { .. } => "refine",
        }
    }
}

/// Chainable rule: a base type plus checks run in declaration order.
///
/// `min`/`max` mean character count for strings, value for numbers and
/// item count for arrays. Only the first failing check is reported unless
/// [`Rule::report_all`] is set.
#[derive(Clone)]
pub struct Rule {
    kind: RuleKind,
    checks: Vec<Check>,
    report_all: bool,
}

impl Rule {
    fn of(kind: RuleKind) -> Self {
        Self {
            kind,
            checks: Vec::new(),
            report_all: false,
        }
    }

    pub fn string() -> Self {
        Self::of(RuleKind::String)
    }

    pub fn number() -> Self {
        Self::of(RuleKind::Number)
    }

    pub fn boolean() -> Self {
        Self::of(RuleKind::Boolean)
    }

    /// Dates as `YYYY-MM-DD` or RFC 3339 strings.
    pub fn date() -> Self {
        Self::of(RuleKind::Date)
    }

    /// Arrays whose items each satisfy `item`.
    pub fn array(item: Rule) -> Self {
        Self::of(RuleKind::Array(Box::new(item)))
    }

    pub fn min(mut self, bound: impl Into<f64>, message: impl Into<String>) -> Self {
        self.checks.push(Check::Min {
            bound: bound.into(),
            message: message.into(),
        });
        self
    }

    pub fn max(mut self, bound: impl Into<f64>, message: impl Into<String>) -> Self {
        self.checks.push(Check::Max {
            bound: bound.into(),
            message: message.into(),
        });
        self
    }

    pub fn email(mut self, message: impl Into<String>) -> Self {
        self.checks.push(Check::Email {
            message: message.into(),
        });
        self
    }

    pub fn pattern(mut self, regex: Regex, message: impl Into<String>) -> Self {
        self.checks.push(Check::Pattern {
            regex,
            message: message.into(),
        });
        self
    }

    /// Number must be strictly greater than zero.
    pub fn positive(mut self) -> Self {
        self.checks.push(Check::Positive);
        self
    }

    /// Number must have no fractional part.
    pub fn int(mut self) -> Self {
        self.checks.push(Check::Int);
        self
    }

    /// Custom check on the (type-checked) value.
    pub fn refine(
        mut self,
        predicate: impl Fn(&Value) -> bool + Send + Sync + 'static,
        message: impl Into<String>,
    ) -> Self {
        self.checks.push(Check::Custom {
            predicate: Arc::new(predicate),
            message: message.into(),
        });
        self
    }

    /// Report every failing check instead of only the first.
    pub fn report_all(mut self) -> Self {
        self.report_all = true;
        self
    }

    fn check_type(&self, value: &Value) -> Result<(), RuleError> {
        let matches = match &self.kind {
            RuleKind::String => value.is_string(),
            RuleKind::Number => value.is_number(),
            RuleKind::Boolean => value.is_boolean(),
            RuleKind::Date => value.is_string(),
            RuleKind::Array(_) => value.is_array(),
        };
        if !matches {
            return Err(RuleError::unexpected(format!(
                "expected {}, received {}",
                self.kind.name(),
                json_kind(value)
            )));
        }

        match (&self.kind, value) {
            (RuleKind::Date, Value::String(s)) if parse_date(s).is_none() => {
                Err(RuleError::invalid(INVALID_DATE_MESSAGE))
            }
            (RuleKind::Array(item), Value::Array(items)) => {
                for entry in items {
                    item.validate(Some(entry))?;
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }

    /// The quantity `min`/`max` compare against.
    fn measure(&self, value: &Value) -> Option<f64> {
        match (&self.kind, value) {
            (RuleKind::String, Value::String(s)) => Some(s.chars().count() as f64),
            (RuleKind::Number, Value::Number(n)) => n.as_f64(),
            (RuleKind::Array(_), Value::Array(items)) => Some(items.len() as f64),
            _ => None,
        }
    }

    /// `Ok(None)` passes, `Ok(Some(msg))` fails, `Err` cannot evaluate.
    fn run_check(&self, check: &Check, value: &Value) -> Result<Option<String>, RuleError> {
        let unsupported = || {
            RuleError::unexpected(format!(
                "'{}' is not supported on {} rules",
                check.name(),
                self.kind.name()
            ))
        };

        let failed = match check {
            Check::Min { bound, .. } => self.measure(value).ok_or_else(unsupported)? < *bound,
            Check::Max { bound, .. } => self.measure(value).ok_or_else(unsupported)? > *bound,
            Check::Email { .. } => !email_regex().is_match(value.as_str().ok_or_else(unsupported)?),
            Check::Pattern { regex, .. } => !regex.is_match(value.as_str().ok_or_else(unsupported)?),
            Check::Positive => value.as_f64().ok_or_else(unsupported)? <= 0.0,
            Check::Int => {
                let n = value.as_f64().ok_or_else(unsupported)?;
                n.fract() != 0.0
            }
            Check::Custom { predicate, .. } => !predicate(value),
        };

        if !failed {
            return Ok(None);
        }
        let message = match check {
            Check::Min { message, .. }
            | Check::Max { message, .. }
            | Check::Email { message }
            | Check::Pattern { message, .. }
            | Check::Custom { message, .. } => message.clone(),
            Check::Positive => POSITIVE_MESSAGE.to_string(),
            Check::Int => INT_MESSAGE.to_string(),
        };
        Ok(Some(message))
    }
}

impl Validator for Rule {
    fn validate(&self, value: Option<&Value>) -> Result<(), RuleError> {
        let value = match value {
            None | Some(Value::Null) => return Err(RuleError::invalid(REQUIRED_MESSAGE)),
            Some(v) => v,
        };

        self.check_type(value)?;

        let mut messages = Vec::new();
        for check in &self.checks {
            if let Some(message) = self.run_check(check, value)? {
                messages.push(message);
                if !self.report_all {
                    break;
                }
            }
        }

        if messages.is_empty() {
            Ok(())
        } else {
            Err(RuleError::Invalid { messages })
        }
    }
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}
