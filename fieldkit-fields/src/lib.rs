//! Field schema registry and form evaluation engine
//!
//! `fieldkit-fields` declares a form as an ordered list of field descriptors
//! and evaluates live form records against it. It renders nothing and
//! submits nothing; a UI layer consumes the results.
//!
//! # Architecture
//!
//! - **Schema**: [`FieldRegistry`] holds [`FieldDescriptor`]s in declaration
//!   order; each may carry a [`Rule`], a visibility predicate, a cross-field
//!   refinement and an on-change derivation hook
//! - **Validation**: [`ValidationEngine`] checks visible fields only and
//!   reports failures as data
//! - **Derivation**: [`DerivationDispatcher`] runs on-change hooks through a
//!   staged [`ChangeScope`], committing writes atomically
//! - **Session**: [`FormSession`] ties one [`FormData`] record to the engines

pub mod derivation;
pub mod error;
pub mod form_data;
pub mod registry;
pub mod rule;
pub mod session;
pub mod types;
pub mod validation;

pub use derivation::{ChangeScope, DerivationDispatcher};
pub use error::{FieldsError, Result};
pub use form_data::FormData;
pub use registry::{FieldRegistry, FieldRegistryBuilder};
pub use rule::{Rule, RuleError, Validator};
pub use session::FormSession;
pub use types::{Constraints, FieldDescriptor, FieldType, Refinement, SelectOption};
pub use validation::{FieldValidation, FormValidation, ValidationEngine};
