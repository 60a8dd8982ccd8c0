//! Built-in user profile form.
//!
//! `profile_form()` is the thirteen-field sign-up/profile schema the fieldkit
//! tooling ships with. `profile_fields()` returns the same descriptors as a
//! builder so callers can append their own fields before freezing it.

use std::sync::OnceLock;

use fieldkit_fields::{
    ChangeScope, FieldDescriptor, FieldRegistry, FieldRegistryBuilder, FieldType, Refinement,
    Result, Rule,
};
use serde_json::Value;
use tracing::trace;

/// Gender value that reveals the bio field.
pub const BIO_GENDER: &str = "male";

/// On-change hook of `username`: `initials` becomes the first two characters,
/// upper-cased, or empty when the value is not a string.
pub fn derive_initials(value: &Value, scope: &mut ChangeScope<'_>) -> Result<()> {
    let initials = value
        .as_str()
        .map(|s| s.chars().take(2).collect::<String>().to_uppercase())
        .unwrap_or_default();
    trace!(%initials, "initials derived");
    scope.set("initials", initials)
}

/// All built-in profile field descriptors, in render order.
pub fn profile_fields() -> FieldRegistryBuilder {
    FieldRegistry::builder()
        .field(
            FieldDescriptor::new(FieldType::Text, "username")
                .with_label("Username")
                .with_placeholder("Enter your username")
                .with_max_length(20)
                .with_rule(Rule::string().min(1, "Username is required"))
                .on_change(derive_initials),
        )
        .field(
            FieldDescriptor::new(FieldType::Text, "initials")
                .with_label("Initials")
                .with_placeholder("Enter your initials")
                .with_rule(Rule::string().min(1, "Initials is required")),
        )
        .field(
            FieldDescriptor::new(FieldType::Text, "firstName")
                .with_label("First Name")
                .with_placeholder("Enter your first name"),
        )
        .field(
            FieldDescriptor::new(FieldType::Text, "lastName")
                .with_label("Last Name")
                .with_placeholder("Enter your last name")
                .with_rule(Rule::string().min(1, "Last Name is required"))
                .with_refinement(Refinement::new(|data| data.is_truthy("firstName"))),
        )
        .field(
            FieldDescriptor::new(FieldType::Email, "email")
                .with_label("Email")
                .with_placeholder("Enter your email")
                .with_rule(Rule::string().email("Invalid email")),
        )
        .field(
            FieldDescriptor::new(FieldType::Password, "password")
                .with_label("Password")
                .with_placeholder("Enter your password")
                .with_min_length(6)
                .with_rule(
                    Rule::string()
                        .min(6, "Password must be at least 6 characters")
                        .min(1, "Password is required"),
                ),
        )
        .field(
            FieldDescriptor::new(FieldType::Textarea, "bio")
                .with_label("Bio")
                .with_placeholder("Tell us about yourself")
                .with_rows(4)
                .when(|data| data.str_value("gender") == Some(BIO_GENDER))
                .with_rule(Rule::string().min(1, "Bio is required")),
        )
        .field(
            FieldDescriptor::new(FieldType::Select, "gender")
                .with_label("Gender")
                .with_placeholder("Select your gender")
                .with_option("male", "Male")
                .with_option("female", "Female")
                .with_option("other", "Other")
                .with_rule(Rule::string().min(1, "Gender is required")),
        )
        .field(
            FieldDescriptor::new(FieldType::Checkbox, "subscribe")
                .with_label("Subscribe to newsletter")
                .with_default_value(true),
        )
        .field(
            FieldDescriptor::new(FieldType::Radio, "newsletter")
                .with_label("Receive Newsletter")
                .with_default_value("yes"),
        )
        .field(
            FieldDescriptor::new(FieldType::Number, "age")
                .with_label("Age")
                .with_placeholder("Enter your age")
                .with_rule(
                    Rule::number()
                        .positive()
                        .int()
                        .refine(|value| !value.is_null(), "Age is required"),
                ),
        )
        .field(
            FieldDescriptor::new(FieldType::Date, "dob")
                .with_label("Date of Birth")
                .with_placeholder("Select your date of birth")
                .with_rule(Rule::date().refine(|value| !value.is_null(), "Date of Birth is required")),
        )
        .field(
            FieldDescriptor::new(FieldType::Multiselect, "hobbies")
                .with_label("Hobbies")
                .with_placeholder("Select your hobbies")
                .with_option("reading", "Reading")
                .with_option("traveling", "Traveling")
                .with_option("sports", "Sports")
                .with_rule(Rule::array(Rule::string()).min(1, "Select at least one hobby")),
        )
}

/// The built-in profile form, built once per process.
pub fn profile_form() -> &'static FieldRegistry {
    static FORM: OnceLock<FieldRegistry> = OnceLock::new();
    FORM.get_or_init(|| {
        profile_fields()
            .build()
            .expect("built-in profile form is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_form_has_all_fields() {
        assert_eq!(profile_form().len(), 13);
    }

    #[test]
    fn profile_form_is_shared() {
        assert!(std::ptr::eq(profile_form(), profile_form()));
    }

    #[test]
    fn only_bio_is_conditional() {
        let conditional: Vec<_> = profile_form()
            .list_fields()
            .iter()
            .filter(|f| f.is_conditional())
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(conditional, vec!["bio"]);
    }

    #[test]
    fn only_username_derives() {
        let hooks: Vec<_> = profile_form()
            .list_fields()
            .iter()
            .filter(|f| f.derivation().is_some())
            .map(|f| f.name.as_str())
            .collect();
        assert_eq!(hooks, vec!["username"]);
    }

    #[test]
    fn builder_can_be_extended() {
        let registry = profile_fields()
            .field(FieldDescriptor::new(FieldType::Text, "nickname"))
            .build()
            .unwrap();
        assert_eq!(registry.len(), 14);
        assert_eq!(registry.position("nickname"), Some(13));
    }
}
