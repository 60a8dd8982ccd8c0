//! fieldkit change - replay one edit through the form session.

use anyhow::Result;
use fieldkit_config::FormSettings;
use fieldkit_fields::{FieldRegistry, FormData, FormSession};
use serde_json::Value;
use tracing::info;

/// Record after the edit, plus the fields its hooks derived.
#[derive(Debug)]
pub struct ChangeOutcome {
    pub data: FormData,
    pub derived: Vec<String>,
}

/// Assign `value` to `name`, run derivations and apply the hidden-value policy.
pub fn apply_change(
    registry: &FieldRegistry,
    settings: &FormSettings,
    data: FormData,
    name: &str,
    value: Value,
) -> Result<ChangeOutcome> {
    let mut session = FormSession::with_data(registry, settings.clone(), data);
    let derived = session.set_value(name, value)?;
    if !derived.is_empty() {
        info!(field = %name, derived = ?derived, "derived values");
    }
    Ok(ChangeOutcome {
        data: session.into_data(),
        derived,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldkit_config::HiddenValuePolicy;
    use fieldkit_profile::profile_form;
    use serde_json::json;

    #[test]
    fn username_change_sets_initials() {
        let outcome = apply_change(
            profile_form(),
            &FormSettings::default(),
            FormData::new(),
            "username",
            json!("johnsmith"),
        )
        .unwrap();
        assert_eq!(outcome.derived, vec!["initials"]);
        assert_eq!(
            outcome.data.to_value(),
            json!({"username": "johnsmith", "initials": "JO"})
        );
    }

    #[test]
    fn unknown_field_is_rejected() {
        let result = apply_change(
            profile_form(),
            &FormSettings::default(),
            FormData::new(),
            "nickname",
            json!("x"),
        );
        assert!(result.is_err());
    }

    #[test]
    fn clear_policy_drops_hidden_bio() {
        let settings = FormSettings::new().with_hidden_values(HiddenValuePolicy::Clear);
        let data = FormData::from_value(json!({"gender": "male", "bio": "Hi"})).unwrap();
        let outcome =
            apply_change(profile_form(), &settings, data, "gender", json!("female")).unwrap();
        assert!(outcome.derived.is_empty());
        assert!(!outcome.data.contains("bio"));
    }
}
