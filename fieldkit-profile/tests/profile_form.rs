//! Behavior of the built-in profile form end to end.

use fieldkit_config::{FormSettings, HiddenValuePolicy};
use fieldkit_fields::{
    DerivationDispatcher, FieldType, FieldsError, FormData, FormSession, ValidationEngine,
};
use fieldkit_profile::profile_form;
use proptest::prelude::*;
use rstest::rstest;
use serde_json::{json, Value};

const DECLARED: [&str; 13] = [
    "username",
    "initials",
    "firstName",
    "lastName",
    "email",
    "password",
    "bio",
    "gender",
    "subscribe",
    "newsletter",
    "age",
    "dob",
    "hobbies",
];

fn data(value: Value) -> FormData {
    FormData::from_value(value).unwrap()
}

fn complete_profile() -> FormData {
    data(json!({
        "username": "johnsmith",
        "initials": "JO",
        "firstName": "John",
        "lastName": "Smith",
        "email": "john@example.com",
        "password": "secret123",
        "bio": "",
        "gender": "female",
        "subscribe": true,
        "newsletter": "yes",
        "age": 30,
        "dob": "1994-05-17",
        "hobbies": ["reading"]
    }))
}

#[test]
fn get_field_returns_matching_descriptor() {
    let form = profile_form();
    for name in DECLARED {
        assert_eq!(form.get_field(name).unwrap().name, name);
    }
    assert!(matches!(
        form.get_field("nickname"),
        Err(FieldsError::FieldNotFound { .. })
    ));
}

#[test]
fn list_fields_is_stable_and_in_declared_order() {
    let form = profile_form();
    let first: Vec<_> = form.list_fields().iter().map(|f| f.name.clone()).collect();
    let second: Vec<_> = form.list_fields().iter().map(|f| f.name.clone()).collect();
    assert_eq!(first, DECLARED);
    assert_eq!(first, second);
}

#[rstest]
#[case("username", FieldType::Text)]
#[case("email", FieldType::Email)]
#[case("password", FieldType::Password)]
#[case("bio", FieldType::Textarea)]
#[case("gender", FieldType::Select)]
#[case("subscribe", FieldType::Checkbox)]
#[case("newsletter", FieldType::Radio)]
#[case("age", FieldType::Number)]
#[case("dob", FieldType::Date)]
#[case("hobbies", FieldType::Multiselect)]
fn field_types_match_declaration(#[case] name: &str, #[case] expected: FieldType) {
    assert_eq!(profile_form().get_field(name).unwrap().type_, expected);
}

#[test]
fn display_metadata_is_declared() {
    let form = profile_form();
    let username = form.get_field("username").unwrap();
    assert_eq!(username.label.as_deref(), Some("Username"));
    assert_eq!(username.constraints.max_length, Some(20));

    let bio = form.get_field("bio").unwrap();
    assert_eq!(bio.constraints.rows, Some(4));

    let gender = form.get_field("gender").unwrap();
    let values: Vec<_> = gender.options.iter().map(|o| o.value.as_str()).collect();
    assert_eq!(values, vec!["male", "female", "other"]);
}

#[test]
fn initial_record_uses_defaults() {
    let initial = FormData::initial(profile_form());
    assert_eq!(initial.get("subscribe"), Some(&json!(true)));
    assert_eq!(initial.get("newsletter"), Some(&json!("yes")));
    assert_eq!(initial.get("hobbies"), Some(&json!([])));
    assert_eq!(initial.get("age"), Some(&Value::Null));
    assert_eq!(initial.get("username"), Some(&json!("")));
}

#[test]
fn field_without_rule_is_always_valid() {
    let engine = ValidationEngine::default();
    for value in [json!(null), json!(""), json!("John"), json!(7), json!({"a": 1})] {
        let record = data(json!({ "firstName": value }));
        let result = engine
            .validate_field(profile_form(), "firstName", &record)
            .unwrap();
        assert!(result.is_valid);
    }
    let result = engine
        .validate_field(profile_form(), "firstName", &FormData::new())
        .unwrap();
    assert!(result.is_valid);
}

#[test]
fn username_change_derives_initials() {
    let mut record = data(json!({"username": "johnsmith"}));
    DerivationDispatcher::default()
        .on_field_changed(profile_form(), "username", &json!("johnsmith"), &mut record)
        .unwrap();
    assert_eq!(record.str_value("initials"), Some("JO"));
}

#[test]
fn last_name_requires_first_name() {
    let record = data(json!({"firstName": "", "lastName": "Doe"}));
    let result = ValidationEngine::default()
        .validate_field(profile_form(), "lastName", &record)
        .unwrap();
    assert!(!result.is_valid);

    let record = data(json!({"firstName": "John", "lastName": "Doe"}));
    let result = ValidationEngine::default()
        .validate_field(profile_form(), "lastName", &record)
        .unwrap();
    assert!(result.is_valid);
}

#[test]
fn bio_hidden_unless_male() {
    let form = profile_form();
    let record = data(json!({"gender": "female", "bio": ""}));

    let visible: Vec<_> = form.visible_fields(&record).iter().map(|f| f.name.as_str()).collect();
    assert!(!visible.contains(&"bio"));

    let result = ValidationEngine::default().validate(form, &record);
    assert!(result.field("bio").is_none());
    assert!(!result.errors().any(|f| f.name == "bio"));

    let record = data(json!({"gender": "male", "bio": ""}));
    let result = ValidationEngine::default().validate(form, &record);
    assert_eq!(result.field("bio").unwrap().first_error(), Some("Bio is required"));
}

#[rstest]
#[case("password", json!("ab"), "Password must be at least 6 characters")]
#[case("password", json!(""), "Password must be at least 6 characters")]
#[case("hobbies", json!([]), "Select at least one hobby")]
#[case("email", json!("not-an-email"), "Invalid email")]
#[case("username", json!(""), "Username is required")]
#[case("gender", json!(""), "Gender is required")]
#[case("age", json!(-3), "Number must be greater than 0")]
#[case("dob", json!("yesterday"), "Invalid date")]
fn failing_values_report_declared_message(
    #[case] name: &str,
    #[case] value: Value,
    #[case] message: &str,
) {
    let record = data(json!({ name: value }));
    let result = ValidationEngine::default()
        .validate_field(profile_form(), name, &record)
        .unwrap();
    assert!(!result.is_valid);
    assert_eq!(result.first_error(), Some(message));
}

#[test]
fn absent_required_value_reports_required() {
    let result = ValidationEngine::default()
        .validate_field(profile_form(), "age", &FormData::new())
        .unwrap();
    assert_eq!(result.errors, vec!["Required"]);
}

#[test]
fn mistyped_value_is_downgraded() {
    let record = data(json!({"age": "thirty"}));
    let result = ValidationEngine::default()
        .validate_field(profile_form(), "age", &record)
        .unwrap();
    assert_eq!(result.errors, vec!["Invalid value"]);
}

#[test]
fn complete_profile_is_valid() {
    let result = ValidationEngine::default().validate(profile_form(), &complete_profile());
    assert!(result.is_form_valid, "{:?}", result.errors().collect::<Vec<_>>());
    assert_eq!(result.hidden, vec!["bio"]);
}

#[test]
fn change_without_hook_leaves_record_unchanged() {
    let mut record = complete_profile();
    record.set("firstName", "Jane");
    let before = record.clone();

    let written = DerivationDispatcher::default()
        .on_field_changed(profile_form(), "firstName", &json!("Jane"), &mut record)
        .unwrap();

    assert!(written.is_empty());
    assert_eq!(record, before);
}

#[test]
fn session_walkthrough() {
    let mut session = FormSession::new(profile_form(), FormSettings::default());
    assert!(!session.validate().is_form_valid);

    session.set_value("username", "adalovelace").unwrap();
    assert_eq!(session.data().str_value("initials"), Some("AD"));

    session.set_value("gender", "male").unwrap();
    assert!(session.visible_fields().iter().any(|f| f.name == "bio"));
    session.set_value("bio", "Analyst").unwrap();
    session.set_value("gender", "other").unwrap();
    assert_eq!(session.data().str_value("bio"), Some("Analyst"));
}

#[test]
fn session_can_clear_hidden_bio() {
    let settings = FormSettings::new().with_hidden_values(HiddenValuePolicy::Clear);
    let mut session = FormSession::with_data(profile_form(), settings, complete_profile());
    session.set_value("gender", "male").unwrap();
    session.set_value("bio", "Analyst").unwrap();
    session.set_value("gender", "female").unwrap();
    assert!(!session.data().contains("bio"));
}

proptest! {
    #[test]
    fn visible_fields_is_ordered_subsequence(gender in prop_oneof![
        Just(json!("male")),
        Just(json!("female")),
        Just(json!("other")),
        Just(json!("")),
        Just(Value::Null),
        any::<i64>().prop_map(|n| json!(n)),
        "[a-z]{0,8}".prop_map(|s| json!(s)),
    ]) {
        let form = profile_form();
        let record = data(json!({ "gender": gender }));
        let visible: Vec<_> = form.visible_fields(&record).iter().map(|f| f.name.clone()).collect();

        let mut remaining = DECLARED.iter();
        for name in &visible {
            prop_assert!(remaining.any(|declared| *declared == name.as_str()));
        }
        prop_assert!(visible.len() == DECLARED.len() || visible.len() == DECLARED.len() - 1);
    }
}
