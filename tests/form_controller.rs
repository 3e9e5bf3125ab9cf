use std::cell::{Cell, RefCell};
use std::rc::Rc;

use schemaform::{
    ConditionRule, ErrorMap, FieldSchema, FieldType, FormCommand, FormController, FormEvent,
    FormOptions, FormSchema, Operator, SubmitOutcome, ValidationKind, ValidationMode,
    ValidationRule, ValueBag,
};
use serde_json::{Value, json};

fn schema(fields: Vec<FieldSchema>) -> FormSchema {
    FormSchema {
        id: Some("test".into()),
        title: None,
        description: None,
        fields,
        layout: None,
        styling: None,
    }
}

fn bag(value: Value) -> ValueBag {
    value.as_object().cloned().unwrap()
}

fn required_text(name: &str, message: &str) -> FieldSchema {
    let mut field = FieldSchema::new(name, FieldType::Text);
    field.validation = vec![ValidationRule::new(ValidationKind::Required).with_message(message)];
    field
}

fn country_state_schema() -> FormSchema {
    let country = FieldSchema::new("country", FieldType::Select);
    let mut state = FieldSchema::new("state", FieldType::Text);
    state.clear_value_rules = vec![ConditionRule::new(
        "country",
        Operator::Changed,
        Value::Null,
    )];
    schema(vec![country, state])
}

#[test]
fn changing_country_clears_state_in_the_same_cycle() {
    let options =
        FormOptions::default().with_initial_values(bag(json!({"country": "us", "state": "NY"})));
    let mut form = FormController::new(country_state_schema(), options);

    let cleared = form.set_field_value("country", json!("ca"), false);

    assert_eq!(cleared, vec!["state".to_string()]);
    assert_eq!(form.value("state"), Some(&json!("")));
    assert_eq!(form.value("country"), Some(&json!("ca")));
    assert_eq!(
        form.previous_values().and_then(|prev| prev.get("country")),
        Some(&json!("us"))
    );
}

#[test]
fn cleared_field_can_be_filled_again() {
    let options =
        FormOptions::default().with_initial_values(bag(json!({"country": "us", "state": "NY"})));
    let mut form = FormController::new(country_state_schema(), options);
    form.set_field_value("country", json!("ca"), false);

    let cleared = form.set_field_value("state", json!("ON"), false);

    assert!(cleared.is_empty());
    assert_eq!(form.value("state"), Some(&json!("ON")));
}

#[test]
fn setting_the_same_value_does_not_clear() {
    let options =
        FormOptions::default().with_initial_values(bag(json!({"country": "us", "state": "NY"})));
    let mut form = FormController::new(country_state_schema(), options);
    assert!(form.set_field_value("country", json!("us"), false).is_empty());
    assert_eq!(form.value("state"), Some(&json!("NY")));
}

#[test]
fn equality_clear_rules_fire_once_and_allow_refill() {
    let plan = FieldSchema::new("plan", FieldType::Radio);
    let mut seats = FieldSchema::new("seats", FieldType::Number);
    seats.clear_value_rules = vec![ConditionRule::new("plan", Operator::Eq, "solo")];
    let mut note = FieldSchema::new("note", FieldType::Text);
    note.default_value = Some(json!("hello"));

    let options = FormOptions::default().with_initial_values(bag(json!({"seats": 5})));
    let mut form = FormController::new(schema(vec![plan, seats, note]), options);

    assert_eq!(form.set_field_value("plan", json!("solo"), false), vec!["seats"]);
    assert_eq!(form.value("seats"), Some(&json!("")));

    form.set_field_value("seats", json!(2), false);
    form.set_field_value("note", json!("bye"), false);
    assert_eq!(form.value("seats"), Some(&json!(2)));
}

#[test]
fn clears_cascade_through_dependent_fields() {
    let region = FieldSchema::new("region", FieldType::Select);
    let mut country = FieldSchema::new("country", FieldType::Select);
    country.clear_value_rules =
        vec![ConditionRule::new("region", Operator::Changed, Value::Null)];
    let mut cities = FieldSchema::new("cities", FieldType::Autocomplete);
    cities.multiple = true;
    cities.clear_value_rules =
        vec![ConditionRule::new("country", Operator::Changed, Value::Null)];

    let options = FormOptions::default().with_initial_values(bag(json!({
        "region": "eu",
        "country": "no",
        "cities": ["oslo"]
    })));
    let mut form = FormController::new(schema(vec![region, country, cities]), options);

    let cleared = form.set_field_value("region", json!("na"), false);

    assert_eq!(cleared, vec!["country", "cities"]);
    assert_eq!(form.value("country"), Some(&json!("")));
    assert_eq!(form.value("cities"), Some(&json!([])));
}

#[test]
fn empty_values_follow_field_type_when_clearing() {
    let trigger = FieldSchema::new("mode", FieldType::Select);
    let rule = || vec![ConditionRule::new("mode", Operator::Changed, Value::Null)];
    let mut stay = FieldSchema::new("stay", FieldType::Daterange);
    stay.clear_value_rules = rule();
    let mut agree = FieldSchema::new("agree", FieldType::Checkbox);
    agree.clear_value_rules = rule();
    let mut born = FieldSchema::new("born", FieldType::Date);
    born.clear_value_rules = rule();

    let options = FormOptions::default().with_initial_values(bag(json!({
        "mode": "a",
        "stay": {"start": "2025-01-01", "end": "2025-01-02"},
        "agree": true,
        "born": "2000-01-01"
    })));
    let mut form = FormController::new(schema(vec![trigger, stay, agree, born]), options);
    form.set_field_value("mode", json!("b"), false);

    assert_eq!(form.value("stay"), Some(&json!({"start": null, "end": null})));
    assert_eq!(form.value("agree"), Some(&json!(false)));
    assert_eq!(form.value("born"), Some(&Value::Null));
}

#[test]
fn disable_rule_tracks_notify_switch() {
    let notify = FieldSchema::new("notify", FieldType::Switch);
    let mut frequency = FieldSchema::new("frequency", FieldType::Radio);
    frequency.disable_rules = vec![ConditionRule::new("notify", Operator::Neq, true)];
    let mut form = FormController::new(schema(vec![notify, frequency]), FormOptions::default());

    let field = form.schema().field("frequency").cloned().unwrap();
    assert!(form.render_decision(&field).disabled);

    form.set_field_value("notify", json!(true), false);
    assert!(!form.render_decision(&field).disabled);
    assert_eq!(form.value("frequency"), Some(&json!("")));
    assert!(form.errors().is_empty());
}

#[test]
fn failed_submit_blocks_callback_until_fixed() {
    let calls = Rc::new(Cell::new(0));
    let submitted = Rc::new(RefCell::new(None));
    let options = {
        let calls = calls.clone();
        let submitted = submitted.clone();
        FormOptions::default().with_submit_handler(move |values: &ValueBag| {
            calls.set(calls.get() + 1);
            *submitted.borrow_mut() = Some(values.clone());
        })
    };
    let mut form = FormController::new(
        schema(vec![required_text("fullName", "Name is required")]),
        options,
    );

    assert_eq!(form.handle_submit(), SubmitOutcome::Rejected { errors: 1 });
    assert!(form.is_submitted());
    assert_eq!(calls.get(), 0);
    assert_eq!(form.displayed_error("fullName"), Some("Name is required"));

    form.set_field_value("fullName", json!("Ada"), false);
    assert!(form.errors().is_empty());
    assert_eq!(form.handle_submit(), SubmitOutcome::Submitted);
    assert_eq!(calls.get(), 1);
    assert_eq!(
        submitted.borrow().as_ref().and_then(|values| values.get("fullName")),
        Some(&json!("Ada"))
    );
}

#[test]
fn errors_are_hidden_until_touched_or_submitted() {
    let options = FormOptions::default().with_mode(ValidationMode::OnChange);
    let mut form = FormController::new(
        schema(vec![required_text("email", "Email is required")]),
        options,
    );

    form.set_field_value("email", json!(""), false);
    assert_eq!(
        form.errors().get("email").map(String::as_str),
        Some("Email is required")
    );
    assert_eq!(form.displayed_error("email"), None);

    form.handle_blur("email");
    assert!(form.is_touched("email"));
    assert_eq!(form.displayed_error("email"), Some("Email is required"));
}

#[test]
fn on_submit_mode_defers_validation() {
    let mut form = FormController::new(
        schema(vec![required_text("name", "Required!")]),
        FormOptions::default(),
    );
    form.set_field_value("name", json!(""), false);
    form.handle_blur("name");
    assert!(form.errors().is_empty());

    form.set_field_value("name", json!(""), true);
    assert_eq!(form.errors().len(), 1);
}

#[test]
fn on_blur_mode_validates_when_leaving_a_field() {
    let options = FormOptions::default().with_mode(ValidationMode::OnBlur);
    let mut form =
        FormController::new(schema(vec![required_text("name", "Required!")]), options);
    form.set_field_value("name", json!(""), false);
    assert!(form.errors().is_empty());
    form.handle_blur("name");
    assert_eq!(form.displayed_error("name"), Some("Required!"));
}

#[test]
fn validate_on_change_flag_is_per_field() {
    let mut eager = required_text("eager", "Eager required");
    eager.validate_on_change = true;
    let mut form = FormController::new(
        schema(vec![eager, required_text("lazy", "Lazy required")]),
        FormOptions::default(),
    );
    form.set_field_value("lazy", json!(""), false);
    assert!(form.errors().is_empty());
    form.set_field_value("eager", json!(""), false);
    assert_eq!(form.errors().len(), 2);
}

#[test]
fn reset_restores_defaults_and_clears_state() {
    let mut form = FormController::new(
        schema(vec![required_text("name", "Required!")]),
        FormOptions::default(),
    );
    form.set_field_value("name", json!("Grace"), false);
    form.handle_blur("name");
    form.set_field_value("name", json!(""), false);
    form.handle_submit();

    form.reset();

    assert_eq!(form.values(), &bag(json!({"name": ""})));
    assert!(form.errors().is_empty());
    assert!(form.touched().is_empty());
    assert!(!form.is_submitted());
    assert!(form.previous_values().is_none());
}

#[test]
fn custom_validator_overrides_compiled_errors() {
    let password = required_text("password", "Password required");
    let confirm = FieldSchema::new("confirm", FieldType::Password);
    let options = FormOptions::default().with_validator(|values: &ValueBag| {
        let mut errors = ErrorMap::new();
        if values.get("password") != values.get("confirm") {
            errors.insert("confirm".into(), "Passwords differ".into());
        }
        if values.get("password") == Some(&json!("")) {
            errors.insert("password".into(), "Pick a password".into());
        }
        errors
    });
    let mut form = FormController::new(schema(vec![password, confirm]), options);

    form.set_field_value("confirm", json!("x"), false);
    form.handle_submit();

    assert_eq!(form.errors()["password"], "Pick a password");
    assert_eq!(form.errors()["confirm"], "Passwords differ");
}

#[test]
fn render_decisions_combine_rules_and_flags() {
    let role = FieldSchema::new("role", FieldType::Select);
    let mut other = required_text("otherRole", "Please specify");
    other.visibility_rules = vec![ConditionRule::new("role", Operator::Eq, "other")];
    other.reserve_space = true;
    let mut secret = FieldSchema::new("secret", FieldType::Text);
    secret.hidden = true;

    let mut form = FormController::new(schema(vec![role, other, secret]), FormOptions::default());
    let decisions = form.render_decisions();
    assert!(decisions[0].1.visible);
    assert!(!decisions[1].1.visible);
    assert!(decisions[1].1.reserve_space);
    assert!(!decisions[2].1.visible);
    assert!(!decisions[2].1.reserve_space);

    form.set_field_value("role", json!("other"), false);
    form.handle_submit();
    let field = form.schema().field("otherRole").cloned().unwrap();
    let decision = form.render_decision(&field);
    assert!(decision.visible);
    assert_eq!(decision.error.as_deref(), Some("Please specify"));
}

#[test]
fn commands_dispatch_to_operations() {
    let mut form = FormController::new(
        schema(vec![required_text("name", "Required!")]),
        FormOptions::default(),
    );
    assert_eq!(
        form.dispatch(FormCommand::set("name", "")),
        FormEvent::Changed { cleared: vec![] }
    );
    assert_eq!(form.dispatch(FormCommand::blur("name")), FormEvent::Blurred);
    assert_eq!(
        form.dispatch(FormCommand::Submit),
        FormEvent::Submitted(SubmitOutcome::Rejected { errors: 1 })
    );
    assert_eq!(form.dispatch(FormCommand::Reset), FormEvent::Reset);
    assert!(!form.is_submitted());
}

#[test]
fn initial_values_layer_over_defaults() {
    let options = FormOptions::default().with_initial_values(bag(json!({"name": "Linus"})));
    let form = FormController::new(
        schema(vec![
            FieldSchema::new("name", FieldType::Text),
            FieldSchema::new("agree", FieldType::Checkbox),
        ]),
        options,
    );
    assert_eq!(form.values(), &bag(json!({"name": "Linus", "agree": false})));
}

fn digits_only(restrict: bool) -> FieldSchema {
    let mut zip = FieldSchema::new("zip", FieldType::Text);
    zip.restrict_input = restrict;
    zip.validation = vec![
        ValidationRule::new(ValidationKind::Pattern)
            .with_value("^[0-9]*$")
            .with_message("Digits only"),
    ];
    zip
}

#[test]
fn restricted_input_refuses_text_outside_the_pattern() {
    let mut form = FormController::new(schema(vec![digits_only(true)]), FormOptions::default());

    form.set_field_value("zip", json!("123"), false);
    assert_eq!(form.value("zip"), Some(&json!("123")));

    form.set_field_value("zip", json!("12a"), false);
    assert_eq!(form.value("zip"), Some(&json!("123")));
    assert_eq!(
        form.dispatch(FormCommand::set("zip", "x")),
        FormEvent::Rejected
    );

    form.set_field_value("zip", json!(""), false);
    assert_eq!(form.value("zip"), Some(&json!("")));
}

#[test]
fn unrestricted_input_is_written_and_validated_later() {
    let mut form = FormController::new(schema(vec![digits_only(false)]), FormOptions::default());
    form.set_field_value("zip", json!("12a"), false);
    assert_eq!(form.value("zip"), Some(&json!("12a")));
    assert_eq!(form.validate().get("zip").map(String::as_str), Some("Digits only"));
}

#[test]
fn clearing_a_field_uses_the_empty_value_of_its_type() {
    let mut tags = FieldSchema::new("tags", FieldType::Select);
    tags.multiple = true;
    let mut note = FieldSchema::new("note", FieldType::Text);
    note.clear_value_rules = vec![ConditionRule::new("name", Operator::Changed, Value::Null)];
    let options = FormOptions::default().with_initial_values(bag(json!({
        "name": "Ada",
        "note": "hello",
        "tags": ["a", "b"],
        "stay": {"start": "2025-01-01", "end": "2025-01-03"},
    })));
    let mut form = FormController::new(
        schema(vec![
            FieldSchema::new("name", FieldType::Text),
            note,
            tags,
            FieldSchema::new("stay", FieldType::Daterange),
        ]),
        options,
    );

    assert_eq!(form.clear_field("tags"), Vec::<String>::new());
    assert_eq!(form.value("tags"), Some(&json!([])));

    form.clear_field("stay");
    assert_eq!(form.value("stay"), Some(&json!({"start": null, "end": null})));

    let cleared = form.clear_field("name");
    assert_eq!(form.value("name"), Some(&json!("")));
    assert_eq!(cleared, vec!["note".to_string()]);
    assert_eq!(form.value("note"), Some(&json!("")));

    assert!(form.clear_field("missing").is_empty());
    assert_eq!(
        form.dispatch(FormCommand::clear("tags")),
        FormEvent::Changed { cleared: vec![] }
    );
}

#[test]
fn values_listener_sees_every_change() {
    let calls = Rc::new(Cell::new(0));
    let last = Rc::new(RefCell::new(ValueBag::new()));
    let options = FormOptions::default()
        .with_initial_values(bag(json!({"country": "us", "state": "NY"})))
        .with_values_listener({
            let calls = Rc::clone(&calls);
            let last = Rc::clone(&last);
            move |values: &ValueBag| {
                calls.set(calls.get() + 1);
                *last.borrow_mut() = values.clone();
            }
        });
    let mut form = FormController::new(country_state_schema(), options);
    assert_eq!(calls.get(), 0);

    form.set_field_value("country", json!("ca"), false);
    assert_eq!(calls.get(), 1);
    assert_eq!(*last.borrow(), bag(json!({"country": "ca", "state": ""})));

    form.clear_field("country");
    assert_eq!(calls.get(), 2);
    assert_eq!(last.borrow().get("country"), Some(&json!("")));

    form.reset();
    assert_eq!(calls.get(), 3);
    assert_eq!(*last.borrow(), bag(json!({"country": "us", "state": "NY"})));
}
