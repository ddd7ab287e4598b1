//! Conversion scenarios against the `Example` fixture schema.

mod common;

use common::{get_message, get_string, load_registry, repeated, repeated_strings};
use populate_core::{convert, InputValue, PopulateError, SchemaRegistry};
use protobuf::reflect::ReflectValueRef;
use protobuf::MessageDyn;
use serde_json::json;

fn new_example(registry: &SchemaRegistry) -> Box<dyn MessageDyn> {
    registry
        .get("Example")
        .expect("Example message not found")
        .new_instance()
}

fn canonical_input() -> InputValue {
    InputValue::from(json!({
        "key": "1",
        "values": ["1", "2", "3"],
        "nested": {"value": "1"},
        "nested_values": [{"value": "1"}, {"value": "2"}],
    }))
}

#[test]
fn test_canonical_example() {
    let registry = load_registry("example.proto");
    let mut message = new_example(&registry);

    let ex = convert(&registry, &mut *message, &canonical_input(), false).expect("convert");

    assert_eq!(get_string(&*ex, "key"), "1");
    assert_eq!(repeated_strings(&*ex, "values"), vec!["1", "2", "3"]);
    assert_eq!(get_string(&*get_message(&*ex, "nested"), "value"), "1");

    let nested_values = repeated(&*ex, "nested_values");
    assert_eq!(nested_values.len(), 2);
    for (element, expected) in nested_values.iter().zip(["1", "2"]) {
        match element {
            ReflectValueRef::Message(m) => assert_eq!(get_string(&**m, "value"), expected),
            other => panic!("element is not a message: {other:?}"),
        }
    }
}

#[test]
fn test_strict_and_non_strict_agree_on_known_keys() {
    let registry = load_registry("example.proto");

    let mut lenient = new_example(&registry);
    convert(&registry, &mut *lenient, &canonical_input(), false).expect("non-strict");
    let mut strict = new_example(&registry);
    convert(&registry, &mut *strict, &canonical_input(), true).expect("strict");

    assert_eq!(
        lenient.write_to_bytes_dyn().expect("encode"),
        strict.write_to_bytes_dyn().expect("encode")
    );
}

#[test]
fn test_conversion_is_repeatable_on_fresh_instances() {
    let registry = load_registry("example.proto");

    let mut first = new_example(&registry);
    convert(&registry, &mut *first, &canonical_input(), true).expect("first");
    let mut second = new_example(&registry);
    convert(&registry, &mut *second, &canonical_input(), true).expect("second");

    assert_eq!(
        first.write_to_bytes_dyn().expect("encode"),
        second.write_to_bytes_dyn().expect("encode")
    );
    assert_eq!(common::text(&*first), common::text(&*second));
}

#[test]
fn test_strict_unknown_key_at_root() {
    let registry = load_registry("example.proto");
    let mut message = new_example(&registry);

    let err = convert(
        &registry,
        &mut *message,
        &InputValue::from(json!({"unknown-key": 1})),
        true,
    )
    .err()
    .expect("strict conversion must fail");

    assert_eq!(
        err,
        PopulateError::MissingKey {
            key: "unknown-key".to_string(),
            message_type: "Example".to_string(),
        }
    );
}

#[test]
fn test_strict_unknown_key_in_nested_message() {
    let registry = load_registry("example.proto");
    let mut message = new_example(&registry);

    let err = convert(
        &registry,
        &mut *message,
        &InputValue::from(json!({"nested": {"unknown-key": 1}})),
        true,
    )
    .err()
    .expect("strict conversion must fail");

    assert_eq!(
        err.to_string(),
        "'unknown-key' not described in the 'Example.Nested' message"
    );
}

#[test]
fn test_strict_unknown_key_in_repeated_nested_message() {
    let registry = load_registry("example.proto");
    let mut message = new_example(&registry);

    let err = convert(
        &registry,
        &mut *message,
        &InputValue::from(json!({"nested_values": [{"value": "1"}, {"unknown-key": 1}]})),
        true,
    )
    .err()
    .expect("strict conversion must fail");

    assert!(matches!(
        err,
        PopulateError::MissingKey { ref key, ref message_type }
            if key == "unknown-key" && message_type == "Example.Nested"
    ));
    // The first element was complete and stays appended.
    assert_eq!(repeated(&*message, "nested_values").len(), 1);
}

#[test]
fn test_non_strict_drops_unknown_keys_only() {
    let registry = load_registry("example.proto");
    let mut message = new_example(&registry);

    let data = InputValue::from(json!({
        "unknown-key": 1,
        "key": "1",
        "nested": {"value": "1", "unknown-key": [1, 2]},
        "nested_values": [{"value": "2", "unknown-key": {"a": 1}}],
    }));
    convert(&registry, &mut *message, &data, false).expect("non-strict conversion");

    assert_eq!(get_string(&*message, "key"), "1");
    assert_eq!(get_string(&*get_message(&*message, "nested"), "value"), "1");
    assert_eq!(repeated(&*message, "nested_values").len(), 1);
}

#[test]
fn test_mapping_into_string_field() {
    let registry = load_registry("example.proto");
    let mut message = new_example(&registry);

    let err = convert(
        &registry,
        &mut *message,
        &InputValue::from(json!({"key": {"value": "1"}})),
        true,
    )
    .err()
    .expect("mapping into string field must fail");

    assert_eq!(
        err.to_string(),
        r#"'key' is wrong type. Expected type string but got value: {"value": "1"}"#
    );
}

#[test]
fn test_empty_sequence_appends_nothing() {
    let registry = load_registry("example.proto");
    let mut message = new_example(&registry);

    convert(
        &registry,
        &mut *message,
        &InputValue::from(json!({"values": [], "nested_values": []})),
        true,
    )
    .expect("convert");

    assert!(repeated(&*message, "values").is_empty());
    assert!(repeated(&*message, "nested_values").is_empty());
}
