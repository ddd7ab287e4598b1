//! Shared helpers for integration tests.

#![allow(dead_code)]

use populate_core::SchemaRegistry;
use proto_schema::ProtoSchema;
use protobuf::reflect::{FieldDescriptor, MessageRef, ReflectValueRef};
use protobuf::MessageDyn;
use std::path::{Path, PathBuf};

pub fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn load_registry(proto: &str) -> SchemaRegistry {
    let schema = ProtoSchema::from_file(fixture(proto)).expect("Failed to load fixture schema");
    SchemaRegistry::from_files(schema.files())
}

pub fn field(message: &dyn MessageDyn, name: &str) -> FieldDescriptor {
    message
        .descriptor_dyn()
        .field_by_name(name)
        .unwrap_or_else(|| panic!("field {name} not declared"))
}

pub fn get<'a>(message: &'a dyn MessageDyn, name: &str) -> ReflectValueRef<'a> {
    field(message, name).get_singular_field_or_default(message)
}

pub fn get_string(message: &dyn MessageDyn, name: &str) -> String {
    match get(message, name) {
        ReflectValueRef::String(s) => s.to_string(),
        other => panic!("{name} is not a string: {other:?}"),
    }
}

pub fn get_message<'a>(message: &'a dyn MessageDyn, name: &str) -> MessageRef<'a> {
    match get(message, name) {
        ReflectValueRef::Message(m) => m,
        other => panic!("{name} is not a message: {other:?}"),
    }
}

pub fn repeated<'a>(message: &'a dyn MessageDyn, name: &str) -> Vec<ReflectValueRef<'a>> {
    let values = field(message, name).get_repeated(message);
    (0..values.len()).map(|i| values.get(i)).collect()
}

pub fn repeated_strings(message: &dyn MessageDyn, name: &str) -> Vec<String> {
    repeated(message, name)
        .into_iter()
        .map(|v| match v {
            ReflectValueRef::String(s) => s.to_string(),
            other => panic!("{name} element is not a string: {other:?}"),
        })
        .collect()
}

pub fn text(message: &dyn MessageDyn) -> String {
    protobuf::text_format::print_to_string(message)
}
