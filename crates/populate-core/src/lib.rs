//! Populate protobuf messages from untyped nested values.
//!
//! This crate converts a loosely-typed tree of mappings, sequences and
//! scalars into a protobuf message, following the message's field graph
//! through protobuf reflection. It works with generated messages and with
//! dynamic messages built from runtime descriptors.
//!
//! # Architecture
//!
//! ```text
//! InputValue ──► Populator ──► &mut dyn MessageDyn
//!                   │
//!                   ├── value     (shape: mapping / sequence / scalar)
//!                   ├── resolver  (field lookup, nested type resolution)
//!                   │      └── registry (full name → message type)
//!                   └── scalar    (input scalar → reflect value)
//! ```
//!
//! # Example
//!
//! ```ignore
//! use populate_core::{convert, InputValue, SchemaRegistry};
//!
//! let registry = SchemaRegistry::from_files(schema.files());
//! let mut message = registry.get("example.Example").unwrap().new_instance();
//! let data = InputValue::from(serde_json::json!({"key": "1", "values": ["1", "2"]}));
//! convert(&registry, &mut *message, &data, true)?;
//! ```

pub mod error;
pub mod populate;
pub mod registry;
pub mod resolver;
pub mod scalar;
pub mod value;

pub use error::{PopulateError, Result};
pub use populate::{ConversionState, Populator};
pub use registry::SchemaRegistry;
pub use resolver::{field_exists, get_field, message_type_name, resolve_message_type, FieldHandle};
pub use value::{InputValue, Shape};

use protobuf::{MessageDyn, MessageFull};

/// Populate `message` in place from `data` and return it.
///
/// `data` must be a mapping. With `strict` set, any key that is not a
/// declared field, at any depth, aborts the conversion with
/// [`PopulateError::MissingKey`]; otherwise such keys are ignored.
pub fn convert<'m>(
    registry: &SchemaRegistry,
    message: &'m mut dyn MessageDyn,
    data: &InputValue,
    strict: bool,
) -> Result<&'m mut dyn MessageDyn> {
    let entries = data.as_mapping().ok_or_else(|| PopulateError::NotAMapping {
        message_type: message_type_name(message),
        value: data.to_string(),
    })?;

    Populator::new(registry, ConversionState::new(strict)).populate(message, entries)?;
    Ok(message)
}

/// Build a new generated message of type `M` from `data`.
///
/// Nothing is returned on failure, so callers never observe a partially
/// populated instance.
pub fn convert_into<M: MessageFull>(
    registry: &SchemaRegistry,
    data: &InputValue,
    strict: bool,
) -> Result<M> {
    let mut message = M::new();
    convert(registry, &mut message, data, strict)?;
    Ok(message)
}

/// Build a new message of the registered type `type_name` from `data`.
pub fn convert_new(
    registry: &SchemaRegistry,
    type_name: &str,
    data: &InputValue,
    strict: bool,
) -> Result<Box<dyn MessageDyn>> {
    let descriptor = registry
        .get(type_name)
        .ok_or_else(|| PopulateError::UnknownMessageType(type_name.to_string()))?;

    let mut message = descriptor.new_instance();
    convert(registry, &mut *message, data, strict)?;
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proto_schema::ProtoSchema;
    use serde_json::json;

    fn registry() -> SchemaRegistry {
        let schema = ProtoSchema::from_string(
            r#"
                syntax = "proto3";
                package demo;
                message Item { string name = 1; int32 qty = 2; }
            "#,
        )
        .expect("Failed to parse proto");
        SchemaRegistry::from_files(schema.files())
    }

    #[test]
    fn test_convert_returns_the_same_instance() {
        let registry = registry();
        let mut message = registry.get("demo.Item").expect("Item").new_instance();
        let original: *const dyn MessageDyn = &*message;

        let data = InputValue::from(json!({"name": "bolt", "qty": 3}));
        let returned = convert(&registry, &mut *message, &data, true).expect("convert");
        let returned: *const dyn MessageDyn = &*returned;

        assert!(std::ptr::addr_eq(original, returned));
    }

    #[test]
    fn test_convert_rejects_non_mapping_input() {
        let registry = registry();
        let mut message = registry.get("demo.Item").expect("Item").new_instance();

        let err = convert(&registry, &mut *message, &InputValue::from(vec![1, 2]), false)
            .err()
            .expect("sequence input must fail");
        assert_eq!(
            err,
            PopulateError::NotAMapping {
                message_type: "demo.Item".to_string(),
                value: "[1, 2]".to_string(),
            }
        );
    }

    #[test]
    fn test_convert_new_uses_registry_factory() {
        let registry = registry();
        let data = InputValue::from(json!({"name": "nut"}));

        let message = convert_new(&registry, "demo.Item", &data, true).expect("convert_new");
        assert_eq!(message_type_name(&*message), "demo.Item");

        let err = convert_new(&registry, "demo.Missing", &data, true)
            .err()
            .expect("unknown type must fail");
        assert_eq!(
            err,
            PopulateError::UnknownMessageType("demo.Missing".to_string())
        );
    }

    #[test]
    fn test_convert_into_generated_message() {
        use protobuf::well_known_types::timestamp::Timestamp;

        let mut registry = SchemaRegistry::new();
        registry.register::<Timestamp>();

        let data = InputValue::from(json!({"seconds": 1_700_000_000, "nanos": 5}));
        let ts: Timestamp = convert_into(&registry, &data, true).expect("convert_into");
        assert_eq!(ts.seconds, 1_700_000_000);
        assert_eq!(ts.nanos, 5);

        let bad = InputValue::from(json!({"seconds": 1, "millis": 2}));
        let err = convert_into::<Timestamp>(&registry, &bad, true)
            .err()
            .expect("strict conversion must fail");
        assert_eq!(
            err,
            PopulateError::MissingKey {
                key: "millis".to_string(),
                message_type: "google.protobuf.Timestamp".to_string(),
            }
        );
    }

    #[test]
    fn test_generated_repeated_messages() {
        use protobuf::descriptor::field_descriptor_proto::Type;
        use protobuf::descriptor::FileDescriptorProto;

        let registry = SchemaRegistry::from_files([protobuf::descriptor::file_descriptor()]);
        let data = InputValue::from(json!({
            "name": "shop.proto",
            "dependency": ["common.proto"],
            "message_type": [
                {"name": "Order", "field": [{"name": "id", "number": 1, "type": "TYPE_STRING"}]},
                {"name": "Line"},
            ],
        }));

        let file: FileDescriptorProto = convert_into(&registry, &data, true).expect("convert_into");
        assert_eq!(file.name(), "shop.proto");
        assert_eq!(file.dependency, vec!["common.proto".to_string()]);
        assert_eq!(file.message_type.len(), 2);
        assert_eq!(file.message_type[0].name(), "Order");
        assert_eq!(file.message_type[0].field[0].number(), 1);
        assert_eq!(file.message_type[0].field[0].type_(), Type::TYPE_STRING);
        assert_eq!(file.message_type[1].name(), "Line");
    }

    #[test]
    fn test_error_key_accessor() {
        let registry = registry();
        let data = InputValue::from(json!({"colour": "red"}));
        let err = convert_new(&registry, "demo.Item", &data, true)
            .err()
            .expect("strict conversion must fail");
        assert_eq!(err.key(), Some("colour"));
    }
}
