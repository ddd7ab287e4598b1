//! Schema questions about a message instance's fields.
//!
//! All lookups go through protobuf reflection on `&dyn MessageDyn`, so they
//! work the same for generated and dynamic messages. Unknown names are
//! answered with `false`/`None`, never with an error.

use crate::registry::SchemaRegistry;
use protobuf::reflect::{FieldDescriptor, MessageDescriptor, RuntimeFieldType, RuntimeType};
use protobuf::MessageDyn;

/// How a field stores its value.
#[derive(Clone)]
pub enum FieldKind {
    /// Singular non-message field
    Scalar(RuntimeType),
    /// Singular message field
    Message(MessageDescriptor),
    /// Repeated field of the given element type
    Repeated(RuntimeType),
    /// `map<K, V>` field
    Map(RuntimeType, RuntimeType),
}

/// Handle to a declared field, used to read or write it by reflection.
#[derive(Clone)]
pub struct FieldHandle {
    descriptor: FieldDescriptor,
}

impl FieldHandle {
    pub fn name(&self) -> &str {
        self.descriptor.name()
    }

    pub fn descriptor(&self) -> &FieldDescriptor {
        &self.descriptor
    }

    pub fn kind(&self) -> FieldKind {
        match self.descriptor.runtime_field_type() {
            RuntimeFieldType::Singular(RuntimeType::Message(m)) => FieldKind::Message(m),
            RuntimeFieldType::Singular(t) => FieldKind::Scalar(t),
            RuntimeFieldType::Repeated(t) => FieldKind::Repeated(t),
            RuntimeFieldType::Map(k, v) => FieldKind::Map(k, v),
        }
    }

    /// The message type referenced by the field, for singular, repeated and
    /// map-value message fields.
    pub fn referenced_message(&self) -> Option<MessageDescriptor> {
        match self.kind() {
            FieldKind::Message(m)
            | FieldKind::Repeated(RuntimeType::Message(m))
            | FieldKind::Map(_, RuntimeType::Message(m)) => Some(m),
            _ => None,
        }
    }

    /// Human-readable declared type, e.g. `repeated string`.
    pub fn describe(&self) -> String {
        match self.kind() {
            FieldKind::Scalar(t) => describe_runtime_type(&t),
            FieldKind::Message(m) => format!("message {}", m.full_name()),
            FieldKind::Repeated(t) => format!("repeated {}", describe_runtime_type(&t)),
            FieldKind::Map(k, v) => format!(
                "map<{}, {}>",
                describe_runtime_type(&k),
                describe_runtime_type(&v)
            ),
        }
    }
}

/// Name of a runtime type as written in .proto sources.
pub fn describe_runtime_type(t: &RuntimeType) -> String {
    match t {
        RuntimeType::I32 => "int32".to_string(),
        RuntimeType::I64 => "int64".to_string(),
        RuntimeType::U32 => "uint32".to_string(),
        RuntimeType::U64 => "uint64".to_string(),
        RuntimeType::F32 => "float".to_string(),
        RuntimeType::F64 => "double".to_string(),
        RuntimeType::Bool => "bool".to_string(),
        RuntimeType::String => "string".to_string(),
        RuntimeType::VecU8 => "bytes".to_string(),
        RuntimeType::Enum(e) => format!("enum {}", e.full_name()),
        RuntimeType::Message(m) => format!("message {}", m.full_name()),
    }
}

/// True iff the message type declares a field named `key`.
pub fn field_exists(message: &dyn MessageDyn, key: &str) -> bool {
    message.descriptor_dyn().field_by_name(key).is_some()
}

/// Handle for the field named `key`, or `None` if it is not declared.
pub fn get_field(message: &dyn MessageDyn, key: &str) -> Option<FieldHandle> {
    message
        .descriptor_dyn()
        .field_by_name(key)
        .map(|descriptor| FieldHandle { descriptor })
}

/// Resolve the message type referenced by field `key` through the registry.
///
/// Returns `None` when the field is undeclared, is not message-typed, or its
/// type name is unknown to the registry.
pub fn resolve_message_type(
    registry: &SchemaRegistry,
    message: &dyn MessageDyn,
    key: &str,
) -> Option<MessageDescriptor> {
    let referenced = get_field(message, key)?.referenced_message()?;
    registry.resolve_path(referenced.full_name().split('.'))
}

/// Fully qualified type name of a message instance: package, enclosing
/// types and name, dot separated (e.g. `example.Example.Nested`).
pub fn message_type_name(message: &dyn MessageDyn) -> String {
    message.descriptor_dyn().full_name().to_string()
}
