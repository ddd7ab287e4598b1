//! Recursive population of a message from an input mapping.
//!
//! For every key the populator checks the field exists (failing in strict
//! mode, skipping otherwise) and dispatches on the input shape:
//!
//! ```text
//! mapping  → singular message field: recurse into the nested message
//!            map field:              insert one entry per input pair
//! sequence → repeated message field: build, recurse and append per element
//!            repeated scalar field:  append each coerced element
//! scalar   → singular scalar field:  coerce and set
//! ```
//!
//! Errors propagate unchanged to the caller. Fields written before the
//! failing key stay written.

use crate::error::{PopulateError, Result};
use crate::registry::SchemaRegistry;
use crate::resolver::{
    field_exists, get_field, message_type_name, resolve_message_type, FieldHandle, FieldKind,
};
use crate::scalar::{map_key, to_reflect_value};
use crate::value::{InputValue, Shape};
use protobuf::reflect::{FileDescriptor, MessageDescriptor, ReflectValueBox, RuntimeType};
use protobuf::MessageDyn;
use std::collections::BTreeMap;

/// Settings shared by every level of one conversion.
///
/// Built once by the entry point and copied into each recursive call; it has
/// no setters, so nested levels always see the mode of the top-level call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConversionState {
    strict: bool,
}

impl ConversionState {
    pub fn new(strict: bool) -> Self {
        Self { strict }
    }

    /// Whether unknown keys abort the conversion.
    pub fn strict(&self) -> bool {
        self.strict
    }
}

/// Walks an input mapping and writes it into a message.
pub struct Populator<'r> {
    registry: &'r SchemaRegistry,
    state: ConversionState,
}

impl<'r> Populator<'r> {
    pub fn new(registry: &'r SchemaRegistry, state: ConversionState) -> Self {
        Self { registry, state }
    }

    /// Populate `message` in place from `data`.
    pub fn populate(
        &self,
        message: &mut dyn MessageDyn,
        data: &BTreeMap<String, InputValue>,
    ) -> Result<()> {
        for (key, value) in data {
            self.enforce_strictness(message, key)?;

            if !field_exists(message, key) {
                tracing::debug!(
                    "Skipping key '{}' not described in '{}'",
                    key,
                    message_type_name(message)
                );
                continue;
            }

            tracing::trace!(
                "Populating '{}.{}' from {}",
                message_type_name(message),
                key,
                value.kind()
            );

            match value.shape() {
                Shape::Mapping(entries) => self.update_message(message, key, value, entries)?,
                Shape::Sequence(items) => self.update_repeated(message, key, value, items)?,
                Shape::Scalar(scalar) => self.update_value(message, key, scalar)?,
            }
        }
        Ok(())
    }

    fn enforce_strictness(&self, message: &dyn MessageDyn, key: &str) -> Result<()> {
        if self.state.strict() && !field_exists(message, key) {
            return Err(missing_key(message, key));
        }
        Ok(())
    }

    fn update_message(
        &self,
        message: &mut dyn MessageDyn,
        key: &str,
        value: &InputValue,
        entries: &BTreeMap<String, InputValue>,
    ) -> Result<()> {
        let field = get_field(message, key).ok_or_else(|| missing_key(message, key))?;

        match field.kind() {
            FieldKind::Message(_) => {
                let nested = field.descriptor().mut_message(message);
                self.populate(nested, entries)
            }
            FieldKind::Map(key_type, value_type) => {
                self.update_map(message, &field, &key_type, &value_type, entries)
            }
            FieldKind::Scalar(_) | FieldKind::Repeated(_) => Err(PopulateError::KeyType {
                key: key.to_string(),
                expected: field.describe(),
                value: value.to_string(),
            }),
        }
    }

    fn update_map(
        &self,
        message: &mut dyn MessageDyn,
        field: &FieldHandle,
        key_type: &RuntimeType,
        value_type: &RuntimeType,
        entries: &BTreeMap<String, InputValue>,
    ) -> Result<()> {
        let key = field.name();
        let element_type = match value_type {
            RuntimeType::Message(_) => self.element_type(message, field)?,
            _ => None,
        };

        // Entries are built before the map is touched, so a bad entry leaves
        // the map unchanged.
        let mut built = Vec::with_capacity(entries.len());
        for (entry_key, entry_value) in entries {
            let k = map_key(entry_key, key_type).map_err(|reason| PopulateError::Assignment {
                key: key.to_string(),
                value: format!("{entry_key:?}"),
                reason,
            })?;
            let v = match &element_type {
                Some(descriptor) => self.build_element(key, descriptor, entry_value)?,
                None => coerce_element(message, key, value_type, entry_value)?,
            };
            built.push((k, v));
        }

        let mut map = field.descriptor().mut_map(message);
        for (k, v) in built {
            map.insert(k, v);
        }
        Ok(())
    }

    fn update_repeated(
        &self,
        message: &mut dyn MessageDyn,
        key: &str,
        value: &InputValue,
        items: &[InputValue],
    ) -> Result<()> {
        let field = get_field(message, key).ok_or_else(|| missing_key(message, key))?;

        let element_runtime_type = match field.kind() {
            FieldKind::Repeated(t) => t,
            FieldKind::Scalar(_) | FieldKind::Message(_) | FieldKind::Map(..) => {
                return Err(PopulateError::KeyType {
                    key: key.to_string(),
                    expected: field.describe(),
                    value: value.to_string(),
                })
            }
        };

        match self.element_type(message, &field)? {
            Some(descriptor) => {
                for item in items {
                    let element = self.build_element(key, &descriptor, item)?;
                    field.descriptor().mut_repeated(message).push(element);
                }
            }
            None => {
                for item in items {
                    let element = coerce_element(message, key, &element_runtime_type, item)?;
                    field.descriptor().mut_repeated(message).push(element);
                }
            }
        }
        Ok(())
    }

    fn update_value(&self, message: &mut dyn MessageDyn, key: &str, value: &InputValue) -> Result<()> {
        let field = get_field(message, key).ok_or_else(|| missing_key(message, key))?;

        let runtime_type = match field.kind() {
            FieldKind::Scalar(t) => t,
            FieldKind::Message(m) => RuntimeType::Message(m),
            FieldKind::Repeated(_) | FieldKind::Map(..) => {
                return Err(assignment(
                    key,
                    value,
                    format!("assignment not allowed to {} field", field.describe()),
                ))
            }
        };

        let boxed = to_reflect_value(value, &runtime_type, &scope(message))
            .map_err(|reason| assignment(key, value, reason))?;
        field.descriptor().set_singular_field(message, boxed);
        Ok(())
    }

    /// Registry type for the elements of a message-typed field.
    ///
    /// `None` means the registry does not know the type; a registered type
    /// that differs from the declared one is an error.
    fn element_type(
        &self,
        message: &dyn MessageDyn,
        field: &FieldHandle,
    ) -> Result<Option<MessageDescriptor>> {
        let Some(resolved) = resolve_message_type(self.registry, message, field.name()) else {
            return Ok(None);
        };
        match field.referenced_message() {
            Some(declared) if declared == resolved => Ok(Some(resolved)),
            _ => Err(PopulateError::RegistryMismatch {
                key: field.name().to_string(),
                field_type: field.describe(),
                registered: resolved.full_name().to_string(),
            }),
        }
    }

    /// Build a fresh message element from a mapping.
    fn build_element(
        &self,
        key: &str,
        descriptor: &MessageDescriptor,
        item: &InputValue,
    ) -> Result<ReflectValueBox> {
        let entries = item.as_mapping().ok_or_else(|| PopulateError::KeyType {
            key: key.to_string(),
            expected: format!("message {}", descriptor.full_name()),
            value: item.to_string(),
        })?;

        let mut element = descriptor.new_instance();
        self.populate(&mut *element, entries)?;
        Ok(ReflectValueBox::Message(element))
    }
}

/// Coerce a raw element for a repeated or map field without recursion.
fn coerce_element(
    message: &dyn MessageDyn,
    key: &str,
    ty: &RuntimeType,
    item: &InputValue,
) -> Result<ReflectValueBox> {
    if let RuntimeType::Message(descriptor) = ty {
        return Err(PopulateError::UnknownMessageType(
            descriptor.full_name().to_string(),
        ));
    }
    to_reflect_value(item, ty, &scope(message)).map_err(|reason| assignment(key, item, reason))
}

fn scope(message: &dyn MessageDyn) -> FileDescriptor {
    message.descriptor_dyn().file_descriptor().clone()
}

fn missing_key(message: &dyn MessageDyn, key: &str) -> PopulateError {
    PopulateError::MissingKey {
        key: key.to_string(),
        message_type: message_type_name(message),
    }
}

fn assignment(key: &str, value: &InputValue, reason: String) -> PopulateError {
    PopulateError::Assignment {
        key: key.to_string(),
        value: value.to_string(),
        reason,
    }
}
