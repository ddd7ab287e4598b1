//! Schema registry: fully-qualified message name → constructible message type.
//!
//! The registry is filled once at schema-load time and only read afterwards.
//! A [`MessageDescriptor`] is both the schema of a type and its factory
//! (`new_instance`), so it is what the registry stores.

use protobuf::reflect::{FileDescriptor, MessageDescriptor};
use protobuf::MessageFull;
use std::collections::HashMap;
use std::fmt;

#[derive(Clone, Default)]
pub struct SchemaRegistry {
    messages: HashMap<String, MessageDescriptor>,
}

impl fmt::Debug for SchemaRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SchemaRegistry")
            .field("messages", &self.list_messages())
            .finish()
    }
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry holding every message of the given files.
    pub fn from_files<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = &'a FileDescriptor>,
    {
        let mut registry = Self::new();
        for file in files {
            registry.register_file(file);
        }
        registry
    }

    /// Register all messages of a file, nested types included.
    pub fn register_file(&mut self, file: &FileDescriptor) {
        for message in file.messages() {
            self.register_descriptor(message);
        }
    }

    /// Register a message type and its nested types. Map entry types are skipped.
    pub fn register_descriptor(&mut self, descriptor: MessageDescriptor) {
        if descriptor.is_map_entry() {
            return;
        }
        for nested in descriptor.nested_messages() {
            self.register_descriptor(nested);
        }
        tracing::trace!("Registering message type {}", descriptor.full_name());
        self.messages
            .insert(descriptor.full_name().to_string(), descriptor);
    }

    /// Register a generated message type and its nested types.
    pub fn register<M: MessageFull>(&mut self) {
        self.register_descriptor(M::descriptor());
    }

    /// Exact-match lookup by fully qualified name. A leading dot is accepted.
    pub fn get(&self, full_name: &str) -> Option<MessageDescriptor> {
        let full_name = full_name.strip_prefix('.').unwrap_or(full_name);
        self.messages.get(full_name).cloned()
    }

    /// Lookup by dotted path segments (`["pkg", "Outer", "Inner"]`).
    ///
    /// Empty paths and empty segments resolve to nothing.
    pub fn resolve_path<'s, I>(&self, segments: I) -> Option<MessageDescriptor>
    where
        I: IntoIterator<Item = &'s str>,
    {
        let segments: Vec<&str> = segments.into_iter().collect();
        if segments.is_empty() || segments.iter().any(|s| s.is_empty()) {
            return None;
        }
        self.get(&segments.join("."))
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Registered names, sorted.
    pub fn list_messages(&self) -> Vec<String> {
        let mut names: Vec<String> = self.messages.keys().cloned().collect();
        names.sort();
        names
    }
}
