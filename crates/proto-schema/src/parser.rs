use crate::error::{Result, SchemaError};
use protobuf::reflect::{FileDescriptor, MessageDescriptor};
use protobuf_parse::Parser;
use std::fmt;
use std::path::{Path, PathBuf};

/// A set of parsed `.proto` files turned into runtime descriptors.
#[derive(Clone)]
pub struct ProtoSchema {
    files: Vec<FileDescriptor>,
}

impl fmt::Debug for ProtoSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProtoSchema")
            .field("files", &self.file_names())
            .finish()
    }
}

impl ProtoSchema {
    /// Parse a single .proto file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_files(&[path.as_ref()], &[] as &[&Path])
    }

    /// Parse several .proto files with extra include directories.
    ///
    /// The parent directory of every input is added to the include path, so
    /// sibling imports resolve without configuration.
    pub fn from_files<P, I>(inputs: &[P], includes: &[I]) -> Result<Self>
    where
        P: AsRef<Path>,
        I: AsRef<Path>,
    {
        if inputs.is_empty() {
            return Err(SchemaError::Parse("No .proto inputs given".to_string()));
        }

        let mut include_dirs: Vec<PathBuf> = includes
            .iter()
            .map(|dir| dir.as_ref().to_path_buf())
            .collect();

        let mut parser = Parser::new();
        parser.pure();

        for input in inputs {
            let p = input.as_ref();
            if let Some(parent) = p.parent() {
                let parent = parent.to_path_buf();
                if !include_dirs.contains(&parent) {
                    include_dirs.push(parent);
                }
            }
            parser.input(p);
        }
        for dir in &include_dirs {
            parser.include(dir);
        }

        let parsed = parser
            .parse_and_typecheck()
            .map_err(|e| SchemaError::Parse(format!("{e:#}")))?;

        let files = FileDescriptor::new_dynamic_fds(parsed.file_descriptors, &[])
            .map_err(|e| SchemaError::Descriptor(e.to_string()))?;

        for file in &files {
            tracing::debug!("Loaded proto file {}", file.proto().name());
        }

        Ok(Self { files })
    }

    /// Parse .proto content from a string.
    pub fn from_string(content: &str) -> Result<Self> {
        // The pure parser resolves inputs against include directories, so the
        // content is written into a scratch directory rather than a bare temp file.
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("inline.proto");
        std::fs::write(&path, content)?;

        Self::from_file(&path)
    }

    /// Wrap descriptors that were built elsewhere (e.g. generated code).
    pub fn from_descriptors(files: Vec<FileDescriptor>) -> Self {
        Self { files }
    }

    /// All loaded file descriptors, dependencies included.
    pub fn files(&self) -> &[FileDescriptor] {
        &self.files
    }

    /// Look up a message by its fully qualified name (e.g. "pkg.Outer.Inner").
    pub fn message(&self, full_name: &str) -> Option<MessageDescriptor> {
        let full_name = full_name.strip_prefix('.').unwrap_or(full_name);
        self.all_messages()
            .into_iter()
            .find(|m| m.full_name() == full_name)
    }

    /// List the fully qualified names of all messages, nested ones included.
    pub fn list_messages(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .all_messages()
            .iter()
            .map(|m| m.full_name().to_string())
            .collect();
        names.sort();
        names
    }

    fn all_messages(&self) -> Vec<MessageDescriptor> {
        let mut out = Vec::new();
        for file in &self.files {
            for message in file.messages() {
                collect_nested(message, &mut out);
            }
        }
        out
    }

    fn file_names(&self) -> Vec<String> {
        self.files
            .iter()
            .map(|f| f.proto().name().to_string())
            .collect()
    }
}

fn collect_nested(message: MessageDescriptor, out: &mut Vec<MessageDescriptor>) {
    // Map entries are synthesized by the compiler, not declared.
    if message.is_map_entry() {
        return;
    }
    for nested in message.nested_messages() {
        collect_nested(nested, out);
    }
    out.push(message);
}
