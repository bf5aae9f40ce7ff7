use std::path::PathBuf;

/// Errors raised while loading a document for the resolver.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum LoadError {
    /// No document is registered or present at that path.
    #[display("document not found: {}", path.display())]
    #[from(skip)]
    NotFound {
        /// The missing document path.
        path: PathBuf,
    },

    /// The document could not be read.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    /// The document is not valid JSON.
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),

    /// The document is not valid YAML.
    #[display("YAML error: {error}")]
    #[from(skip)]
    Yaml {
        /// Message from the YAML parser.
        error: String,
    },

    /// The document extension maps to no enabled format.
    #[display("unsupported document format: {}", path.display())]
    #[from(skip)]
    UnsupportedFormat {
        /// The offending document path.
        path: PathBuf,
    },
}

/// A `$ref` that cannot be resolved.
///
/// Every variant carries the raw pointer and the document declaring it.
/// Reference cycles are not errors, see [`CycleMarker`](crate::model::CycleMarker).
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum ResolveError {
    /// The target document could not be loaded.
    #[display(
        "cannot load '{}' for '{pointer}' declared in '{}': {source}",
        target.display(),
        document.display()
    )]
    Load {
        /// The raw `$ref` value, empty for a root document.
        pointer: String,
        /// The document declaring the reference.
        document: PathBuf,
        /// The document that failed to load.
        target: PathBuf,
        /// The loader failure.
        source: LoadError,
    },

    /// The pointer does not match any node of its target document.
    #[display("'{pointer}' declared in '{}' does not match any node", document.display())]
    TargetNotFound {
        /// The raw `$ref` value.
        pointer: String,
        /// The document declaring the reference.
        document: PathBuf,
    },

    /// The pointer targets something other than an object.
    #[display("'{pointer}' declared in '{}' does not target an object", document.display())]
    NotAnObject {
        /// The raw `$ref` value.
        pointer: String,
        /// The document declaring the reference.
        document: PathBuf,
    },

    /// The fragment part is not a JSON pointer.
    #[display("'{pointer}' declared in '{}' is not a valid JSON pointer: {reason}", document.display())]
    InvalidPointer {
        /// The raw `$ref` value.
        pointer: String,
        /// The document declaring the reference.
        document: PathBuf,
        /// Parser message.
        reason: String,
    },
}

impl ResolveError {
    /// The raw `$ref` value at fault.
    pub fn pointer(&self) -> &str {
        match self {
            Self::Load { pointer, .. }
            | Self::TargetNotFound { pointer, .. }
            | Self::NotAnObject { pointer, .. }
            | Self::InvalidPointer { pointer, .. } => pointer,
        }
    }

    /// The document declaring the faulty reference.
    pub fn document(&self) -> &std::path::Path {
        match self {
            Self::Load { document, .. }
            | Self::TargetNotFound { document, .. }
            | Self::NotAnObject { document, .. }
            | Self::InvalidPointer { document, .. } => document,
        }
    }
}
