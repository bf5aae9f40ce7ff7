use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::LoadError;
use crate::model::{Node, normalize_path};

/// Source of raw documents for the [`Resolver`](super::Resolver).
///
/// The resolver asks for each document at most once and keeps the returned tree
/// for later references.
pub trait DocumentLoader {
    /// Loads the raw (un-resolved) document stored at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`LoadError`] when the document is missing or cannot be parsed.
    fn load(&self, path: &Path) -> Result<Node, LoadError>;
}

impl<L: DocumentLoader + ?Sized> DocumentLoader for &L {
    fn load(&self, path: &Path) -> Result<Node, LoadError> {
        (**self).load(path)
    }
}

/// Loads documents from the file system, relative to a base directory.
///
/// JSON is always supported. Files ending with `.yaml` or `.yml` are parsed as
/// YAML when the `yaml` feature is enabled.
#[derive(Debug, Clone, Default)]
pub struct FsLoader {
    base: PathBuf,
}

impl FsLoader {
    /// Creates a loader resolving document paths against `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    /// Reads the source text of a document.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NotFound`] for a missing file, [`LoadError::Io`] otherwise.
    pub fn read_source(&self, path: &Path) -> Result<String, LoadError> {
        let full_path = self.base.join(path);
        if !full_path.is_file() {
            return Err(LoadError::NotFound {
                path: path.to_path_buf(),
            });
        }
        Ok(fs::read_to_string(full_path)?)
    }
}

impl DocumentLoader for FsLoader {
    fn load(&self, path: &Path) -> Result<Node, LoadError> {
        debug!(path = %path.display(), "loading document");
        let source = self.read_source(path)?;
        let value = parse_source(path, &source)?;
        Ok(Node::from_value(value, path))
    }
}

fn parse_source(path: &Path, source: &str) -> Result<serde_json::Value, LoadError> {
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    if !is_yaml {
        return Ok(serde_json::from_str(source)?);
    }

    #[cfg(feature = "yaml")]
    {
        serde_saphyr::from_str(source).map_err(|err| LoadError::Yaml {
            error: err.to_string(),
        })
    }
    #[cfg(not(feature = "yaml"))]
    {
        Err(LoadError::UnsupportedFormat {
            path: path.to_path_buf(),
        })
    }
}

/// In-memory document set, keyed by normalized path.
///
/// ```rust
/// use std::path::Path;
/// use apisplit_core::resolve::{DocumentLoader, MemoryLoader};
/// use serde_json::json;
///
/// let loader = MemoryLoader::default()
///     .with_document("specs/common.json", json!({ "definitions": {} }));
///
/// assert!(loader.load(Path::new("specs/./common.json")).is_ok());
/// assert!(loader.load(Path::new("specs/other.json")).is_err());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    documents: HashMap<PathBuf, serde_json::Value>,
}

impl MemoryLoader {
    /// Registers a document.
    pub fn with_document(mut self, path: impl AsRef<Path>, document: serde_json::Value) -> Self {
        self.insert(path, document);
        self
    }

    /// Registers a document, replacing any previous one at that path.
    pub fn insert(&mut self, path: impl AsRef<Path>, document: serde_json::Value) {
        self.documents
            .insert(normalize_path(path.as_ref()), document);
    }
}

impl DocumentLoader for MemoryLoader {
    fn load(&self, path: &Path) -> Result<Node, LoadError> {
        let path = normalize_path(path);
        let document = self
            .documents
            .get(&path)
            .cloned()
            .ok_or_else(|| LoadError::NotFound { path: path.clone() })?;
        Ok(Node::from_value(document, path))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_report_missing_file() {
        let loader = FsLoader::new("does-not-exist");

        let result = loader.load(Path::new("api.json"));

        assert!(matches!(result, Err(LoadError::NotFound { .. })));
    }

    #[test]
    fn should_load_json_fixture() {
        let loader = FsLoader::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures"));

        let node = loader.load(Path::new("petstore.json")).expect("fixture loads");

        assert_eq!(node.get("swagger").and_then(Node::as_str), Some("2.0"));
    }

    #[test]
    fn should_load_from_memory() {
        let loader = MemoryLoader::default().with_document("a/b.json", json!({ "x": 1 }));

        let node = loader.load(Path::new("a/c/../b.json")).expect("registered");

        assert_eq!(node.to_value(), json!({ "x": 1 }));
    }

    #[cfg(not(feature = "yaml"))]
    #[test]
    fn should_reject_yaml_without_feature() {
        let result = parse_source(Path::new("api.yaml"), "swagger: '2.0'");

        assert!(matches!(result, Err(LoadError::UnsupportedFormat { .. })));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn should_parse_yaml_with_feature() {
        let value = parse_source(Path::new("api.yml"), "swagger: '2.0'\ninfo:\n  title: Pets\n")
            .expect("valid YAML");

        assert_eq!(value, json!({ "swagger": "2.0", "info": { "title": "Pets" } }));
    }
}
