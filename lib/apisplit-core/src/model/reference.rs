use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use super::{Node, NodeMap};

/// How a `$ref` pointer locates its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ReferenceKind {
    /// A pointer into the declaring document: `#/definitions/Pet`.
    Internal,
    /// A pointer into another document: `common.json#/definitions/Error`.
    ExternalEmbedded,
    /// A whole other document: `pet.json`.
    ExternalFile,
}

/// The document and JSON pointer a reference resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceTarget {
    /// Normalized path of the target document.
    pub document: PathBuf,
    /// JSON pointer inside the target document, empty for the whole document.
    pub pointer: String,
}

/// A `$ref` node.
///
/// Besides the raw pointer, a reference keeps the sibling properties declared next
/// to `$ref` in the source. Once resolved it holds an object with the target content
/// and the siblings laid over it; references to the same target without siblings
/// share that object.
#[derive(Debug, Clone, PartialEq)]
pub struct Reference {
    raw: String,
    kind: ReferenceKind,
    document: PathBuf,
    siblings: NodeMap,
    resolved: Option<Arc<NodeMap>>,
}

impl Reference {
    /// Creates an un-resolved reference declared in `document`.
    pub fn new(raw: impl Into<String>, document: impl AsRef<Path>, siblings: NodeMap) -> Self {
        let raw = raw.into();
        let kind = if raw.starts_with('#') {
            ReferenceKind::Internal
        } else if raw.contains('#') {
            ReferenceKind::ExternalEmbedded
        } else {
            ReferenceKind::ExternalFile
        };
        Self {
            raw,
            kind,
            document: normalize_path(document.as_ref()),
            siblings,
            resolved: None,
        }
    }

    /// The raw `$ref` value.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The resolution kind.
    pub fn kind(&self) -> ReferenceKind {
        self.kind
    }

    /// The document this reference was declared in.
    pub fn document(&self) -> &Path {
        &self.document
    }

    /// Properties declared alongside `$ref`.
    pub fn siblings(&self) -> &NodeMap {
        &self.siblings
    }

    /// The resolved content, siblings included.
    pub fn resolved(&self) -> Option<&NodeMap> {
        self.resolved.as_deref()
    }

    /// Resolved content, shared with every reference to the same target.
    #[cfg(test)]
    pub(crate) fn resolved_shared(&self) -> Option<&Arc<NodeMap>> {
        self.resolved.as_ref()
    }

    pub(crate) fn into_resolved(self) -> Option<Arc<NodeMap>> {
        self.resolved
    }

    pub(crate) fn set_resolved(&mut self, content: impl Into<Arc<NodeMap>>) {
        self.resolved = Some(content.into());
    }

    /// Computes the target document and pointer.
    ///
    /// External documents are looked up relative to the declaring document.
    pub fn target(&self) -> ReferenceTarget {
        let (file, pointer) = match self.kind {
            ReferenceKind::Internal => ("", self.raw.trim_start_matches('#')),
            ReferenceKind::ExternalEmbedded => self
                .raw
                .split_once('#')
                .unwrap_or((self.raw.as_str(), "")),
            ReferenceKind::ExternalFile => (self.raw.as_str(), ""),
        };

        let document = if file.is_empty() {
            self.document.clone()
        } else {
            let base = self.document.parent().unwrap_or_else(|| Path::new(""));
            normalize_path(&base.join(file))
        };

        ReferenceTarget {
            document,
            pointer: pointer.to_string(),
        }
    }

    /// The source form of this reference: `$ref` followed by the raw siblings.
    pub fn raw_map(&self) -> NodeMap {
        let mut map = NodeMap::with_capacity(self.siblings.len() + 1);
        map.insert("$ref".to_string(), Node::scalar(self.raw.clone()));
        for (key, value) in &self.siblings {
            map.insert(key.clone(), value.clone());
        }
        map
    }
}

/// Lexically normalizes a path: drops `.` and folds `..` into its parent.
///
/// ```rust
/// use std::path::Path;
/// use apisplit_core::model::normalize_path;
///
/// assert_eq!(normalize_path(Path::new("specs/./v1/../common.json")), Path::new("specs/common.json"));
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut result = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let can_pop = matches!(result.components().next_back(), Some(Component::Normal(_)));
                if can_pop {
                    result.pop();
                } else {
                    result.push(component);
                }
            }
            Component::Prefix(_) | Component::RootDir | Component::Normal(_) => {
                result.push(component);
            }
        }
    }
    result
}
