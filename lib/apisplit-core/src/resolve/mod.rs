//! `$ref` resolution over the [document model](crate::model).
//!
//! The [`Resolver`] walks a document depth-first and fills every [`Reference`]
//! with a resolved copy of its target. External documents are requested from a
//! [`DocumentLoader`] and cached for the lifetime of the resolver.
//!
//! A reference pointing to one of its own ancestors (the node being walked, or any
//! reference target still being resolved) becomes a
//! [`CycleMarker`](crate::model::CycleMarker): cycles are a normal outcome, never
//! an error.
//!
//! # Example
//!
//! ```rust
//! use apisplit_core::model::NodeKind;
//! use apisplit_core::resolve::{MemoryLoader, Resolver};
//! use serde_json::json;
//!
//! let loader = MemoryLoader::default().with_document(
//!     "api.json",
//!     json!({
//!         "definitions": {
//!             "Node": { "properties": { "next": { "$ref": "#/definitions/Node" } } }
//!         }
//!     }),
//! );
//!
//! let mut resolver = Resolver::new(loader);
//! let document = resolver.resolve_document("api.json")?;
//!
//! let next = document
//!     .get("definitions")
//!     .and_then(|it| it.get("Node"))
//!     .and_then(|it| it.get("properties"))
//!     .and_then(|it| it.get("next"))
//!     .expect("next property");
//! assert!(matches!(next.kind(), NodeKind::Cycle(_)));
//! # Ok::<(), apisplit_core::resolve::ResolveError>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::debug;

use crate::model::{CycleMarker, Node, NodeKind, NodeMap, Reference, duplicate_map, normalize_path};

mod error;
pub use self::error::{LoadError, ResolveError};

mod loader;
pub use self::loader::{DocumentLoader, FsLoader, MemoryLoader};

mod path;
use self::path::{ResolutionPath, TargetKey};

/// Resolves `$ref` pointers of documents.
///
/// The resolver keeps the raw form of every document it has seen, so internal
/// pointers always target source content, not content rewritten by a previous
/// resolution.
///
/// Resolved targets are kept too: references to the same target share one
/// resolved object, as long as no cycle makes its shape depend on where the
/// reference sits.
#[derive(Debug)]
pub struct Resolver<L> {
    loader: L,
    documents: HashMap<PathBuf, Node>,
    targets: HashMap<TargetKey, ResolvedTarget>,
}

impl<L: DocumentLoader> Resolver<L> {
    /// Creates a resolver fetching documents from `loader`.
    pub fn new(loader: L) -> Self {
        Self {
            loader,
            documents: HashMap::new(),
            targets: HashMap::new(),
        }
    }

    /// Loads and resolves the document stored at `location`.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when the document or one of its references
    /// cannot be loaded or located.
    pub fn resolve_document(&mut self, location: impl AsRef<Path>) -> Result<Node, ResolveError> {
        let location = normalize_path(location.as_ref());
        let root = match self.documents.get(&location) {
            Some(root) => root.clone(),
            None => {
                let root = self
                    .loader
                    .load(&location)
                    .map_err(|source| ResolveError::Load {
                        pointer: String::new(),
                        document: location.clone(),
                        target: location.clone(),
                        source,
                    })?;
                self.documents.insert(location.clone(), root.clone());
                root
            }
        };
        self.resolve(root, location)
    }

    /// Resolves `root`, a document located at `location`.
    ///
    /// Internal pointers of `root` are looked up in `root` itself; resolving an
    /// already resolved node is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a [`ResolveError`] when a reference cannot be loaded or located.
    pub fn resolve(&mut self, root: Node, location: impl AsRef<Path>) -> Result<Node, ResolveError> {
        let location = normalize_path(location.as_ref());
        if !self.documents.contains_key(&location) {
            self.documents.insert(location.clone(), root.clone());
        }

        let mut root = root;
        let mut path = ResolutionPath::new(location);
        self.resolve_node(&mut root, &mut path)?;
        Ok(root)
    }

    fn resolve_node(&mut self, node: &mut Node, path: &mut ResolutionPath) -> Result<(), ResolveError> {
        if node.is_resolved() {
            return Ok(());
        }

        let replacement = match node.kind_mut() {
            NodeKind::Object(children) => {
                self.resolve_children(children, path)?;
                None
            }
            NodeKind::Array(items) => {
                for (index, item) in items.iter_mut().enumerate() {
                    path.enter(index.to_string());
                    self.resolve_node(item, path)?;
                    path.leave();
                }
                None
            }
            NodeKind::Reference(reference) => self.resolve_reference(reference, path)?,
            NodeKind::Scalar(_) | NodeKind::Cycle(_) => None,
        };

        if let Some(marker) = replacement {
            node.set_kind(NodeKind::Cycle(marker));
        }
        node.mark_resolved();
        Ok(())
    }

    fn resolve_children(
        &mut self,
        children: &mut NodeMap,
        path: &mut ResolutionPath,
    ) -> Result<(), ResolveError> {
        for (key, child) in children.iter_mut() {
            path.enter(key.as_str());
            self.resolve_node(child, path)?;
            path.leave();
        }
        Ok(())
    }

    /// Resolves `reference` in place, or returns the marker replacing it.
    fn resolve_reference(
        &mut self,
        reference: &mut Reference,
        path: &mut ResolutionPath,
    ) -> Result<Option<CycleMarker>, ResolveError> {
        let target = reference.target();
        let tokens = pointer_tokens(&target.pointer).map_err(|reason| ResolveError::InvalidPointer {
            pointer: reference.raw().to_string(),
            document: reference.document().to_path_buf(),
            reason,
        })?;
        let key = (target.document, tokens);

        if let Some(frame) = path.ancestor_frame(&key.0, &key.1) {
            debug!(pointer = reference.raw(), document = %reference.document().display(), "reference cycle");
            path.close_cycle(frame);
            let content = match self.lookup(reference, &key)?.into_kind() {
                NodeKind::Object(children) => children,
                NodeKind::Reference(inner) => inner.raw_map(),
                NodeKind::Cycle(marker) => marker.content().clone(),
                NodeKind::Array(_) | NodeKind::Scalar(_) => return Err(not_an_object(reference)),
            };
            return Ok(Some(CycleMarker::new(reference.raw(), content)));
        }

        let content = match self.reusable_target(&key, path) {
            Some(content) => content,
            None => self.resolve_target(reference, key, path)?,
        };

        if reference.siblings().is_empty() {
            reference.set_resolved(content);
            return Ok(None);
        }

        // siblings declared next to `$ref` override the target properties
        let mut content = duplicate_map(&content);
        for (name, sibling) in reference.siblings() {
            let mut sibling = sibling.clone();
            path.enter(name.as_str());
            self.resolve_node(&mut sibling, path)?;
            path.leave();
            content.insert(name.clone(), sibling);
        }

        reference.set_resolved(content);
        Ok(None)
    }

    /// The content of a target resolved earlier, unless one of the targets it
    /// expanded is an ancestor here and would now close a cycle.
    fn reusable_target(&self, key: &TargetKey, path: &mut ResolutionPath) -> Option<Arc<NodeMap>> {
        let resolved = self.targets.get(key)?;
        if resolved
            .expanded
            .iter()
            .any(|(document, tokens)| path.is_ancestor(document, tokens))
        {
            return None;
        }
        path.record_expanded(&resolved.expanded);
        path.record_expanded([key]);
        Some(Arc::clone(&resolved.content))
    }

    /// Resolves a reference target from its raw content.
    ///
    /// The result is kept for reuse when no cycle closed on an enclosing frame.
    fn resolve_target(
        &mut self,
        reference: &Reference,
        key: TargetKey,
        path: &mut ResolutionPath,
    ) -> Result<Arc<NodeMap>, ResolveError> {
        let mut target_node = self.lookup(reference, &key)?;
        if !matches!(
            target_node.kind(),
            NodeKind::Object(_) | NodeKind::Reference(_) | NodeKind::Cycle(_)
        ) {
            return Err(not_an_object(reference));
        }

        path.push_frame(key.clone());
        let resolved = self.resolve_node(&mut target_node, path);
        let visit = path.pop_frame();
        resolved?;

        let content = match target_node.into_kind() {
            NodeKind::Object(children) => Arc::new(children),
            NodeKind::Reference(inner) => inner.into_resolved().unwrap_or_default(),
            NodeKind::Cycle(marker) => Arc::new(marker.content().clone()),
            NodeKind::Array(_) | NodeKind::Scalar(_) => return Err(not_an_object(reference)),
        };

        if !visit.contextual {
            self.targets.insert(
                key,
                ResolvedTarget {
                    content: Arc::clone(&content),
                    expanded: visit.expanded,
                },
            );
        }
        Ok(content)
    }

    /// Returns a raw copy of the reference target.
    fn lookup(&mut self, reference: &Reference, (document, tokens): &TargetKey) -> Result<Node, ResolveError> {
        if !self.documents.contains_key(document) {
            debug!(document = %document.display(), pointer = reference.raw(), "loading referenced document");
            let loaded = self.loader.load(document).map_err(|source| ResolveError::Load {
                pointer: reference.raw().to_string(),
                document: reference.document().to_path_buf(),
                target: document.clone(),
                source,
            })?;
            self.documents.insert(document.clone(), loaded);
        }

        self.documents
            .get(document)
            .and_then(|root| locate(root, tokens))
            .cloned()
            .ok_or_else(|| ResolveError::TargetNotFound {
                pointer: reference.raw().to_string(),
                document: reference.document().to_path_buf(),
            })
    }
}

/// A resolved reference target, with the targets expanded to resolve it.
#[derive(Debug)]
struct ResolvedTarget {
    content: Arc<NodeMap>,
    expanded: HashSet<TargetKey>,
}

fn not_an_object(reference: &Reference) -> ResolveError {
    ResolveError::NotAnObject {
        pointer: reference.raw().to_string(),
        document: reference.document().to_path_buf(),
    }
}

/// Decodes a JSON pointer into its reference tokens.
fn pointer_tokens(pointer: &str) -> Result<Vec<String>, String> {
    let pointer = jsonptr::Pointer::parse(pointer).map_err(|err| err.to_string())?;
    Ok(pointer
        .tokens()
        .map(|token| token.decoded().into_owned())
        .collect())
}

/// Walks raw content along `tokens`.
fn locate<'n>(root: &'n Node, tokens: &[String]) -> Option<&'n Node> {
    tokens.iter().try_fold(root, |current, token| match current.kind() {
        NodeKind::Object(children) => children.get(token),
        NodeKind::Array(items) => token.parse::<usize>().ok().and_then(|index| items.get(index)),
        NodeKind::Scalar(_) | NodeKind::Reference(_) | NodeKind::Cycle(_) => None,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn count_cycles(node: &Node) -> usize {
        match node.kind() {
            NodeKind::Object(children) => children.values().map(count_cycles).sum(),
            NodeKind::Array(items) => items.iter().map(count_cycles).sum(),
            NodeKind::Reference(reference) => reference
                .resolved()
                .map(|content| content.values().map(count_cycles).sum())
                .unwrap_or_default(),
            NodeKind::Cycle(_) => 1,
            NodeKind::Scalar(_) => 0,
        }
    }

    fn all_resolved(node: &Node) -> bool {
        node.is_resolved()
            && match node.kind() {
                NodeKind::Object(children) => children.values().all(all_resolved),
                NodeKind::Array(items) => items.iter().all(all_resolved),
                NodeKind::Reference(reference) => reference
                    .resolved()
                    .is_some_and(|content| content.values().all(all_resolved)),
                NodeKind::Scalar(_) | NodeKind::Cycle(_) => true,
            }
    }

    fn resolve(document: serde_json::Value) -> Result<Node, ResolveError> {
        let loader = MemoryLoader::default().with_document("api.json", document);
        Resolver::new(loader).resolve_document("api.json")
    }

    #[test]
    fn should_resolve_internal_reference_with_sibling_override() {
        let document = resolve(json!({
            "definitions": {
                "Pet": { "type": "object", "description": "A pet" }
            },
            "schema": { "$ref": "#/definitions/Pet", "description": "The pet to add" }
        }))
        .expect("resolves");

        assert!(all_resolved(&document));
        insta::assert_json_snapshot!(document.get("schema").expect("schema").to_value(), @r#"
        {
          "type": "object",
          "description": "The pet to add"
        }
        "#);
    }

    #[test]
    fn should_mark_self_reference_once() {
        let document = resolve(json!({
            "definitions": {
                "Node": {
                    "type": "object",
                    "properties": { "next": { "$ref": "#/definitions/Node" } }
                }
            }
        }))
        .expect("resolves");

        assert_eq!(count_cycles(&document), 1);
    }

    #[test]
    fn should_mark_each_edge_of_two_node_cycle() {
        let document = resolve(json!({
            "definitions": {
                "A": { "properties": { "b": { "$ref": "#/definitions/B" } } },
                "B": { "properties": { "a": { "$ref": "#/definitions/A" } } }
            }
        }))
        .expect("resolves");

        let a = document.get("definitions").and_then(|it| it.get("A")).expect("A");
        let b = document.get("definitions").and_then(|it| it.get("B")).expect("B");
        assert_eq!(count_cycles(a), 1);
        assert_eq!(count_cycles(b), 1);
    }

    #[test]
    fn should_mark_cycle_through_reference_only_root() {
        let document = resolve(json!({
            "definitions": {
                "A": { "properties": { "b": { "$ref": "#/definitions/B" } } },
                "B": { "properties": { "c": { "$ref": "#/definitions/C" } } },
                "C": { "properties": { "a": { "$ref": "#/definitions/A" } } }
            },
            "schema": { "$ref": "#/definitions/A" }
        }))
        .expect("resolves");

        let schema = document.get("schema").expect("schema");
        assert_eq!(count_cycles(schema), 1);
        let cycle = schema
            .get("properties")
            .and_then(|it| it.get("b"))
            .and_then(|it| it.get("properties"))
            .and_then(|it| it.get("c"))
            .and_then(|it| it.get("properties"))
            .and_then(|it| it.get("a"))
            .expect("a");
        let NodeKind::Cycle(marker) = cycle.kind() else {
            panic!("expected a cycle marker, got {cycle:?}");
        };
        assert_eq!(marker.pointer(), "#/definitions/A");
        assert!(marker.content().contains_key("properties"));
    }

    #[test]
    fn should_not_mark_shared_non_cyclic_targets() {
        let document = resolve(json!({
            "definitions": {
                "Id": { "type": "string" },
                "Pair": {
                    "properties": {
                        "left": { "$ref": "#/definitions/Id" },
                        "right": { "$ref": "#/definitions/Id" }
                    }
                }
            }
        }))
        .expect("resolves");

        assert_eq!(count_cycles(&document), 0);
    }

    #[test]
    fn should_share_resolved_targets_along_deep_chains() {
        const DEPTH: usize = 40;
        let mut definitions = serde_json::Map::new();
        for level in 0..DEPTH {
            let next = json!({ "$ref": format!("#/definitions/D{}", level + 1) });
            definitions.insert(
                format!("D{level}"),
                json!({ "properties": { "l": next.clone(), "r": next } }),
            );
        }
        definitions.insert(format!("D{DEPTH}"), json!({ "type": "string" }));

        // every level doubles the expanded tree, only sharing keeps this tractable
        let document = resolve(json!({
            "definitions": serde_json::Value::Object(definitions),
            "schema": { "$ref": "#/definitions/D0" }
        }))
        .expect("resolves");

        let mut current = document.get("schema").expect("schema");
        for level in 0..DEPTH {
            let properties = current.get("properties").expect("properties");
            let left = properties.get("l").expect("l");
            let right = properties.get("r").expect("r");
            let (NodeKind::Reference(left_ref), NodeKind::Reference(right_ref)) = (left.kind(), right.kind())
            else {
                panic!("expected references at level {level}");
            };
            let shared = left_ref
                .resolved_shared()
                .zip(right_ref.resolved_shared())
                .is_some_and(|(left, right)| Arc::ptr_eq(left, right));
            assert!(shared, "level {level} is not shared");
            current = left;
        }
        assert_eq!(current.get_str("type"), Some("string"));
    }

    #[test]
    fn should_not_reuse_target_hiding_a_cycle() {
        // `B` is first resolved from `x`, where `A` is not an ancestor
        let document = resolve(json!({
            "x": { "$ref": "#/definitions/B" },
            "definitions": {
                "A": { "properties": { "b": { "$ref": "#/definitions/B" } } },
                "B": { "properties": { "a": { "$ref": "#/definitions/A" } } }
            }
        }))
        .expect("resolves");

        let from_x = document
            .get("x")
            .and_then(|it| it.get("properties"))
            .and_then(|it| it.get("a"))
            .expect("x.a");
        assert!(matches!(from_x.kind(), NodeKind::Reference(_)));

        let from_a = document
            .get("definitions")
            .and_then(|it| it.get("A"))
            .and_then(|it| it.get("properties"))
            .and_then(|it| it.get("b"))
            .and_then(|it| it.get("properties"))
            .and_then(|it| it.get("a"))
            .expect("A.b.a");
        assert!(matches!(from_a.kind(), NodeKind::Cycle(_)), "got {from_a:?}");
        let a = document.get("definitions").and_then(|it| it.get("A")).expect("A");
        assert_eq!(count_cycles(a), 1);
    }

    #[test]
    fn should_be_idempotent() {
        let loader = MemoryLoader::default().with_document(
            "api.json",
            json!({
                "definitions": {
                    "Node": { "properties": { "next": { "$ref": "#/definitions/Node" } } },
                    "List": { "items": { "$ref": "#/definitions/Node" } }
                }
            }),
        );
        let mut resolver = Resolver::new(loader);
        let once = resolver.resolve_document("api.json").expect("resolves");

        let again = resolver.resolve(once.clone(), "api.json").expect("resolves again");
        assert_eq!(again, once);
        assert_eq!(again.to_value(), once.to_value());
        assert_eq!(count_cycles(&again), count_cycles(&once));
    }

    #[test]
    fn should_skip_already_resolved_nodes() {
        let loader = MemoryLoader::default()
            .with_document("api.json", json!({ "schema": { "$ref": "#/definitions/Missing" } }));
        let mut resolver = Resolver::new(loader);
        let mut node = Node::from_value(json!({ "$ref": "#/definitions/Missing" }), "api.json");
        node.mark_resolved();

        let result = resolver.resolve(node, "api.json");

        assert!(result.is_ok());
    }

    #[test]
    fn should_resolve_external_references() {
        let loader = MemoryLoader::default()
            .with_document(
                "specs/api.json",
                json!({
                    "error": { "$ref": "../shared/common.json#/definitions/Error" },
                    "pet": { "$ref": "pet.json" }
                }),
            )
            .with_document(
                "shared/common.json",
                json!({
                    "definitions": {
                        "Error": { "properties": { "code": { "$ref": "#/definitions/Code" } } },
                        "Code": { "type": "integer" }
                    }
                }),
            )
            .with_document("specs/pet.json", json!({ "type": "object" }));

        let document = Resolver::new(loader)
            .resolve_document("specs/api.json")
            .expect("resolves");

        insta::assert_json_snapshot!(document.to_value(), @r#"
        {
          "error": {
            "properties": {
              "code": {
                "type": "integer"
              }
            }
          },
          "pet": {
            "type": "object"
          }
        }
        "#);
    }

    #[test]
    fn should_detect_cycles_across_documents() {
        let loader = MemoryLoader::default()
            .with_document("a.json", json!({ "child": { "$ref": "b.json" } }))
            .with_document("b.json", json!({ "parent": { "$ref": "a.json" } }));

        let document = Resolver::new(loader).resolve_document("a.json").expect("resolves");

        assert_eq!(count_cycles(&document), 1);
    }

    #[test]
    fn should_resolve_alias_definitions() {
        let document = resolve(json!({
            "definitions": {
                "Pet": { "type": "object" },
                "Animal": { "$ref": "#/definitions/Pet" }
            },
            "schema": { "$ref": "#/definitions/Animal" }
        }))
        .expect("resolves");

        assert_eq!(
            document.get("schema").map(Node::to_value),
            Some(json!({ "type": "object" }))
        );
    }

    #[test]
    fn should_fail_on_missing_external_document() {
        let error = resolve(json!({ "schema": { "$ref": "missing.json#/definitions/X" } }))
            .expect_err("missing document");

        assert!(matches!(error, ResolveError::Load { .. }));
        assert_eq!(error.pointer(), "missing.json#/definitions/X");
        assert_eq!(error.document(), Path::new("api.json"));
    }

    #[test]
    fn should_fail_on_missing_target() {
        let error = resolve(json!({ "schema": { "$ref": "#/definitions/Missing" } }))
            .expect_err("missing target");

        assert!(matches!(error, ResolveError::TargetNotFound { .. }));
    }

    #[test]
    fn should_fail_on_scalar_target() {
        let error = resolve(json!({
            "version": "1.0",
            "schema": { "$ref": "#/version" }
        }))
        .expect_err("scalar target");

        assert!(matches!(error, ResolveError::NotAnObject { .. }));
    }

    #[test]
    fn should_fail_on_invalid_pointer() {
        let error = resolve(json!({ "schema": { "$ref": "#definitions/Pet" } }))
            .expect_err("invalid pointer");

        assert!(matches!(error, ResolveError::InvalidPointer { .. }));
    }

    #[test]
    fn should_decode_escaped_pointer_tokens() {
        let document = resolve(json!({
            "paths": { "/pets": { "get": { "operationId": "listPets" } } },
            "alias": { "$ref": "#/paths/~1pets/get" }
        }))
        .expect("resolves");

        assert_eq!(
            document.get("alias").and_then(|it| it.get_str("operationId")),
            Some("listPets")
        );
    }
}
