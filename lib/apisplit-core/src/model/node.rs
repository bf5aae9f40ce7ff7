use std::sync::Arc;

use indexmap::IndexMap;

use super::Reference;

/// Children of an object node, in declaration order.
pub type NodeMap = IndexMap<String, Node>;

/// A node of the document model.
///
/// A node pairs its [`NodeKind`] with a `resolved` flag that only the
/// [`Resolver`](crate::resolve::Resolver) sets.
///
/// Two properties differ from a plain derived implementation:
///
/// - [`Clone`] deep-copies objects, arrays and references but the copy is always
///   un-resolved: resolution state is never transferred to a copy.
///   Cycle markers stay resolved, their content is shared.
/// - [`PartialEq`] compares the structure only and ignores the `resolved` flag.
#[derive(Debug)]
pub struct Node {
    kind: NodeKind,
    resolved: bool,
}

/// The closed set of node variants.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// A JSON object.
    Object(NodeMap),
    /// A JSON array.
    Array(Vec<Node>),
    /// A literal: string, number, boolean or null.
    Scalar(serde_json::Value),
    /// A `$ref` pointer, possibly resolved.
    Reference(Box<Reference>),
    /// A reference into one of its own ancestors.
    Cycle(CycleMarker),
}

/// Stand-in for a reference whose target was already being resolved.
///
/// The marker keeps the raw (un-resolved) content of the target. That content is
/// shared and immutable, so cloning a marker never walks it.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleMarker {
    pointer: String,
    content: Arc<NodeMap>,
}

impl CycleMarker {
    /// Creates a marker for the `pointer` reference with the target's raw content.
    pub fn new(pointer: impl Into<String>, content: NodeMap) -> Self {
        Self {
            pointer: pointer.into(),
            content: Arc::new(content),
        }
    }

    /// The raw `$ref` value that closed the cycle.
    pub fn pointer(&self) -> &str {
        &self.pointer
    }

    /// The raw content of the cycle target.
    pub fn content(&self) -> &NodeMap {
        &self.content
    }
}

impl Node {
    /// Creates an un-resolved node.
    pub fn new(kind: NodeKind) -> Self {
        let resolved = matches!(kind, NodeKind::Cycle(_));
        Self { kind, resolved }
    }

    /// Creates an object node.
    pub fn object(children: NodeMap) -> Self {
        Self::new(NodeKind::Object(children))
    }

    /// Creates an array node.
    pub fn array(items: Vec<Node>) -> Self {
        Self::new(NodeKind::Array(items))
    }

    /// Creates a scalar node.
    pub fn scalar(value: impl Into<serde_json::Value>) -> Self {
        Self::new(NodeKind::Scalar(value.into()))
    }

    /// Creates a reference node.
    pub fn reference(reference: Reference) -> Self {
        Self::new(NodeKind::Reference(Box::new(reference)))
    }

    /// Creates a cycle marker node, resolved from the start.
    pub fn cycle(marker: CycleMarker) -> Self {
        Self::new(NodeKind::Cycle(marker))
    }

    /// The variant of this node.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub(crate) fn kind_mut(&mut self) -> &mut NodeKind {
        &mut self.kind
    }

    pub(crate) fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
    }

    /// Consumes the node, returning its variant.
    pub fn into_kind(self) -> NodeKind {
        self.kind
    }

    /// Whether the resolver already visited this node.
    pub fn is_resolved(&self) -> bool {
        self.resolved
    }

    pub(crate) fn mark_resolved(&mut self) {
        self.resolved = true;
    }

    /// Object view of this node.
    ///
    /// Resolved references expose their resolved content and cycle markers the
    /// raw content of their target.
    pub fn as_object(&self) -> Option<&NodeMap> {
        match &self.kind {
            NodeKind::Object(children) => Some(children),
            NodeKind::Reference(reference) => reference.resolved(),
            NodeKind::Cycle(marker) => Some(marker.content()),
            NodeKind::Array(_) | NodeKind::Scalar(_) => None,
        }
    }

    /// Array view of this node.
    pub fn as_array(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Array(items) => Some(items),
            _ => None,
        }
    }

    /// String view of a scalar node.
    pub fn as_str(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Scalar(value) => value.as_str(),
            _ => None,
        }
    }

    /// Looks up a child of the object view.
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_object().and_then(|children| children.get(key))
    }

    /// Deep copy keeping the resolution state, resolved references keep sharing
    /// their content.
    pub(crate) fn duplicate(&self) -> Self {
        let kind = match &self.kind {
            NodeKind::Object(children) => NodeKind::Object(duplicate_map(children)),
            NodeKind::Array(items) => NodeKind::Array(items.iter().map(Node::duplicate).collect()),
            other => other.clone(),
        };
        Self {
            kind,
            resolved: self.resolved,
        }
    }

    /// Looks up a string child of the object view.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Node::as_str)
    }
}

/// [`Node::duplicate`] over the children of an object.
pub(crate) fn duplicate_map(children: &NodeMap) -> NodeMap {
    children
        .iter()
        .map(|(key, child)| (key.clone(), child.duplicate()))
        .collect()
}

impl Clone for Node {
    fn clone(&self) -> Self {
        Self::new(self.kind.clone())
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl From<NodeKind> for Node {
    fn from(kind: NodeKind) -> Self {
        Self::new(kind)
    }
}
