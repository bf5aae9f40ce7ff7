//! Conversions between [`Node`] and [`serde_json::Value`].

use std::path::Path;

use serde_json::{Map, Value};

use super::{Node, NodeKind, NodeMap, Reference};

const REF_KEY: &str = "$ref";

impl Node {
    /// Builds a node tree from a JSON value parsed out of `document`.
    ///
    /// Objects holding a string `$ref` become [`Reference`] nodes, their other
    /// properties are kept as siblings.
    pub fn from_value(value: Value, document: impl AsRef<Path>) -> Self {
        convert(value, document.as_ref())
    }

    /// Serializes the node tree back to JSON.
    ///
    /// - a resolved reference becomes its resolved object, siblings included
    /// - an un-resolved reference becomes `{"$ref": ..}` plus its siblings
    /// - a cycle marker becomes the raw content of its target
    pub fn to_value(&self) -> Value {
        match self.kind() {
            NodeKind::Object(children) => map_to_value(children),
            NodeKind::Array(items) => Value::Array(items.iter().map(Node::to_value).collect()),
            NodeKind::Scalar(value) => value.clone(),
            NodeKind::Reference(reference) => match reference.resolved() {
                Some(content) => map_to_value(content),
                None => map_to_value(&reference.raw_map()),
            },
            NodeKind::Cycle(marker) => map_to_value(marker.content()),
        }
    }
}

fn convert(value: Value, document: &Path) -> Node {
    match value {
        Value::Object(mut map) => {
            if let Some(Value::String(raw)) = map.get(REF_KEY).cloned() {
                map.shift_remove(REF_KEY);
                let siblings = convert_map(map, document);
                Node::reference(Reference::new(raw, document, siblings))
            } else {
                Node::object(convert_map(map, document))
            }
        }
        Value::Array(items) => Node::array(
            items
                .into_iter()
                .map(|item| convert(item, document))
                .collect(),
        ),
        scalar => Node::scalar(scalar),
    }
}

fn convert_map(map: Map<String, Value>, document: &Path) -> NodeMap {
    map.into_iter()
        .map(|(key, value)| (key, convert(value, document)))
        .collect()
}

fn map_to_value(children: &NodeMap) -> Value {
    Value::Object(
        children
            .iter()
            .map(|(key, child)| (key.clone(), child.to_value()))
            .collect(),
    )
}
