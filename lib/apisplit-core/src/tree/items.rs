use std::path::PathBuf;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Open metadata bag: unknown keys are kept verbatim.
pub type Metadata = IndexMap<String, serde_json::Value>;

/// Where an item comes from in its source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceDetail {
    /// The source document path.
    pub path: PathBuf,
    /// JSON pointer of the item inside the source document.
    pub pointer: String,
}

/// The root of an API item tree: one Swagger document, or one split-out part of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRootItem {
    /// Unique identifier.
    pub uid: String,
    /// Anchor id derived from the uid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_id: Option<String>,
    /// Display name.
    pub name: String,
    /// Conceptual content, filled by overwrite documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conceptual: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Remarks, filled by overwrite documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Source location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<SourceDetail>,
    /// Source text of the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
    /// Declared tags.
    #[serde(default)]
    pub tags: Vec<ApiTagItem>,
    /// Operations.
    #[serde(default)]
    pub children: Vec<ApiChildItem>,
    /// Every other property.
    #[serde(flatten)]
    pub metadata: Metadata,
}

impl ApiRootItem {
    /// Creates an empty root item.
    pub fn new(uid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            html_id: None,
            name: name.into(),
            conceptual: None,
            description: None,
            summary: None,
            remarks: None,
            documentation: None,
            raw: None,
            tags: Vec::new(),
            children: Vec::new(),
            metadata: Metadata::new(),
        }
    }

    /// All uids declared by this item: its own, its tags' and its children's.
    pub fn uids(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.uid.as_str())
            .chain(self.tags.iter().map(|tag| tag.uid.as_str()))
            .chain(self.children.iter().map(|child| child.uid.as_str()))
    }
}

/// One operation: an HTTP verb on a path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiChildItem {
    /// Unique identifier.
    pub uid: String,
    /// Anchor id derived from the uid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_id: Option<String>,
    /// The path template, e.g. `/pets/{id}`.
    pub path: String,
    /// The HTTP verb, lower case.
    pub operation_name: String,
    /// The `operationId`.
    pub operation_id: String,
    /// Names of the tags the operation belongs to, in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// Parameters, path-level ones included.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ApiParameter>,
    /// Responses in declaration order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub responses: Vec<ApiResponse>,
    /// Conceptual content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conceptual: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Remarks, filled by overwrite documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Source location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<SourceDetail>,
    /// Every other property.
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// A declared tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTagItem {
    /// Unique identifier.
    pub uid: String,
    /// Name.
    pub name: String,
    /// Anchor id derived from the uid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub html_id: Option<String>,
    /// Conceptual content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conceptual: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Source location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<SourceDetail>,
    /// Every other property.
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// An operation parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiParameter {
    /// Name.
    pub name: String,
    /// Where the parameter goes: `path`, `query`, `header`, `body` or `formData`.
    #[serde(rename = "in", default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Every other property.
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// An operation response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    /// Status code, or `default`.
    pub status_code: String,
    /// Long description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Short description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// Example bodies.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<ResponseExample>,
    /// Every other property.
    #[serde(flatten)]
    pub metadata: Metadata,
}

/// An example body for one mime type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseExample {
    /// The mime type.
    pub mime_type: String,
    /// The example body.
    pub content: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn should_serialize_root_with_flattened_metadata() {
        let mut root = ApiRootItem::new("petstore.io/v1/Petstore", "Petstore");
        root.metadata.insert("swagger".to_string(), json!("2.0"));

        insta::assert_json_snapshot!(root, @r#"
        {
          "uid": "petstore.io/v1/Petstore",
          "name": "Petstore",
          "tags": [],
          "children": [],
          "swagger": "2.0"
        }
        "#);
    }

    #[test]
    fn should_read_back_unknown_keys_as_metadata() {
        let tag: ApiTagItem = serde_json::from_value(json!({
            "uid": "api/tag/pet",
            "name": "pet",
            "x-display": "Pets"
        }))
        .expect("valid tag");

        assert_eq!(tag.metadata.get("x-display"), Some(&json!("Pets")));
        assert_eq!(tag.description, None);
    }

    #[test]
    fn should_list_all_uids() {
        let mut root = ApiRootItem::new("api", "API");
        root.tags.push(ApiTagItem {
            uid: "api/tag/pet".to_string(),
            name: "pet".to_string(),
            html_id: None,
            conceptual: None,
            description: None,
            documentation: None,
            metadata: Metadata::new(),
        });

        let uids = root.uids().collect::<Vec<_>>();

        assert_eq!(uids, ["api", "api/tag/pet"]);
    }
}
