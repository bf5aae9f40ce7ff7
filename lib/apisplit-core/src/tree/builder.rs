use std::collections::HashSet;
use std::path::PathBuf;

use jsonptr::PointerBuf;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::{
    ApiChildItem, ApiParameter, ApiResponse, ApiRootItem, ApiTagItem, BuildError, Metadata,
    ResponseExample, SourceDetail, html_id, join_uid,
};
use crate::model::Node;

/// HTTP verbs recognized under a path item.
const VERBS: [&str; 8] = ["get", "put", "post", "delete", "options", "head", "patch", "trace"];

/// Operation keys mapped to dedicated fields.
const OPERATION_KEYS: [&str; 6] = [
    "operationId",
    "tags",
    "parameters",
    "responses",
    "summary",
    "description",
];

/// Projects a resolved Swagger document into an [`ApiRootItem`].
///
/// # Example
///
/// ```rust
/// use apisplit_core::model::Node;
/// use apisplit_core::tree::ApiTreeBuilder;
/// use serde_json::json;
///
/// let document = Node::from_value(
///     json!({
///         "swagger": "2.0",
///         "host": "petstore.io",
///         "basePath": "/v1",
///         "info": { "title": "Petstore" },
///         "paths": { "/pets": { "get": { "operationId": "listPets", "tags": ["pet"] } } }
///     }),
///     "petstore.json",
/// );
///
/// let root = ApiTreeBuilder::new("petstore.json").build(&document)?;
/// assert_eq!(root.uid, "petstore.io/v1/Petstore");
/// assert_eq!(root.children[0].uid, "petstore.io/v1/Petstore/listPets");
/// # Ok::<(), apisplit_core::tree::BuildError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ApiTreeBuilder {
    path: PathBuf,
    raw: Option<String>,
}

impl ApiTreeBuilder {
    /// Creates a builder for the document located at `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            raw: None,
        }
    }

    /// Keeps the source text on the root item.
    #[must_use]
    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    /// Builds the API item tree of a resolved document.
    ///
    /// Every top-level key but `paths` and `tags` ends in the root metadata.
    ///
    /// # Errors
    ///
    /// Returns a [`BuildError`] when a required Swagger property is missing.
    pub fn build(&self, document: &Node) -> Result<ApiRootItem, BuildError> {
        let Value::Object(mut properties) = document.to_value() else {
            return Err(BuildError::NotAnObject);
        };

        let title = properties
            .get("info")
            .and_then(|info| info.get("title"))
            .and_then(Value::as_str)
            .ok_or(BuildError::MissingTitle)?
            .to_string();
        let host = string_of(&properties, "host").unwrap_or_default();
        let base_path = string_of(&properties, "basePath").unwrap_or_default();
        let uid = join_uid([host.as_str(), base_path.as_str(), title.as_str()]);

        let info = properties.get("info");
        let description = info.and_then(|info| info.get("description")).and_then(as_string);
        let summary = info.and_then(|info| info.get("x-summary")).and_then(as_string);

        let tags = match properties.shift_remove("tags") {
            Some(Value::Array(tags)) => self.build_tags(&uid, tags)?,
            Some(other) => {
                warn!(path = %self.path.display(), value = %other, "'tags' is not an array, ignored");
                Vec::new()
            }
            None => Vec::new(),
        };
        let children = match properties.shift_remove("paths") {
            Some(Value::Object(paths)) => self.build_children(&uid, paths)?,
            _ => Vec::new(),
        };
        debug!(%uid, tags = tags.len(), children = children.len(), "API tree built");

        Ok(ApiRootItem {
            html_id: Some(html_id(&uid)),
            uid,
            name: title,
            conceptual: None,
            description,
            summary,
            remarks: None,
            documentation: Some(self.source(PointerBuf::new())),
            raw: self.raw.clone(),
            tags,
            children,
            metadata: properties.into_iter().collect(),
        })
    }

    fn source(&self, pointer: PointerBuf) -> SourceDetail {
        SourceDetail {
            path: self.path.clone(),
            pointer: pointer.to_string(),
        }
    }

    fn build_tags(&self, root_uid: &str, tags: Vec<Value>) -> Result<Vec<ApiTagItem>, BuildError> {
        tags.into_iter()
            .enumerate()
            .map(|(index, tag)| {
                let Value::Object(mut properties) = tag else {
                    return Err(BuildError::MissingTagName { index });
                };
                let name = take_string(&mut properties, "name")
                    .ok_or(BuildError::MissingTagName { index })?;
                let uid = take_string(&mut properties, "uid")
                    .unwrap_or_else(|| join_uid([root_uid, "tag", name.as_str()]));
                let pointer = PointerBuf::from_tokens(["tags".to_string(), index.to_string()]);

                Ok(ApiTagItem {
                    html_id: Some(html_id(&uid)),
                    uid,
                    name,
                    conceptual: None,
                    description: take_string(&mut properties, "description"),
                    documentation: Some(self.source(pointer)),
                    metadata: properties.into_iter().collect(),
                })
            })
            .collect()
    }

    fn build_children(
        &self,
        root_uid: &str,
        paths: Map<String, Value>,
    ) -> Result<Vec<ApiChildItem>, BuildError> {
        let mut children = Vec::new();
        let mut operation_ids = HashSet::new();
        for (path, item) in paths {
            let Value::Object(mut item) = item else {
                debug!(%path, "path item is not an object, skipped");
                continue;
            };

            let shared_parameters = match item.shift_remove("parameters") {
                Some(Value::Array(parameters)) => build_parameters(parameters),
                _ => Vec::new(),
            };
            let extensions = item
                .iter()
                .filter(|(key, _)| key.starts_with("x-"))
                .map(|(key, value)| (key.clone(), value.clone()))
                .collect::<Metadata>();

            for (verb, operation) in item {
                if !VERBS.contains(&verb.as_str()) {
                    continue;
                }
                let Value::Object(operation) = operation else {
                    debug!(%path, %verb, "operation is not an object, skipped");
                    continue;
                };
                let child = self.build_child(
                    root_uid,
                    &path,
                    verb,
                    operation,
                    &shared_parameters,
                    &extensions,
                )?;
                if !operation_ids.insert(child.operation_id.clone()) {
                    return Err(BuildError::DuplicateOperationId {
                        operation_id: child.operation_id,
                        path,
                        verb: child.operation_name,
                    });
                }
                children.push(child);
            }
        }
        Ok(children)
    }

    fn build_child(
        &self,
        root_uid: &str,
        path: &str,
        verb: String,
        mut operation: Map<String, Value>,
        shared_parameters: &[ApiParameter],
        extensions: &Metadata,
    ) -> Result<ApiChildItem, BuildError> {
        let operation_id = string_of(&operation, "operationId").ok_or_else(|| {
            BuildError::MissingOperationId {
                path: path.to_string(),
                verb: verb.clone(),
            }
        })?;
        let uid = join_uid([root_uid, operation_id.as_str()]);

        let tags = match operation.get("tags") {
            Some(Value::Array(tags)) => tags.iter().filter_map(as_string).collect(),
            _ => Vec::new(),
        };
        let own_parameters = match operation.get("parameters") {
            Some(Value::Array(parameters)) => build_parameters(parameters.clone()),
            _ => Vec::new(),
        };
        let responses = match operation.get("responses") {
            Some(Value::Object(responses)) => build_responses(responses),
            _ => Vec::new(),
        };
        let summary = string_of(&operation, "summary");
        let description = string_of(&operation, "description");

        operation.retain(|key, _| !OPERATION_KEYS.contains(&key.as_str()));
        let mut metadata = operation.into_iter().collect::<Metadata>();
        for (key, value) in extensions {
            metadata.entry(key.clone()).or_insert_with(|| value.clone());
        }

        let pointer = PointerBuf::from_tokens(["paths", path, verb.as_str()]);
        Ok(ApiChildItem {
            html_id: Some(html_id(&uid)),
            uid,
            path: path.to_string(),
            operation_name: verb,
            operation_id,
            tags,
            parameters: merge_parameters(shared_parameters, own_parameters),
            responses,
            conceptual: None,
            description,
            summary,
            remarks: None,
            documentation: Some(self.source(pointer)),
            metadata,
        })
    }
}

fn string_of(properties: &Map<String, Value>, key: &str) -> Option<String> {
    properties.get(key).and_then(as_string)
}

fn take_string(properties: &mut Map<String, Value>, key: &str) -> Option<String> {
    match properties.shift_remove(key) {
        Some(Value::String(value)) => Some(value),
        Some(other) => {
            properties.insert(key.to_string(), other);
            None
        }
        None => None,
    }
}

fn as_string(value: &Value) -> Option<String> {
    value.as_str().map(ToString::to_string)
}

fn build_parameters(parameters: Vec<Value>) -> Vec<ApiParameter> {
    parameters
        .into_iter()
        .filter_map(|parameter| {
            let Value::Object(mut properties) = parameter else {
                return None;
            };
            Some(ApiParameter {
                name: take_string(&mut properties, "name").unwrap_or_default(),
                location: take_string(&mut properties, "in"),
                description: take_string(&mut properties, "description"),
                metadata: properties.into_iter().collect(),
            })
        })
        .collect()
}

/// Path-level parameters followed by operation ones; an operation parameter
/// replaces the path-level one with the same name and location.
fn merge_parameters(shared: &[ApiParameter], own: Vec<ApiParameter>) -> Vec<ApiParameter> {
    let mut merged = shared.to_vec();
    for parameter in own {
        let existing = merged.iter_mut().find(|candidate| {
            candidate.name == parameter.name && candidate.location == parameter.location
        });
        match existing {
            Some(slot) => *slot = parameter,
            None => merged.push(parameter),
        }
    }
    merged
}

fn build_responses(responses: &Map<String, Value>) -> Vec<ApiResponse> {
    responses
        .iter()
        .filter_map(|(status_code, response)| {
            let Value::Object(properties) = response else {
                return None;
            };
            let mut properties = properties.clone();
            let examples = match properties.shift_remove("examples") {
                Some(Value::Object(examples)) => examples
                    .into_iter()
                    .map(|(mime_type, content)| ResponseExample { mime_type, content })
                    .collect(),
                Some(other) => {
                    properties.insert("examples".to_string(), other);
                    Vec::new()
                }
                None => Vec::new(),
            };
            Some(ApiResponse {
                status_code: status_code.clone(),
                description: take_string(&mut properties, "description"),
                summary: take_string(&mut properties, "x-summary"),
                examples,
                metadata: properties.into_iter().collect(),
            })
        })
        .collect()
}
