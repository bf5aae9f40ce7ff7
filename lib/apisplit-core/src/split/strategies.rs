//! Built-in splitting strategies.

use std::mem;

use indexmap::IndexMap;
use tracing::{debug, warn};

use super::metadata::{
    IS_SPLITTED_BY_OPERATION, IS_SPLITTED_BY_TAG, IS_SPLITTED_TO_OPERATION, IS_SPLITTED_TO_TAG,
    merge_metadata, set_flag,
};
use super::naming::{FileNameAllocator, dotted_extension, logical_path, split_directory};
use super::{ApiSplitter, Fragment, SourceDocument, SplitResult};
use crate::toc::{KeyKind, NavigationItem, NavigationPatch};
use crate::tree::{ApiChildItem, ApiRootItem, ApiTagItem};

/// Splits a document into one document per tag.
///
/// Each operation goes to the document of its *first* tag, so an operation never
/// appears twice. Split documents are written next to the source, in a directory
/// named after the source file:
///
/// ```text
/// specs/petstore.json          residual document
/// specs/petstore/pet.json      operations tagged `pet`
/// specs/petstore/store.json    operations tagged `store`
/// ```
///
/// Tag metadata wins over the source document metadata in split documents.
/// Tags without operations, and operations without a declared tag, stay in the
/// residual document.
///
/// # Example
///
/// ```rust
/// use apisplit_core::split::{ApiSplitter, SourceDocument, SplitByTag};
/// use apisplit_core::tree::{ApiChildItem, ApiRootItem, ApiTagItem};
/// # fn operation(id: &str, tag: &str) -> ApiChildItem {
/// #     serde_json::from_value(serde_json::json!({
/// #         "uid": format!("api/{id}"), "path": "/pets", "operationName": "get",
/// #         "operationId": id, "tags": [tag]
/// #     })).expect("valid child")
/// # }
///
/// let mut root = ApiRootItem::new("api", "API");
/// root.tags.push(serde_json::from_value(serde_json::json!({ "uid": "api/tag/pet", "name": "pet" }))?);
/// root.children.push(operation("listPets", "pet"));
///
/// let result = SplitByTag::new().split(SourceDocument::new("specs/api.json", root));
///
/// assert_eq!(result.fragment_count(), 1);
/// assert!(result.main.item.children.is_empty());
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct SplitByTag;

impl SplitByTag {
    /// Creates the splitter.
    pub fn new() -> Self {
        Self
    }

    /// First declaration of each tag name.
    fn declared_tags(document: &SourceDocument) -> IndexMap<String, ApiTagItem> {
        let mut declared = IndexMap::new();
        for tag in &document.item.tags {
            if declared.contains_key(&tag.name) {
                warn!(
                    document = %document.path.display(),
                    tag = %tag.name,
                    uid = %tag.uid,
                    "duplicate tag declaration, only the first one is split"
                );
                continue;
            }
            declared.insert(tag.name.clone(), tag.clone());
        }
        declared
    }
}

impl ApiSplitter for SplitByTag {
    fn split(&self, document: SourceDocument) -> SplitResult {
        if document.item.tags.is_empty() || document.item.children.is_empty() {
            debug!(document = %document.path.display(), "no tag or no operation, nothing to split by tag");
            return SplitResult::new(document);
        }

        let mut declared = Self::declared_tags(&document);
        let SourceDocument { path, mut item, origin } = document;

        let mut groups: IndexMap<String, Vec<ApiChildItem>> =
            declared.keys().map(|name| (name.clone(), Vec::new())).collect();
        let mut remaining = Vec::new();
        for child in mem::take(&mut item.children) {
            let group = child.tags.first().and_then(|first| groups.get_mut(first));
            match group {
                Some(children) => children.push(child),
                None => remaining.push(child),
            }
        }
        item.children = remaining;
        groups.retain(|_, children| !children.is_empty());

        if groups.is_empty() {
            debug!(document = %path.display(), "no operation matches a declared tag");
            return SplitResult::new(SourceDocument { path, item, origin });
        }

        item.tags.retain(|tag| !groups.contains_key(&tag.name));

        let directory = split_directory(&path);
        let extension = dotted_extension(&path);
        let mut file_names = FileNameAllocator::default();
        let mut fragments = Vec::with_capacity(groups.len());
        let mut navigation = Vec::with_capacity(groups.len());

        for (name, mut children) in groups {
            let Some(tag) = declared.shift_remove(&name) else {
                continue;
            };
            for child in &mut children {
                child.tags.clear();
            }

            let mut content = ApiRootItem {
                children,
                metadata: merge_metadata(tag.metadata, &item.metadata),
                html_id: tag.html_id,
                conceptual: tag.conceptual,
                description: tag.description,
                documentation: tag.documentation,
                ..ApiRootItem::new(tag.uid, tag.name)
            };
            set_flag(&mut content.metadata, IS_SPLITTED_TO_TAG);

            let file_name = file_names.allocate(&content.name, &extension);
            navigation.push(NavigationItem::new(&content.name, &content.uid));
            fragments.push(Fragment::new(directory.join(file_name), content, origin.clone()));
        }

        set_flag(&mut item.metadata, IS_SPLITTED_BY_TAG);
        debug!(document = %path.display(), fragments = fragments.len(), "split by tag");

        let key = logical_path(&path);
        let mut result = SplitResult::new(SourceDocument { path, item, origin });
        result.fragments = fragments;
        result.add_patch(NavigationPatch::append_child(
            key.clone(),
            KeyKind::TopicHref,
            navigation,
            key,
        ));
        result
    }
}

/// Splits a document into one document per operation.
///
/// Each split document promotes its operation to the root: uid, name (the
/// operation id) and display fields. The operation itself is kept as the single
/// child, with a `/operation` uid suffix and its display fields cleared.
/// Operation metadata wins over the source document metadata.
///
/// Two patches are emitted per source document, keyed by its path and by its uid,
/// with the same items.
#[derive(Debug, Clone, Default)]
pub struct SplitByOperation;

impl SplitByOperation {
    /// Creates the splitter.
    pub fn new() -> Self {
        Self
    }

    fn promote(mut child: ApiChildItem, parent: &ApiRootItem) -> ApiRootItem {
        let mut content = ApiRootItem {
            html_id: child.html_id.take(),
            conceptual: child.conceptual.take(),
            description: child.description.take(),
            summary: child.summary.take(),
            remarks: child.remarks.clone(),
            documentation: child.documentation.clone(),
            metadata: merge_metadata(child.metadata.clone(), &parent.metadata),
            ..ApiRootItem::new(child.uid.clone(), child.operation_id.clone())
        };
        set_flag(&mut content.metadata, IS_SPLITTED_TO_OPERATION);

        child.uid.push_str("/operation");
        child.tags.clear();
        content.children.push(child);
        content
    }
}

impl ApiSplitter for SplitByOperation {
    fn split(&self, document: SourceDocument) -> SplitResult {
        if document.item.children.is_empty() {
            debug!(document = %document.path.display(), "no operation, nothing to split by operation");
            return SplitResult::new(document);
        }

        let SourceDocument { path, mut item, origin } = document;
        let directory = split_directory(&path);
        let extension = dotted_extension(&path);
        let mut file_names = FileNameAllocator::default();

        let children = mem::take(&mut item.children);
        let mut fragments = Vec::with_capacity(children.len());
        let mut navigation = Vec::with_capacity(children.len());
        for child in children {
            let content = Self::promote(child, &item);
            let file_name = file_names.allocate(&content.name, &extension);
            navigation.push(NavigationItem::new(&content.name, &content.uid));
            fragments.push(Fragment::new(directory.join(file_name), content, origin.clone()));
        }

        set_flag(&mut item.metadata, IS_SPLITTED_BY_OPERATION);
        debug!(document = %path.display(), fragments = fragments.len(), "split by operation");

        let key = logical_path(&path);
        let by_href =
            NavigationPatch::append_child(key.clone(), KeyKind::TopicHref, navigation.clone(), key.clone());
        let by_uid = NavigationPatch::append_child(item.uid.clone(), KeyKind::TopicUid, navigation, key);

        let mut result = SplitResult::new(SourceDocument { path, item, origin });
        result.fragments = fragments;
        result.add_patch(by_href);
        result.add_patch(by_uid);
        result
    }
}
