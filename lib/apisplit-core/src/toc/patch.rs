use serde::{Deserialize, Serialize};

/// What a patch does to the navigation tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, derive_more::Display,
)]
pub enum PatchAction {
    /// Appends the patch items as children of the matched node.
    #[default]
    AppendChild,
}

/// How a patch key is matched against the navigation tree.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, derive_more::Display,
)]
pub enum KeyKind {
    /// The key is the navigation href of a topic: its document path.
    TopicHref,
    /// The key is the uid of a topic.
    TopicUid,
}

/// A node appended to the navigation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationItem {
    /// Display name.
    pub name: String,
    /// Uid of the target topic.
    pub uid: String,
}

impl NavigationItem {
    /// Creates an item.
    pub fn new(name: impl Into<String>, uid: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            uid: uid.into(),
        }
    }
}

/// A patch record for the external table-of-contents builder.
///
/// ```rust
/// use apisplit_core::toc::{KeyKind, NavigationItem, NavigationPatch};
///
/// let patch = NavigationPatch::append_child(
///     "petstore.json",
///     KeyKind::TopicHref,
///     vec![NavigationItem::new("store", "api/tag/store"), NavigationItem::new("pet", "api/tag/pet")],
///     "petstore.json",
/// );
///
/// let names = patch.items.iter().map(|item| item.name.as_str()).collect::<Vec<_>>();
/// assert_eq!(names, ["pet", "store"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationPatch {
    /// The patch action.
    pub action_type: PatchAction,
    /// Locates the node to patch.
    pub key: String,
    /// How [`Self::key`] is matched.
    pub key_kind: KeyKind,
    /// The items, sorted by name.
    pub items: Vec<NavigationItem>,
    /// The documents that produced this patch.
    pub source_files: Vec<String>,
}

impl NavigationPatch {
    /// Creates an `AppendChild` patch.
    ///
    /// Items are sorted by name with a stable, case-sensitive ordinal comparison.
    pub fn append_child(
        key: impl Into<String>,
        key_kind: KeyKind,
        mut items: Vec<NavigationItem>,
        source_file: impl Into<String>,
    ) -> Self {
        items.sort_by(|left, right| left.name.cmp(&right.name));
        Self {
            action_type: PatchAction::AppendChild,
            key: key.into(),
            key_kind,
            items,
            source_files: vec![source_file.into()],
        }
    }
}
