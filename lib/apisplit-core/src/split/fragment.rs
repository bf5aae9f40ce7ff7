//! Documents produced and consumed by the split steps.

use std::path::PathBuf;

use serde::Serialize;

use super::naming::logical_path;
use crate::toc::NavigationPatch;
use crate::tree::ApiRootItem;

/// An API tree together with the path of the file it is published as.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceDocument {
    /// Path of the document, relative to the build root.
    pub path: PathBuf,
    /// The document content.
    pub item: ApiRootItem,
    /// Logical path of the input file the document comes from.
    pub origin: String,
}

impl SourceDocument {
    /// Creates an input document, its own origin.
    pub fn new(path: impl Into<PathBuf>, item: ApiRootItem) -> Self {
        let path = path.into();
        let origin = logical_path(&path);
        Self { path, item, origin }
    }

    /// Sets the input file the document comes from.
    #[must_use]
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// The navigation href of the document: its path with `/` separators.
    pub fn key(&self) -> String {
        logical_path(&self.path)
    }

    /// The uids declared by the document, each paired with its origin.
    pub fn uid_entries(&self) -> Vec<UidEntry> {
        index_uids(&self.item, &self.origin)
    }
}

/// A uid and the logical path of the input file declaring it.
///
/// Split documents keep the path of the file they were split from, so lookups
/// and build attribution still point at the source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct UidEntry {
    /// The uid.
    pub uid: String,
    /// Logical path of the input file.
    pub file: String,
}

fn index_uids(item: &ApiRootItem, origin: &str) -> Vec<UidEntry> {
    item.uids()
        .map(|uid| UidEntry {
            uid: uid.to_string(),
            file: origin.to_string(),
        })
        .collect()
}

/// A document split out of a [`SourceDocument`].
#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    /// Where the fragment is written.
    pub path: PathBuf,
    /// The fragment content.
    pub content: ApiRootItem,
    /// Logical path of the input file the fragment was split from.
    pub origin: String,
    /// Uids moved into the fragment, paired with `origin`.
    pub uids: Vec<UidEntry>,
}

impl Fragment {
    /// Creates a fragment split out of `origin` and indexes its uids.
    pub fn new(path: impl Into<PathBuf>, content: ApiRootItem, origin: impl Into<String>) -> Self {
        let origin = origin.into();
        let uids = index_uids(&content, &origin);
        Self {
            path: path.into(),
            content,
            origin,
            uids,
        }
    }
}

impl From<Fragment> for SourceDocument {
    fn from(fragment: Fragment) -> Self {
        Self::new(fragment.path, fragment.content).with_origin(fragment.origin)
    }
}

/// The outcome of one split.
///
/// Contains the residual document, the split-out fragments, and the patches
/// grafting the fragments into the navigation tree.
#[derive(Debug, Clone)]
pub struct SplitResult {
    /// The residual document.
    pub main: SourceDocument,

    /// Split-out documents.
    pub fragments: Vec<Fragment>,

    /// Navigation patches for the fragments.
    pub patches: Vec<NavigationPatch>,
}

impl SplitResult {
    /// Creates a result with no fragment.
    pub fn new(main: SourceDocument) -> Self {
        Self {
            main,
            fragments: Vec::new(),
            patches: Vec::new(),
        }
    }

    /// Adds a fragment.
    pub fn add_fragment(&mut self, fragment: Fragment) {
        self.fragments.push(fragment);
    }

    /// Adds a navigation patch.
    pub fn add_patch(&mut self, patch: NavigationPatch) {
        self.patches.push(patch);
    }

    /// Returns `true` if there are no fragments (no splitting occurred).
    pub fn is_unsplit(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Returns the number of fragments.
    pub fn fragment_count(&self) -> usize {
        self.fragments.len()
    }

    /// The residual document followed by the fragments.
    pub fn into_documents(self) -> impl Iterator<Item = SourceDocument> {
        std::iter::once(self.main).chain(self.fragments.into_iter().map(SourceDocument::from))
    }
}
