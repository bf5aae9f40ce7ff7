//! The ApiSplitter trait for partitioning API documents.

use super::{SourceDocument, SplitResult};

/// Trait for partitioning an API document into several documents.
///
/// A splitter consumes the document and returns the residual document, the
/// split-out fragments, and the navigation patches grafting them.
///
/// # Implementing Custom Splitters
///
/// ```rust
/// use apisplit_core::split::{ApiSplitter, SourceDocument, SplitResult};
///
/// /// Keeps every document whole.
/// struct NoSplit;
///
/// impl ApiSplitter for NoSplit {
///     fn split(&self, document: SourceDocument) -> SplitResult {
///         SplitResult::new(document)
///     }
/// }
/// ```
///
/// # Built-in Implementations
///
/// * [`SplitByTag`](super::SplitByTag) - One document per tag
/// * [`SplitByOperation`](super::SplitByOperation) - One document per operation
pub trait ApiSplitter {
    /// Splits the document.
    ///
    /// A document with nothing to split comes back unchanged as
    /// [`SplitResult::main`], with no fragment and no patch.
    fn split(&self, document: SourceDocument) -> SplitResult;
}

impl<S: ApiSplitter + ?Sized> ApiSplitter for &S {
    fn split(&self, document: SourceDocument) -> SplitResult {
        (**self).split(document)
    }
}

/// Extension trait for convenient splitting of documents.
pub trait ApiSplitExt {
    /// Splits this document using the provided splitter.
    ///
    /// This is a convenience method that calls `splitter.split(self)`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use apisplit_core::split::{ApiSplitExt, SourceDocument, SplitByTag};
    /// use apisplit_core::tree::ApiRootItem;
    ///
    /// let document = SourceDocument::new("api.json", ApiRootItem::new("api", "API"));
    /// let result = document.split_with(SplitByTag::new());
    ///
    /// assert!(result.is_unsplit());
    /// ```
    fn split_with<S: ApiSplitter>(self, splitter: S) -> SplitResult;
}

impl ApiSplitExt for SourceDocument {
    fn split_with<S: ApiSplitter>(self, splitter: S) -> SplitResult {
        splitter.split(self)
    }
}
