//! Partitioning of API documents.
//!
//! A document is split either by tag (one document per declared tag) or by
//! operation (one document per operation). Both steps return the residual source
//! document, the split-out [`Fragment`]s and the [`NavigationPatch`](crate::toc::NavigationPatch)
//! records grafting the fragments into the navigation tree.
//!
//! # Quick Start
//!
//! ```rust
//! use apisplit_core::split::{PartitionConfig, Partitioner, SourceDocument};
//! use apisplit_core::tree::ApiRootItem;
//!
//! let documents = vec![SourceDocument::new("specs/api.json", ApiRootItem::new("api", "API"))];
//! let config = PartitionConfig::default().with_by_tag(true).with_by_operation(true);
//!
//! let output = Partitioner::new(config).run(documents);
//! assert_eq!(output.documents.len(), 1);
//! ```
//!
//! # Output layout
//!
//! Documents split out of `<dir>/<name>.<ext>` are written to
//! `<dir>/<name>/<tag or operation>.<ext>`. File names are sanitized and made
//! unique inside their directory.
//!
//! # Metadata
//!
//! Split documents inherit the metadata of their source document. On a key
//! collision the more specific item wins: the tag for a split by tag, the
//! operation for a split by operation. The flags `_isSplittedByTag`,
//! `_isSplittedToTag`, `_isSplittedByOperation` and `_isSplittedToOperation`
//! mark residual and split documents.

mod fragment;
pub use self::fragment::{Fragment, SourceDocument, SplitResult, UidEntry};

mod metadata;
pub use self::metadata::{
    IS_SPLITTED_BY_OPERATION, IS_SPLITTED_BY_TAG, IS_SPLITTED_TO_OPERATION, IS_SPLITTED_TO_TAG,
    merge_metadata,
};

mod naming;

mod partitioner;
pub use self::partitioner::{PartitionConfig, PartitionOutput, Partitioner};

mod splitter;
pub use self::splitter::{ApiSplitExt, ApiSplitter};

mod strategies;
pub use self::strategies::{SplitByOperation, SplitByTag};
