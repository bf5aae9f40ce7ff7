use tracing::{debug, info};

use super::{ApiSplitter, SourceDocument, SplitByOperation, SplitByTag, UidEntry};
use crate::toc::{NavigationPatch, PatchCollision, PatchTable};

/// Which split steps run.
///
/// ```rust
/// use apisplit_core::split::PartitionConfig;
///
/// let config = PartitionConfig::default().with_by_tag(true);
/// assert!(config.by_tag());
/// assert!(!config.by_operation());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PartitionConfig {
    by_tag: bool,
    by_operation: bool,
}

impl PartitionConfig {
    /// Enables or disables the split by tag.
    #[must_use]
    pub fn with_by_tag(mut self, enabled: bool) -> Self {
        self.by_tag = enabled;
        self
    }

    /// Enables or disables the split by operation.
    #[must_use]
    pub fn with_by_operation(mut self, enabled: bool) -> Self {
        self.by_operation = enabled;
        self
    }

    /// Whether the split by tag runs.
    pub fn by_tag(&self) -> bool {
        self.by_tag
    }

    /// Whether the split by operation runs.
    pub fn by_operation(&self) -> bool {
        self.by_operation
    }
}

/// Everything a batch produced.
#[derive(Debug, Clone, Default)]
pub struct PartitionOutput {
    /// Residual and split documents, in input order.
    pub documents: Vec<SourceDocument>,
    /// Uid index over all documents.
    pub uids: Vec<UidEntry>,
    /// Navigation patches kept.
    pub patches: Vec<NavigationPatch>,
    /// Navigation patches dropped for a key collision.
    pub collisions: Vec<PatchCollision>,
}

/// Runs the split steps over a batch of documents.
///
/// The split by tag runs first, then the split by operation over all of its
/// output documents. Each step owns a [`PatchTable`] filled in input order, so
/// the first document producing a navigation key keeps it.
#[derive(Debug, Clone, Default)]
pub struct Partitioner {
    config: PartitionConfig,
}

impl Partitioner {
    /// Creates a partitioner.
    pub fn new(config: PartitionConfig) -> Self {
        Self { config }
    }

    /// Partitions the documents.
    pub fn run(&self, documents: Vec<SourceDocument>) -> PartitionOutput {
        let mut output = PartitionOutput::default();
        let mut documents = documents;

        if self.config.by_tag {
            documents = Self::run_step(&SplitByTag::new(), documents, &mut output);
        }
        if self.config.by_operation {
            documents = Self::run_step(&SplitByOperation::new(), documents, &mut output);
        }

        output.uids = documents.iter().flat_map(SourceDocument::uid_entries).collect();
        output.documents = documents;
        info!(
            documents = output.documents.len(),
            patches = output.patches.len(),
            collisions = output.collisions.len(),
            "partition done"
        );
        output
    }

    fn run_step(
        splitter: &impl ApiSplitter,
        documents: Vec<SourceDocument>,
        output: &mut PartitionOutput,
    ) -> Vec<SourceDocument> {
        let mut table = PatchTable::new();
        let mut produced = Vec::with_capacity(documents.len());

        for document in documents {
            let mut result = splitter.split(document);
            debug!(document = %result.main.path.display(), fragments = result.fragment_count(), "document split");
            for patch in std::mem::take(&mut result.patches) {
                if let Err(collision) = table.insert(patch) {
                    output.collisions.push(collision);
                }
            }
            produced.extend(result.into_documents());
        }

        output.patches.extend(table.into_patches());
        produced
    }
}
