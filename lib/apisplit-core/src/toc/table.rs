use indexmap::IndexMap;
use indexmap::map::Entry;
use tracing::warn;

use super::{KeyKind, NavigationPatch};

/// A patch rejected because its key was already produced in the batch.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Error, derive_more::Display)]
#[display(
    "navigation key '{key}' ({key_kind}) already produced by {existing:?}, patch from {rejected:?} dropped"
)]
pub struct PatchCollision {
    /// The colliding key.
    pub key: String,
    /// How the key is matched.
    pub key_kind: KeyKind,
    /// Source files of the patch kept.
    pub existing: Vec<String>,
    /// Source files of the patch dropped.
    pub rejected: Vec<String>,
}

/// Patches of one batch, unique per key and key kind.
///
/// The first patch inserted for a key wins: insert patches in input order to
/// keep the outcome reproducible.
#[derive(Debug, Clone, Default)]
pub struct PatchTable {
    patches: IndexMap<(KeyKind, String), NavigationPatch>,
}

impl PatchTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a patch unless its key is taken.
    ///
    /// # Errors
    ///
    /// Returns a [`PatchCollision`] (and logs a warning) when the key is already
    /// present; the table is left untouched.
    pub fn insert(&mut self, patch: NavigationPatch) -> Result<(), PatchCollision> {
        match self.patches.entry((patch.key_kind, patch.key.clone())) {
            Entry::Occupied(entry) => {
                let collision = PatchCollision {
                    key: patch.key,
                    key_kind: patch.key_kind,
                    existing: entry.get().source_files.clone(),
                    rejected: patch.source_files,
                };
                warn!(
                    key = %collision.key,
                    key_kind = %collision.key_kind,
                    existing = ?collision.existing,
                    rejected = ?collision.rejected,
                    "navigation key collision, later patch dropped"
                );
                Err(collision)
            }
            Entry::Vacant(entry) => {
                entry.insert(patch);
                Ok(())
            }
        }
    }

    /// Looks up the patch registered for a key.
    pub fn get(&self, key_kind: KeyKind, key: &str) -> Option<&NavigationPatch> {
        self.patches.get(&(key_kind, key.to_string()))
    }

    /// Number of patches.
    pub fn len(&self) -> usize {
        self.patches.len()
    }

    /// Whether the table holds no patch.
    pub fn is_empty(&self) -> bool {
        self.patches.is_empty()
    }

    /// Patches in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &NavigationPatch> {
        self.patches.values()
    }

    /// Consumes the table, returning its patches in insertion order.
    pub fn into_patches(self) -> Vec<NavigationPatch> {
        self.patches.into_values().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toc::NavigationItem;

    fn patch(key: &str, kind: KeyKind, source: &str) -> NavigationPatch {
        NavigationPatch::append_child(key, kind, vec![NavigationItem::new("pet", "uid/pet")], source)
    }

    #[test]
    fn should_keep_first_patch_on_collision() {
        let mut table = PatchTable::new();

        table
            .insert(patch("K", KeyKind::TopicHref, "first.json"))
            .expect("first insert");
        let collision = table
            .insert(patch("K", KeyKind::TopicHref, "second.json"))
            .expect_err("collision");

        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get(KeyKind::TopicHref, "K").map(|it| it.source_files.clone()),
            Some(vec!["first.json".to_string()])
        );
        insta::assert_snapshot!(collision, @r#"navigation key 'K' (TopicHref) already produced by ["first.json"], patch from ["second.json"] dropped"#);
    }

    #[test]
    fn should_scope_keys_by_kind() {
        let mut table = PatchTable::new();

        table.insert(patch("K", KeyKind::TopicHref, "api.json")).expect("href");
        table.insert(patch("K", KeyKind::TopicUid, "api.json")).expect("uid");

        assert_eq!(table.len(), 2);
        let kinds = table.iter().map(|it| it.key_kind).collect::<Vec<_>>();
        assert_eq!(kinds, [KeyKind::TopicHref, KeyKind::TopicUid]);
    }
}
