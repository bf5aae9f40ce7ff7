#![allow(dead_code)]
use rstest::fixture;
use tracing::info;

use apisplit_core::model::{Node, NodeKind};
use apisplit_core::resolve::{FsLoader, Resolver};

pub const FIXTURES: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures");

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

#[fixture]
pub fn resolver() -> Resolver<FsLoader> {
    init_tracing();
    Resolver::new(FsLoader::new(FIXTURES))
}

/// Counts the cycle markers reachable from `node`, resolved content included.
pub fn count_cycles(node: &Node) -> usize {
    match node.kind() {
        NodeKind::Object(children) => children.values().map(count_cycles).sum(),
        NodeKind::Array(items) => items.iter().map(count_cycles).sum(),
        NodeKind::Reference(reference) => reference
            .resolved()
            .map(|content| content.values().map(count_cycles).sum())
            .unwrap_or_default(),
        NodeKind::Cycle(_) => 1,
        NodeKind::Scalar(_) => 0,
    }
}

/// Follows a path of object keys.
pub fn lookup<'n>(node: &'n Node, keys: &[&str]) -> Option<&'n Node> {
    keys.iter().try_fold(node, |current, key| current.get(key))
}
