//! Reference resolution over the file-system fixtures.

use anyhow::Context;
use rstest::rstest;

use apisplit_core::model::NodeKind;
use apisplit_core::resolve::{FsLoader, ResolveError, Resolver};

mod common;
pub use self::common::*;

#[rstest]
fn should_resolve_internal_and_external_references(
    mut resolver: Resolver<FsLoader>,
) -> anyhow::Result<()> {
    let document = resolver.resolve_document("petstore.json")?;

    let category = lookup(&document, &["definitions", "Pet", "properties", "category"])
        .context("category property")?;
    assert!(category.is_resolved());
    assert_eq!(category.get_str("description"), Some("The pet category"));
    assert_eq!(category.get_str("type"), Some("object"));

    let sub_categories = lookup(category, &["properties", "subCategories", "items"])
        .context("sub categories items")?;
    let NodeKind::Cycle(marker) = sub_categories.kind() else {
        anyhow::bail!("expected a cycle marker, got {sub_categories:?}");
    };
    assert_eq!(marker.pointer(), "#/definitions/Category");

    let error_schema = lookup(
        &document,
        &["paths", "/pets", "get", "responses", "default", "schema", "properties", "code"],
    )
    .context("error code property")?;
    assert_eq!(error_schema.get_str("type"), Some("integer"));
    Ok(())
}

#[rstest]
#[case::self_reference("Node", 1)]
#[case::two_node_cycle_first("A", 1)]
#[case::two_node_cycle_second("B", 1)]
#[case::three_node_cycle("X", 1)]
#[case::three_node_cycle_last("Z", 1)]
fn should_mark_each_cycle_edge_once(
    mut resolver: Resolver<FsLoader>,
    #[case] definition: &str,
    #[case] expected: usize,
) -> anyhow::Result<()> {
    let document = resolver.resolve_document("cyclic.json")?;

    let node = lookup(&document, &["definitions", definition]).context("definition")?;

    assert_eq!(count_cycles(node), expected);
    Ok(())
}

#[rstest]
fn should_produce_one_marker_per_cycle_edge(mut resolver: Resolver<FsLoader>) -> anyhow::Result<()> {
    let document = resolver.resolve_document("cyclic.json")?;

    // Node -> Node, A <-> B, X -> Y -> Z -> X
    assert_eq!(count_cycles(&document), 6);
    Ok(())
}

#[rstest]
#[case::acyclic("petstore.json")]
#[case::cyclic("cyclic.json")]
fn should_be_idempotent(mut resolver: Resolver<FsLoader>, #[case] path: &str) -> anyhow::Result<()> {
    let once = resolver.resolve_document(path)?;

    let twice = resolver.resolve(once.clone(), path)?;

    assert_eq!(twice, once);
    assert_eq!(twice.to_value(), once.to_value());
    Ok(())
}

#[rstest]
fn should_report_unresolvable_reference(mut resolver: Resolver<FsLoader>) {
    let error = resolver
        .resolve_document("broken.json")
        .expect_err("missing.json does not exist");

    assert!(matches!(error, ResolveError::Load { .. }), "unexpected error: {error}");
    assert_eq!(error.pointer(), "missing.json#/responses/Ok");
    assert_eq!(error.document(), std::path::Path::new("broken.json"));
}
