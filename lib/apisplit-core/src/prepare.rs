use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::ApiSplitError;
use crate::model::normalize_path;
use crate::resolve::{DocumentLoader, Resolver};
use crate::split::SourceDocument;
use crate::tree::ApiTreeBuilder;

/// Resolves a document then builds its API tree.
///
/// # Errors
///
/// Returns an [`ApiSplitError`] when a reference cannot be resolved or the
/// document is not a valid Swagger document.
pub fn prepare_document<L: DocumentLoader>(
    resolver: &mut Resolver<L>,
    path: impl AsRef<Path>,
) -> Result<SourceDocument, ApiSplitError> {
    let path = normalize_path(path.as_ref());
    let resolved = resolver.resolve_document(&path)?;
    let item = ApiTreeBuilder::new(&path).build(&resolved)?;
    Ok(SourceDocument::new(path, item))
}

/// Prepares a batch of documents.
///
/// A failing document is logged and reported, the others are still prepared.
/// Prepared documents keep the input order.
pub fn prepare_documents<L, P>(
    resolver: &mut Resolver<L>,
    paths: impl IntoIterator<Item = P>,
) -> (Vec<SourceDocument>, Vec<(PathBuf, ApiSplitError)>)
where
    L: DocumentLoader,
    P: AsRef<Path>,
{
    let mut documents = Vec::new();
    let mut failures = Vec::new();
    for path in paths {
        let path = path.as_ref();
        match prepare_document(resolver, path) {
            Ok(document) => {
                info!(path = %path.display(), operations = document.item.children.len(), "document prepared");
                documents.push(document);
            }
            Err(error) => {
                warn!(path = %path.display(), %error, "document skipped");
                failures.push((path.to_path_buf(), error));
            }
        }
    }
    (documents, failures)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::resolve::MemoryLoader;

    #[test]
    fn should_skip_failing_documents() {
        let loader = MemoryLoader::default()
            .with_document(
                "broken.json",
                json!({ "info": { "title": "Broken" }, "x": { "$ref": "missing.json" } }),
            )
            .with_document("ok.json", json!({ "info": { "title": "Ok" } }));
        let mut resolver = Resolver::new(loader);

        let (documents, failures) =
            prepare_documents(&mut resolver, ["broken.json", "ok.json", "absent.json"]);

        let prepared = documents.iter().map(|doc| doc.item.uid.as_str()).collect::<Vec<_>>();
        assert_eq!(prepared, ["Ok"]);
        let failed = failures.iter().map(|(path, _)| path.clone()).collect::<Vec<_>>();
        assert_eq!(failed, [PathBuf::from("broken.json"), PathBuf::from("absent.json")]);
        assert!(failures.iter().all(|(_, error)| matches!(error, ApiSplitError::Resolve(_))));
    }
}
