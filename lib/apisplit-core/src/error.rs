use crate::resolve::ResolveError;
use crate::tree::BuildError;

/// Errors raised while preparing or writing API documents.
#[derive(Debug, derive_more::Error, derive_more::Display, derive_more::From)]
pub enum ApiSplitError {
    /// A `$ref` could not be resolved.
    #[display("reference resolution failed: {_0}")]
    Resolve(ResolveError),

    /// The resolved document is not a valid Swagger document.
    #[display("cannot build the API tree: {_0}")]
    Build(BuildError),

    /// I/O error.
    #[display("I/O error: {_0}")]
    Io(std::io::Error),

    /// JSON serialization error.
    #[display("JSON error: {_0}")]
    Json(serde_json::Error),

    /// YAML serialization error.
    #[cfg(feature = "yaml")]
    #[display("YAML error: {_0}")]
    Yaml(crate::YamlError),
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn should_wrap_resolve_errors() {
        let error: ApiSplitError = ResolveError::TargetNotFound {
            pointer: "#/definitions/Pet".to_string(),
            document: PathBuf::from("api.json"),
        }
        .into();

        insta::assert_snapshot!(error, @"reference resolution failed: '#/definitions/Pet' declared in 'api.json' does not match any node");
    }

    #[test]
    fn should_wrap_build_errors() {
        let error = ApiSplitError::from(BuildError::MissingTitle);

        assert_eq!(error.to_string(), "cannot build the API tree: missing 'info.title'");
    }
}
