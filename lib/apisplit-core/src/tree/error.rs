/// Errors raised while building an API item tree.
#[derive(Debug, derive_more::Error, derive_more::Display)]
pub enum BuildError {
    /// The document root is not an object.
    #[display("the document root is not an object")]
    NotAnObject,

    /// `info.title` is missing: the root uid cannot be computed.
    #[display("missing 'info.title'")]
    MissingTitle,

    /// An operation has no `operationId`.
    #[display("missing 'operationId' for '{verb} {path}'")]
    MissingOperationId {
        /// The path template.
        path: String,
        /// The HTTP verb.
        verb: String,
    },

    /// Two operations share an `operationId`, so they would share a uid.
    #[display("duplicate 'operationId' '{operation_id}' for '{verb} {path}'")]
    DuplicateOperationId {
        /// The repeated operation id.
        operation_id: String,
        /// The path template of the later operation.
        path: String,
        /// The HTTP verb of the later operation.
        verb: String,
    },

    /// A tag declaration has no `name`.
    #[display("missing 'name' for tag #{index}")]
    MissingTagName {
        /// Position of the tag in `tags`.
        index: usize,
    },
}
