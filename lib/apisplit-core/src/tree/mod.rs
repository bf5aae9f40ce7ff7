//! The API item tree.
//!
//! A resolved Swagger document is projected into a normalized tree:
//!
//! - one [`ApiRootItem`] per document, holding the declared [`ApiTagItem`]s
//! - one [`ApiChildItem`] per operation (HTTP verb on a path)
//!
//! Uids are built from the document `host`, `basePath` and `info.title`, see
//! [`join_uid`]. Properties without a dedicated field are kept verbatim in the
//! [`Metadata`] bag of each item.

mod builder;
pub use self::builder::ApiTreeBuilder;

mod error;
pub use self::error::BuildError;

mod items;
pub use self::items::{
    ApiChildItem, ApiParameter, ApiResponse, ApiRootItem, ApiTagItem, Metadata, ResponseExample,
    SourceDetail,
};

mod uid;
pub use self::uid::{html_id, join_uid};
