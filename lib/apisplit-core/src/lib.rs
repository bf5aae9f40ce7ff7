//! # Apisplit Core
//!
//! Resolve Swagger documents and split them into smaller, independently
//! publishable documents.
//!
//! The processing goes through four stages:
//!
//! 1. **[Resolution](resolve)** - every `$ref` of a [document model](model) is
//!    replaced by its target; a reference into one of its own ancestors becomes a
//!    [`CycleMarker`](model::CycleMarker)
//! 2. **[Tree building](tree)** - the resolved document is projected into an
//!    [`ApiRootItem`](tree::ApiRootItem) holding tags and operations
//! 3. **[Partitioning](split)** - documents are split by tag and/or by operation
//! 4. **[Navigation patches](toc)** - each split emits records telling the
//!    table-of-contents builder where to graft the new documents
//!
//! ## Quick Start
//!
//! ```rust
//! use apisplit_core::prepare_document;
//! use apisplit_core::resolve::{MemoryLoader, Resolver};
//! use apisplit_core::split::{PartitionConfig, Partitioner};
//! use serde_json::json;
//!
//! # fn main() -> Result<(), apisplit_core::ApiSplitError> {
//! let loader = MemoryLoader::default().with_document(
//!     "specs/petstore.json",
//!     json!({
//!         "swagger": "2.0",
//!         "info": { "title": "Petstore" },
//!         "tags": [{ "name": "pet" }],
//!         "paths": {
//!             "/pets": { "get": { "operationId": "listPets", "tags": ["pet"] } }
//!         }
//!     }),
//! );
//! let mut resolver = Resolver::new(loader);
//! let document = prepare_document(&mut resolver, "specs/petstore.json")?;
//!
//! let output = Partitioner::new(PartitionConfig::default().with_by_tag(true)).run(vec![document]);
//!
//! let keys = output.documents.iter().map(|doc| doc.key()).collect::<Vec<_>>();
//! assert_eq!(keys, ["specs/petstore.json", "specs/petstore/pet.json"]);
//! assert_eq!(output.patches.len(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `yaml`: read `.yaml`/`.yml` documents and serialize output with `ToYaml`

pub mod model;
pub mod resolve;
pub mod split;
pub mod toc;
pub mod tree;

mod error;
pub use self::error::ApiSplitError;

mod prepare;
pub use self::prepare::{prepare_document, prepare_documents};

#[cfg(feature = "yaml")]
mod yaml;
#[cfg(feature = "yaml")]
pub use self::yaml::{ToYaml, YamlError};
