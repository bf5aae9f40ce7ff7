//! Document model for arbitrary Swagger/OpenAPI content.
//!
//! A Swagger file is loaded as a tree of [`Node`]s. Every JSON object carrying a
//! `$ref` key becomes a [`Reference`] node, which the
//! [`Resolver`](crate::resolve::Resolver) later fills with the referenced content.
//! A reference that would resolve into one of its own ancestors is turned into a
//! [`CycleMarker`] instead.
//!
//! # Example
//!
//! ```rust
//! use apisplit_core::model::{Node, NodeKind};
//! use serde_json::json;
//!
//! let node = Node::from_value(
//!     json!({ "schema": { "$ref": "#/definitions/Pet", "description": "A pet" } }),
//!     "petstore.json",
//! );
//!
//! let schema = node.get("schema").expect("schema");
//! assert!(matches!(schema.kind(), NodeKind::Reference(_)));
//! assert!(!schema.is_resolved());
//! ```

mod convert;
mod node;
mod reference;

pub use self::node::{CycleMarker, Node, NodeKind, NodeMap};
pub(crate) use self::node::duplicate_map;
pub use self::reference::{Reference, ReferenceKind, ReferenceTarget, normalize_path};
