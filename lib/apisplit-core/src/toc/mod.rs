//! Navigation (table of contents) patches.
//!
//! Split steps do not edit the navigation tree: they emit [`NavigationPatch`]
//! records telling the external table-of-contents builder where to graft the new
//! documents. A [`PatchTable`] collects the records of one batch and rejects any
//! record whose key was already produced.

mod patch;
pub use self::patch::{KeyKind, NavigationItem, NavigationPatch, PatchAction};

mod table;
pub use self::table::{PatchCollision, PatchTable};
