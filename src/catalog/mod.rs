//! Locale catalog model.
//!
//! A catalog is one locale's translation tree (for example
//! `assets/locales/fr.json`). [`Catalog`] guarantees the tree holds only
//! namespaces and leaf strings; [`flatten`]/[`unflatten`] convert between the
//! nested form and dotted `path -> text` pairs. Both directions preserve the
//! document's key order.

pub mod flat;
pub mod path;
pub mod tree;

pub use flat::{FlatCatalog, flatten, unflatten, unflatten_with};
pub use path::KeyPath;
pub use tree::{Catalog, ConflictPolicy, Node};
