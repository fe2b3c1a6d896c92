//! Applying override sets to a catalog.
//!
//! An override set names the writes one locale needs: namespaces that must
//! already exist, whole subtrees to install, and individual dotted leaves.
//! [`apply_overrides`] is pure; persistence lives in [`crate::store`].

use crate::catalog::{Catalog, ConflictPolicy, FlatCatalog, KeyPath};
use crate::error::CatalogError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct OverrideSet {
    /// Namespaces that must exist in the target before anything is written.
    pub requires: Vec<KeyPath>,
    /// Subtrees installed verbatim, replacing the destination.
    pub grafts: Vec<(KeyPath, Catalog)>,
    /// Individual leaf writes; siblings are left alone.
    pub values: FlatCatalog,
}

impl OverrideSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(mut self, path: impl Into<KeyPath>) -> Self {
        self.requires.push(path.into());
        self
    }

    pub fn graft(mut self, path: impl Into<KeyPath>, subtree: Catalog) -> Self {
        self.grafts.push((path.into(), subtree));
        self
    }

    pub fn set(mut self, path: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(path, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.grafts.is_empty() && self.values.is_empty()
    }

    /// Number of writes (grafts plus leaf values).
    pub fn write_count(&self) -> usize {
        self.grafts.len() + self.values.len()
    }
}

/// Merge `overrides` into a copy of `catalog`.
///
/// Grafts run first, then leaf values, each in declaration order. A missing
/// required namespace yields `CatalogError::MissingSection` before any write.
pub fn apply_overrides(
    catalog: &Catalog,
    overrides: &OverrideSet,
    policy: ConflictPolicy,
) -> Result<Catalog, CatalogError> {
    if let Some(missing) = overrides
        .requires
        .iter()
        .find(|path| !catalog.has_namespace(path))
    {
        return Err(CatalogError::MissingSection {
            path: missing.to_string(),
        });
    }

    let mut merged = catalog.clone();
    for (path, subtree) in &overrides.grafts {
        merged.graft(path, subtree.clone(), policy)?;
    }
    for (path, value) in overrides.values.iter() {
        merged.insert_leaf(&KeyPath::parse(path), value, policy)?;
    }
    Ok(merged)
}
