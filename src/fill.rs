//! Filling keys a locale lacks.
//!
//! Each missing key takes the locale's glossary translation when there is
//! one; otherwise the reference wording stands in until someone provides a
//! real translation. The writes go through the same override path as any
//! other merge, so conflicts are reported the same way.

use crate::catalog::{Catalog, ConflictPolicy, FlatCatalog, KeyPath, flatten};
use crate::error::CatalogError;
use crate::glossary::Glossary;
use crate::merge::{OverrideSet, apply_overrides};

/// Reference leaves missing from `locale`, optionally limited to `prefix`.
pub fn missing_overrides(
    reference: &FlatCatalog,
    locale: &FlatCatalog,
    prefix: Option<&KeyPath>,
    glossary: Option<&Glossary>,
) -> OverrideSet {
    let mut overrides = OverrideSet::new();
    for (path, text) in reference.iter() {
        if locale.contains_key(path) {
            continue;
        }
        if let Some(prefix) = prefix {
            if !KeyPath::parse(path).starts_with(prefix) {
                continue;
            }
        }
        let text = glossary
            .and_then(|glossary| glossary.translate(path, text))
            .unwrap_or(text);
        overrides.values.insert(path, text);
    }
    overrides
}

pub fn fill_missing(
    reference: &FlatCatalog,
    locale: &Catalog,
    prefix: Option<&KeyPath>,
    glossary: Option<&Glossary>,
    policy: ConflictPolicy,
) -> Result<Catalog, CatalogError> {
    let overrides = missing_overrides(reference, &flatten(locale), prefix, glossary);
    apply_overrides(locale, &overrides, policy)
}
