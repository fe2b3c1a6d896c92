//! Locale catalog tooling for the documentation site.
//!
//! Catalogs are nested JSON translation files, one per language. The library
//! loads them, flattens them to dotted paths, merges override sets into them
//! without disturbing unrelated keys, and writes them back. Around that core
//! sit the per-language override store and glossaries, a batch runner that
//! treats each locale as an independent unit of work, and a coverage analyzer.

pub mod analyze;
pub mod batch;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fill;
pub mod glossary;
pub mod logging;
pub mod merge;
pub mod overrides;
mod schema;
pub mod store;

pub use analyze::{CoverageReport, LocaleCoverage, analyze};
pub use batch::{
    BatchOptions, BatchReport, BatchSummary, Outcome, SkipReason, TargetSelector, resolve_targets,
    run_batch,
};
pub use catalog::{Catalog, ConflictPolicy, FlatCatalog, KeyPath, flatten, unflatten};
pub use config::{ConfigOverrides, Settings};
pub use error::{CatalogError, ConflictKind};
pub use fill::fill_missing;
pub use glossary::{Glossary, GlossaryStore};
pub use merge::{OverrideSet, apply_overrides};
pub use overrides::{OverrideStore, ResolvedOverride};
pub use store::{load, save};

/// Split a comma- or whitespace-separated list, dropping empty entries.
pub fn split_list(value: &str) -> Vec<String> {
    value
        .replace(',', " ")
        .split_whitespace()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
