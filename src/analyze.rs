//! Translation coverage against a reference locale.

use crate::batch::locale_path;
use crate::catalog::{FlatCatalog, flatten};
use crate::error::CatalogError;
use crate::store;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::{debug, warn};

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LocaleCoverage {
    pub total_keys: usize,
    pub missing_count: usize,
    pub extra_count: usize,
    /// Percentage of reference keys present in the locale.
    pub completion_rate: f64,
    pub missing_keys: Vec<String>,
    pub extra_keys: Vec<String>,
}

impl LocaleCoverage {
    pub fn is_complete(&self) -> bool {
        self.missing_count == 0
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CoverageReport {
    pub reference: String,
    pub reference_keys: usize,
    pub locales: BTreeMap<String, LocaleCoverage>,
    /// Locales that could not be loaded, with the reason.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub failures: BTreeMap<String, String>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.locales.values().all(LocaleCoverage::is_complete)
    }
}

/// Compare one flattened locale with the flattened reference.
pub fn compare(reference: &FlatCatalog, locale: &FlatCatalog) -> LocaleCoverage {
    let reference_keys: BTreeSet<&str> = reference.keys().collect();
    let locale_keys: BTreeSet<&str> = locale.keys().collect();
    let missing_keys: Vec<String> = reference_keys
        .difference(&locale_keys)
        .map(|key| key.to_string())
        .collect();
    let extra_keys: Vec<String> = locale_keys
        .difference(&reference_keys)
        .map(|key| key.to_string())
        .collect();
    let present = reference_keys.len() - missing_keys.len();
    let completion_rate = if reference_keys.is_empty() {
        100.0
    } else {
        present as f64 / reference_keys.len() as f64 * 100.0
    };
    LocaleCoverage {
        total_keys: locale_keys.len(),
        missing_count: missing_keys.len(),
        extra_count: extra_keys.len(),
        completion_rate,
        missing_keys,
        extra_keys,
    }
}

/// Analyze every target against `reference`.
///
/// The reference must load; a target that fails to load is recorded in
/// `failures` and the rest are still analyzed. The reference itself is
/// skipped if it appears among the targets.
pub fn analyze(
    locales_dir: &Path,
    reference: &str,
    targets: &[String],
) -> Result<CoverageReport, CatalogError> {
    let reference_flat = flatten(&store::load(&locale_path(locales_dir, reference))?);
    let mut report = CoverageReport {
        reference: reference.to_string(),
        reference_keys: reference_flat.len(),
        locales: BTreeMap::new(),
        failures: BTreeMap::new(),
    };

    for target in targets.iter().filter(|target| target.as_str() != reference) {
        match store::load(&locale_path(locales_dir, target)) {
            Ok(catalog) => {
                let coverage = compare(&reference_flat, &flatten(&catalog));
                debug!(
                    locale = %target,
                    missing = coverage.missing_count,
                    extra = coverage.extra_count,
                    "analyzed locale"
                );
                report.locales.insert(target.clone(), coverage);
            }
            Err(error) => {
                warn!(locale = %target, %error, "locale could not be analyzed");
                report.failures.insert(target.clone(), error.to_string());
            }
        }
    }
    Ok(report)
}
