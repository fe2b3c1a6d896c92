//! Running one transformation across many locale files.
//!
//! Each target is an independent unit: load, transform, save. A target whose
//! file is missing or unreadable is skipped and reported; a target whose merge
//! or save fails is recorded as failed. Either way the run moves on, and the
//! caller decides the exit status from the [`BatchSummary`].

use crate::catalog::Catalog;
use crate::error::CatalogError;
use crate::store;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Literal accepted in place of a locale code to select every target.
pub const ALL_TARGETS: &str = "all";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TargetSelector {
    All,
    One(String),
}

impl From<&str> for TargetSelector {
    fn from(value: &str) -> Self {
        if value == ALL_TARGETS {
            TargetSelector::All
        } else {
            TargetSelector::One(value.to_string())
        }
    }
}

/// `xx`, `xxx`, `xx_YY` or `xx-YY` (for example `en`, `fil`, `zh_CN`).
pub fn is_locale_code(stem: &str) -> bool {
    let (language, region) = match stem.split_once(['_', '-']) {
        Some((language, region)) => (language, Some(region)),
        None => (stem, None),
    };
    let language_ok =
        (2..=3).contains(&language.len()) && language.chars().all(|c| c.is_ascii_lowercase());
    let region_ok = region.is_none_or(|region| {
        (2..=4).contains(&region.len()) && region.chars().all(|c| c.is_ascii_alphabetic())
    });
    language_ok && region_ok
}

pub fn locale_path(locales_dir: &Path, code: &str) -> PathBuf {
    locales_dir.join(format!("{code}.json"))
}

/// Expand a selector into locale codes.
///
/// `All` uses the configured language list when there is one, otherwise every
/// `<code>.json` in the locales directory, sorted. Explicit names must be
/// locale codes so a target can never point outside the locales directory.
pub fn resolve_targets(
    selector: &TargetSelector,
    locales_dir: &Path,
    languages: Option<&[String]>,
) -> Result<Vec<String>, CatalogError> {
    let explicit = match selector {
        TargetSelector::One(code) => vec![code.clone()],
        TargetSelector::All => match languages {
            Some(list) => list.to_vec(),
            None => return discover_locales(locales_dir),
        },
    };
    if let Some(bad) = explicit.iter().find(|code| !is_locale_code(code)) {
        return Err(CatalogError::InvalidTarget { name: bad.clone() });
    }
    Ok(explicit)
}

pub fn discover_locales(locales_dir: &Path) -> Result<Vec<String>, CatalogError> {
    let entries =
        fs::read_dir(locales_dir).map_err(|err| CatalogError::from_io(locales_dir, err))?;
    let mut codes = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|err| CatalogError::from_io(locales_dir, err))?
            .path();
        if !path.is_file() || path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            if is_locale_code(stem) {
                codes.push(stem.to_string());
            }
        }
    }
    codes.sort();
    Ok(codes)
}

/// Why a target was left alone.
#[derive(Debug)]
pub enum SkipReason {
    /// The override set requires a namespace the locale lacks.
    MissingSection(String),
    /// The locale file is missing or not a valid catalog.
    Unreadable(CatalogError),
}

impl SkipReason {
    pub fn is_unreadable(&self) -> bool {
        matches!(self, SkipReason::Unreadable(_))
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingSection(reason) => f.write_str(reason),
            SkipReason::Unreadable(error) => write!(f, "{error}"),
        }
    }
}

#[derive(Debug)]
pub enum Outcome {
    Succeeded { changed: bool },
    Skipped { reason: SkipReason },
    Failed { error: CatalogError },
}

impl Outcome {
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Succeeded { changed: true } => "updated",
            Outcome::Succeeded { changed: false } => "unchanged",
            Outcome::Skipped { .. } => "skipped",
            Outcome::Failed { .. } => "failed",
        }
    }
}

#[derive(Debug)]
pub struct TargetReport {
    pub target: String,
    pub path: PathBuf,
    pub outcome: Outcome,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    /// Skipped targets whose file could not be loaded.
    pub unreadable: usize,
}

impl BatchSummary {
    fn record(&mut self, outcome: &Outcome) {
        match outcome {
            Outcome::Succeeded { .. } => self.succeeded += 1,
            Outcome::Skipped { reason } => {
                self.skipped += 1;
                if reason.is_unreadable() {
                    self.unreadable += 1;
                }
            }
            Outcome::Failed { .. } => self.failed += 1,
        }
    }

    /// A run succeeds when nothing failed and every target could be read.
    pub fn is_success(&self) -> bool {
        self.failed == 0 && self.unreadable == 0
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub targets: Vec<TargetReport>,
    pub summary: BatchSummary,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct BatchOptions {
    /// Run every step except the final write.
    pub dry_run: bool,
}

/// Load, transform, and save each target in turn.
///
/// `transform` receives the locale code and its loaded catalog. A target that
/// cannot be loaded is skipped as unreadable. Returning
/// `CatalogError::MissingSection` marks the target skipped; any other error
/// marks it failed. Unchanged catalogs are not rewritten.
pub fn run_batch<F>(
    locales_dir: &Path,
    targets: &[String],
    options: BatchOptions,
    mut transform: F,
) -> BatchReport
where
    F: FnMut(&str, &Catalog) -> Result<Catalog, CatalogError>,
{
    let mut report = BatchReport::default();
    for target in targets {
        let path = locale_path(locales_dir, target);
        let outcome = process_target(target, &path, options, &mut transform);
        match &outcome {
            Outcome::Succeeded { changed } => {
                info!(locale = %target, path = %path.display(), changed, dry_run = options.dry_run, "target processed")
            }
            Outcome::Skipped { reason } => {
                warn!(locale = %target, path = %path.display(), %reason, "target skipped")
            }
            Outcome::Failed { error } => {
                warn!(locale = %target, path = %path.display(), %error, "target failed")
            }
        }
        report.summary.record(&outcome);
        report.targets.push(TargetReport {
            target: target.clone(),
            path,
            outcome,
        });
    }
    report
}

fn process_target<F>(target: &str, path: &Path, options: BatchOptions, transform: &mut F) -> Outcome
where
    F: FnMut(&str, &Catalog) -> Result<Catalog, CatalogError>,
{
    let catalog = match store::load(path) {
        Ok(catalog) => catalog,
        Err(error @ (CatalogError::NotFound { .. } | CatalogError::Malformed { .. })) => {
            return Outcome::Skipped {
                reason: SkipReason::Unreadable(error),
            };
        }
        Err(error) => return Outcome::Failed { error },
    };
    let updated = match transform(target, &catalog) {
        Ok(updated) => updated,
        Err(error) if error.is_skip() => {
            return Outcome::Skipped {
                reason: SkipReason::MissingSection(error.to_string()),
            };
        }
        Err(error) => return Outcome::Failed { error },
    };
    let changed = updated != catalog;
    if changed && !options.dry_run {
        if let Err(error) = store::save(&updated, path) {
            return Outcome::Failed { error };
        }
    }
    Outcome::Succeeded { changed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{ConflictPolicy, KeyPath};
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn locale_codes() {
        for ok in ["en", "fil", "zh_CN", "zh_TW", "pt-BR", "zh_Hant"] {
            assert!(is_locale_code(ok), "{ok} should be a locale code");
        }
        for bad in ["", "e", "EN", "missing_keys_analysis", "en_", "english", "ab_C1"] {
            assert!(!is_locale_code(bad), "{bad} should not be a locale code");
        }
    }

    #[test]
    fn discovery_ignores_reports_and_other_files() {
        let dir = TempDir::new().unwrap();
        for name in ["fr.json", "en.json", "missing_keys_analysis.json", "notes.txt", "zh_CN.json"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("overrides")).unwrap();
        assert_eq!(discover_locales(dir.path()).unwrap(), ["en", "fr", "zh_CN"]);
    }

    #[test]
    fn configured_languages_win_over_discovery() {
        let dir = TempDir::new().unwrap();
        let languages = vec!["de".to_string(), "ja".to_string()];
        let targets = resolve_targets(&TargetSelector::All, dir.path(), Some(&languages)).unwrap();
        assert_eq!(targets, languages);
        assert_eq!(
            resolve_targets(&TargetSelector::from("ko"), dir.path(), None).unwrap(),
            ["ko"]
        );
    }

    #[test]
    fn target_names_must_be_locale_codes() {
        let dir = TempDir::new().unwrap();
        for bad in ["../../etc/foo", "fr/../de", "/tmp/x", ""] {
            assert!(
                matches!(
                    resolve_targets(&TargetSelector::from(bad), dir.path(), None),
                    Err(CatalogError::InvalidTarget { .. })
                ),
                "{bad} should be rejected"
            );
        }
        let languages = vec!["fr".to_string(), "../secrets".to_string()];
        assert!(resolve_targets(&TargetSelector::All, dir.path(), Some(&languages)).is_err());
    }

    #[test]
    fn bad_targets_do_not_stop_the_rest() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("de.json"), r#"{"nav": {"home": "Start"}}"#).unwrap();
        fs::write(dir.path().join("es.json"), "{broken").unwrap();
        fs::write(dir.path().join("fr.json"), r#"{"docs": "Docs"}"#).unwrap();
        fs::write(dir.path().join("pt.json"), r#"{"nav": {"docs": {"title": "Docs"}}}"#).unwrap();
        let targets: Vec<String> = ["de", "es", "fr", "it", "pt"]
            .iter()
            .map(|s| s.to_string())
            .collect();

        let report = run_batch(dir.path(), &targets, BatchOptions::default(), |_, catalog| {
            let mut updated = catalog.clone();
            if !updated.has_namespace(&KeyPath::parse("nav")) {
                return Err(CatalogError::MissingSection { path: "nav".into() });
            }
            updated.insert_leaf(&KeyPath::parse("nav.docs"), "Doku", ConflictPolicy::Fail)?;
            Ok(updated)
        });

        assert_eq!(
            report.summary,
            BatchSummary {
                succeeded: 1,
                failed: 1,
                skipped: 3,
                unreadable: 2
            }
        );
        assert!(!report.summary.is_success());
        let labels: Vec<&str> = report.targets.iter().map(|t| t.outcome.label()).collect();
        assert_eq!(labels, ["updated", "skipped", "skipped", "skipped", "failed"]);
        assert!(matches!(
            &report.targets[1].outcome,
            Outcome::Skipped { reason: SkipReason::Unreadable(CatalogError::Malformed { .. }) }
        ));
        assert!(matches!(
            &report.targets[3].outcome,
            Outcome::Skipped { reason: SkipReason::Unreadable(CatalogError::NotFound { .. }) }
        ));
        let saved = store::load(&dir.path().join("de.json")).unwrap();
        assert_eq!(saved.into_value(), json!({"nav": {"home": "Start", "docs": "Doku"}}));
        assert!(!dir.path().join("it.json").exists());
    }

    #[test]
    fn missing_target_is_skipped_and_reported() {
        let dir = TempDir::new().unwrap();
        let report = run_batch(dir.path(), &["ko".to_string()], BatchOptions::default(), |_, c| {
            Ok(c.clone())
        });
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.failed, 0);
        assert!(!report.summary.is_success());
        assert_eq!(report.targets[0].outcome.label(), "skipped");
        assert!(!dir.path().join("ko.json").exists());
    }

    #[test]
    fn missing_section_skip_keeps_the_run_green() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("ja.json"), r#"{"nav": {}}"#).unwrap();
        let report = run_batch(dir.path(), &["ja".to_string()], BatchOptions::default(), |_, _| {
            Err(CatalogError::MissingSection { path: "docs".into() })
        });
        assert_eq!(report.summary.skipped, 1);
        assert_eq!(report.summary.unreadable, 0);
        assert!(report.summary.is_success());
    }

    #[test]
    fn dry_run_leaves_files_alone() {
        let dir = TempDir::new().unwrap();
        let original = r#"{"a": "1"}"#;
        fs::write(dir.path().join("nl.json"), original).unwrap();
        let options = BatchOptions { dry_run: true };
        let report = run_batch(dir.path(), &["nl".to_string()], options, |_, catalog| {
            let mut updated = catalog.clone();
            updated.insert_leaf(&KeyPath::parse("b"), "2", ConflictPolicy::Fail)?;
            Ok(updated)
        });
        assert!(matches!(
            report.targets[0].outcome,
            Outcome::Succeeded { changed: true }
        ));
        assert_eq!(fs::read_to_string(dir.path().join("nl.json")).unwrap(), original);
    }
}
