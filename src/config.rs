//! Path and language settings.
//!
//! Precedence for every setting: command-line flag, then environment
//! variable, then a default derived from the site root. The site root is the
//! first directory (from `LOCALE_MERGE_ROOT`, or walking up from the current
//! directory) that contains `assets/locales`.

use crate::split_list;
use anyhow::{Result, bail};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

pub const ROOT_ENV: &str = "LOCALE_MERGE_ROOT";
pub const LOCALES_DIR_ENV: &str = "LOCALE_MERGE_LOCALES_DIR";
pub const OVERRIDES_DIR_ENV: &str = "LOCALE_MERGE_OVERRIDES_DIR";
pub const GLOSSARY_DIR_ENV: &str = "LOCALE_MERGE_GLOSSARY_DIR";
pub const FALLBACK_ENV: &str = "LOCALE_MERGE_FALLBACK";
pub const LANGUAGES_ENV: &str = "LOCALE_MERGE_LANGUAGES";

pub const DEFAULT_LOCALES_SUBDIR: &str = "assets/locales";
pub const DEFAULT_OVERRIDES_SUBDIR: &str = "overrides";
pub const DEFAULT_GLOSSARY_SUBDIR: &str = "glossary";
pub const DEFAULT_FALLBACK_LANGUAGE: &str = "en";

/// Values given explicitly on the command line.
#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub root: Option<PathBuf>,
    pub locales_dir: Option<PathBuf>,
    pub overrides_dir: Option<PathBuf>,
    pub glossary_dir: Option<PathBuf>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub locales_dir: PathBuf,
    pub overrides_dir: PathBuf,
    pub glossary_dir: PathBuf,
    pub fallback_language: String,
    /// Explicit target list for `all`; `None` means discover from disk.
    pub languages: Option<Vec<String>>,
}

impl Settings {
    pub fn resolve(flags: &ConfigOverrides) -> Result<Self> {
        let cwd = env::current_dir()?;
        Self::resolve_with(flags, |name| env::var(name).ok(), &cwd)
    }

    /// Resolution with the environment and working directory injected.
    pub fn resolve_with<E>(flags: &ConfigOverrides, env_var: E, cwd: &Path) -> Result<Self>
    where
        E: Fn(&str) -> Option<String>,
    {
        let env_path = |name: &str| env_var(name).filter(|v| !v.is_empty()).map(PathBuf::from);

        let locales_dir = match flags
            .locales_dir
            .clone()
            .or_else(|| env_path(LOCALES_DIR_ENV))
        {
            Some(dir) => absolutize(cwd, dir),
            None => {
                let root = match &flags.root {
                    Some(root) => {
                        let root = absolutize(cwd, root.clone());
                        if !is_site_root(&root) {
                            bail!(
                                "{} does not contain {DEFAULT_LOCALES_SUBDIR}",
                                root.display()
                            );
                        }
                        root
                    }
                    None => find_site_root(env_var(ROOT_ENV).as_deref(), cwd)?,
                };
                root.join(DEFAULT_LOCALES_SUBDIR)
            }
        };

        let overrides_dir = flags
            .overrides_dir
            .clone()
            .or_else(|| env_path(OVERRIDES_DIR_ENV))
            .map(|dir| absolutize(cwd, dir))
            .unwrap_or_else(|| locales_dir.join(DEFAULT_OVERRIDES_SUBDIR));

        let glossary_dir = flags
            .glossary_dir
            .clone()
            .or_else(|| env_path(GLOSSARY_DIR_ENV))
            .map(|dir| absolutize(cwd, dir))
            .unwrap_or_else(|| locales_dir.join(DEFAULT_GLOSSARY_SUBDIR));

        let fallback_language = env_var(FALLBACK_ENV)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_FALLBACK_LANGUAGE.to_string());

        let languages = env_var(LANGUAGES_ENV)
            .map(|raw| split_list(&raw))
            .filter(|list| !list.is_empty());

        Ok(Self {
            locales_dir,
            overrides_dir,
            glossary_dir,
            fallback_language,
            languages,
        })
    }
}

fn absolutize(cwd: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        cwd.join(path)
    }
}

fn is_site_root(candidate: &Path) -> bool {
    candidate.join(DEFAULT_LOCALES_SUBDIR).is_dir()
}

fn root_from_hint(hint: &str) -> Option<PathBuf> {
    if hint.is_empty() {
        return None;
    }
    let hint_path = PathBuf::from(hint);
    if !hint_path.exists() || !is_site_root(&hint_path) {
        return None;
    }
    fs::canonicalize(hint_path).ok()
}

fn search_upwards(start: &Path) -> Option<PathBuf> {
    let mut dir = fs::canonicalize(start).ok()?;
    loop {
        if is_site_root(&dir) {
            return Some(dir);
        }
        if !dir.pop() {
            break;
        }
    }
    None
}

/// Locate the documentation site root.
pub fn find_site_root(hint: Option<&str>, start: &Path) -> Result<PathBuf> {
    if let Some(hint) = hint {
        if let Some(root) = root_from_hint(hint) {
            return Ok(root);
        }
    }

    if let Some(root) = search_upwards(start) {
        return Ok(root);
    }

    bail!(
        "Unable to locate the site root (a directory containing {DEFAULT_LOCALES_SUBDIR}). Set {ROOT_ENV} or pass --root."
    );
}
