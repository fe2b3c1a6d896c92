//! Override sets stored as per-language data files.
//!
//! Layout: `<overrides>/<set>/<lang>.json`. A language without its own file
//! uses the fallback language's file (normally `en`), so a set can ship
//! English text everywhere first and gain translations later. Every document
//! is validated against the bundled schema before it is converted.

pub use crate::schema::OVERRIDE_SCHEMA_VERSION;

use crate::catalog::{Catalog, KeyPath};
use crate::error::CatalogError;
use crate::merge::OverrideSet;
use crate::schema::DocumentSchema;
use serde::Deserialize;
use serde_json::{Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct OverrideDocument {
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    requires: Vec<KeyPath>,
    #[serde(default)]
    graft: Map<String, Value>,
    #[serde(default)]
    set: Map<String, Value>,
}

/// An override set resolved for one target language.
#[derive(Debug, Clone)]
pub struct ResolvedOverride {
    pub set: String,
    /// Language whose file was actually read.
    pub language: String,
    pub source: PathBuf,
    pub fell_back: bool,
    pub description: Option<String>,
    pub overrides: OverrideSet,
}

pub struct OverrideStore {
    root: PathBuf,
    fallback: String,
    schema: DocumentSchema,
}

impl OverrideStore {
    pub fn open(root: impl Into<PathBuf>, fallback: impl Into<String>) -> Result<Self, CatalogError> {
        Ok(Self {
            root: root.into(),
            fallback: fallback.into(),
            schema: DocumentSchema::override_set()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn fallback_language(&self) -> &str {
        &self.fallback
    }

    /// Names of every set directory, sorted.
    pub fn set_names(&self) -> Result<Vec<String>, CatalogError> {
        let entries = fs::read_dir(&self.root).map_err(|err| CatalogError::from_io(&self.root, err))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|err| CatalogError::from_io(&self.root, err))?;
            if !entry.path().is_dir() {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if is_valid_name(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Load the set's document for `language`, falling back when absent.
    pub fn resolve(&self, set: &str, language: &str) -> Result<ResolvedOverride, CatalogError> {
        let set_dir = self.set_dir(set)?;
        let primary = set_dir.join(format!("{language}.json"));
        let missing = |path: PathBuf| CatalogError::OverrideNotFound {
            set: set.to_string(),
            language: language.to_string(),
            path,
        };
        if !is_valid_name(language) {
            return Err(missing(primary));
        }
        let (source, resolved_language) = if primary.is_file() {
            (primary, language)
        } else {
            let fallback = set_dir.join(format!("{}.json", self.fallback));
            if language == self.fallback || !fallback.is_file() {
                return Err(missing(primary));
            }
            warn!(
                set,
                language,
                fallback = %self.fallback,
                "no override file for language; using fallback"
            );
            (fallback, self.fallback.as_str())
        };

        let (overrides, description) = self.load_file(&source)?;
        debug!(
            set,
            language = resolved_language,
            writes = overrides.write_count(),
            source = %source.display(),
            "resolved override set"
        );
        Ok(ResolvedOverride {
            set: set.to_string(),
            language: resolved_language.to_string(),
            fell_back: resolved_language != language,
            source,
            description,
            overrides,
        })
    }

    /// Validate every document of a set, one result per file.
    pub fn check_set(
        &self,
        set: &str,
    ) -> Result<Vec<(PathBuf, Result<OverrideSet, CatalogError>)>, CatalogError> {
        let set_dir = self.set_dir(set)?;
        let entries = fs::read_dir(&set_dir).map_err(|err| CatalogError::from_io(&set_dir, err))?;
        let mut files = Vec::new();
        for entry in entries {
            let path = entry.map_err(|err| CatalogError::from_io(&set_dir, err))?.path();
            if path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files
            .into_iter()
            .map(|path| {
                let result = self.load_file(&path).map(|(overrides, _)| overrides);
                (path, result)
            })
            .collect())
    }

    /// Parse, validate, and convert one override document.
    pub fn load_file(&self, path: &Path) -> Result<(OverrideSet, Option<String>), CatalogError> {
        let invalid = |details: String| CatalogError::InvalidOverrideSet {
            path: path.to_path_buf(),
            details,
        };
        let data = fs::read_to_string(path).map_err(|err| CatalogError::from_io(path, err))?;
        let value: Value = serde_json::from_str(&data).map_err(|err| invalid(err.to_string()))?;
        self.schema.validate(&value).map_err(invalid)?;
        let document: OverrideDocument =
            serde_json::from_value(value).map_err(|err| invalid(err.to_string()))?;

        let mut overrides = OverrideSet::new();
        overrides.requires = document.requires;
        for (dotted, subtree) in document.graft {
            let subtree = Catalog::from_value(subtree)
                .map_err(|err| invalid(format!("graft '{dotted}': {err}")))?;
            overrides.grafts.push((KeyPath::parse(&dotted), subtree));
        }
        for (dotted, text) in document.set {
            let Value::String(text) = text else {
                return Err(invalid(format!("set '{dotted}' must be a string")));
            };
            overrides.values.insert(dotted, text);
        }
        Ok((overrides, document.description))
    }

    fn set_dir(&self, set: &str) -> Result<PathBuf, CatalogError> {
        if !is_valid_name(set) {
            return Err(CatalogError::InvalidOverrideSet {
                path: self.root.clone(),
                details: format!("override set name must match ^[A-Za-z0-9_-][A-Za-z0-9_.-]*$, got '{set}'"),
            });
        }
        Ok(self.root.join(set))
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with('.')
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
}
