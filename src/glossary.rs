//! Per-language glossaries of known translations.
//!
//! Layout: `<glossary_dir>/<lang>.json` with two optional maps: `keys`
//! (dotted catalog path -> text) and `phrases` (reference text -> text).
//! When a locale is missing a key, the filler asks the glossary first and
//! only copies the reference wording when neither map has an answer.

use crate::error::CatalogError;
use crate::schema::DocumentSchema;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct GlossaryDocument {
    #[serde(default)]
    keys: BTreeMap<String, String>,
    #[serde(default)]
    phrases: BTreeMap<String, String>,
}

/// Known translations for one language.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Glossary {
    keys: BTreeMap<String, String>,
    phrases: BTreeMap<String, String>,
}

impl Glossary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.keys.insert(path.into(), text.into());
        self
    }

    pub fn with_phrase(mut self, reference: impl Into<String>, text: impl Into<String>) -> Self {
        self.phrases.insert(reference.into(), text.into());
        self
    }

    pub fn len(&self) -> usize {
        self.keys.len() + self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty() && self.phrases.is_empty()
    }

    /// Translation for the key at `path` whose reference wording is
    /// `reference`: an exact key entry wins, then an exact phrase, then a
    /// phrase matching after surrounding whitespace is trimmed.
    pub fn translate(&self, path: &str, reference: &str) -> Option<&str> {
        if let Some(text) = self.keys.get(path) {
            return Some(text);
        }
        if let Some(text) = self.phrases.get(reference) {
            return Some(text);
        }
        let trimmed = reference.trim();
        self.phrases
            .iter()
            .find(|(phrase, _)| phrase.trim() == trimmed)
            .map(|(_, text)| text.as_str())
    }
}

pub struct GlossaryStore {
    root: PathBuf,
    schema: DocumentSchema,
}

impl GlossaryStore {
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, CatalogError> {
        Ok(Self {
            root: root.into(),
            schema: DocumentSchema::glossary()?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The glossary for `language`, or `None` when it has no file.
    pub fn load(&self, language: &str) -> Result<Option<Glossary>, CatalogError> {
        let path = self.root.join(format!("{language}.json"));
        if !path.is_file() {
            debug!(language, path = %path.display(), "no glossary for language");
            return Ok(None);
        }
        let glossary = self.load_file(&path)?;
        debug!(language, entries = glossary.len(), "loaded glossary");
        Ok(Some(glossary))
    }

    pub fn load_file(&self, path: &Path) -> Result<Glossary, CatalogError> {
        let invalid = |details: String| CatalogError::InvalidGlossary {
            path: path.to_path_buf(),
            details,
        };
        let data = fs::read_to_string(path).map_err(|err| CatalogError::from_io(path, err))?;
        let value: serde_json::Value =
            serde_json::from_str(&data).map_err(|err| invalid(err.to_string()))?;
        self.schema.validate(&value).map_err(invalid)?;
        let document: GlossaryDocument =
            serde_json::from_value(value).map_err(|err| invalid(err.to_string()))?;
        Ok(Glossary {
            keys: document.keys,
            phrases: document.phrases,
        })
    }
}
