//! Error taxonomy shared by every catalog operation.
//!
//! Failures are local to one target document: the batch runner turns each
//! variant into a per-target outcome instead of aborting the run.

use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    /// The source document does not exist.
    #[error("catalog not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The source document is not valid JSON or not a catalog-shaped tree.
    #[error("malformed catalog {}: {reason}", path.display())]
    Malformed { path: PathBuf, reason: String },

    /// An override path collides with the existing structure.
    #[error("path conflict writing '{path}': {kind} at '{at}'")]
    PathConflict {
        path: String,
        at: String,
        kind: ConflictKind,
    },

    /// An override document failed schema validation or conversion.
    #[error("invalid override set {}:\n{details}", path.display())]
    InvalidOverrideSet { path: PathBuf, details: String },

    /// Neither the language's own override file nor the fallback's exists.
    #[error("override set '{set}' has no file for '{language}' (looked for {})", path.display())]
    OverrideNotFound {
        set: String,
        language: String,
        path: PathBuf,
    },

    /// A glossary document failed schema validation or conversion.
    #[error("invalid glossary {}:\n{details}", path.display())]
    InvalidGlossary { path: PathBuf, details: String },

    /// A target name that is not a locale code.
    #[error("'{name}' is not a locale code (expected xx, xxx, xx_YY or xx-YY)")]
    InvalidTarget { name: String },

    /// A namespace the override set requires is absent from the target.
    #[error("required namespace '{path}' is missing")]
    MissingSection { path: String },

    /// A bundled document schema could not be compiled.
    #[error("bundled schema is unusable: {0}")]
    Schema(String),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CatalogError {
    /// Wrap an I/O error, mapping `NotFound` onto the dedicated variant.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::NotFound {
            CatalogError::NotFound { path }
        } else {
            CatalogError::Io { path, source }
        }
    }

    /// Skips are expected outcomes (a locale without the section an override
    /// set extends), not failures.
    pub fn is_skip(&self) -> bool {
        matches!(self, CatalogError::MissingSection { .. })
    }
}

/// How an override path collided with the catalog structure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConflictKind {
    /// A prefix of the path holds a leaf where a namespace is needed.
    LeafInPath,
    /// The path itself names a namespace that a leaf write would discard.
    NamespaceOverwrite,
}

impl fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictKind::LeafInPath => f.write_str("leaf value where a namespace is expected"),
            ConflictKind::NamespaceOverwrite => {
                f.write_str("namespace would be replaced by a leaf value")
            }
        }
    }
}

/// A JSON value that cannot live in a catalog (anything but a string or an
/// object).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("value at '{path}' is {found}; catalogs hold only strings and objects")]
pub struct ShapeError {
    pub path: String,
    pub found: &'static str,
}
