//! Reading and writing catalog documents.
//!
//! Documents are pretty-printed JSON with two-space indentation, non-ASCII
//! text written verbatim, and a trailing newline. Writes go to a temporary
//! file next to the destination and are renamed into place.

use crate::catalog::Catalog;
use crate::error::CatalogError;
use serde::Serialize;
use serde_json::Value;
use std::fs;
use std::io::{self, Write};
use std::path::Path;
use tempfile::NamedTempFile;

pub fn load(path: &Path) -> Result<Catalog, CatalogError> {
    let data = fs::read_to_string(path).map_err(|err| CatalogError::from_io(path, err))?;
    parse(path, &data)
}

/// Parse document text; `path` only labels errors.
pub fn parse(path: &Path, data: &str) -> Result<Catalog, CatalogError> {
    let value: Value = serde_json::from_str(data).map_err(|err| CatalogError::Malformed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    Catalog::from_value(value).map_err(|err| CatalogError::Malformed {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })
}

pub fn save(catalog: &Catalog, path: &Path) -> Result<(), CatalogError> {
    write_json(catalog, path)
}

pub fn render<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    Ok(text)
}

/// Atomically replace `path` with the rendered document.
///
/// An existing destination keeps its permissions.
pub fn write_json<T: Serialize + ?Sized>(value: &T, path: &Path) -> Result<(), CatalogError> {
    let io_err = |err: io::Error| CatalogError::Io {
        path: path.to_path_buf(),
        source: err,
    };
    let text = render(value).map_err(|err| io_err(io::Error::other(err)))?;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = NamedTempFile::new_in(dir).map_err(|err| CatalogError::from_io(dir, err))?;
    temp.write_all(text.as_bytes()).map_err(io_err)?;
    temp.as_file().sync_all().map_err(io_err)?;

    match fs::metadata(path) {
        Ok(meta) => fs::set_permissions(temp.path(), meta.permissions()).map_err(io_err)?,
        Err(_) => set_default_permissions(temp.path()).map_err(io_err)?,
    }

    temp.persist(path).map_err(|err| io_err(err.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_default_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_default_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}
