use crate::catalog::{Catalog, ConflictPolicy, KeyPath};
use crate::error::CatalogError;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Dotted path -> leaf text, in document order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FlatCatalog {
    entries: Map<String, Value>,
}

impl FlatCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the previous text.
    pub fn insert(&mut self, path: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries
            .insert(path.into(), Value::String(value.into()))
            .and_then(|old| match old {
                Value::String(text) => Some(text),
                _ => None,
            })
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.entries.get(path).and_then(Value::as_str)
    }

    pub fn contains_key(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .filter_map(|(path, value)| value.as_str().map(|text| (path.as_str(), text)))
    }
}

impl<K, V> FromIterator<(K, V)> for FlatCatalog
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut flat = FlatCatalog::new();
        for (path, value) in iter {
            flat.insert(path, value);
        }
        flat
    }
}

impl Serialize for FlatCatalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}

/// One entry per leaf, keyed by the dot-joined path from the root.
///
/// Empty namespaces have no leaves and do not appear in the output.
pub fn flatten(catalog: &Catalog) -> FlatCatalog {
    let mut flat = FlatCatalog::new();
    catalog.for_each_leaf(|path, text| {
        flat.insert(path.to_string(), text);
    });
    flat
}

/// Rebuild a nested catalog, failing on leaf/namespace collisions.
pub fn unflatten(flat: &FlatCatalog) -> Result<Catalog, CatalogError> {
    unflatten_with(flat, ConflictPolicy::Fail)
}

/// Rebuild a nested catalog under an explicit conflict policy.
///
/// With [`ConflictPolicy::Overwrite`] a later pair wins structurally: a leaf
/// sitting on a later pair's prefix is replaced by an empty namespace.
pub fn unflatten_with(flat: &FlatCatalog, policy: ConflictPolicy) -> Result<Catalog, CatalogError> {
    let mut catalog = Catalog::new();
    for (path, value) in flat.iter() {
        catalog.insert_leaf(&KeyPath::parse(path), value, policy)?;
    }
    Ok(catalog)
}
