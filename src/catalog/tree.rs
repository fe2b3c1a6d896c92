use crate::catalog::KeyPath;
use crate::error::{CatalogError, ConflictKind, ShapeError};
use serde::de::{self, Deserialize, Deserializer};
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// What to do when a write meets the wrong kind of node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConflictPolicy {
    /// Refuse the write with `CatalogError::PathConflict`.
    #[default]
    Fail,
    /// Replace the offending node; leaves on the way become empty namespaces
    /// and a namespace at the destination is discarded.
    Overwrite,
}

impl ConflictPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConflictPolicy::Fail => "fail",
            ConflictPolicy::Overwrite => "overwrite",
        }
    }
}

impl TryFrom<&str> for ConflictPolicy {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "fail" => Ok(ConflictPolicy::Fail),
            "overwrite" => Ok(ConflictPolicy::Overwrite),
            other => Err(format!("unknown conflict policy: {other}")),
        }
    }
}

/// Borrowed view of one catalog node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Node<'a> {
    Leaf(&'a str),
    Namespace(&'a Map<String, Value>),
}

/// A locale catalog: string keys mapping to leaf strings or nested
/// namespaces.
///
/// Backed by an insertion-ordered JSON object. Every value in the tree is
/// guaranteed to be a string or an object; construction from arbitrary JSON
/// goes through [`Catalog::from_value`]. Equality ignores key order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Catalog {
    root: Map<String, Value>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate an arbitrary JSON document as a catalog.
    pub fn from_value(value: Value) -> Result<Self, ShapeError> {
        match value {
            Value::Object(root) => {
                check_namespace(&root, None)?;
                Ok(Self { root })
            }
            other => Err(ShapeError {
                path: String::new(),
                found: kind_name(&other),
            }),
        }
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn get(&self, path: &KeyPath) -> Option<Node<'_>> {
        let mut current = &self.root;
        let (parents, last) = path.split_last();
        for segment in parents {
            current = current.get(segment)?.as_object()?;
        }
        match current.get(last)? {
            Value::String(text) => Some(Node::Leaf(text)),
            Value::Object(map) => Some(Node::Namespace(map)),
            _ => None,
        }
    }

    pub fn leaf(&self, path: &KeyPath) -> Option<&str> {
        match self.get(path)? {
            Node::Leaf(text) => Some(text),
            Node::Namespace(_) => None,
        }
    }

    pub fn has_namespace(&self, path: &KeyPath) -> bool {
        matches!(self.get(path), Some(Node::Namespace(_)))
    }

    /// Number of leaves in the whole tree.
    pub fn leaf_count(&self) -> usize {
        fn count(map: &Map<String, Value>) -> usize {
            map.values()
                .map(|value| match value {
                    Value::Object(child) => count(child),
                    _ => 1,
                })
                .sum()
        }
        count(&self.root)
    }

    /// Write a leaf, creating missing namespaces on the way.
    ///
    /// Under [`ConflictPolicy::Fail`] nothing is modified when the write
    /// conflicts: missing namespaces are only created below the last existing
    /// node, so a conflict is always detected before the first insertion.
    pub fn insert_leaf(
        &mut self,
        path: &KeyPath,
        value: impl Into<String>,
        policy: ConflictPolicy,
    ) -> Result<(), CatalogError> {
        let parent = parent_namespace(&mut self.root, path, policy)?;
        let (_, last) = path.split_last();
        if policy == ConflictPolicy::Fail && matches!(parent.get(last), Some(Value::Object(_))) {
            return Err(CatalogError::PathConflict {
                path: path.to_string(),
                at: path.to_string(),
                kind: ConflictKind::NamespaceOverwrite,
            });
        }
        parent.insert(last.to_string(), Value::String(value.into()));
        Ok(())
    }

    /// Install `subtree` at `path`, replacing whatever was there.
    pub fn graft(
        &mut self,
        path: &KeyPath,
        subtree: Catalog,
        policy: ConflictPolicy,
    ) -> Result<(), CatalogError> {
        let parent = parent_namespace(&mut self.root, path, policy)?;
        let (_, last) = path.split_last();
        parent.insert(last.to_string(), subtree.into_value());
        Ok(())
    }

    /// Visit every leaf in document order with its full path.
    pub fn for_each_leaf<F>(&self, mut visit: F)
    where
        F: FnMut(&KeyPath, &str),
    {
        fn walk<F>(map: &Map<String, Value>, prefix: Option<&KeyPath>, visit: &mut F)
        where
            F: FnMut(&KeyPath, &str),
        {
            for (key, value) in map {
                let path = match prefix {
                    Some(parent) => parent.child(key),
                    None => KeyPath::single(key),
                };
                match value {
                    Value::Object(child) => walk(child, Some(&path), visit),
                    Value::String(text) => visit(&path, text),
                    _ => {}
                }
            }
        }
        walk(&self.root, None, &mut visit);
    }
}

fn parent_namespace<'a>(
    root: &'a mut Map<String, Value>,
    path: &KeyPath,
    policy: ConflictPolicy,
) -> Result<&'a mut Map<String, Value>, CatalogError> {
    let (parents, _) = path.split_last();
    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            if policy == ConflictPolicy::Fail {
                return Err(CatalogError::PathConflict {
                    path: path.to_string(),
                    at: path.prefix(depth + 1).to_string(),
                    kind: ConflictKind::LeafInPath,
                });
            }
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => unreachable!("namespace slot was just normalized to an object"),
        };
    }
    Ok(current)
}

fn check_namespace(map: &Map<String, Value>, prefix: Option<&str>) -> Result<(), ShapeError> {
    for (key, value) in map {
        let path = match prefix {
            Some(parent) => format!("{parent}.{key}"),
            None => key.clone(),
        };
        match value {
            Value::String(_) => {}
            Value::Object(child) => check_namespace(child, Some(&path))?,
            other => {
                return Err(ShapeError {
                    path,
                    found: kind_name(other),
                });
            }
        }
    }
    Ok(())
}

fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.root.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Catalog::from_value(value).map_err(de::Error::custom)
    }
}
