use serde::{Deserialize, Serialize};
use std::fmt;

/// Separator between key segments in a flattened path.
pub const SEPARATOR: char = '.';

/// A non-empty sequence of catalog key segments.
///
/// Parsing splits on `.` without any escaping, so a key that itself contains
/// a dot cannot be addressed through a dotted string.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted.split(SEPARATOR).map(str::to_string).collect(),
        }
    }

    /// A one-segment path; the key is kept whole even if it contains a dot.
    pub(crate) fn single(key: &str) -> Self {
        Self {
            segments: vec![key.to_string()],
        }
    }

    /// Build a path from explicit segments; `None` when there are none.
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return None;
        }
        Some(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Parent segments and the final key.
    pub fn split_last(&self) -> (&[String], &str) {
        match self.segments.split_last() {
            Some((last, parents)) => (parents, last.as_str()),
            None => (&[], ""),
        }
    }

    pub fn child(&self, key: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(key.to_string());
        Self { segments }
    }

    /// The first `len` segments, clamped to the path length.
    pub fn prefix(&self, len: usize) -> Self {
        let len = len.clamp(1, self.segments.len());
        Self {
            segments: self.segments[..len].to_vec(),
        }
    }

    /// True when `self` equals `ancestor` or lies underneath it.
    pub fn starts_with(&self, ancestor: &KeyPath) -> bool {
        self.segments.starts_with(&ancestor.segments)
    }

    pub fn has_dotted_segment(&self) -> bool {
        self.segments.iter().any(|s| s.contains(SEPARATOR))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, segment) in self.segments.iter().enumerate() {
            if idx > 0 {
                write!(f, "{SEPARATOR}")?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl From<&str> for KeyPath {
    fn from(value: &str) -> Self {
        KeyPath::parse(value)
    }
}

impl From<String> for KeyPath {
    fn from(value: String) -> Self {
        KeyPath::parse(&value)
    }
}

impl From<KeyPath> for String {
    fn from(value: KeyPath) -> Self {
        value.to_string()
    }
}
