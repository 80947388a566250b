//! Resource names
//!
//! A [`ResourceName`] identifies one resource within one [`ResourceKind`].
//! [`ResourceNames`] keeps insertion order and does not deduplicate.
//!
//! [`ResourceKind`]: crate::ResourceKind

use serde::Serialize;

/// Name of a single resource, unique only within its kind
#[derive(
    Debug,
    Clone,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    derive_more::Display,
    derive_more::Deref,
    derive_more::From,
)]
#[serde(transparent)]
pub struct ResourceName(String);

impl ResourceName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ResourceName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

/// Ordered list of resource names; append-only, duplicates allowed
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResourceNames(Vec<ResourceName>);

impl ResourceNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append names, keeping the order they are given in
    pub fn extend<I, N>(&mut self, names: I)
    where
        I: IntoIterator<Item = N>,
        N: Into<ResourceName>,
    {
        self.0.extend(names.into_iter().map(Into::into));
    }

    /// Append only the names not already present, returning how many were added.
    ///
    /// Existing duplicates are left alone.
    pub fn extend_missing<I, N>(&mut self, names: I) -> usize
    where
        I: IntoIterator<Item = N>,
        N: Into<ResourceName>,
    {
        let before = self.0.len();
        for name in names {
            let name = name.into();
            if !self.0.contains(&name) {
                self.0.push(name);
            }
        }
        self.0.len() - before
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ResourceName> {
        self.0.iter()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n.as_str() == name)
    }

    /// Owned copies of every name, in order, for request builders
    pub fn to_strings(&self) -> Vec<String> {
        self.0.iter().map(ToString::to_string).collect()
    }
}

impl<N: Into<ResourceName>> FromIterator<N> for ResourceNames {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a ResourceNames {
    type Item = &'a ResourceName;
    type IntoIter = std::slice::Iter<'a, ResourceName>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl std::fmt::Display for ResourceNames {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, name) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{name}")?;
        }
        write!(f, "]")
    }
}
