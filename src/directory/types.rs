//! Directory entries and search results exchanged with a [`DirectoryClient`].
//!
//! [`DirectoryClient`]: super::DirectoryClient

use std::collections::BTreeMap;

/// A single directory entry: a distinguished name and its attributes.
///
/// Attribute names are matched exactly (case-sensitive). Each attribute holds
/// its values in the order they were supplied. That order is local only:
/// LDAP attribute values are a set, and an add sends them unordered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    distinguished_name: String,
    attributes: BTreeMap<String, Vec<String>>,
}

impl DirectoryEntry {
    /// Creates an entry with no attributes.
    #[must_use]
    pub fn new(distinguished_name: impl Into<String>) -> Self {
        Self {
            distinguished_name: distinguished_name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Returns the entry with `values` appended to attribute `name`.
    #[must_use]
    pub fn with_attribute<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.attributes
            .entry(name.into())
            .or_default()
            .extend(values.into_iter().map(Into::into));
        self
    }

    /// Appends a single value to attribute `name`, creating it if absent.
    pub fn push_value(&mut self, name: &str, value: impl Into<String>) {
        self.attributes
            .entry(name.to_owned())
            .or_default()
            .push(value.into());
    }

    /// The entry's distinguished name.
    #[must_use]
    pub fn distinguished_name(&self) -> &str {
        &self.distinguished_name
    }

    /// Whether the entry carries attribute `name`.
    #[must_use]
    pub fn has_attribute(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// The values of attribute `name`, or `None` when the attribute is absent.
    #[must_use]
    pub fn attribute_values(&self, name: &str) -> Option<&[String]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// Iterates over all attributes in name order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.attributes
            .iter()
            .map(|(name, values)| (name.as_str(), values.as_slice()))
    }
}

/// The entries returned by one search, in server order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchResult {
    entries: Vec<DirectoryEntry>,
}

impl SearchResult {
    /// Wraps the entries returned by a search.
    #[must_use]
    pub const fn new(entries: Vec<DirectoryEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries returned.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.entries.len()
    }

    /// Whether the search matched nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries as an ordered slice.
    #[must_use]
    pub fn entries(&self) -> &[DirectoryEntry] {
        &self.entries
    }

    /// The first entry, if any.
    #[must_use]
    pub fn first(&self) -> Option<&DirectoryEntry> {
        self.entries.first()
    }

    /// Consumes the result, returning the ordered entries.
    #[must_use]
    pub fn into_entries(self) -> Vec<DirectoryEntry> {
        self.entries
    }
}

impl FromIterator<DirectoryEntry> for SearchResult {
    fn from_iter<T: IntoIterator<Item = DirectoryEntry>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
