//! The ordered key/value map backing a library manifest.

use std::collections::BTreeMap;

use crate::error::PropertiesError;
use crate::list::parse_property_list;

/// An ordered mapping from property keys to string values.
///
/// Keys iterate in ascending order, so dumps and substitutions are
/// deterministic regardless of the order lines appeared in the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Creates an empty property map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value for `key`, if present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns `true` if `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Sets `key` to `value`, returning the previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Iterates entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Iterates keys in ascending order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the value for `key` as an owned string, if present.
    pub fn property_string(&self, key: &str) -> Option<String> {
        self.get(key).map(str::to_string)
    }

    /// Splits the value for `key` into a list.
    ///
    /// Items are separated by whitespace or commas. With `escape_in_quotes`,
    /// quoted segments keep separators literally. An absent key yields an
    /// empty list.
    pub fn property_list(
        &self,
        key: &str,
        escape_in_quotes: bool,
    ) -> Result<Vec<String>, PropertiesError> {
        match self.get(key) {
            Some(value) => parse_property_list(value, escape_in_quotes).map_err(|reason| {
                PropertiesError::InvalidList {
                    key: key.to_string(),
                    reason,
                }
            }),
            None => Ok(Vec::new()),
        }
    }
}

impl FromIterator<(String, String)> for Properties {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Properties {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
