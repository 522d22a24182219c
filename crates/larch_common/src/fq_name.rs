//! Dotted package names.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully-qualified, dot-separated package name such as `org.example.util`.
///
/// The empty name denotes the root package.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Default, Serialize, Deserialize)]
pub struct FqName(String);

impl FqName {
    /// Creates a package name from its dotted form.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The root package.
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Returns `true` for the root package.
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the dotted form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the name's segments; empty for the root package.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }
}

impl From<&str> for FqName {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for FqName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_package() {
        let root = FqName::root();
        assert!(root.is_root());
        assert_eq!(root.segments().count(), 0);
        assert_eq!(root.to_string(), "<root>");
    }

    #[test]
    fn segments_split_on_dots() {
        let name = FqName::from("org.example.util");
        assert!(!name.is_root());
        assert_eq!(name.segments().collect::<Vec<_>>(), vec!["org", "example", "util"]);
        assert_eq!(name.to_string(), "org.example.util");
    }

    #[test]
    fn ordering_is_lexicographic() {
        let a = FqName::from("a.b");
        let b = FqName::from("a.c");
        assert!(a < b);
    }
}
