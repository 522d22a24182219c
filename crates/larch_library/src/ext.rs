//! Convenience accessors derived from manifest properties.

use serde::Serialize;

use crate::base::BaseLibrary;
use crate::error::LibraryError;
use crate::properties::{
    dependency_version_key, DEPENDS, EXPORT_FORWARD_DECLARATIONS, INCLUDED_HEADERS, INTEROP,
    PACKAGE, SHORT_NAME, UNIQUE_NAME,
};

/// A dependency named in the manifest, not yet resolved to a library.
#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct UnresolvedLibrary {
    /// The declared library name.
    pub name: String,
    /// The declared version, if the manifest records one.
    pub version: Option<String>,
}

/// Derived accessors available on every facet that exposes a manifest.
///
/// Values are recomputed from the cached manifest on each call.
pub trait LibraryExt: BaseLibrary {
    /// The globally unique library name.
    ///
    /// Fails with [`LibraryError::RequiredPropertyMissing`] if absent.
    fn unique_name(&self) -> Result<&str, LibraryError> {
        self.manifest_properties()?
            .get(UNIQUE_NAME)
            .ok_or_else(|| LibraryError::RequiredPropertyMissing {
                library: self.library_name().to_string(),
                property: UNIQUE_NAME.to_string(),
            })
    }

    /// The short display name, if any.
    fn short_name(&self) -> Result<Option<&str>, LibraryError> {
        Ok(self.manifest_properties()?.get(SHORT_NAME))
    }

    /// Dependencies from `depends`, each paired with its
    /// `dependency_version_<name>` entry.
    fn unresolved_dependencies(&self) -> Result<Vec<UnresolvedLibrary>, LibraryError> {
        let properties = self.manifest_properties()?;
        Ok(properties
            .property_list(DEPENDS, true)?
            .into_iter()
            .map(|name| {
                let version = properties.property_string(&dependency_version_key(&name));
                UnresolvedLibrary { name, version }
            })
            .collect())
    }

    /// `true` only if `interop` is exactly `true`.
    fn is_interop(&self) -> Result<bool, LibraryError> {
        Ok(self.manifest_properties()?.get(INTEROP) == Some("true"))
    }

    /// The package of the library's interop declarations, if any.
    fn package_fq_name(&self) -> Result<Option<&str>, LibraryError> {
        Ok(self.manifest_properties()?.get(PACKAGE))
    }

    /// Forwarded declarations, blank entries dropped.
    fn exported_forward_declarations(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self
            .manifest_properties()?
            .get(EXPORT_FORWARD_DECLARATIONS)
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default())
    }

    /// Foreign headers the library was generated from.
    fn included_headers(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self
            .manifest_properties()?
            .property_list(INCLUDED_HEADERS, true)?)
    }
}

impl<T: BaseLibrary + ?Sized> LibraryExt for T {}
