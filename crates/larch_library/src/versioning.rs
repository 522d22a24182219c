//! Version information projected from the manifest.

use std::fmt;
use std::str::FromStr;

use larch_properties::Properties;
use serde::Serialize;

use crate::properties::{ABI_VERSION, COMPILER_VERSION, IR_VERSION, LIBRARY_VERSION, METADATA_VERSION};

/// ABI version of a library's serialized format.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize)]
pub struct AbiVersion {
    /// Major component.
    pub major: u32,
    /// Minor component.
    pub minor: u32,
    /// Patch component.
    pub patch: u32,
}

impl AbiVersion {
    /// Creates a version from its components.
    pub fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl fmt::Display for AbiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Error type for parsing ABI version strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid abi version: '{input}'")]
pub struct ParseAbiVersionError {
    /// The input string that failed to parse.
    pub input: String,
}

impl FromStr for AbiVersion {
    type Err = ParseAbiVersionError;

    /// Parses `major.minor.patch`, or a bare integer `n` meaning `0.n.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseAbiVersionError {
            input: s.to_string(),
        };
        let parts = s
            .trim()
            .split('.')
            .map(|p| p.parse::<u32>().map_err(|_| err()))
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [major, minor, patch] => Ok(Self::new(*major, *minor, *patch)),
            [legacy] => Ok(Self::new(0, *legacy, 0)),
            _ => Err(err()),
        }
    }
}

/// Versions recorded in a library manifest. Every field is optional.
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize)]
pub struct LibraryVersioning {
    /// The library's own version.
    pub library_version: Option<String>,
    /// Version of the compiler that produced the library.
    pub compiler_version: Option<String>,
    /// ABI version of the serialized format.
    pub abi_version: Option<AbiVersion>,
    /// Version of the metadata format.
    pub metadata_version: Option<String>,
    /// Version of the IR format.
    pub ir_version: Option<String>,
}

impl LibraryVersioning {
    /// Projects the version keys out of `properties`.
    pub fn from_properties(properties: &Properties) -> Result<Self, ParseAbiVersionError> {
        let abi_version = properties
            .get(ABI_VERSION)
            .map(str::parse::<AbiVersion>)
            .transpose()?;
        Ok(Self {
            library_version: properties.property_string(LIBRARY_VERSION),
            compiler_version: properties.property_string(COMPILER_VERSION),
            abi_version,
            metadata_version: properties.property_string(METADATA_VERSION),
            ir_version: properties.property_string(IR_VERSION),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use larch_properties::parse_properties;

    #[test]
    fn parse_full_abi_version() {
        assert_eq!("1.8.0".parse::<AbiVersion>().unwrap(), AbiVersion::new(1, 8, 0));
    }

    #[test]
    fn parse_legacy_abi_version() {
        assert_eq!("24".parse::<AbiVersion>().unwrap(), AbiVersion::new(0, 24, 0));
    }

    #[test]
    fn reject_malformed_abi_version() {
        assert!("1.8".parse::<AbiVersion>().is_err());
        assert!("one.two.three".parse::<AbiVersion>().is_err());
        assert!("".parse::<AbiVersion>().is_err());
        let err = "1.x.0".parse::<AbiVersion>().unwrap_err();
        assert_eq!(err.to_string(), "invalid abi version: '1.x.0'");
    }

    #[test]
    fn display_roundtrip() {
        let v = AbiVersion::new(2, 1, 3);
        assert_eq!(v.to_string().parse::<AbiVersion>().unwrap(), v);
    }

    #[test]
    fn project_from_properties() {
        let p = parse_properties(
            "abi_version=1.8.0\ncompiler_version=2.0.0\nlibrary_version=3.1\nir_version=1.0",
        )
        .unwrap();
        let v = LibraryVersioning::from_properties(&p).unwrap();
        assert_eq!(v.abi_version, Some(AbiVersion::new(1, 8, 0)));
        assert_eq!(v.compiler_version.as_deref(), Some("2.0.0"));
        assert_eq!(v.library_version.as_deref(), Some("3.1"));
        assert_eq!(v.ir_version.as_deref(), Some("1.0"));
        assert!(v.metadata_version.is_none());
    }

    #[test]
    fn empty_properties_give_empty_versions() {
        let v = LibraryVersioning::from_properties(&Properties::new()).unwrap();
        assert_eq!(v, LibraryVersioning::default());
    }

    #[test]
    fn malformed_abi_version_propagates() {
        let p = parse_properties("abi_version=latest").unwrap();
        assert!(LibraryVersioning::from_properties(&p).is_err());
    }
}
