//! Error types for library access.

use std::path::PathBuf;

use larch_properties::PropertiesError;

/// Errors that can occur while reading a library archive.
///
/// Optional content (IR header, data-flow graph, absent target directories)
/// is reported as `None` or an empty list rather than an error. Everything
/// here propagates to the caller unchanged.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// An I/O error occurred while reading the archive.
    #[error("library I/O error at {path}: {source}")]
    Io {
        /// The path that caused the error.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// A required entry does not exist in the archive.
    #[error("{entry} not found in library {library}")]
    NotFound {
        /// The library root.
        library: PathBuf,
        /// Description of the missing entry.
        entry: String,
    },

    /// A file in the archive could not be parsed.
    #[error("failed to parse {path}: {reason}")]
    Parse {
        /// The file that failed to parse.
        path: PathBuf,
        /// Description of the parse failure.
        reason: String,
    },

    /// A manifest property could not be interpreted.
    #[error(transparent)]
    Properties(#[from] PropertiesError),

    /// Several metadata files resolve to the same part name.
    #[error("duplicate metadata parts in package {package}: {duplicates}")]
    DuplicateParts {
        /// The package whose directory holds the duplicates.
        package: String,
        /// Each duplicated part name with its occurrence count.
        duplicates: String,
    },

    /// A metadata part name that cannot name a file in the package directory.
    #[error("invalid metadata part name '{part}' in package {package}")]
    InvalidPartName {
        /// The package the part was requested from.
        package: String,
        /// The rejected part name.
        part: String,
    },

    /// A manifest property the caller relies on is absent.
    #[error("library {library} is missing required property '{property}'")]
    RequiredPropertyMissing {
        /// The library name.
        library: String,
        /// The missing property key.
        property: String,
    },

    /// The consolidated declarations file is structurally invalid.
    #[error("malformed declarations file {path}: {reason}")]
    MalformedDeclarations {
        /// The declarations file.
        path: PathBuf,
        /// Description of the problem.
        reason: String,
    },

    /// The declarations table could not be encoded.
    #[error("serialization error: {reason}")]
    Serialization {
        /// Description of the serialization failure.
        reason: String,
    },
}
