//! Identity and raw manifest of a library.

use std::path::Path;
use std::sync::OnceLock;

use larch_properties::{parse_properties, Properties, PropertiesError};

use crate::access::{ArchiveView, LibraryAccess};
use crate::error::LibraryError;
use crate::layout::{Layout, LibraryLayout};
use crate::memo::get_or_try_init;
use crate::versioning::LibraryVersioning;

/// Identity, manifest and versions of a library.
pub trait BaseLibrary {
    /// The library root.
    fn library_file(&self) -> &Path;

    /// Name derived from the library root.
    fn library_name(&self) -> &str;

    /// Manifest properties, loaded on first access.
    fn manifest_properties(&self) -> Result<&Properties, LibraryError>;

    /// Versions recorded in the manifest.
    fn versions(&self) -> Result<&LibraryVersioning, LibraryError>;

    /// Whether the library ships with the standard distribution rather than
    /// being supplied by the user.
    fn is_default(&self) -> bool;
}

/// [`BaseLibrary`] over the raw, unsubstituted manifest.
#[derive(Debug)]
pub struct BaseLibraryImpl {
    access: LibraryAccess<LibraryLayout>,
    is_default: bool,
    library_name: String,
    manifest: OnceLock<Properties>,
    versions: OnceLock<LibraryVersioning>,
}

impl BaseLibraryImpl {
    /// Creates the facet. Nothing is read until a property is requested.
    pub fn new(access: LibraryAccess<LibraryLayout>, is_default: bool) -> Self {
        let library_name = access.layout().library_name();
        Self {
            access,
            is_default,
            library_name,
            manifest: OnceLock::new(),
            versions: OnceLock::new(),
        }
    }
}

impl BaseLibrary for BaseLibraryImpl {
    fn library_file(&self) -> &Path {
        self.access.library_file()
    }

    fn library_name(&self) -> &str {
        &self.library_name
    }

    fn manifest_properties(&self) -> Result<&Properties, LibraryError> {
        get_or_try_init(&self.manifest, || {
            self.access.in_place(|view| read_manifest(view, view.layout()))
        })
    }

    fn versions(&self) -> Result<&LibraryVersioning, LibraryError> {
        get_or_try_init(&self.versions, || {
            let properties = self.manifest_properties()?;
            LibraryVersioning::from_properties(properties).map_err(|e| LibraryError::Parse {
                path: self
                    .access
                    .library_file()
                    .join(self.access.layout().manifest_file()),
                reason: e.to_string(),
            })
        })
    }

    fn is_default(&self) -> bool {
        self.is_default
    }
}

/// Reads and parses the manifest through any facet's view.
pub(crate) fn read_manifest<L>(
    view: &ArchiveView<'_, L>,
    layout: &LibraryLayout,
) -> Result<Properties, LibraryError> {
    let path = layout.manifest_file();
    let bytes = view.read(&path)?;
    let parse_error = |reason: String| LibraryError::Parse {
        path: view.library_file().join(&path),
        reason,
    };
    let text = String::from_utf8(bytes).map_err(|e| parse_error(e.to_string()))?;
    let properties = parse_properties(&text).map_err(|e| match e {
        PropertiesError::ParseError { .. } => parse_error(e.to_string()),
        other => LibraryError::Properties(other),
    })?;
    tracing::debug!(
        library = %view.library_file().display(),
        entries = properties.len(),
        "loaded manifest"
    );
    Ok(properties)
}
