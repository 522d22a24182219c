//! Precompiled native code fragments.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use larch_properties::Properties;

use crate::access::LibraryAccess;
use crate::base::BaseLibrary;
use crate::error::LibraryError;
use crate::layout::BitcodeLayout;
use crate::targeted::{TargetedLibrary, TargetedLibraryImpl};
use crate::versioning::LibraryVersioning;

/// Native code fragments of the selected target.
pub trait BitcodeLibrary: TargetedLibrary {
    /// Absolute paths of the fragments compiled from the library's sources,
    /// followed by the externally authored ones. Each group is sorted by
    /// file name; missing directories or no selected target contribute
    /// nothing.
    fn bitcode_paths(&self) -> Result<Vec<PathBuf>, LibraryError>;
}

/// [`BitcodeLibrary`] sharing a [`TargetedLibraryImpl`].
#[derive(Debug)]
pub struct BitcodeLibraryImpl {
    access: LibraryAccess<BitcodeLayout>,
    targeted: Arc<TargetedLibraryImpl>,
}

impl BitcodeLibraryImpl {
    /// Creates the facet around a shared targeted facet.
    pub fn new(access: LibraryAccess<BitcodeLayout>, targeted: Arc<TargetedLibraryImpl>) -> Self {
        Self { access, targeted }
    }
}

impl BitcodeLibrary for BitcodeLibraryImpl {
    fn bitcode_paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        self.access.real_files(|files| {
            let layout = files.layout();
            let mut paths = Vec::new();
            for dir in [layout.compiled_dir(), layout.native_dir()].into_iter().flatten() {
                paths.extend(files.list_files_or_empty(&dir)?);
            }
            Ok(paths)
        })
    }
}

impl TargetedLibrary for BitcodeLibraryImpl {
    fn target_list(&self) -> Result<Vec<String>, LibraryError> {
        self.targeted.target_list()
    }

    fn included_paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        self.targeted.included_paths()
    }
}

impl BaseLibrary for BitcodeLibraryImpl {
    fn library_file(&self) -> &Path {
        self.targeted.library_file()
    }

    fn library_name(&self) -> &str {
        self.targeted.library_name()
    }

    fn manifest_properties(&self) -> Result<&Properties, LibraryError> {
        self.targeted.manifest_properties()
    }

    fn versions(&self) -> Result<&LibraryVersioning, LibraryError> {
        self.targeted.versions()
    }

    fn is_default(&self) -> bool {
        self.targeted.is_default()
    }
}
