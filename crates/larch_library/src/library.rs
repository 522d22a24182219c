//! The unified library view.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use larch_common::{FqName, Target};
use larch_properties::Properties;

use crate::access::LibraryAccess;
use crate::base::{BaseLibrary, BaseLibraryImpl};
use crate::bitcode::{BitcodeLibrary, BitcodeLibraryImpl};
use crate::error::LibraryError;
use crate::ir::{IrLibrary, IrLibraryImpl};
use crate::metadata::{MetadataLibrary, MetadataLibraryImpl};
use crate::properties::LINKER_OPTS;
use crate::targeted::{TargetedLibrary, TargetedLibraryImpl};
use crate::versioning::LibraryVersioning;

/// Every facet of a library in one object.
pub trait Library: BaseLibrary + MetadataLibrary + IrLibrary + BitcodeLibrary {
    /// Linker options from the target-substituted manifest.
    ///
    /// The `linkerOpts` value is split on whitespace and commas; quoted
    /// segments keep those characters.
    fn linker_opts(&self) -> Result<Vec<String>, LibraryError>;
}

/// [`Library`] composed from one instance of each facet.
///
/// Identity and manifest come from the targeted facet, so the manifest seen
/// here has the selected target's substitutions applied. The targeted facet
/// is shared with the native-code facet, so both observe one cache.
#[derive(Debug)]
pub struct LibraryImpl {
    targeted: Arc<TargetedLibraryImpl>,
    metadata: MetadataLibraryImpl,
    ir: IrLibraryImpl,
    bitcode: BitcodeLibraryImpl,
}

impl LibraryImpl {
    /// Composes already constructed facets.
    pub fn new(
        targeted: Arc<TargetedLibraryImpl>,
        metadata: MetadataLibraryImpl,
        ir: IrLibraryImpl,
        bitcode: BitcodeLibraryImpl,
    ) -> Self {
        Self {
            targeted,
            metadata,
            ir,
            bitcode,
        }
    }

    /// The target this library was opened for.
    pub fn target(&self) -> Option<&Target> {
        self.targeted.target()
    }

    /// The targeted facet.
    pub fn targeted(&self) -> &TargetedLibraryImpl {
        &self.targeted
    }

    /// The IR facet.
    pub fn ir(&self) -> &IrLibraryImpl {
        &self.ir
    }
}

/// Builds the unified view of the library at `library_file`.
///
/// Each facet gets its own access object over the same root and target.
/// No I/O happens here; every property is loaded on first use.
pub fn create_library(
    library_file: &Path,
    target: Option<&Target>,
    is_default: bool,
) -> LibraryImpl {
    let base = BaseLibraryImpl::new(LibraryAccess::new(library_file, target), is_default);
    let targeted = Arc::new(TargetedLibraryImpl::new(
        LibraryAccess::new(library_file, target),
        base,
    ));
    let metadata = MetadataLibraryImpl::new(LibraryAccess::new(library_file, target));
    let ir = IrLibraryImpl::new(LibraryAccess::new(library_file, target));
    let bitcode = BitcodeLibraryImpl::new(
        LibraryAccess::new(library_file, target),
        Arc::clone(&targeted),
    );
    LibraryImpl::new(targeted, metadata, ir, bitcode)
}

impl BaseLibrary for LibraryImpl {
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

impl TargetedLibrary for LibraryImpl {
    fn target_list(&self) -> Result<Vec<String>, LibraryError> {
        self.targeted.target_list()
    }

    fn included_paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        self.targeted.included_paths()
    }
}

impl MetadataLibrary for LibraryImpl {
    fn module_header_data(&self) -> Result<&[u8], LibraryError> {
        self.metadata.module_header_data()
    }

    fn package_metadata(&self, fq_name: &FqName, part_name: &str) -> Result<Vec<u8>, LibraryError> {
        self.metadata.package_metadata(fq_name, part_name)
    }

    fn package_metadata_parts(
        &self,
        fq_name: &FqName,
    ) -> Result<BTreeSet<String>, LibraryError> {
        self.metadata.package_metadata_parts(fq_name)
    }
}

impl IrLibrary for LibraryImpl {
    fn ir_header(&self) -> Result<Option<&[u8]>, LibraryError> {
        self.ir.ir_header()
    }

    fn data_flow_graph(&self) -> Result<Option<&[u8]>, LibraryError> {
        self.ir.data_flow_graph()
    }

    fn ir_declaration(&self, index: u64, is_local: bool) -> Result<&[u8], LibraryError> {
        self.ir.ir_declaration(index, is_local)
    }
}

impl BitcodeLibrary for LibraryImpl {
    fn bitcode_paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        self.bitcode.bitcode_paths()
    }
}

impl Library for LibraryImpl {
    fn linker_opts(&self) -> Result<Vec<String>, LibraryError> {
        Ok(self.manifest_properties()?.property_list(LINKER_OPTS, true)?)
    }
}
