//! Archive-relative paths of every library facet.
//!
//! A layout only computes paths; it never touches the filesystem. All paths
//! returned here are relative to the library root and are resolved by an
//! [`ArchiveView`](crate::access::ArchiveView) or
//! [`RealFiles`](crate::access::RealFiles).
//!
//! ```text
//! <root>/default/manifest
//! <root>/default/resources/
//! <root>/default/linkdata/module
//! <root>/default/linkdata/package_<fq.name>/<part>.knm
//! <root>/default/ir/irDeclarations.knd
//! <root>/default/ir/header.knh
//! <root>/default/module_data_flow_graph
//! <root>/default/targets/<target>/included/
//! <root>/default/targets/<target>/compiled/
//! <root>/default/targets/<target>/native/
//! ```

use std::path::{Path, PathBuf};

use larch_common::{FqName, Target};

/// Name of the component directory holding the library contents.
pub const DEFAULT_COMPONENT: &str = "default";

/// File extension of metadata part files.
pub const METADATA_PART_EXTENSION: &str = "knm";

const MANIFEST_FILE: &str = "manifest";
const RESOURCES_DIR: &str = "resources";
const LINKDATA_DIR: &str = "linkdata";
const MODULE_HEADER_FILE: &str = "module";
const ROOT_PACKAGE_DIR: &str = "root_package";
const PACKAGE_DIR_PREFIX: &str = "package_";
const IR_DIR: &str = "ir";
const IR_DECLARATIONS_FILE: &str = "irDeclarations.knd";
const IR_HEADER_FILE: &str = "header.knh";
const DATA_FLOW_GRAPH_FILE: &str = "module_data_flow_graph";
const TARGETS_DIR: &str = "targets";
const INCLUDED_DIR: &str = "included";
const COMPILED_DIR: &str = "compiled";
const NATIVE_DIR: &str = "native";

/// Constructs a facet layout from a library root and optional target.
pub trait Layout: Sized {
    /// Creates the layout for the library rooted at `library_file`.
    fn new(library_file: &Path, target: Option<&Target>) -> Self;

    /// The library root this layout describes.
    fn library_file(&self) -> &Path;
}

/// Paths shared by every facet: identity, manifest and resources.
#[derive(Debug, Clone)]
pub struct LibraryLayout {
    library_file: PathBuf,
    component: String,
}

impl LibraryLayout {
    /// Library name derived from the root's file stem.
    pub fn library_name(&self) -> String {
        self.library_file
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// The component directory.
    pub fn component_dir(&self) -> PathBuf {
        PathBuf::from(&self.component)
    }

    /// The manifest properties file.
    pub fn manifest_file(&self) -> PathBuf {
        self.component_dir().join(MANIFEST_FILE)
    }

    /// Free-form resources shipped with the library.
    pub fn resources_dir(&self) -> PathBuf {
        self.component_dir().join(RESOURCES_DIR)
    }
}

impl Layout for LibraryLayout {
    fn new(library_file: &Path, _target: Option<&Target>) -> Self {
        Self {
            library_file: library_file.to_path_buf(),
            component: DEFAULT_COMPONENT.to_string(),
        }
    }

    fn library_file(&self) -> &Path {
        &self.library_file
    }
}

/// Per-target paths.
#[derive(Debug, Clone)]
pub struct TargetedLayout {
    base: LibraryLayout,
    target: Option<Target>,
}

impl TargetedLayout {
    /// The shared base layout.
    pub fn base(&self) -> &LibraryLayout {
        &self.base
    }

    /// The target this layout was built for.
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// Directory holding one subdirectory per supported target.
    pub fn targets_dir(&self) -> PathBuf {
        self.base.component_dir().join(TARGETS_DIR)
    }

    /// Directory of the selected target, if any.
    pub fn target_dir(&self) -> Option<PathBuf> {
        self.target
            .as_ref()
            .map(|target| self.targets_dir().join(target.name()))
    }

    /// Included sources of the selected target.
    pub fn included_dir(&self) -> Option<PathBuf> {
        self.target_dir().map(|dir| dir.join(INCLUDED_DIR))
    }
}

impl Layout for TargetedLayout {
    fn new(library_file: &Path, target: Option<&Target>) -> Self {
        Self {
            base: LibraryLayout::new(library_file, target),
            target: target.cloned(),
        }
    }

    fn library_file(&self) -> &Path {
        self.base.library_file()
    }
}

/// Paths of the serialized metadata.
#[derive(Debug, Clone)]
pub struct MetadataLayout {
    base: LibraryLayout,
}

impl MetadataLayout {
    /// Root of the metadata tree.
    pub fn linkdata_dir(&self) -> PathBuf {
        self.base.component_dir().join(LINKDATA_DIR)
    }

    /// The serialized module header.
    pub fn module_header_file(&self) -> PathBuf {
        self.linkdata_dir().join(MODULE_HEADER_FILE)
    }

    /// Directory of one package's metadata parts.
    pub fn package_fragments_dir(&self, fq_name: &FqName) -> PathBuf {
        let dir = if fq_name.is_root() {
            ROOT_PACKAGE_DIR.to_string()
        } else {
            format!("{PACKAGE_DIR_PREFIX}{}", fq_name.as_str())
        };
        self.linkdata_dir().join(dir)
    }

    /// File holding one metadata part of a package.
    pub fn package_fragment_file(&self, fq_name: &FqName, part_name: &str) -> PathBuf {
        self.package_fragments_dir(fq_name)
            .join(format!("{part_name}.{METADATA_PART_EXTENSION}"))
    }
}

impl Layout for MetadataLayout {
    fn new(library_file: &Path, target: Option<&Target>) -> Self {
        Self {
            base: LibraryLayout::new(library_file, target),
        }
    }

    fn library_file(&self) -> &Path {
        self.base.library_file()
    }
}

/// Paths of the serialized IR.
#[derive(Debug, Clone)]
pub struct IrLayout {
    base: LibraryLayout,
}

impl IrLayout {
    /// Root of the IR tree.
    pub fn ir_dir(&self) -> PathBuf {
        self.base.component_dir().join(IR_DIR)
    }

    /// The consolidated declarations file.
    pub fn ir_declarations(&self) -> PathBuf {
        self.ir_dir().join(IR_DECLARATIONS_FILE)
    }

    /// The optional IR header.
    pub fn ir_header(&self) -> PathBuf {
        self.ir_dir().join(IR_HEADER_FILE)
    }

    /// The optional serialized data-flow graph.
    pub fn data_flow_graph(&self) -> PathBuf {
        self.base.component_dir().join(DATA_FLOW_GRAPH_FILE)
    }
}

impl Layout for IrLayout {
    fn new(library_file: &Path, target: Option<&Target>) -> Self {
        Self {
            base: LibraryLayout::new(library_file, target),
        }
    }

    fn library_file(&self) -> &Path {
        self.base.library_file()
    }
}

/// Paths of precompiled native code fragments.
#[derive(Debug, Clone)]
pub struct BitcodeLayout {
    targeted: TargetedLayout,
}

impl BitcodeLayout {
    /// Fragments compiled from the library's own sources.
    pub fn compiled_dir(&self) -> Option<PathBuf> {
        self.targeted.target_dir().map(|dir| dir.join(COMPILED_DIR))
    }

    /// Externally authored fragments bundled with the library.
    pub fn native_dir(&self) -> Option<PathBuf> {
        self.targeted.target_dir().map(|dir| dir.join(NATIVE_DIR))
    }
}

impl Layout for BitcodeLayout {
    fn new(library_file: &Path, target: Option<&Target>) -> Self {
        Self {
            targeted: TargetedLayout::new(library_file, target),
        }
    }

    fn library_file(&self) -> &Path {
        self.targeted.library_file()
    }
}
