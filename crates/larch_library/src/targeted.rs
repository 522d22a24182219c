//! Target-aware manifest and per-target directories.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use larch_common::Target;
use larch_properties::{substitute, Properties};

use crate::access::LibraryAccess;
use crate::base::{read_manifest, BaseLibrary, BaseLibraryImpl};
use crate::error::LibraryError;
use crate::layout::TargetedLayout;
use crate::memo::get_or_try_init;
use crate::versioning::LibraryVersioning;

/// Per-target view of a library.
pub trait TargetedLibrary {
    /// Names of the targets the library carries artifacts for, sorted.
    ///
    /// Empty if the library has no targets directory.
    fn target_list(&self) -> Result<Vec<String>, LibraryError>;

    /// Absolute paths of the included sources for the selected target.
    ///
    /// Empty if no target was selected or the directory is absent.
    fn included_paths(&self) -> Result<Vec<PathBuf>, LibraryError>;
}

/// [`TargetedLibrary`] wrapping a [`BaseLibraryImpl`].
///
/// Its manifest is a separate copy from the base facet's, with the selected
/// target's substitutions applied. Identity and versions come from the base.
#[derive(Debug)]
pub struct TargetedLibraryImpl {
    access: LibraryAccess<TargetedLayout>,
    base: BaseLibraryImpl,
    manifest: OnceLock<Properties>,
}

impl TargetedLibraryImpl {
    /// Creates the facet around `base`.
    pub fn new(access: LibraryAccess<TargetedLayout>, base: BaseLibraryImpl) -> Self {
        Self {
            access,
            base,
            manifest: OnceLock::new(),
        }
    }

    /// The target this facet was built for.
    pub fn target(&self) -> Option<&Target> {
        self.access.target()
    }

    /// The wrapped base facet, whose manifest is unsubstituted.
    pub fn base(&self) -> &BaseLibraryImpl {
        &self.base
    }
}

impl BaseLibrary for TargetedLibraryImpl {
    fn library_file(&self) -> &Path {
        self.base.library_file()
    }

    fn library_name(&self) -> &str {
        self.base.library_name()
    }

    fn manifest_properties(&self) -> Result<&Properties, LibraryError> {
        get_or_try_init(&self.manifest, || {
            let mut properties = self
                .access
                .in_place(|view| read_manifest(view, view.layout().base()))?;
            if let Some(target) = self.access.target() {
                substitute(&mut properties, &target.substitutions());
            }
            Ok(properties)
        })
    }

    fn versions(&self) -> Result<&LibraryVersioning, LibraryError> {
        self.base.versions()
    }

    fn is_default(&self) -> bool {
        self.base.is_default()
    }
}

impl TargetedLibrary for TargetedLibraryImpl {
    fn target_list(&self) -> Result<Vec<String>, LibraryError> {
        self.access
            .in_place(|view| view.list_names_or_empty(&view.layout().targets_dir()))
    }

    fn included_paths(&self) -> Result<Vec<PathBuf>, LibraryError> {
        self.access.real_files(|files| match files.layout().included_dir() {
            Some(dir) => files.list_files_or_empty(&dir),
            None => Ok(Vec::new()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = "unique_name=core\nlinkerOpts=-lm\nlinkerOpts.linux=-ldl\n";

    fn make_library() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("core");
        std::fs::create_dir_all(root.join("default")).unwrap();
        std::fs::write(root.join("default/manifest"), MANIFEST).unwrap();
        (dir, root)
    }

    fn targeted(root: &Path, target: Option<&Target>) -> TargetedLibraryImpl {
        let base = BaseLibraryImpl::new(LibraryAccess::new(root, target), false);
        TargetedLibraryImpl::new(LibraryAccess::new(root, target), base)
    }

    fn linux() -> Target {
        "linux_x64".parse().unwrap()
    }

    #[test]
    fn substitution_applied_with_target() {
        let (_dir, root) = make_library();
        let lib = targeted(&root, Some(&linux()));
        let substituted = lib.manifest_properties().unwrap();
        let raw = lib.base().manifest_properties().unwrap();
        assert_eq!(substituted.get("linkerOpts"), Some("-lm -ldl"));
        assert_eq!(raw.get("linkerOpts"), Some("-lm"));
    }

    #[test]
    fn no_target_means_raw_manifest() {
        let (_dir, root) = make_library();
        let lib = targeted(&root, None);
        assert_eq!(
            lib.manifest_properties().unwrap(),
            lib.base().manifest_properties().unwrap()
        );
    }

    #[test]
    fn target_list_without_directory_is_empty() {
        let (_dir, root) = make_library();
        assert!(targeted(&root, None).target_list().unwrap().is_empty());
    }

    #[test]
    fn target_list_enumerates_directory() {
        let (_dir, root) = make_library();
        for t in ["macos_arm64", "linux_x64"] {
            std::fs::create_dir_all(root.join("default/targets").join(t)).unwrap();
        }
        assert_eq!(
            targeted(&root, None).target_list().unwrap(),
            vec!["linux_x64", "macos_arm64"]
        );
    }

    #[test]
    fn included_paths_are_absolute() {
        let (_dir, root) = make_library();
        let included = root.join("default/targets/linux_x64/included");
        std::fs::create_dir_all(&included).unwrap();
        std::fs::write(included.join("b.h"), "").unwrap();
        std::fs::write(included.join("a.h"), "").unwrap();

        let paths = targeted(&root, Some(&linux())).included_paths().unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].is_absolute());
        assert!(paths[0].ends_with("included/a.h"));
        assert!(paths[1].ends_with("included/b.h"));
    }

    #[test]
    fn included_paths_empty_without_target_or_dir() {
        let (_dir, root) = make_library();
        assert!(targeted(&root, None).included_paths().unwrap().is_empty());
        assert!(targeted(&root, Some(&linux())).included_paths().unwrap().is_empty());
    }

    #[test]
    fn identity_delegates_to_base() {
        let (_dir, root) = make_library();
        let base = BaseLibraryImpl::new(LibraryAccess::new(&root, None), true);
        let lib = TargetedLibraryImpl::new(LibraryAccess::new(&root, None), base);
        assert!(lib.is_default());
        assert_eq!(lib.library_name(), "core");
        assert!(lib.target().is_none());
    }
}
