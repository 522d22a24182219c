//! Scoped access to a library archive.
//!
//! [`LibraryAccess`] opens the archive for the duration of one closure call
//! and hands it a view parameterized by a facet [`Layout`]. The handle is
//! released when the call returns, on success or failure.
//!
//! [`LibraryAccess::in_place`] reads archive-relative entries without
//! exposing on-disk locations. [`LibraryAccess::real_files`] is for callers
//! that need absolute paths, such as linker inputs. Only directory archives
//! are supported; both modes then resolve against the same directory and
//! nothing has to be extracted.

use std::ffi::OsString;
use std::io::ErrorKind;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use larch_common::Target;

use crate::error::LibraryError;
use crate::layout::Layout;

/// Opens a library archive and resolves paths through layout `L`.
#[derive(Debug, Clone)]
pub struct LibraryAccess<L> {
    library_file: PathBuf,
    target: Option<Target>,
    _layout: PhantomData<fn() -> L>,
}

impl<L: Layout> LibraryAccess<L> {
    /// Creates an access object. Nothing is opened until a read is requested.
    pub fn new(library_file: &Path, target: Option<&Target>) -> Self {
        Self {
            library_file: library_file.to_path_buf(),
            target: target.cloned(),
            _layout: PhantomData,
        }
    }

    /// The library root this access object opens.
    pub fn library_file(&self) -> &Path {
        &self.library_file
    }

    /// The target the layout is built for.
    pub fn target(&self) -> Option<&Target> {
        self.target.as_ref()
    }

    /// A layout value without opening the archive.
    pub fn layout(&self) -> L {
        L::new(&self.library_file, self.target.as_ref())
    }

    /// Runs `action` against the archive contents in place.
    pub fn in_place<T>(
        &self,
        action: impl FnOnce(&ArchiveView<'_, L>) -> Result<T, LibraryError>,
    ) -> Result<T, LibraryError> {
        let handle = ArchiveHandle::open(&self.library_file)?;
        let layout = self.layout();
        action(&ArchiveView {
            handle: &handle,
            layout: &layout,
        })
    }

    /// Runs `action` with access to real on-disk paths of archive entries.
    pub fn real_files<T>(
        &self,
        action: impl FnOnce(&RealFiles<'_, L>) -> Result<T, LibraryError>,
    ) -> Result<T, LibraryError> {
        let handle = ArchiveHandle::open(&self.library_file)?;
        let layout = self.layout();
        action(&RealFiles {
            view: ArchiveView {
                handle: &handle,
                layout: &layout,
            },
        })
    }
}

/// An open archive. Closed on drop.
#[derive(Debug)]
struct ArchiveHandle {
    library_file: PathBuf,
    root: PathBuf,
}

impl ArchiveHandle {
    fn open(library_file: &Path) -> Result<Self, LibraryError> {
        let io_error = |source| LibraryError::Io {
            path: library_file.to_path_buf(),
            source,
        };
        let metadata = std::fs::metadata(library_file).map_err(io_error)?;
        if !metadata.is_dir() {
            return Err(io_error(std::io::Error::new(
                ErrorKind::Unsupported,
                "packed library archives are not supported",
            )));
        }
        let root = std::fs::canonicalize(library_file).map_err(io_error)?;
        tracing::trace!(root = %root.display(), "opened library");
        Ok(Self {
            library_file: library_file.to_path_buf(),
            root,
        })
    }
}

impl Drop for ArchiveHandle {
    fn drop(&mut self) {
        tracing::trace!(root = %self.root.display(), "closed library");
    }
}

/// Read access to archive-relative entries.
pub struct ArchiveView<'a, L> {
    handle: &'a ArchiveHandle,
    layout: &'a L,
}

impl<L> ArchiveView<'_, L> {
    /// The layout of the facet this view was opened for.
    pub fn layout(&self) -> &L {
        self.layout
    }

    /// The library root as it was given to [`LibraryAccess::new`].
    pub fn library_file(&self) -> &Path {
        &self.handle.library_file
    }

    fn locate(&self, path: &Path) -> PathBuf {
        self.handle.root.join(path)
    }

    fn io_error(&self, path: &Path, source: std::io::Error) -> LibraryError {
        LibraryError::Io {
            path: self.locate(path),
            source,
        }
    }

    /// Returns `true` if `path` exists in the archive.
    pub fn exists(&self, path: &Path) -> bool {
        self.locate(path).exists()
    }

    /// Reads an entry. A missing entry is an I/O error.
    pub fn read(&self, path: &Path) -> Result<Vec<u8>, LibraryError> {
        std::fs::read(self.locate(path)).map_err(|e| self.io_error(path, e))
    }

    /// Reads an entry, reporting a missing one as [`LibraryError::NotFound`]
    /// described by `entry`.
    pub fn read_entry(&self, path: &Path, entry: &str) -> Result<Vec<u8>, LibraryError> {
        std::fs::read(self.locate(path)).map_err(|e| match e.kind() {
            ErrorKind::NotFound => LibraryError::NotFound {
                library: self.library_file().to_path_buf(),
                entry: entry.to_string(),
            },
            _ => self.io_error(path, e),
        })
    }

    /// Reads an entry if it exists.
    pub fn read_if_exists(&self, path: &Path) -> Result<Option<Vec<u8>>, LibraryError> {
        match std::fs::read(self.locate(path)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(path, e)),
        }
    }

    /// Names of the entries of directory `path`, sorted. A missing directory
    /// is an I/O error.
    pub fn list_names(&self, path: &Path) -> Result<Vec<String>, LibraryError> {
        Ok(lossy(self.list_os_names(path)?))
    }

    /// Like [`list_names`](Self::list_names), but a missing directory yields
    /// an empty list.
    pub fn list_names_or_empty(&self, path: &Path) -> Result<Vec<String>, LibraryError> {
        Ok(lossy(self.list_os_names_or_empty(path)?))
    }

    fn list_os_names(&self, path: &Path) -> Result<Vec<OsString>, LibraryError> {
        let entries = std::fs::read_dir(self.locate(path)).map_err(|e| self.io_error(path, e))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| self.io_error(path, e))?;
            names.push(entry.file_name());
        }
        names.sort();
        Ok(names)
    }

    fn list_os_names_or_empty(&self, path: &Path) -> Result<Vec<OsString>, LibraryError> {
        match self.list_os_names(path) {
            Err(LibraryError::Io { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Ok(Vec::new())
            }
            other => other,
        }
    }
}

/// Access to real on-disk paths of archive entries.
pub struct RealFiles<'a, L> {
    view: ArchiveView<'a, L>,
}

impl<L> RealFiles<'_, L> {
    /// The layout of the facet this view was opened for.
    pub fn layout(&self) -> &L {
        self.view.layout()
    }

    /// Absolute on-disk path of `path`.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.view.locate(path)
    }

    /// Absolute paths of the entries of directory `path`, sorted by name.
    /// A missing directory yields an empty list. Names are kept as the
    /// filesystem reports them.
    pub fn list_files_or_empty(&self, path: &Path) -> Result<Vec<PathBuf>, LibraryError> {
        let dir = self.resolve(path);
        Ok(self
            .view
            .list_os_names_or_empty(path)?
            .into_iter()
            .map(|name| dir.join(name))
            .collect())
    }
}

fn lossy(names: Vec<OsString>) -> Vec<String> {
    names
        .into_iter()
        .map(|name| name.to_string_lossy().into_owned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LibraryLayout;

    fn make_library() -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("core");
        std::fs::create_dir_all(root.join("default/resources")).unwrap();
        std::fs::write(root.join("default/manifest"), "unique_name=core\n").unwrap();
        std::fs::write(root.join("default/resources/b.txt"), "b").unwrap();
        std::fs::write(root.join("default/resources/a.txt"), "a").unwrap();
        (dir, root)
    }

    #[test]
    fn in_place_reads_relative_entries() {
        let (_dir, root) = make_library();
        let access = LibraryAccess::<LibraryLayout>::new(&root, None);
        let bytes = access
            .in_place(|view| view.read(&view.layout().manifest_file()))
            .unwrap();
        assert_eq!(bytes, b"unique_name=core\n");
    }

    #[test]
    fn missing_root_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let access = LibraryAccess::<LibraryLayout>::new(&dir.path().join("absent"), None);
        let err = access.in_place(|_| Ok(())).unwrap_err();
        match err {
            LibraryError::Io { source, .. } => assert_eq!(source.kind(), ErrorKind::NotFound),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn packed_file_is_unsupported() {
        let dir = tempfile::tempdir().unwrap();
        let packed = dir.path().join("core.klib");
        std::fs::write(&packed, b"PK").unwrap();
        let access = LibraryAccess::<LibraryLayout>::new(&packed, None);
        let err = access.in_place(|_| Ok(())).unwrap_err();
        match err {
            LibraryError::Io { source, .. } => assert_eq!(source.kind(), ErrorKind::Unsupported),
            other => panic!("expected Io, got {other:?}"),
        }
    }

    #[test]
    fn read_entry_maps_not_found() {
        let (_dir, root) = make_library();
        let access = LibraryAccess::<LibraryLayout>::new(&root, None);
        let err = access
            .in_place(|view| view.read_entry(Path::new("default/nope"), "nope"))
            .unwrap_err();
        assert!(matches!(err, LibraryError::NotFound { ref entry, .. } if entry == "nope"));
    }

    #[test]
    fn read_if_exists_handles_absence() {
        let (_dir, root) = make_library();
        let access = LibraryAccess::<LibraryLayout>::new(&root, None);
        let (present, absent) = access
            .in_place(|view| {
                Ok((
                    view.read_if_exists(Path::new("default/manifest"))?,
                    view.read_if_exists(Path::new("default/absent"))?,
                ))
            })
            .unwrap();
        assert!(present.is_some());
        assert!(absent.is_none());
    }

    #[test]
    fn listing_is_sorted() {
        let (_dir, root) = make_library();
        let access = LibraryAccess::<LibraryLayout>::new(&root, None);
        let names = access
            .in_place(|view| view.list_names(&view.layout().resources_dir()))
            .unwrap();
        assert_eq!(names, vec!["a.txt", "b.txt"]);
    }

    #[test]
    fn listing_missing_dir() {
        let (_dir, root) = make_library();
        let access = LibraryAccess::<LibraryLayout>::new(&root, None);
        let empty = access
            .in_place(|view| view.list_names_or_empty(Path::new("default/targets")))
            .unwrap();
        assert!(empty.is_empty());
        let err = access
            .in_place(|view| view.list_names(Path::new("default/targets")))
            .unwrap_err();
        assert!(matches!(err, LibraryError::Io { .. }));
    }

    #[test]
    fn real_files_are_absolute() {
        let (_dir, root) = make_library();
        let access = LibraryAccess::<LibraryLayout>::new(&root, None);
        let files = access
            .real_files(|files| files.list_files_or_empty(&files.layout().resources_dir()))
            .unwrap();
        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|p| p.is_absolute() && p.exists()));
        assert!(files[0].ends_with("default/resources/a.txt"));
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn real_files_keep_non_utf8_names() {
        use std::os::unix::ffi::OsStrExt;

        let (_dir, root) = make_library();
        let name = std::ffi::OsStr::from_bytes(b"lib\xff.bc");
        std::fs::write(root.join("default/resources").join(name), "x").unwrap();
        let access = LibraryAccess::<LibraryLayout>::new(&root, None);
        let files = access
            .real_files(|files| files.list_files_or_empty(&files.layout().resources_dir()))
            .unwrap();
        assert_eq!(files.len(), 3);
        assert!(files.iter().all(|p| p.exists()));
        assert!(files.iter().any(|p| p.file_name() == Some(name)));
    }
}
