//! Serialized metadata of a library.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use larch_common::FqName;

use crate::access::LibraryAccess;
use crate::error::LibraryError;
use crate::layout::{MetadataLayout, METADATA_PART_EXTENSION};
use crate::memo::get_or_try_init;

/// Access to the serialized module header and per-package metadata parts.
pub trait MetadataLibrary {
    /// Bytes of the module header, read once.
    fn module_header_data(&self) -> Result<&[u8], LibraryError>;

    /// Bytes of one metadata part. Read on every call.
    fn package_metadata(&self, fq_name: &FqName, part_name: &str) -> Result<Vec<u8>, LibraryError>;

    /// Names of the metadata parts of a package.
    fn package_metadata_parts(&self, fq_name: &FqName) -> Result<BTreeSet<String>, LibraryError>;
}

/// [`MetadataLibrary`] over the `linkdata` tree.
#[derive(Debug)]
pub struct MetadataLibraryImpl {
    access: LibraryAccess<MetadataLayout>,
    module_header: OnceLock<Vec<u8>>,
}

impl MetadataLibraryImpl {
    /// Creates the facet. Nothing is read until requested.
    pub fn new(access: LibraryAccess<MetadataLayout>) -> Self {
        Self {
            access,
            module_header: OnceLock::new(),
        }
    }
}

impl MetadataLibrary for MetadataLibraryImpl {
    fn module_header_data(&self) -> Result<&[u8], LibraryError> {
        get_or_try_init(&self.module_header, || {
            self.access.in_place(|view| {
                view.read_entry(&view.layout().module_header_file(), "module header")
            })
        })
        .map(Vec::as_slice)
    }

    fn package_metadata(&self, fq_name: &FqName, part_name: &str) -> Result<Vec<u8>, LibraryError> {
        if part_name.is_empty() || part_name.contains(['/', '\\']) {
            return Err(LibraryError::InvalidPartName {
                package: fq_name.to_string(),
                part: part_name.to_string(),
            });
        }
        self.access.in_place(|view| {
            view.read_entry(
                &view.layout().package_fragment_file(fq_name, part_name),
                &format!("metadata part '{part_name}' of package {fq_name}"),
            )
        })
    }

    fn package_metadata_parts(&self, fq_name: &FqName) -> Result<BTreeSet<String>, LibraryError> {
        let entries = self.access.in_place(|view| {
            let dir = view.layout().package_fragments_dir(fq_name);
            if !view.exists(&dir) {
                return Err(LibraryError::NotFound {
                    library: view.library_file().to_path_buf(),
                    entry: format!("metadata of package {fq_name}"),
                });
            }
            view.list_names(&dir)
        })?;
        unique_part_names(fq_name, &entries)
    }
}

/// Cuts each entry at its first part extension, failing if two entries map
/// to the same part name. Entries without the extension, or with nothing
/// before it, are not parts.
fn unique_part_names(fq_name: &FqName, entries: &[String]) -> Result<BTreeSet<String>, LibraryError> {
    let suffix = format!(".{METADATA_PART_EXTENSION}");
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let parts = entries
        .iter()
        .filter_map(|entry| entry.split_once(&suffix))
        .map(|(part, _)| part)
        .filter(|part| !part.is_empty());
    for part in parts {
        *counts.entry(part).or_default() += 1;
    }

    let duplicates: Vec<String> = counts
        .iter()
        .filter(|(_, count)| **count > 1)
        .map(|(part, count)| format!("{part} ({count})"))
        .collect();
    if !duplicates.is_empty() {
        return Err(LibraryError::DuplicateParts {
            package: fq_name.to_string(),
            duplicates: duplicates.join(", "),
        });
    }

    Ok(counts.into_keys().map(str::to_string).collect())
}
