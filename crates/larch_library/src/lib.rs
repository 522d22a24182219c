//! Read access to larch library archives.
//!
//! A library archive bundles a manifest, serialized metadata, IR
//! declarations and precompiled native code for several targets. Each
//! concern is exposed as an independent facet ([`BaseLibrary`],
//! [`TargetedLibrary`], [`MetadataLibrary`], [`IrLibrary`],
//! [`BitcodeLibrary`]) backed by its own [`Layout`] and [`LibraryAccess`].
//! [`LibraryImpl`] composes one instance of each into the full [`Library`]
//! view. Every facet loads lazily and caches what it loads for its own
//! lifetime.

#![warn(missing_docs)]

pub mod access;
pub mod base;
pub mod bitcode;
pub mod declarations;
pub mod error;
pub mod ext;
pub mod ir;
pub mod layout;
pub mod library;
pub mod metadata;
pub mod properties;
pub mod targeted;
pub mod versioning;

mod memo;

pub use access::{ArchiveView, LibraryAccess, RealFiles};
pub use base::{BaseLibrary, BaseLibraryImpl};
pub use bitcode::{BitcodeLibrary, BitcodeLibraryImpl};
pub use declarations::{encode_declarations, CombinedDeclarationsReader, DeclarationId};
pub use error::LibraryError;
pub use ext::{LibraryExt, UnresolvedLibrary};
pub use ir::{IrLibrary, IrLibraryImpl};
pub use layout::{BitcodeLayout, IrLayout, Layout, LibraryLayout, MetadataLayout, TargetedLayout};
pub use library::{create_library, Library, LibraryImpl};
pub use metadata::{MetadataLibrary, MetadataLibraryImpl};
pub use targeted::{TargetedLibrary, TargetedLibraryImpl};
pub use versioning::{AbiVersion, LibraryVersioning, ParseAbiVersionError};
