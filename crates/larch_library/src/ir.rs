//! Serialized IR of a library.

use std::sync::OnceLock;

use crate::access::LibraryAccess;
use crate::declarations::{CombinedDeclarationsReader, DeclarationId};
use crate::error::LibraryError;
use crate::layout::IrLayout;
use crate::memo::get_or_try_init;

/// Access to the IR header, data-flow graph and individual declarations.
pub trait IrLibrary {
    /// Bytes of the IR header, or `None` if the library has none.
    fn ir_header(&self) -> Result<Option<&[u8]>, LibraryError>;

    /// Bytes of the data-flow graph, or `None` if the library has none.
    fn data_flow_graph(&self) -> Result<Option<&[u8]>, LibraryError>;

    /// Bytes of one declaration.
    fn ir_declaration(&self, index: u64, is_local: bool) -> Result<&[u8], LibraryError>;
}

/// [`IrLibrary`] over the `ir` tree.
///
/// The declarations file is loaded and indexed on the first declaration
/// lookup and reused for the facet's lifetime.
#[derive(Debug)]
pub struct IrLibraryImpl {
    access: LibraryAccess<IrLayout>,
    ir_header: OnceLock<Option<Vec<u8>>>,
    data_flow_graph: OnceLock<Option<Vec<u8>>>,
    declarations: OnceLock<CombinedDeclarationsReader>,
}

impl IrLibraryImpl {
    /// Creates the facet. Nothing is read until requested.
    pub fn new(access: LibraryAccess<IrLayout>) -> Self {
        Self {
            access,
            ir_header: OnceLock::new(),
            data_flow_graph: OnceLock::new(),
            declarations: OnceLock::new(),
        }
    }

    /// The indexed declarations file.
    pub fn declarations(&self) -> Result<&CombinedDeclarationsReader, LibraryError> {
        get_or_try_init(&self.declarations, || {
            self.access.in_place(|view| {
                let path = view.layout().ir_declarations();
                let bytes = view.read(&path)?;
                let reader =
                    CombinedDeclarationsReader::from_bytes(&view.library_file().join(&path), bytes)?;
                tracing::debug!(
                    library = %view.library_file().display(),
                    declarations = reader.len(),
                    "indexed IR declarations"
                );
                Ok(reader)
            })
        })
    }
}

impl IrLibrary for IrLibraryImpl {
    fn ir_header(&self) -> Result<Option<&[u8]>, LibraryError> {
        get_or_try_init(&self.ir_header, || {
            self.access
                .in_place(|view| view.read_if_exists(&view.layout().ir_header()))
        })
        .map(Option::as_deref)
    }

    fn data_flow_graph(&self) -> Result<Option<&[u8]>, LibraryError> {
        get_or_try_init(&self.data_flow_graph, || {
            self.access
                .in_place(|view| view.read_if_exists(&view.layout().data_flow_graph()))
        })
        .map(Option::as_deref)
    }

    fn ir_declaration(&self, index: u64, is_local: bool) -> Result<&[u8], LibraryError> {
        let id = DeclarationId::new(index, is_local);
        self.declarations()?
            .declaration_bytes(id)
            .ok_or_else(|| LibraryError::NotFound {
                library: self.access.library_file().to_path_buf(),
                entry: id.to_string(),
            })
    }
}
