//! The consolidated IR declarations file.
//!
//! All serialized IR declarations of a library live in one file: a table of
//! `(id, offset, size)` entries followed by the declaration bytes. The file
//! is loaded once and indexed, after which single declarations are served
//! as slices of the loaded buffer.
//!
//! Layout:
//!
//! ```text
//! magic       [u8; 4]  b"LDCL"
//! table_len   u32      little-endian length of the encoded table
//! table       bincode  Vec<{ id: { index, is_local }, offset, size }>
//! data        offsets are relative to the start of this section
//! ```

use std::collections::HashMap;
use std::fmt;
use std::ops::Range;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::LibraryError;

const MAGIC: [u8; 4] = *b"LDCL";
const TABLE_START: usize = 8;

/// Identifies one serialized declaration.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize, Deserialize)]
pub struct DeclarationId {
    /// Numeric index of the declaration.
    pub index: u64,
    /// Whether the declaration is local to its file.
    pub is_local: bool,
}

impl DeclarationId {
    /// Creates an id.
    pub fn new(index: u64, is_local: bool) -> Self {
        Self { index, is_local }
    }
}

impl fmt::Display for DeclarationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_local {
            write!(f, "declaration {} (local)", self.index)
        } else {
            write!(f, "declaration {}", self.index)
        }
    }
}

/// One row of the entry table.
#[derive(Debug, Serialize, Deserialize)]
struct TableEntry {
    id: DeclarationId,
    offset: u64,
    size: u64,
}

/// Indexed view over a consolidated declarations file.
#[derive(Debug)]
pub struct CombinedDeclarationsReader {
    data: Vec<u8>,
    index: HashMap<DeclarationId, Range<usize>>,
}

impl CombinedDeclarationsReader {
    /// Validates the entry table of `bytes` and indexes it.
    ///
    /// `path` is only used for error messages.
    pub fn from_bytes(path: &Path, bytes: Vec<u8>) -> Result<Self, LibraryError> {
        let malformed = |reason: String| LibraryError::MalformedDeclarations {
            path: path.to_path_buf(),
            reason,
        };

        if bytes.len() < TABLE_START || bytes[..4] != MAGIC {
            return Err(malformed("missing magic bytes".to_string()));
        }
        let mut len = [0u8; 4];
        len.copy_from_slice(&bytes[4..TABLE_START]);
        let table_len = u32::from_le_bytes(len) as usize;
        let data_start = TABLE_START
            .checked_add(table_len)
            .filter(|&start| start <= bytes.len())
            .ok_or_else(|| malformed(format!("entry table of {table_len} bytes is truncated")))?;

        let (entries, read): (Vec<TableEntry>, usize) = bincode::serde::decode_from_slice(
            &bytes[TABLE_START..data_start],
            bincode::config::standard(),
        )
        .map_err(|e| malformed(format!("invalid entry table: {e}")))?;
        if read != table_len {
            return Err(malformed(format!(
                "entry table has {} trailing bytes",
                table_len - read
            )));
        }
        let data_len = bytes.len() - data_start;

        let mut index = HashMap::with_capacity(entries.len());
        for TableEntry { id, offset, size } in entries {
            let range = usize::try_from(offset)
                .ok()
                .zip(usize::try_from(size).ok())
                .and_then(|(offset, size)| Some(offset..offset.checked_add(size)?))
                .filter(|range| range.end <= data_len)
                .ok_or_else(|| malformed(format!("{id} points past the end of the file")))?;

            if index
                .insert(id, data_start + range.start..data_start + range.end)
                .is_some()
            {
                return Err(malformed(format!("{id} appears twice")));
            }
        }

        Ok(Self { data: bytes, index })
    }

    /// Bytes of the declaration with `id`, if present.
    pub fn declaration_bytes(&self, id: DeclarationId) -> Option<&[u8]> {
        self.index.get(&id).map(|range| &self.data[range.clone()])
    }

    /// Number of declarations.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns `true` if the file holds no declarations.
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// All declaration ids, sorted.
    pub fn ids(&self) -> Vec<DeclarationId> {
        let mut ids: Vec<_> = self.index.keys().copied().collect();
        ids.sort();
        ids
    }
}

/// Encodes declarations into the consolidated file format.
pub fn encode_declarations(entries: &[(DeclarationId, &[u8])]) -> Result<Vec<u8>, LibraryError> {
    let mut offset = 0u64;
    let table: Vec<TableEntry> = entries
        .iter()
        .map(|(id, bytes)| {
            let entry = TableEntry {
                id: *id,
                offset,
                size: bytes.len() as u64,
            };
            offset += entry.size;
            entry
        })
        .collect();

    let table_bytes = bincode::serde::encode_to_vec(&table, bincode::config::standard())
        .map_err(|e| LibraryError::Serialization {
            reason: e.to_string(),
        })?;
    let table_len = u32::try_from(table_bytes.len()).map_err(|_| LibraryError::Serialization {
        reason: format!("entry table of {} bytes is too large", table_bytes.len()),
    })?;

    let data_len: usize = entries.iter().map(|(_, bytes)| bytes.len()).sum();
    let mut output = Vec::with_capacity(TABLE_START + table_bytes.len() + data_len);
    output.extend_from_slice(&MAGIC);
    output.extend_from_slice(&table_len.to_le_bytes());
    output.extend_from_slice(&table_bytes);
    for (_, bytes) in entries {
        output.extend_from_slice(bytes);
    }
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        encode_declarations(&[
            (DeclarationId::new(0, false), b"fun main".as_slice()),
            (DeclarationId::new(0, true), b"local".as_slice()),
            (DeclarationId::new(7, false), b"".as_slice()),
            (DeclarationId::new(42, false), b"class Foo".as_slice()),
        ])
        .unwrap()
    }

    fn table_len(bytes: &[u8]) -> usize {
        u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize
    }

    fn reader(bytes: Vec<u8>) -> Result<CombinedDeclarationsReader, LibraryError> {
        CombinedDeclarationsReader::from_bytes(Path::new("irDeclarations.knd"), bytes)
    }

    #[test]
    fn encode_then_read_roundtrip() {
        let r = reader(sample()).unwrap();
        assert_eq!(r.len(), 4);
        assert_eq!(r.declaration_bytes(DeclarationId::new(0, false)), Some(b"fun main".as_slice()));
        assert_eq!(r.declaration_bytes(DeclarationId::new(0, true)), Some(b"local".as_slice()));
        assert_eq!(r.declaration_bytes(DeclarationId::new(7, false)), Some(b"".as_slice()));
        assert_eq!(r.declaration_bytes(DeclarationId::new(42, false)), Some(b"class Foo".as_slice()));
    }

    #[test]
    fn locality_is_part_of_the_key() {
        let r = reader(sample()).unwrap();
        assert!(r.declaration_bytes(DeclarationId::new(42, true)).is_none());
        assert!(r.declaration_bytes(DeclarationId::new(1, false)).is_none());
    }

    #[test]
    fn ids_are_sorted() {
        let r = reader(sample()).unwrap();
        assert_eq!(
            r.ids(),
            vec![
                DeclarationId::new(0, false),
                DeclarationId::new(0, true),
                DeclarationId::new(7, false),
                DeclarationId::new(42, false),
            ]
        );
    }

    #[test]
    fn empty_file_is_valid() {
        let r = reader(encode_declarations(&[]).unwrap()).unwrap();
        assert!(r.is_empty());
    }

    #[test]
    fn bad_magic_rejected() {
        let mut bytes = sample();
        bytes[0] = b'X';
        assert!(matches!(reader(bytes), Err(LibraryError::MalformedDeclarations { .. })));
    }

    #[test]
    fn truncated_table_rejected() {
        let bytes = sample();
        let cut = TABLE_START + table_len(&bytes) - 1;
        let err = reader(bytes[..cut].to_vec()).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn range_past_end_rejected() {
        let mut bytes = sample();
        bytes.truncate(bytes.len() - 1);
        let err = reader(bytes).unwrap_err();
        assert!(err.to_string().contains("past the end"));
    }

    #[test]
    fn duplicate_ids_rejected() {
        let bytes = encode_declarations(&[
            (DeclarationId::new(1, false), b"a".as_slice()),
            (DeclarationId::new(1, false), b"b".as_slice()),
        ])
        .unwrap();
        let err = reader(bytes).unwrap_err();
        assert!(err.to_string().contains("appears twice"));
    }

    #[test]
    fn bad_locality_flag_rejected() {
        let mut bytes = sample();
        // Table starts with the entry count, then the first id's index and flag.
        bytes[TABLE_START + 2] = 2;
        let err = reader(bytes).unwrap_err();
        assert!(matches!(err, LibraryError::MalformedDeclarations { .. }));
        assert!(err.to_string().contains("invalid entry table"));
    }

    #[test]
    fn table_length_past_end_rejected() {
        let mut bytes = sample();
        bytes[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
        let err = reader(bytes).unwrap_err();
        assert!(err.to_string().contains("truncated"));
    }

    #[test]
    fn trailing_table_bytes_rejected() {
        let bytes = sample();
        let len = table_len(&bytes);
        let mut padded = bytes[..TABLE_START + len].to_vec();
        padded.push(0);
        padded.extend_from_slice(&bytes[TABLE_START + len..]);
        padded[4..8].copy_from_slice(&((len + 1) as u32).to_le_bytes());
        let err = reader(padded).unwrap_err();
        assert!(err.to_string().contains("trailing"));
    }

    #[test]
    fn display_id() {
        assert_eq!(DeclarationId::new(3, true).to_string(), "declaration 3 (local)");
        assert_eq!(DeclarationId::new(3, false).to_string(), "declaration 3");
    }
}
