//! String space: the collaborator that owns string byte storage.
//!
//! The value engine never holds a `String` directly; it holds a 3-byte
//! [`StringDescriptor`] (length + address) and asks a [`StringSpace`] to
//! resolve or allocate the bytes behind it. This mirrors the original
//! BASIC runtime, where string data lived in a separate heap from scalar
//! variables and only the descriptor travelled with the value.


use crate::error::{Result, ValueError};

/// A 3-byte handle: one length byte, one little-endian 2-byte address.
/// The engine never interprets `address` itself; it only round-trips it
/// through the backing [`StringSpace`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct StringDescriptor {
    pub length: u8,
    pub address: u16,
}

impl StringDescriptor {
    pub const EMPTY: StringDescriptor = StringDescriptor {
        length: 0,
        address: 0,
    };

    pub fn len(&self) -> usize {
        self.length as usize
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// The backing store a `Values` facade delegates string storage to.
///
/// `store` and `copy` are the only two operations the engine needs;
/// everything about how bytes are laid out, reclaimed, or compacted is the
/// implementor's business.
pub trait StringSpace {
    /// Allocate a new slot holding `bytes` and return its descriptor.
    /// `bytes.len()` must be at most 255; longer input is a runtime error.
    fn store(&mut self, bytes: &[u8]) -> Result<StringDescriptor>;

    /// Return an owned copy of the bytes behind `desc`.
    fn copy(&self, desc: StringDescriptor) -> Vec<u8>;
}

/// The simplest legal backing store: a flat, monotonically growing byte
/// arena with no compaction or reclamation. Good enough for the demo CLI
/// and for tests; a production host can swap in a compacting allocator
/// behind the same trait.
#[derive(Debug, Default, Clone)]
pub struct SlabStringSpace {
    arena: Vec<u8>,
}

impl SlabStringSpace {
    pub fn new() -> Self {
        SlabStringSpace { arena: Vec::new() }
    }
}

impl StringSpace for SlabStringSpace {
    fn store(&mut self, bytes: &[u8]) -> Result<StringDescriptor> {
        if bytes.len() > 255 {
            return Err(ValueError::StringTooLong);
        }
        let address = u16::try_from(self.arena.len()).map_err(|_| ValueError::StringTooLong)?;
        self.arena.extend_from_slice(bytes);
        Ok(StringDescriptor {
            length: bytes.len() as u8,
            address,
        })
    }

    fn copy(&self, desc: StringDescriptor) -> Vec<u8> {
        let start = desc.address as usize;
        let end = start + desc.length as usize;
        self.arena.get(start..end).map(|s| s.to_vec()).unwrap_or_default()
    }
}
