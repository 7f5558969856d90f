//! Fixed-width extent keys and the ordered list of them embedded in an
//! inode's value region.

use std::sync::RwLock;

use fsbuf::Buffer;

use crate::encoding::{read_u32, read_u64, write_u32, write_u64};
use crate::error::Result;

/// Byte width of one marshaled `ExtentKey`. The extent list has no explicit
/// count or length prefix of its own — the caller bounds decoding by the
/// inode's declared value length, and this fixed width is what makes "bare
/// concatenation, no sentinel" decodable.
pub const EXTENT_KEY_SIZE: usize = 40;

/// A fixed-width descriptor of a contiguous data range belonging to an
/// inode: which partition and extent hold the data, at what offset within
/// that extent, its size, and a checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtentKey {
    /// Logical byte offset within the owning file.
    pub file_offset: u64,
    /// Data-partition identifier the extent physically lives on.
    pub partition_id: u64,
    /// Extent identifier within that partition.
    pub extent_id: u64,
    /// Byte offset within the extent where this range starts.
    pub extent_offset: u64,
    /// Length of the range, in bytes.
    pub size: u32,
    /// Checksum of the range's contents.
    pub crc: u32,
}

impl ExtentKey {
    /// Write this extent key's 40 bytes at the buffer's current write
    /// offset. No length prefix — the caller already knows the width.
    pub fn marshal_binary_with_buffer(&self, buf: &mut Buffer) -> Result<()> {
        write_u64(buf, self.file_offset);
        write_u64(buf, self.partition_id);
        write_u64(buf, self.extent_id);
        write_u64(buf, self.extent_offset);
        write_u32(buf, self.size);
        write_u32(buf, self.crc);
        Ok(())
    }

    /// Read one extent key's 40 bytes from the buffer's current read
    /// offset. Returns the key and the number of bytes consumed
    /// (always `EXTENT_KEY_SIZE`), the latter so callers can accumulate a
    /// running total for the length-mismatch assertion on the enclosing
    /// inode value region.
    pub fn unmarshal_binary_with_buffer(buf: &mut Buffer) -> Result<(Self, usize)> {
        let file_offset = read_u64(buf)?;
        let partition_id = read_u64(buf)?;
        let extent_id = read_u64(buf)?;
        let extent_offset = read_u64(buf)?;
        let size = read_u32(buf)?;
        let crc = read_u32(buf)?;
        Ok((
            ExtentKey {
                file_offset,
                partition_id,
                extent_id,
                extent_offset,
                size,
                crc,
            },
            EXTENT_KEY_SIZE,
        ))
    }
}

/// An ordered sequence of extent keys, guarded by its own read/write lock so
/// it can be snapshotted independently of the rest of an inode's fields
/// during marshal (see the inode's locking discipline).
///
/// Despite the name, the codec itself never sorts or deduplicates: it
/// preserves whatever order the keys are in, on both encode and decode.
#[derive(Debug, Default)]
pub struct SortedExtents {
    eks: RwLock<Vec<ExtentKey>>,
}

impl SortedExtents {
    /// An empty extent list.
    pub fn new() -> Self {
        SortedExtents {
            eks: RwLock::new(Vec::new()),
        }
    }

    /// Build a list from an existing, already-ordered vector.
    pub fn from_vec(eks: Vec<ExtentKey>) -> Self {
        SortedExtents {
            eks: RwLock::new(eks),
        }
    }

    /// Append one key, preserving whatever order the caller hands keys in.
    pub fn append(&self, ek: ExtentKey) {
        self.eks.write().unwrap().push(ek);
    }

    /// A point-in-time snapshot of the current keys.
    pub fn eks(&self) -> Vec<ExtentKey> {
        self.eks.read().unwrap().clone()
    }

    /// Marshal the whole run under a single read-lock acquisition, so the
    /// bytes written reflect one consistent snapshot even if a concurrent
    /// mutator is appending extents elsewhere.
    pub fn marshal_with_buffer(&self, buf: &mut Buffer) -> Result<()> {
        let eks = self.eks.read().unwrap();
        for ek in eks.iter() {
            ek.marshal_binary_with_buffer(buf)?;
        }
        Ok(())
    }

    /// Consume extent keys until `remaining` bytes have been read.
    /// `remaining` is the number of bytes left in the inode's value region
    /// after its fixed-width fields — the extent list carries no length or
    /// count of its own (see `EXTENT_KEY_SIZE`), so the caller must pass the
    /// exact bound rather than let this loop run to the end of the whole
    /// buffer, which may hold further records after this one. Returns the
    /// list and the total bytes consumed (always equal to `remaining` on
    /// success, since `EXTENT_KEY_SIZE` evenly divides a well-formed region).
    pub fn unmarshal_with_buffer(buf: &mut Buffer, remaining: usize) -> Result<(Self, usize)> {
        let mut has_read = 0usize;
        let mut eks = Vec::new();
        while has_read < remaining {
            let (ek, n) = ExtentKey::unmarshal_binary_with_buffer(buf)?;
            has_read += n;
            eks.push(ek);
        }
        Ok((SortedExtents::from_vec(eks), has_read))
    }
}

impl PartialEq for SortedExtents {
    fn eq(&self, other: &Self) -> bool {
        self.eks() == other.eks()
    }
}

impl Eq for SortedExtents {}

impl Clone for SortedExtents {
    fn clone(&self) -> Self {
        SortedExtents::from_vec(self.eks())
    }
}
