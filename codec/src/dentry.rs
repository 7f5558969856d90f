//! Directory entries: a `(parent inode, name) -> child inode` association.

use fsbuf::Buffer;

use crate::encoding::{read_u32, read_u64, write_u32, write_u64};
use crate::error::Result;

/// A single directory entry keyed by `(parent_id, name)`, pointing at
/// `inode`. The codec is stateless with respect to dentries: it neither
/// validates nor normalizes `name`, which is why it is kept as raw bytes
/// rather than a `String` — a corrupt or adversarial `name` region should
/// round-trip exactly, not trigger a UTF-8 validation error that has no
/// home in this codec's error model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dentry {
    /// Inode number of the parent directory.
    pub parent_id: u64,
    /// Entry name, as the raw bytes that were (or will be) persisted.
    pub name: Vec<u8>,
    /// Inode number of the entry this dentry points to.
    pub inode: u64,
    /// File-type discriminant. Opaque to the codec.
    pub type_: u32,
}

impl Dentry {
    /// Append this dentry's framed record — key region then value region —
    /// to `buf`.
    pub fn marshal_with_buffer(&self, buf: &mut Buffer) -> Result<()> {
        self.marshal_key_with_buffer(buf)?;
        self.marshal_value_with_buffer(buf)?;
        Ok(())
    }

    fn marshal_key_with_buffer(&self, buf: &mut Buffer) -> Result<()> {
        let reservation = buf.need_data_for_write(4);
        let key_start = buf.write_offset();
        write_u64(buf, self.parent_id);
        buf.append(&self.name);
        let key_len = buf.write_offset() - key_start;
        buf.patch(reservation, &(key_len as u32).to_be_bytes());
        Ok(())
    }

    fn marshal_value_with_buffer(&self, buf: &mut Buffer) -> Result<()> {
        let reservation = buf.need_data_for_write(4);
        let value_start = buf.write_offset();
        write_u64(buf, self.inode);
        write_u32(buf, self.type_);
        let value_len = buf.write_offset() - value_start;
        buf.patch(reservation, &(value_len as u32).to_be_bytes());
        Ok(())
    }

    /// Consume one framed dentry record from `buf`.
    pub fn unmarshal_with_buffer(buf: &mut Buffer) -> Result<Self> {
        let key_len = read_u32(buf)? as usize;
        let (parent_id, name) = Self::unmarshal_key_with_buffer(buf, key_len)?;
        let value_len = read_u32(buf)? as usize;
        let (inode, type_) = Self::unmarshal_value_with_buffer(buf, value_len)?;
        Ok(Dentry {
            parent_id,
            name,
            inode,
            type_,
        })
    }

    fn unmarshal_key_with_buffer(buf: &mut Buffer, key_len: usize) -> Result<(u64, Vec<u8>)> {
        let parent_id = read_u64(buf)?;
        let has_read = 8;
        let name = buf.copy_data(key_len - has_read);
        Ok((parent_id, name))
    }

    fn unmarshal_value_with_buffer(buf: &mut Buffer, value_len: usize) -> Result<(u64, u32)> {
        let mut has_read = 0usize;
        let inode = read_u64(buf)?;
        has_read += 8;
        let type_ = read_u32(buf)?;
        has_read += 4;
        if has_read != value_len {
            crate::error::fatal_length_mismatch("dentry", "value", value_len, has_read);
        }
        Ok((inode, type_))
    }
}
