//! Inodes: the metadata record describing a file or directory, including
//! its embedded, independently lockable extent list.

use fsbuf::Buffer;

use crate::encoding::{read_u32, read_u64, write_u32, write_u64};
use crate::error::Result;
use crate::extent::SortedExtents;

/// File-type discriminant. The codec never inspects `Inode::type_` to
/// decide how to marshal — this enum exists purely as a convenience for
/// callers translating the raw `u32` into something they can match on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    /// A regular file.
    File,
    /// A directory.
    Dir,
    /// A symbolic link.
    Symlink,
    /// Any value this system does not assign a name to. Round-trips intact.
    Other(u32),
}

impl FileType {
    const FILE: u32 = 1;
    const DIR: u32 = 2;
    const SYMLINK: u32 = 3;

    /// Interpret a raw `type_` value.
    pub fn from_raw(v: u32) -> Self {
        match v {
            Self::FILE => FileType::File,
            Self::DIR => FileType::Dir,
            Self::SYMLINK => FileType::Symlink,
            other => FileType::Other(other),
        }
    }

    /// Recover the raw value this variant was built from.
    pub fn into_raw(self) -> u32 {
        match self {
            FileType::File => Self::FILE,
            FileType::Dir => Self::DIR,
            FileType::Symlink => Self::SYMLINK,
            FileType::Other(v) => v,
        }
    }
}

/// A file or directory's metadata record.
///
/// The key region is just the inode number; everything else lives in the
/// value region, including the embedded extent list. `extents` is guarded
/// by its own lock (see [`SortedExtents`]) rather than the whole `Inode`
/// being wrapped in one, so a marshal pass can snapshot extents without
/// blocking concurrent reads of the header fields.
#[derive(Debug)]
pub struct Inode {
    /// Inode number; also the marshaled key.
    pub inode: u64,
    /// Raw file-type discriminant. See [`FileType`] for interpretation.
    pub type_: u32,
    /// Owning user id.
    pub uid: u32,
    /// Owning group id.
    pub gid: u32,
    /// Size in bytes.
    pub size: u64,
    /// Generation number, bumped on reuse of a freed inode number.
    pub generation: u64,
    /// Creation time, seconds since epoch.
    pub create_time: i64,
    /// Last access time, seconds since epoch.
    pub access_time: i64,
    /// Last modification time, seconds since epoch.
    pub modify_time: i64,
    /// Symlink target. Empty for non-symlinks.
    pub link_target: Vec<u8>,
    /// Hard link count.
    pub nlink: u32,
    /// Bitmask of implementation-defined flags. Opaque to the codec.
    pub flag: u32,
    /// Reserved field, round-tripped but otherwise unused.
    pub reserved: u64,
    /// This inode's extents.
    pub extents: SortedExtents,
}

impl Inode {
    /// Append this inode's framed record — key region then value region —
    /// to `buf`.
    pub fn marshal_with_buffer(&self, buf: &mut Buffer) -> Result<()> {
        let key_reservation = buf.need_data_for_write(4);
        let key_start = buf.write_offset();
        write_u64(buf, self.inode);
        let key_len = buf.write_offset() - key_start;
        buf.patch(key_reservation, &(key_len as u32).to_be_bytes());

        let value_reservation = buf.need_data_for_write(4);
        let value_start = buf.write_offset();
        self.marshal_value_with_buffer(buf)?;
        let value_len = buf.write_offset() - value_start;
        buf.patch(value_reservation, &(value_len as u32).to_be_bytes());
        Ok(())
    }

    fn marshal_value_with_buffer(&self, buf: &mut Buffer) -> Result<()> {
        write_u32(buf, self.type_);
        write_u32(buf, self.uid);
        write_u32(buf, self.gid);
        write_u64(buf, self.size);
        write_u64(buf, self.generation);
        buf.append(&self.create_time.to_be_bytes());
        buf.append(&self.access_time.to_be_bytes());
        buf.append(&self.modify_time.to_be_bytes());
        write_u32(buf, self.link_target.len() as u32);
        buf.append(&self.link_target);
        write_u32(buf, self.nlink);
        write_u32(buf, self.flag);
        write_u64(buf, self.reserved);
        self.extents.marshal_with_buffer(buf)?;
        Ok(())
    }

    /// Consume one framed inode record from `buf`.
    pub fn unmarshal_with_buffer(buf: &mut Buffer) -> Result<Self> {
        let key_len = read_u32(buf)? as usize;
        let inode = Self::unmarshal_key_with_buffer(buf, key_len)?;
        let value_len = read_u32(buf)? as usize;
        let rest = Self::unmarshal_value_with_buffer(buf, value_len)?;
        Ok(Inode { inode, ..rest })
    }

    fn unmarshal_key_with_buffer(buf: &mut Buffer, key_len: usize) -> Result<u64> {
        let inode = read_u64(buf)?;
        let has_read = 8;
        if has_read != key_len {
            crate::error::fatal_length_mismatch("inode", "key", key_len, has_read);
        }
        Ok(inode)
    }

    fn unmarshal_value_with_buffer(buf: &mut Buffer, value_len: usize) -> Result<Self> {
        let mut has_read = 0usize;

        let type_ = read_u32(buf)?;
        has_read += 4;
        let uid = read_u32(buf)?;
        has_read += 4;
        let gid = read_u32(buf)?;
        has_read += 4;
        let size = read_u64(buf)?;
        has_read += 8;
        let generation = read_u64(buf)?;
        has_read += 8;
        let create_time = i64::from_be_bytes(buf.need_data_for_read(8)?.try_into().unwrap());
        has_read += 8;
        let access_time = i64::from_be_bytes(buf.need_data_for_read(8)?.try_into().unwrap());
        has_read += 8;
        let modify_time = i64::from_be_bytes(buf.need_data_for_read(8)?.try_into().unwrap());
        has_read += 8;
        let sym_size = read_u32(buf)? as usize;
        has_read += 4;
        let link_target = buf.copy_data(sym_size);
        has_read += sym_size;
        let nlink = read_u32(buf)?;
        has_read += 4;
        let flag = read_u32(buf)?;
        has_read += 4;
        let reserved = read_u64(buf)?;
        has_read += 8;

        let remaining_for_extents = match value_len.checked_sub(has_read) {
            Some(remaining) => remaining,
            None => crate::error::fatal_length_mismatch("inode", "value", value_len, has_read),
        };
        let (extents, extents_read) =
            SortedExtents::unmarshal_with_buffer(buf, remaining_for_extents)?;
        has_read += extents_read;

        if has_read != value_len {
            crate::error::fatal_length_mismatch("inode", "value", value_len, has_read);
        }

        Ok(Inode {
            inode: 0,
            type_,
            uid,
            gid,
            size,
            generation,
            create_time,
            access_time,
            modify_time,
            link_target,
            nlink,
            flag,
            reserved,
            extents,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::ExtentKey;

    fn sample() -> Inode {
        Inode {
            inode: 5,
            type_: FileType::File.into_raw(),
            uid: 0,
            gid: 0,
            size: 4096,
            generation: 1,
            create_time: 1_600_000_000,
            access_time: 1_600_000_100,
            modify_time: 1_600_000_200,
            link_target: Vec::new(),
            nlink: 1,
            flag: 0,
            reserved: 0,
            extents: SortedExtents::new(),
        }
    }

    #[test]
    fn inode_without_symlink_or_extents_round_trips() {
        let mut buf = Buffer::new();
        let inode = sample();
        inode.marshal_with_buffer(&mut buf).unwrap();

        let decoded = Inode::unmarshal_with_buffer(&mut buf).unwrap();
        assert_eq!(decoded.inode, inode.inode);
        assert_eq!(decoded.size, inode.size);
        assert_eq!(decoded.link_target, inode.link_target);
        assert_eq!(decoded.extents.eks(), Vec::new());
        assert_eq!(buf.read_remain_bytes(), 0);
    }

    #[test]
    fn stops_at_value_len_and_leaves_a_following_record_untouched() {
        use crate::dentry::Dentry;

        let mut buf = Buffer::new();
        let inode = sample();
        inode.extents.append(ExtentKey {
            file_offset: 0,
            partition_id: 1,
            extent_id: 2,
            extent_offset: 0,
            size: 128,
            crc: 0x1234,
        });
        inode.marshal_with_buffer(&mut buf).unwrap();

        let trailing = Dentry {
            parent_id: 9,
            name: b"sibling".to_vec(),
            inode: 10,
            type_: 1,
        };
        trailing.marshal_with_buffer(&mut buf).unwrap();

        let decoded = Inode::unmarshal_with_buffer(&mut buf).unwrap();
        assert_eq!(decoded.extents.eks(), inode.extents.eks());

        let decoded_trailing = Dentry::unmarshal_with_buffer(&mut buf).unwrap();
        assert_eq!(decoded_trailing, trailing);
        assert_eq!(buf.read_remain_bytes(), 0);
    }

    #[test]
    fn inode_with_symlink_round_trips() {
        let mut buf = Buffer::new();
        let mut inode = sample();
        inode.type_ = FileType::Symlink.into_raw();
        inode.link_target = b"/var/lib/target".to_vec();
        inode.marshal_with_buffer(&mut buf).unwrap();

        let decoded = Inode::unmarshal_with_buffer(&mut buf).unwrap();
        assert_eq!(decoded.link_target, inode.link_target);
        assert_eq!(FileType::from_raw(decoded.type_), FileType::Symlink);
    }

    #[test]
    fn inode_with_two_extents_round_trips() {
        let mut buf = Buffer::new();
        let inode = sample();
        inode.extents.append(ExtentKey {
            file_offset: 0,
            partition_id: 1,
            extent_id: 2,
            extent_offset: 0,
            size: 128,
            crc: 0x1234,
        });
        inode.extents.append(ExtentKey {
            file_offset: 128,
            partition_id: 1,
            extent_id: 3,
            extent_offset: 0,
            size: 64,
            crc: 0x5678,
        });
        inode.marshal_with_buffer(&mut buf).unwrap();

        let decoded = Inode::unmarshal_with_buffer(&mut buf).unwrap();
        assert_eq!(decoded.extents.eks(), inode.extents.eks());
        assert_eq!(buf.read_remain_bytes(), 0);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn corrupted_value_length_prefix_is_fatal_even_with_no_extents() {
        let mut buf = Buffer::new();
        sample().marshal_with_buffer(&mut buf).unwrap();
        let mut bytes = buf.get_data().to_vec();
        // key_len prefix (4) + key region (8) = 12, value_len prefix starts there.
        let vlen_start = 12;
        bytes[vlen_start + 3] += 1;
        let mut corrupted = Buffer::with_data(bytes);
        let _ = Inode::unmarshal_with_buffer(&mut corrupted);
    }

    #[test]
    #[should_panic(expected = "length mismatch")]
    fn corrupted_key_length_prefix_is_fatal() {
        let mut buf = Buffer::new();
        sample().marshal_with_buffer(&mut buf).unwrap();
        let mut bytes = buf.get_data().to_vec();
        bytes[3] += 1; // key_len prefix
        let mut corrupted = Buffer::with_data(bytes);
        let _ = Inode::unmarshal_with_buffer(&mut corrupted);
    }
}
