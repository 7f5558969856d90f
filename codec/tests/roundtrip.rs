//! End-to-end framing checks that exercise the public API the way a
//! storage layer would: encode a batch of records into one buffer, then
//! decode them back in order.

use fsbuf::Buffer;
use fscodec::{Dentry, ExtentKey, FileType, Inode, SortedExtents};

#[test]
fn dentry_and_inode_interleave_in_one_stream() {
    let mut buf = Buffer::new();

    let dentry = Dentry {
        parent_id: 0x0102030405060708,
        name: b"a".to_vec(),
        inode: 0x1111111111111111,
        type_: 0x00000004,
    };
    dentry.marshal_with_buffer(&mut buf).unwrap();

    let inode = Inode {
        inode: 0x1111111111111111,
        type_: FileType::File.into_raw(),
        uid: 1000,
        gid: 1000,
        size: 65536,
        generation: 3,
        create_time: 1_700_000_000,
        access_time: 1_700_000_500,
        modify_time: 1_700_000_900,
        link_target: Vec::new(),
        nlink: 2,
        flag: 0,
        reserved: 0,
        extents: SortedExtents::new(),
    };
    inode.extents.append(ExtentKey {
        file_offset: 0,
        partition_id: 9,
        extent_id: 1,
        extent_offset: 0,
        size: 65536,
        crc: 0xABCD_1234,
    });
    inode.marshal_with_buffer(&mut buf).unwrap();

    let decoded_dentry = Dentry::unmarshal_with_buffer(&mut buf).unwrap();
    assert_eq!(decoded_dentry, dentry);

    let decoded_inode = Inode::unmarshal_with_buffer(&mut buf).unwrap();
    assert_eq!(decoded_inode.inode, inode.inode);
    assert_eq!(decoded_inode.size, inode.size);
    assert_eq!(decoded_inode.extents.eks(), inode.extents.eks());

    assert_eq!(buf.read_remain_bytes(), 0);
}

#[test]
fn inode_symlink_target_survives_round_trip() {
    let mut buf = Buffer::new();
    let inode = Inode {
        inode: 42,
        type_: FileType::Symlink.into_raw(),
        uid: 0,
        gid: 0,
        size: 0,
        generation: 1,
        create_time: 0,
        access_time: 0,
        modify_time: 0,
        link_target: b"../shared/config.toml".to_vec(),
        nlink: 1,
        flag: 0,
        reserved: 0,
        extents: SortedExtents::new(),
    };
    inode.marshal_with_buffer(&mut buf).unwrap();

    let decoded = Inode::unmarshal_with_buffer(&mut buf).unwrap();
    assert_eq!(decoded.link_target, inode.link_target);
    assert_eq!(FileType::from_raw(decoded.type_), FileType::Symlink);
}

#[test]
#[should_panic(expected = "length mismatch")]
fn truncated_value_region_panics_instead_of_returning_err() {
    let mut buf = Buffer::new();
    let dentry = Dentry {
        parent_id: 1,
        name: b"corrupt-me".to_vec(),
        inode: 2,
        type_: 0,
    };
    dentry.marshal_with_buffer(&mut buf).unwrap();

    let mut bytes = buf.get_data().to_vec();
    let key_region_len = 4 + 8 + dentry.name.len();
    let value_len_prefix_start = key_region_len;
    bytes[value_len_prefix_start + 3] -= 1;
    let mut corrupted = Buffer::with_data(bytes);
    let _ = Dentry::unmarshal_with_buffer(&mut corrupted);
}
