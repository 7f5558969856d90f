//! Binary marshal/unmarshal for directory entries and inodes, built on a
//! pooled, growable byte buffer with independent read/write cursors.
//!
//! Every entity is framed the same way: a big-endian `u32` length prefix,
//! then that many bytes, repeated for the key region and then the value
//! region. Structural corruption — a length prefix that disagrees with the
//! bytes actually consumed — is treated as unrecoverable and surfaces as a
//! panic rather than an `Err`; see [`CodecError`] for the one error this
//! crate does consider recoverable.

#![deny(missing_docs)]

mod dentry;
mod encoding;
mod error;
mod extent;
mod inode;

pub use dentry::Dentry;
pub use error::{CodecError, Result};
pub use extent::{ExtentKey, SortedExtents, EXTENT_KEY_SIZE};
pub use inode::{FileType, Inode};
