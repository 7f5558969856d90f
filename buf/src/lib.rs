//! Reusable byte buffer with pooled backing storage.
//!
//! This crate is the leaf of a two-crate workspace. It has exactly one job:
//! a growable byte region with independent read and write cursors, precise
//! enough in its growth and reservation semantics that a codec built on top
//! of it (see the sibling `fscodec` crate) can rely on back-patched length
//! prefixes surviving storage growth. Everything here is synchronous,
//! single-threaded per buffer, and allocation-free except when growth is
//! actually required.
//!
//! See [`Buffer`] for the core abstraction and [`pool`] for the process-wide
//! buffer pools consumers are expected to acquire buffers from rather than
//! constructing one directly on every call.

#![deny(missing_docs)]

mod buffer;
mod config;
mod error;
mod pool;

pub use buffer::{Buffer, WriteReservation};
pub use config::PoolConfig;
pub use error::{BufferError, Result};
pub use pool::{
    get_common_buffer, get_store_inode_buffer, put_common_buffer, put_store_inode_buffer,
    BufferPool, NoPool, PooledBuffer, SharedPool,
};
