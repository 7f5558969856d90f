use std::ops::{Deref, DerefMut};
use std::sync::Mutex;

use lazy_static::lazy_static;
use log::trace;

use crate::buffer::Buffer;
use crate::config::PoolConfig;

/// A cache of reusable `Buffer`s (or inode-key scratch regions) whose
/// lifetime is decoupled from any single marshal/unmarshal call.
///
/// A pool is a cache, not a bound: `acquire` always returns something usable,
/// constructing it fresh when the cache is empty.
pub trait BufferPool {
    /// Take a buffer out of the pool, or construct a fresh one.
    fn acquire(&self) -> Buffer;
    /// Return a buffer to the pool for later reuse. Implementations must
    /// reset both cursors to zero; they must not shrink the storage.
    fn release(&self, buf: Buffer);
}

struct SharedPoolState {
    config: PoolConfig,
    free: Mutex<Vec<Buffer>>,
}

lazy_static! {
    static ref COMMON_POOL: SharedPoolState = SharedPoolState {
        config: PoolConfig::default(),
        free: Mutex::new(Vec::new()),
    };
    static ref INODE_KEY_SCRATCH_POOL: Mutex<Vec<Vec<u8>>> = Mutex::new(Vec::new());
}

/// The process-wide default pool, backed by a mutex-guarded free list. A
/// mutex-guarded stack is explicitly acceptable per the concurrency model —
/// lock-free or per-thread sharding is only a further optimization.
#[derive(Debug, Default, Clone, Copy)]
pub struct SharedPool;

impl BufferPool for SharedPool {
    fn acquire(&self) -> Buffer {
        let mut free = COMMON_POOL.free.lock().unwrap();
        match free.pop() {
            Some(mut buf) => {
                buf.reset();
                buf
            }
            None => {
                trace!(
                    "common buffer pool empty, allocating capacity {}",
                    COMMON_POOL.config.initial_buffer_capacity
                );
                Buffer::with_capacity(COMMON_POOL.config.initial_buffer_capacity)
            }
        }
    }

    fn release(&self, mut buf: Buffer) {
        buf.reset();
        COMMON_POOL.free.lock().unwrap().push(buf);
    }
}

/// A pool that never retains anything: `acquire` always allocates fresh and
/// `release` drops its argument. Useful in tests that want a deterministic
/// allocation count, or to rule out cross-test pool contamination.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPool;

impl BufferPool for NoPool {
    fn acquire(&self) -> Buffer {
        Buffer::new()
    }

    fn release(&self, _buf: Buffer) {}
}

/// Acquire a buffer from the process-wide common pool, with both cursors
/// reset to zero.
pub fn get_common_buffer() -> Buffer {
    SharedPool.acquire()
}

/// Return a buffer to the process-wide common pool.
pub fn put_common_buffer(buf: Buffer) {
    SharedPool.release(buf)
}

/// Acquire a zeroed scratch region sized for encoding an inode-number key.
pub fn get_store_inode_buffer() -> Vec<u8> {
    let mut pool = INODE_KEY_SCRATCH_POOL.lock().unwrap();
    match pool.pop() {
        Some(mut scratch) => {
            scratch.iter_mut().for_each(|b| *b = 0);
            scratch
        }
        None => vec![0u8; PoolConfig::default().inode_key_scratch_width],
    }
}

/// Return an inode-number key scratch region to its pool.
pub fn put_store_inode_buffer(scratch: Vec<u8>) {
    INODE_KEY_SCRATCH_POOL.lock().unwrap().push(scratch);
}

/// RAII wrapper that guarantees a pooled buffer is released on every exit
/// path, including early returns from a failed decode — the scope-guard
/// discipline the concurrency model calls for, expressed through `Drop`
/// instead of a manually-invoked guard.
pub struct PooledBuffer<'p> {
    buf: Option<Buffer>,
    pool: &'p dyn BufferPool,
}

impl<'p> PooledBuffer<'p> {
    /// Acquire a buffer from `pool`, wrapped so it is returned automatically
    /// when this value is dropped.
    pub fn acquire(pool: &'p dyn BufferPool) -> Self {
        PooledBuffer {
            buf: Some(pool.acquire()),
            pool,
        }
    }
}

impl<'p> Deref for PooledBuffer<'p> {
    type Target = Buffer;
    fn deref(&self) -> &Buffer {
        self.buf.as_ref().expect("buffer taken before drop")
    }
}

impl<'p> DerefMut for PooledBuffer<'p> {
    fn deref_mut(&mut self) -> &mut Buffer {
        self.buf.as_mut().expect("buffer taken before drop")
    }
}

impl<'p> Drop for PooledBuffer<'p> {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.release(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acquire_release_resets_offsets() {
        let mut buf = get_common_buffer();
        buf.append(&[1, 2, 3]);
        let _ = buf.need_data_for_read(1).unwrap();
        put_common_buffer(buf);

        let reacquired = get_common_buffer();
        assert_eq!(reacquired.read_offset(), 0);
        assert_eq!(reacquired.write_offset(), 0);
        put_common_buffer(reacquired);
    }

    #[test]
    fn release_does_not_shrink_storage() {
        let mut buf = get_common_buffer();
        buf.append(&vec![0u8; 4096]);
        let grown_capacity = buf.capacity();
        put_common_buffer(buf);

        let reacquired = get_common_buffer();
        assert!(reacquired.capacity() >= grown_capacity || reacquired.capacity() >= 1024);
        put_common_buffer(reacquired);
    }

    #[test]
    fn no_pool_never_retains() {
        let pool = NoPool;
        let buf = pool.acquire();
        assert_eq!(buf.capacity(), 0);
        pool.release(buf);
    }

    #[test]
    fn pooled_buffer_releases_on_drop() {
        {
            let mut pooled = PooledBuffer::acquire(&NoPool);
            pooled.append(&[1, 2, 3]);
        }
        // Nothing to assert for NoPool beyond "this didn't leak or panic" —
        // the shared-pool variant is covered by acquire_release_resets_offsets.
    }

    #[test]
    fn inode_key_scratch_is_zeroed_on_acquire() {
        let mut scratch = get_store_inode_buffer();
        assert_eq!(scratch.len(), 8);
        scratch[0] = 0xFF;
        put_store_inode_buffer(scratch);

        let reacquired = get_store_inode_buffer();
        assert!(reacquired.iter().all(|&b| b == 0));
        put_store_inode_buffer(reacquired);
    }
}
