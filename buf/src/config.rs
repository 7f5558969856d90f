/// Sizing knobs for the process-wide buffer pools.
///
/// The codec has no file or environment configuration surface of its own
/// (see the spec's external-interfaces section); this struct is the entire
/// configuration story, and it only matters to the pools, not to `Buffer`
/// itself or to marshal/unmarshal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Initial capacity, in bytes, of buffers handed out by the common pool.
    pub initial_buffer_capacity: usize,
    /// Width, in bytes, of the scratch regions used to encode inode-number
    /// keys before a store lookup.
    pub inode_key_scratch_width: usize,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            initial_buffer_capacity: 1024,
            inode_key_scratch_width: 8,
        }
    }
}
