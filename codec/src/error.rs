use thiserror::Error;

/// Errors produced by the entity codec.
///
/// There is exactly one *recoverable* variant. Structural corruption — a
/// declared length prefix disagreeing with the bytes actually consumed — is
/// not represented here: it is a programmer-or-storage-corruption bug the
/// system is not designed to tolerate, and is raised via `panic!` (see
/// [`fatal_length_mismatch`]) rather than threaded through `Result`.
#[derive(Error, Debug)]
pub enum CodecError {
    /// The buffer ran out of addressable bytes mid-decode. The buffer's
    /// read offset may have advanced; callers must discard it rather than
    /// continue reading from it.
    #[error("short buffer while decoding: {0}")]
    Buffer(#[from] fsbuf::BufferError),
}

/// Shorthand for a `Result` using [`CodecError`].
pub type Result<T> = std::result::Result<T, CodecError>;

/// Raise a fatal, unrecoverable corruption error: a declared length prefix
/// did not match the number of bytes actually consumed for that region.
///
/// Logs a structured diagnostic naming the entity, the region, and both
/// byte counts before panicking, so a host process's logging backend
/// captures the cause ahead of the unwind.
pub(crate) fn fatal_length_mismatch(entity: &str, region: &str, expected: usize, actual: usize) -> ! {
    log::error!(
        "{entity} {region} length mismatch: expected {expected} byte(s), consumed {actual}"
    );
    panic!("{entity} {region} length mismatch: expected {expected} byte(s), consumed {actual}");
}
