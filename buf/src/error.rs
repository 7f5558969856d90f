use thiserror::Error;

/// Errors produced by [`crate::Buffer`].
///
/// There is exactly one variant: reading past the end of the addressable
/// region is the only operation on a buffer that can fail short of an
/// allocator abort. Structural corruption (length-prefix disagreement) is a
/// codec-level concern, not a buffer-level one, and is handled by panicking
/// rather than by this error type (see the `fscodec` crate).
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BufferError {
    /// `NeedDataForRead` was asked for more bytes than the buffer currently
    /// makes addressable.
    #[error("end of input: need {needed} byte(s) at offset {offset}, buffer capacity is {capacity}")]
    EndOfInput {
        /// Read offset the request started from.
        offset: usize,
        /// Number of bytes requested.
        needed: usize,
        /// Capacity of the backing storage at the time of the request.
        capacity: usize,
    },
}

/// Shorthand for a `Result` using [`BufferError`].
pub type Result<T> = std::result::Result<T, BufferError>;
