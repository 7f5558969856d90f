use crate::error::{BufferError, Result};

/// Opaque token identifying a region reserved for later back-patching.
///
/// `Buffer::need_data_for_write` used to hand back a borrowed slice directly,
/// which aliases the backing storage and goes stale the moment a later write
/// forces a reallocation. Handing back this token instead, and writing
/// through `Buffer::patch`, removes that aliasing hazard: the token is just
/// an offset and a length, resolved against whatever the storage looks like
/// at patch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteReservation {
    offset: usize,
    len: usize,
}

impl WriteReservation {
    /// Offset of the reserved region at the time it was created.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of bytes reserved.
    pub fn len(&self) -> usize {
        self.len
    }
}

/// A growable byte region with independent read and write cursors.
///
/// `storage` always holds exactly `capacity()` bytes (zero-filled past
/// whatever has actually been written); `write_offset` is how much of that
/// has been written, and `read_offset` is how much of the written region has
/// been consumed. The three satisfy `0 <= read_offset <= write_offset <=
/// capacity()` at every observable point.
#[derive(Debug)]
pub struct Buffer {
    storage: Vec<u8>,
    read_offset: usize,
    write_offset: usize,
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Buffer {
    /// A buffer with no backing storage and both offsets at zero.
    pub fn new() -> Self {
        Buffer {
            storage: Vec::new(),
            read_offset: 0,
            write_offset: 0,
        }
    }

    /// A buffer whose storage is the given bytes, ready to be read back from
    /// the start. `write_offset` is set to `data.len()`; `read_offset` is 0.
    pub fn with_data(data: Vec<u8>) -> Self {
        let write_offset = data.len();
        Buffer {
            storage: data,
            read_offset: 0,
            write_offset,
        }
    }

    /// An empty buffer (both offsets zero) whose backing storage is
    /// pre-sized to `capacity` bytes, avoiding a reallocation on the first
    /// write. Used by the pool to hand out buffers pre-grown to the
    /// configured initial capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Buffer {
            storage: vec![0u8; capacity],
            read_offset: 0,
            write_offset: 0,
        }
    }

    /// Capacity of the backing storage. Not the same as `len()`: capacity
    /// may exceed the amount actually written.
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// The write cursor: how many bytes have been written so far.
    pub fn len(&self) -> usize {
        self.write_offset
    }

    /// True if nothing has been written yet.
    pub fn is_empty(&self) -> bool {
        self.write_offset == 0
    }

    /// Bytes written but not yet read.
    pub fn read_remain_bytes(&self) -> usize {
        self.write_offset - self.read_offset
    }

    /// Current read cursor.
    pub fn read_offset(&self) -> usize {
        self.read_offset
    }

    /// Current write cursor. Same value as `len()`.
    pub fn write_offset(&self) -> usize {
        self.write_offset
    }

    /// The unread-but-written region, `[read_offset, write_offset)`.
    pub fn get_data(&self) -> &[u8] {
        &self.storage[self.read_offset..self.write_offset]
    }

    /// Reset both cursors to zero without touching the backing storage.
    /// Used by the pool to recycle a buffer between uses.
    pub fn reset(&mut self) {
        self.read_offset = 0;
        self.write_offset = 0;
    }

    /// Reserve `n` bytes at the current write offset, growing the backing
    /// storage to `max(2 * capacity(), write_offset + n)` if it does not
    /// already fit. Returns a token for the reserved region; the write
    /// offset is advanced by `n` immediately, before any bytes are written,
    /// so the reservation behaves like a placeholder the caller fills in
    /// later via `patch`.
    pub fn need_data_for_write(&mut self, n: usize) -> WriteReservation {
        let required = self.write_offset + n;
        if required > self.capacity() {
            let grown = std::cmp::max(2 * self.capacity(), required);
            self.storage.resize(grown, 0);
        }
        let offset = self.write_offset;
        self.write_offset += n;
        WriteReservation { offset, len: n }
    }

    /// Overwrite a previously reserved region with exactly `reservation.len()`
    /// bytes. This is how length prefixes get back-patched after the
    /// child region they describe has been written.
    pub fn patch(&mut self, reservation: WriteReservation, bytes: &[u8]) {
        assert_eq!(
            bytes.len(),
            reservation.len,
            "patch: reservation at offset {} expects {} byte(s), got {}",
            reservation.offset,
            reservation.len,
            bytes.len()
        );
        self.storage[reservation.offset..reservation.offset + reservation.len]
            .copy_from_slice(bytes);
    }

    /// Append `data` at the current write offset, growing storage by
    /// exactly `capacity() + data.len()` if it doesn't fit (not doubling —
    /// this is deliberately asymmetric with `need_data_for_write`, see
    /// the codec's design notes).
    pub fn append(&mut self, data: &[u8]) {
        let required = self.write_offset + data.len();
        if required > self.capacity() {
            let grown = self.capacity() + data.len();
            self.storage.resize(grown, 0);
        }
        self.storage[self.write_offset..self.write_offset + data.len()].copy_from_slice(data);
        self.write_offset += data.len();
    }

    /// Copy `n` bytes starting at the read offset into a freshly allocated
    /// `Vec`, advancing the read offset. Used when a decoded field (a
    /// string, a symlink target) must outlive the buffer it was read from.
    pub fn copy_data(&mut self, n: usize) -> Vec<u8> {
        let data = self.storage[self.read_offset..self.read_offset + n].to_vec();
        self.read_offset += n;
        data
    }

    /// Borrow `n` bytes starting at the read offset without copying,
    /// advancing the read offset. Fails with `BufferError::EndOfInput` if
    /// fewer than `n` bytes are addressable — note this checks against
    /// `capacity()`, not `len()`: a buffer's trailing, reserved-but-unwritten
    /// region is still considered readable, matching the upstream codec
    /// this crate is compatible with.
    pub fn need_data_for_read(&mut self, n: usize) -> Result<&[u8]> {
        if self.read_offset + n > self.capacity() {
            return Err(BufferError::EndOfInput {
                offset: self.read_offset,
                needed: n,
                capacity: self.capacity(),
            });
        }
        let start = self.read_offset;
        self.read_offset += n;
        Ok(&self.storage[start..start + n])
    }
}
