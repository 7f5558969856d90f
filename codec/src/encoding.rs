//! Big-endian integer read/write helpers over [`fsbuf::Buffer`].
//!
//! All wire integers in this codec are big-endian and fixed-width; these
//! helpers are the only place that knows that, so entity marshal/unmarshal
//! code reads as a flat list of fields rather than repeated
//! `to_be_bytes`/`from_be_bytes` calls.

use fsbuf::Buffer;

use crate::error::Result;

pub(crate) fn write_u32(buf: &mut Buffer, v: u32) {
    buf.append(&v.to_be_bytes());
}

pub(crate) fn write_u64(buf: &mut Buffer, v: u64) {
    buf.append(&v.to_be_bytes());
}

pub(crate) fn read_u32(buf: &mut Buffer) -> Result<u32> {
    let bytes = buf.need_data_for_read(4)?;
    Ok(u32::from_be_bytes(bytes.try_into().expect("exactly 4 bytes")))
}

pub(crate) fn read_u64(buf: &mut Buffer) -> Result<u64> {
    let bytes = buf.need_data_for_read(8)?;
    Ok(u64::from_be_bytes(bytes.try_into().expect("exactly 8 bytes")))
}
