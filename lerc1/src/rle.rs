//! Decoding of the run-length coded byte streams used for the validity mask.
//!
//! A stream is a sequence of runs, each introduced by a signed 16-bit count.
//! A negative count `-n` repeats the following byte `n` times, a non-negative
//! count `n` copies the following `n` bytes verbatim. The stream is closed by
//! the count [`END_MARKER`].

use crate::error::{Result, StreamError, bail};
use crate::log::lwarn;
use crate::reader::Reader;

/// The count that terminates a run-length stream.
pub(crate) const END_MARKER: i16 = i16::MIN;

/// Decode a run-length stream of `byte_count` bytes, starting at the current
/// position of the reader.
///
/// `byte_count` includes the two bytes of the end marker.
pub(crate) fn decode(reader: &mut Reader<'_>, byte_count: u32) -> Result<Vec<u8>> {
    let mut decoded = Vec::new();
    // Can go negative if a literal run claims more bytes than are left.
    let mut remaining = i64::from(byte_count);

    while remaining > 2 {
        let count = reader.read_i16()?;

        let consumed = if count < 0 {
            let byte = reader.read_u8()?;
            decoded.resize(decoded.len() + count.unsigned_abs() as usize, byte);

            1
        } else {
            decoded.extend_from_slice(reader.read_bytes(count as usize)?);

            i64::from(count)
        };

        remaining -= 2 + consumed;
    }

    if reader.read_i16()? != END_MARKER {
        lwarn!("run-length stream is missing its end marker");

        bail!(StreamError::MissingEndMarker);
    }

    Ok(decoded)
}
