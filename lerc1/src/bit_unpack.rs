//! Unpacking of bit-stuffed unsigned integer arrays.
//!
//! An array starts with a header byte: the low 6 bits hold the number of bits
//! per value, the top 2 bits select the width of the element count that
//! follows. The values are then packed most-significant-bit first into
//! little-endian 32-bit words. Unused low-order bytes of the last word are not
//! stored.

use crate::error::{DecodeError, Result, StreamError, bail, err};
use crate::reader::{FieldWidth, Reader};

/// Read a packed integer array.
///
/// Returns `None` if the array has zero bits per value, in which case only
/// the header byte is consumed.
pub(crate) fn read(reader: &mut Reader<'_>) -> Result<Option<Vec<u32>>> {
    let header = reader.read_u8()?;
    let bits = u32::from(header & 0x3F);

    if bits == 0 {
        return Ok(None);
    }

    if bits > 32 {
        bail!(StreamError::TooManyBits);
    }

    let count = match FieldWidth::from_flags(header)? {
        FieldWidth::Four => reader.read_u32()?,
        FieldWidth::Two => u32::from(reader.read_u16()?),
        FieldWidth::One => u32::from(reader.read_u8()?),
    };

    // At most 32 * u32::MAX bits, so this fits into a `u64` and the bounds
    // check of `read_bytes` runs before anything is allocated.
    let num_bytes = (u64::from(count) * u64::from(bits)).div_ceil(8);
    let num_bytes = usize::try_from(num_bytes).map_err(|_| DecodeError::Truncated)?;
    let bytes = reader.read_bytes(num_bytes)?;

    let words = bytes
        .chunks(4)
        .map(|chunk| {
            // A partial word holds its bytes at the most significant end.
            let skipped = 4 - chunk.len();
            chunk
                .iter()
                .enumerate()
                .fold(0_u32, |word, (i, b)| word | (u32::from(*b) << (8 * (i + skipped))))
        })
        .collect::<Vec<_>>();

    unpack(&words, bits, count as usize).map(Some)
}

/// Split `words` into `count` values of `bits` bits each, MSB first.
fn unpack(words: &[u32], bits: u32, count: usize) -> Result<Vec<u32>> {
    let mask = u32::MAX >> (32 - bits);
    let mut values = Vec::with_capacity(count);
    let mut words = words.iter().copied();
    let mut word = words.next().unwrap_or(0);
    let mut bits_left = 32;

    for _ in 0..count {
        let value = if bits_left >= bits {
            bits_left -= bits;

            (word >> bits_left) & mask
        } else {
            // The value straddles two words.
            let high = word.checked_shl(bits - bits_left).unwrap_or(0) & mask;
            word = match words.next() {
                Some(word) => word,
                None => return err!(StreamError::MissingValues),
            };
            bits_left += 32 - bits;

            high | (word >> bits_left)
        };

        values.push(value);
    }

    Ok(values)
}
