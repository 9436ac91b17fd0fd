//! A little-endian byte reader.

use crate::error::{DecodeError, Result, StreamError, bail};

/// The byte width of a variable-size field, selected by the top two bits of
/// the byte that precedes it.
///
/// Element counts are read as `u32`/`u16`/`u8`, block minimums as
/// `f32`/`i16`/`i8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldWidth {
    Four,
    Two,
    One,
}

impl FieldWidth {
    /// Decode the selector stored in the top two bits of `flags`.
    pub(crate) fn from_flags(flags: u8) -> Result<Self> {
        match flags >> 6 {
            0 => Ok(Self::Four),
            1 => Ok(Self::Two),
            2 => Ok(Self::One),
            _ => bail!(StreamError::InvalidWidthSelector),
        }
    }
}

/// A cursor over the bytes of a Lerc1 blob.
///
/// All multi-byte reads are little endian. Every read is bounds-checked and
/// fails with [`DecodeError::Truncated`] instead of panicking.
#[derive(Clone, Debug)]
pub(crate) struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    #[inline]
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self::new_with(data, 0)
    }

    /// Create a new reader that starts at a specific byte offset.
    #[inline]
    pub(crate) fn new_with(data: &'a [u8], offset: usize) -> Self {
        Self { data, offset }
    }

    #[inline]
    pub(crate) fn offset(&self) -> usize {
        self.offset
    }

    #[inline]
    pub(crate) fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(len)?;
        self.offset += len;

        Ok(bytes)
    }

    #[inline]
    pub(crate) fn peek_bytes(&self, len: usize) -> Result<&'a [u8]> {
        let end = self.offset.checked_add(len).ok_or(DecodeError::Truncated)?;
        self.data
            .get(self.offset..end)
            .ok_or(DecodeError::Truncated)
    }

    #[inline]
    pub(crate) fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let bytes = self.read_bytes(N)?;
        // Cannot fail, `read_bytes` returned exactly `N` bytes.
        bytes.try_into().map_err(|_| DecodeError::Truncated)
    }

    #[inline]
    pub(crate) fn read_u8(&mut self) -> Result<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    #[inline]
    pub(crate) fn read_i8(&mut self) -> Result<i8> {
        Ok(i8::from_le_bytes(self.read_array()?))
    }

    #[inline]
    pub(crate) fn read_u16(&mut self) -> Result<u16> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    #[inline]
    pub(crate) fn read_i16(&mut self) -> Result<i16> {
        Ok(i16::from_le_bytes(self.read_array()?))
    }

    #[inline]
    pub(crate) fn read_u32(&mut self) -> Result<u32> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    #[inline]
    pub(crate) fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_le_bytes(self.read_array()?))
    }

    #[inline]
    pub(crate) fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_le_bytes(self.read_array()?))
    }
}
