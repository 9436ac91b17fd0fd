//! The per-pixel validity mask.

use crate::error::{Result, StreamError, bail};
use crate::try_filled;
use crate::header::{Header, MASK_OFFSET};
use crate::log::{ldebug, lwarn};
use crate::reader::Reader;
use crate::rle;

/// A row-major bitmap that marks which pixels of an image hold a value.
///
/// Bits are packed 8 per byte, most significant bit first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Mask {
    /// Create a mask where every byte is `fill`.
    pub(crate) fn filled(width: u32, height: u32, fill: u8) -> Result<Self> {
        Ok(Self {
            width,
            height,
            data: try_filled(Self::byte_len(width, height), fill)?,
        })
    }

    /// Create a mask from packed bits.
    ///
    /// Fails if `data` doesn't hold at least one bit per pixel.
    pub(crate) fn from_bytes(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if data.len() < Self::byte_len(width, height) {
            bail!(StreamError::MaskTooShort);
        }

        Ok(Self {
            width,
            height,
            data,
        })
    }

    fn byte_len(width: u32, height: u32) -> usize {
        (width as usize * height as usize).div_ceil(8)
    }

    /// The width of the mask in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// The height of the mask in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Whether the pixel at `(x, y)` is valid.
    ///
    /// Coordinates outside of the image are reported as invalid.
    #[inline]
    pub fn at(&self, x: u32, y: u32) -> bool {
        if x >= self.width || y >= self.height {
            return false;
        }

        let idx = y as usize * self.width as usize + x as usize;

        self.data[idx / 8] & (128 >> (idx % 8)) != 0
    }

    /// The number of valid pixels.
    pub fn count_valid(&self) -> usize {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter(|&(x, y)| self.at(x, y))
            .count()
    }
}

/// Build the mask of an image.
///
/// Without a mask grid every pixel is valid. A mask grid without any bytes
/// describes a uniform mask, otherwise the mask bits are run-length coded.
pub(crate) fn build(data: &[u8], header: &Header) -> Result<Mask> {
    let (width, height) = (header.width, header.height);

    let Some(grid) = header.mask else {
        return Mask::filled(width, height, 0xFF);
    };

    if grid.byte_count == 0 {
        ldebug!("uniform mask with fill value {}", grid.max_value);

        return Mask::filled(width, height, (grid.max_value * 255.0) as u8);
    }

    let mut reader = Reader::new_with(data, MASK_OFFSET);
    let mask = rle::decode(&mut reader, grid.byte_count)
        .and_then(|bytes| Mask::from_bytes(width, height, bytes));

    if let Err(e) = &mask {
        lwarn!("failed to decode mask: {}", e);
    }

    mask
}
