//! Parsing of the Lerc1 header and its block grid descriptors.
//!
//! The layout of a blob is:
//!
//! | Offset             | Field                                   |
//! |--------------------|-----------------------------------------|
//! | 0                  | `CntZImage ` (10 bytes)                 |
//! | 10                 | version (`u32`, 11)                     |
//! | 14                 | pixel type (`u32`, 8 for float)         |
//! | 18                 | height (`u32`)                          |
//! | 22                 | width (`u32`)                           |
//! | 26                 | max error (`f64`)                       |
//! | 34                 | mask grid (16 bytes, optional)          |
//! | 50                 | mask bytes (run-length coded)           |
//! | 50 + mask bytes    | value grid (16 bytes)                   |
//! | 66 + mask bytes    | value blocks                            |
//!
//! All fields are little endian.

use core::fmt;

use crate::DecodeSettings;
use crate::error::{FormatError, Result, ValidationError, bail};
use crate::log::ldebug;
use crate::reader::Reader;

/// The token every Lerc1 blob starts with.
pub const MAGIC: &[u8; 10] = b"CntZImage ";
/// The only supported format version.
pub(crate) const VERSION: u32 = 11;
/// The pixel type tag of 32-bit floats.
pub(crate) const PIXEL_TYPE_FLOAT: u32 = 8;

/// The offset of the first block grid descriptor.
const FIRST_GRID_OFFSET: usize = 34;
const GRID_LEN: usize = 16;
/// The offset of the mask bytes, right after the mask grid descriptor.
pub(crate) const MASK_OFFSET: usize = FIRST_GRID_OFFSET + GRID_LEN;

/// Describes how one of the two pixel arrays of a blob is split into blocks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockGrid {
    /// The number of block rows.
    pub block_rows: u32,
    /// The number of block columns.
    pub block_cols: u32,
    /// The number of bytes the encoded array occupies.
    pub byte_count: u32,
    /// For the value array the largest value of the image, for the mask
    /// array the fill value of a uniform mask (0 or 1).
    pub max_value: f32,
}

impl BlockGrid {
    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            block_rows: reader.read_u32()?,
            block_cols: reader.read_u32()?,
            byte_count: reader.read_u32()?,
            max_value: reader.read_f32()?,
        })
    }

    /// A mask is never tiled, and a uniform mask is either all 0 or all 1.
    fn looks_like_mask(&self) -> bool {
        self.block_rows == 0
            && self.block_cols == 0
            && (self.max_value == 0.0 || self.max_value == 1.0)
    }
}

/// The header of a Lerc1 blob.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    /// The height of the image in pixels.
    pub height: u32,
    /// The width of the image in pixels.
    pub width: u32,
    /// The distance between two adjacent quantized values.
    ///
    /// Blobs store half of this, the maximum error of the encoding.
    pub quantization_step: f64,
    /// The grid of the mask array, if the blob has one.
    pub mask: Option<BlockGrid>,
    /// The grid of the value array.
    pub values: BlockGrid,
}

impl Header {
    /// The maximum error of a decoded value.
    pub fn max_z_error(&self) -> f64 {
        self.quantization_step / 2.0
    }

    /// The number of pixels of the image.
    pub fn num_pixels(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// The offset of the first value block.
    pub(crate) fn blocks_offset(&self) -> usize {
        match self.mask {
            Some(mask) => MASK_OFFSET + mask.byte_count as usize + GRID_LEN,
            None => MASK_OFFSET,
        }
    }
}

impl fmt::Display for Header {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Lerc1: size {}x{}, max error {}",
            self.width,
            self.height,
            self.max_z_error()
        )?;
        write!(
            f,
            "  values: block count {}x{}, bytes {}, max value {}",
            self.values.block_cols,
            self.values.block_rows,
            self.values.byte_count,
            self.values.max_value
        )?;

        if let Some(mask) = &self.mask {
            write!(
                f,
                "\n  mask: block count {}x{}, bytes {}, max value {}",
                mask.block_cols, mask.block_rows, mask.byte_count, mask.max_value
            )?;
        }

        Ok(())
    }
}

/// Parse the header of a blob.
pub(crate) fn parse(data: &[u8], settings: &DecodeSettings) -> Result<Header> {
    let mut reader = Reader::new(data);

    if reader.read_bytes(MAGIC.len())? != MAGIC {
        bail!(FormatError::InvalidMagic);
    }

    if reader.read_u32()? != VERSION {
        bail!(FormatError::UnsupportedVersion);
    }

    if reader.read_u32()? != PIXEL_TYPE_FLOAT {
        bail!(FormatError::UnsupportedPixelType);
    }

    let height = reader.read_u32()?;
    let width = reader.read_u32()?;
    let quantization_step = reader.read_f64()? * 2.0;

    let first = BlockGrid::read(&mut reader)?;

    // Only if the blob is long enough to hold a second descriptor after the
    // bytes claimed by the first one can the first one be a mask. This is a
    // heuristic: a value grid that happens to look like a mask is taken for
    // one.
    let has_room_for_mask =
        data.len() as u64 >= (MASK_OFFSET + GRID_LEN) as u64 + u64::from(first.byte_count);

    let (mask, values) = if has_room_for_mask && first.looks_like_mask() {
        let mut reader = Reader::new_with(data, MASK_OFFSET + first.byte_count as usize);
        (Some(first), BlockGrid::read(&mut reader)?)
    } else {
        (None, first)
    };

    let header = Header {
        height,
        width,
        quantization_step,
        mask,
        values,
    };

    validate_size(&header, settings)?;
    ldebug!("{header}");

    Ok(header)
}

fn validate_size(header: &Header, settings: &DecodeSettings) -> Result<()> {
    let num_pixels = header.num_pixels();

    if settings.max_pixels.is_some_and(|max| num_pixels > max) {
        bail!(ValidationError::ImageTooLarge);
    }

    // The sample grid must be addressable.
    let addressable = usize::try_from(num_pixels)
        .ok()
        .and_then(|n| n.checked_mul(size_of::<f32>()))
        .is_some_and(|n| n <= isize::MAX as usize);

    if !addressable {
        bail!(ValidationError::ImageTooLarge);
    }

    Ok(())
}
