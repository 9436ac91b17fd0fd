//! Decoding of a single value block.
//!
//! Every block starts with a flag byte. The low 6 bits select the encoding
//! mode:
//!
//! - 0: the valid pixels are stored as raw `f32` values.
//! - 1: the valid pixels are stored as bit-packed multiples of the
//!   quantization step above a minimum.
//! - 2: every pixel is 0.
//! - 3: every pixel has the minimum value.
//!
//! The top 2 bits select how the minimum is stored (`f32`, `i16` or `i8`).

use crate::bit_unpack;
use crate::error::{Result, StreamError, err};
use crate::log::ltrace;
use crate::mask::Mask;
use crate::reader::{FieldWidth, Reader};
use crate::tile::Block;

/// The encoding mode of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BlockMode {
    /// Valid pixels are stored as raw floats.
    Raw,
    /// Valid pixels are stored as quantized offsets from a minimum.
    Quantized,
    /// All pixels have the same value, either the stored minimum or 0.
    Constant { has_min: bool },
}

impl BlockMode {
    fn from_flags(flags: u8) -> Result<Self> {
        match flags & 0x3F {
            0 => Ok(Self::Raw),
            1 => Ok(Self::Quantized),
            2 => Ok(Self::Constant { has_min: false }),
            3 => Ok(Self::Constant { has_min: true }),
            _ => err!(StreamError::InvalidBlockMode),
        }
    }
}

/// Everything a block needs that is shared by all blocks of an image.
pub(crate) struct BlockContext<'a> {
    pub(crate) mask: &'a Mask,
    pub(crate) width: u32,
    pub(crate) quantization_step: f64,
    /// Quantized values are clamped to this.
    pub(crate) max_value: f32,
}

/// Decode one block into `samples`, advancing the reader past it.
pub(crate) fn decode(
    samples: &mut [f32],
    block: &Block,
    ctx: &BlockContext<'_>,
    reader: &mut Reader<'_>,
) -> Result<()> {
    let flags = reader.read_u8()?;
    let mode = BlockMode::from_flags(flags)?;

    ltrace!(
        "block at {}x{}: {:?}, offset {}",
        block.x.start,
        block.y.start,
        mode,
        reader.offset()
    );

    let idx = |x: u32, y: u32| y as usize * ctx.width as usize + x as usize;

    let has_min = match mode {
        BlockMode::Raw => {
            for (x, y) in block.pixels().filter(|&(x, y)| ctx.mask.at(x, y)) {
                samples[idx(x, y)] = reader.read_f32()?;
            }

            return Ok(());
        }
        BlockMode::Quantized => true,
        BlockMode::Constant { has_min } => has_min,
    };

    let min = if has_min {
        read_min(reader, flags)?
    } else {
        0.0
    };

    if mode == BlockMode::Quantized {
        let mut codes = bit_unpack::read(reader)?.map(Vec::into_iter);

        for (x, y) in block.pixels().filter(|&(x, y)| ctx.mask.at(x, y)) {
            let code = match &mut codes {
                Some(codes) => codes.next().ok_or(StreamError::MissingValues)?,
                // Without any bits, every code is 0.
                None => 0,
            };

            let value = f64::from(min) + ctx.quantization_step * f64::from(code);
            samples[idx(x, y)] = value.min(f64::from(ctx.max_value)) as f32;
        }
    } else {
        // The mask is ignored.
        for (x, y) in block.pixels() {
            samples[idx(x, y)] = min;
        }
    }

    Ok(())
}

fn read_min(reader: &mut Reader<'_>, flags: u8) -> Result<f32> {
    Ok(match FieldWidth::from_flags(flags)? {
        FieldWidth::Four => reader.read_f32()?,
        FieldWidth::Two => f32::from(reader.read_i16()?),
        FieldWidth::One => f32::from(reader.read_i8()?),
    })
}
