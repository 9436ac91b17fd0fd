//! Splitting the image into blocks and decoding them in stream order.

use core::ops::Range;

use crate::block::{self, BlockContext};
use crate::error::{Result, ValidationError, bail};
use crate::header::Header;
use crate::mask::Mask;
use crate::reader::Reader;
use crate::try_filled;

/// A rectangular block of the image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Block {
    pub(crate) x: Range<u32>,
    pub(crate) y: Range<u32>,
}

impl Block {
    /// The coordinates of the block in row-major order.
    pub(crate) fn pixels(&self) -> impl Iterator<Item = (u32, u32)> + '_ {
        self.y
            .clone()
            .flat_map(move |y| self.x.clone().map(move |x| (x, y)))
    }
}

/// The blocks of an image, in the order in which they are stored.
///
/// The block size is the image size divided by the block count. If that
/// doesn't divide evenly, the last row and column are made up of smaller
/// blocks that hold the remainder.
pub(crate) fn blocks(header: &Header) -> Result<impl Iterator<Item = Block>> {
    let (width, height) = (header.width, header.height);
    let grid = &header.values;

    let block_height = height.checked_div(grid.block_rows).unwrap_or(0);
    let block_width = width.checked_div(grid.block_cols).unwrap_or(0);

    if block_height == 0 || block_width == 0 {
        bail!(ValidationError::InvalidBlockGrid);
    }

    Ok((0..height)
        .step_by(block_height as usize)
        .flat_map(move |y0| {
            (0..width).step_by(block_width as usize).map(move |x0| Block {
                x: x0..x0 + block_width.min(width - x0),
                y: y0..y0 + block_height.min(height - y0),
            })
        }))
}

/// Decode all value blocks into a row-major sample grid.
pub(crate) fn decode(data: &[u8], header: &Header, mask: &Mask) -> Result<Vec<f32>> {
    let blocks = blocks(header)?;

    let ctx = BlockContext {
        mask,
        width: header.width,
        quantization_step: header.quantization_step,
        max_value: header.values.max_value,
    };

    let mut samples = try_filled(header.num_pixels() as usize, 0.0)?;
    let mut reader = Reader::new_with(data, header.blocks_offset());

    for block in blocks {
        block::decode(&mut samples, &block, &ctx, &mut reader)?;
    }

    Ok(samples)
}
