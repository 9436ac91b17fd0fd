//! Reference encoders for building Lerc1 blobs in tests.

use crate::header::{MAGIC, PIXEL_TYPE_FLOAT, VERSION};

/// Run-length encode `data`, including the end marker.
pub(crate) fn encode_rle(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < data.len() {
        let mut run = 1;

        while i + run < data.len() && data[i + run] == data[i] && run < i16::MAX as usize {
            run += 1;
        }

        if run >= 4 {
            push_literals(&mut out, &data[literal_start..i]);
            out.extend((-(run as i16)).to_le_bytes());
            out.push(data[i]);
            literal_start = i + run;
        }

        i += run;
    }

    push_literals(&mut out, &data[literal_start..]);
    out.extend(i16::MIN.to_le_bytes());

    out
}

fn push_literals(out: &mut Vec<u8>, bytes: &[u8]) {
    for chunk in bytes.chunks(i16::MAX as usize) {
        out.extend((chunk.len() as i16).to_le_bytes());
        out.extend_from_slice(chunk);
    }
}

/// Pack `values` MSB-first into 32-bit words, with the Lerc1 count header.
pub(crate) fn pack_bits(values: &[u32], bits: u8) -> Vec<u8> {
    assert!(bits <= 32);

    if bits == 0 {
        return vec![0];
    }

    let count = values.len();
    let mut out = Vec::new();

    if count <= u8::MAX as usize {
        out.push((2 << 6) | bits);
        out.push(count as u8);
    } else if count <= u16::MAX as usize {
        out.push((1 << 6) | bits);
        out.extend((count as u16).to_le_bytes());
    } else {
        out.push(bits);
        out.extend((count as u32).to_le_bytes());
    }

    let num_bytes = (count * bits as usize).div_ceil(8);
    let mut words = vec![0_u32; num_bytes.div_ceil(4)];
    let mut bit_pos = 0;

    for &value in values {
        for shift in (0..bits).rev() {
            if (value >> shift) & 1 != 0 {
                words[bit_pos / 32] |= 1 << (31 - bit_pos % 32);
            }

            bit_pos += 1;
        }
    }

    let full_words = num_bytes / 4;

    for word in &words[..full_words] {
        out.extend(word.to_le_bytes());
    }

    // Only the most significant bytes of a partial last word are stored.
    let extra = num_bytes - full_words * 4;
    if extra != 0 {
        out.extend(&words[full_words].to_le_bytes()[4 - extra..]);
    }

    out
}

/// Pack a row-major validity grid into mask bytes.
pub(crate) fn pack_mask(valid: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0_u8; valid.len().div_ceil(8)];

    for (i, _) in valid.iter().enumerate().filter(|(_, v)| **v) {
        bytes[i / 8] |= 128 >> (i % 8);
    }

    bytes
}

/// How the mask of a test blob is stored.
pub(crate) enum TestMask {
    /// No mask descriptor at all.
    Absent,
    /// A mask descriptor with zero bytes and the given fill value.
    Uniform(f32),
    /// A run-length coded mask.
    Bits(Vec<bool>),
}

/// Assemble a blob from its parts.
pub(crate) fn build_blob(
    width: u32,
    height: u32,
    max_z_error: f64,
    mask: &TestMask,
    grid: (u32, u32),
    max_value: f32,
    blocks: &[u8],
) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(MAGIC);
    out.extend(VERSION.to_le_bytes());
    out.extend(PIXEL_TYPE_FLOAT.to_le_bytes());
    out.extend(height.to_le_bytes());
    out.extend(width.to_le_bytes());
    out.extend(max_z_error.to_le_bytes());

    let mut push_grid = |rows: u32, cols: u32, byte_count: usize, value: f32| {
        out.extend(rows.to_le_bytes());
        out.extend(cols.to_le_bytes());
        out.extend((byte_count as u32).to_le_bytes());
        out.extend(value.to_le_bytes());
    };

    let mask_bytes = match mask {
        TestMask::Absent => None,
        TestMask::Uniform(fill) => {
            push_grid(0, 0, 0, *fill);
            Some(Vec::new())
        }
        TestMask::Bits(valid) => {
            let rle = encode_rle(&pack_mask(valid));
            push_grid(0, 0, rle.len(), 1.0);
            Some(rle)
        }
    };

    if let Some(mask_bytes) = mask_bytes {
        out.extend(mask_bytes);
    }

    out.extend(grid.0.to_le_bytes());
    out.extend(grid.1.to_le_bytes());
    out.extend((blocks.len() as u32).to_le_bytes());
    out.extend(max_value.to_le_bytes());
    out.extend_from_slice(blocks);

    out
}

/// The smallest encoding that holds `min` exactly, as `(selector, bytes)`.
fn min_field(min: f32) -> (u8, Vec<u8>) {
    if min.fract() == 0.0 && (i8::MIN as f32..=i8::MAX as f32).contains(&min) {
        (2, (min as i8).to_le_bytes().to_vec())
    } else if min.fract() == 0.0 && (i16::MIN as f32..=i16::MAX as f32).contains(&min) {
        (1, (min as i16).to_le_bytes().to_vec())
    } else {
        (0, min.to_le_bytes().to_vec())
    }
}

/// A block that stores the valid pixels as raw floats.
pub(crate) fn raw_block(values: &[f32]) -> Vec<u8> {
    let mut out = vec![0];

    for value in values {
        out.extend(value.to_le_bytes());
    }

    out
}

/// A block where every pixel has the same value.
pub(crate) fn constant_block(min: f32) -> Vec<u8> {
    if min == 0.0 {
        return vec![2];
    }

    let (selector, bytes) = min_field(min);
    let mut out = vec![(selector << 6) | 3];
    out.extend(bytes);

    out
}

/// A block of quantized codes relative to `min`.
pub(crate) fn quantized_block(min: f32, codes: &[u32], bits: u8) -> Vec<u8> {
    let (selector, bytes) = min_field(min);
    let mut out = vec![(selector << 6) | 1];
    out.extend(bytes);
    out.extend(pack_bits(codes, bits));

    out
}

/// Encode a whole image the way a Lerc1 encoder would.
///
/// Blocks without valid pixels or with a single value become constant
/// blocks. With a `max_z_error` of 0 all other blocks are raw, otherwise they
/// are quantized.
pub(crate) fn encode_image(
    width: u32,
    height: u32,
    values: &[f32],
    valid: &[bool],
    grid: (u32, u32),
    max_z_error: f64,
) -> Vec<u8> {
    let block_height = height / grid.0;
    let block_width = width / grid.1;
    let step = 2.0 * max_z_error;

    let max_value = values
        .iter()
        .zip(valid)
        .filter(|(_, v)| **v)
        .map(|(z, _)| *z)
        .reduce(f32::max)
        .unwrap_or(0.0);

    let mut blocks = Vec::new();

    for y0 in (0..height).step_by(block_height as usize) {
        for x0 in (0..width).step_by(block_width as usize) {
            let mut block_values = Vec::new();

            for y in y0..(y0 + block_height).min(height) {
                for x in x0..(x0 + block_width).min(width) {
                    let idx = (y * width + x) as usize;

                    if valid[idx] {
                        block_values.push(values[idx]);
                    }
                }
            }

            let min = block_values.iter().copied().fold(f32::MAX, f32::min);
            let max = block_values.iter().copied().fold(f32::MIN, f32::max);

            if block_values.is_empty() {
                blocks.extend(constant_block(0.0));
            } else if min == max {
                blocks.extend(constant_block(min));
            } else if step == 0.0 {
                blocks.extend(raw_block(&block_values));
            } else {
                let codes = block_values
                    .iter()
                    .map(|z| ((*z as f64 - min as f64) / step).round() as u32)
                    .collect::<Vec<_>>();
                let max_code = codes.iter().copied().max().unwrap_or(0);
                let bits = (32 - max_code.leading_zeros()) as u8;

                blocks.extend(quantized_block(min, &codes, bits));
            }
        }
    }

    build_blob(
        width,
        height,
        max_z_error,
        &TestMask::Bits(valid.to_vec()),
        grid,
        max_value,
        &blocks,
    )
}
