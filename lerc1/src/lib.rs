/*!
A memory-safe, pure-Rust decoder for Lerc v1 rasters.

`lerc1` decodes the legacy "CntZImage" version of Esri's Limited Error Raster
Compression. A blob holds a single float32 band together with a validity
mask. Values are split into blocks that are stored either raw, as a constant
or as bit-packed integers quantized to a given maximum error.

# Example
```rust,no_run
let data = std::fs::read("elevation.lerc").unwrap();
let image = lerc1::decode(&data).unwrap();

println!("{}x{} image", image.width, image.height);
println!("value at (10, 10): {:?}", image.get(10, 10));
```

Use [`Lerc1`] to inspect the header before decoding, or to decode with
custom [`DecodeSettings`].

# Cargo features
- `image` (default): conversions into buffers of the `image` crate.
- `logging`: forward diagnostics to the `log` crate.

# Safety
This crate forbids unsafe code via a crate-level attribute.
*/

#![forbid(unsafe_code)]

mod bit_unpack;
mod block;
mod error;
mod header;
#[cfg(feature = "image")]
mod integration;
mod log;
mod mask;
mod reader;
mod rle;
#[cfg(test)]
mod test_util;
mod tile;

use crate::log::lwarn;

pub use error::{DecodeError, FormatError, Result, StreamError, ValidationError};
pub use header::{BlockGrid, Header, MAGIC};
pub use mask::Mask;

/// Settings that apply to decoding.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeSettings {
    /// The maximum number of pixels an image may have.
    ///
    /// Images with more pixels are rejected when the header is parsed, before
    /// anything is allocated. With `None`, the header only rejects images
    /// whose sample grid can't be addressed at all, and decoding fails with
    /// [`ValidationError::ImageTooLarge`] if the mask or the sample grid can't
    /// be allocated.
    pub max_pixels: Option<u64>,
}

/// A decoding session for a single Lerc1 blob.
///
/// Opening a session parses the header. The mask is built by the first
/// decode and then reused.
#[derive(Debug, Clone)]
pub struct Lerc1<'a> {
    data: &'a [u8],
    header: Result<Header>,
    mask: Option<Result<Mask>>,
}

impl<'a> Lerc1<'a> {
    /// Open a blob with the default settings.
    pub fn new(data: &'a [u8]) -> Self {
        Self::with_settings(data, &DecodeSettings::default())
    }

    /// Open a blob with the given settings.
    ///
    /// This never fails; if the header can't be parsed the session is
    /// invalid and every decode fails with the same error.
    pub fn with_settings(data: &'a [u8], settings: &DecodeSettings) -> Self {
        let header = header::parse(data, settings);

        if let Err(e) = &header {
            lwarn!("failed to parse Lerc1 header: {}", e);
        }

        Self {
            data,
            header,
            mask: None,
        }
    }

    /// Whether the header and, once built, the mask are valid.
    ///
    /// Errors in the value blocks are not recorded in the session; they are
    /// only reported by the decode that hit them.
    pub fn is_valid(&self) -> bool {
        self.error().is_none()
    }

    /// The error that made the session invalid, if any.
    pub fn error(&self) -> Option<DecodeError> {
        match (&self.header, &self.mask) {
            (Err(e), _) | (_, Some(Err(e))) => Some(*e),
            _ => None,
        }
    }

    /// The parsed header, if it is valid.
    pub fn header(&self) -> Option<&Header> {
        self.header.as_ref().ok()
    }

    /// The validity mask, once a decode has built it.
    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()?.as_ref().ok()
    }

    /// Decode the samples of the image in row-major order.
    ///
    /// Returns `None` on any error. Use [`Lerc1::try_decode`] to find out
    /// what went wrong.
    pub fn decode(&mut self) -> Option<Vec<f32>> {
        match self.try_decode() {
            Ok(data) => Some(data),
            Err(e) => {
                lwarn!("failed to decode Lerc1 blob: {}", e);

                None
            }
        }
    }

    /// Decode the samples of the image in row-major order.
    ///
    /// Masked-out pixels are 0 unless they are part of a constant block.
    pub fn try_decode(&mut self) -> Result<Vec<f32>> {
        let header = self.header.as_ref().map_err(|e| *e)?;
        let mask = self
            .mask
            .get_or_insert_with(|| mask::build(self.data, header))
            .as_ref()
            .map_err(|e| *e)?;

        tile::decode(self.data, header, mask)
    }
}

/// A vector of `len` copies of `value`.
///
/// Fails instead of aborting if the memory can't be allocated, since `len`
/// comes from the untrusted header.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>> {
    let mut vec = Vec::new();
    vec.try_reserve_exact(len)
        .map_err(|_| ValidationError::ImageTooLarge)?;
    vec.resize(len, value);

    Ok(vec)
}

/// A decoded Lerc1 image.
#[derive(Debug, Clone)]
pub struct Image {
    /// The width of the image in pixels.
    pub width: u32,
    /// The height of the image in pixels.
    pub height: u32,
    /// The samples, one per pixel, in row-major order.
    pub data: Vec<f32>,
    /// Which of the samples are valid.
    pub mask: Mask,
}

impl Image {
    /// The value at `(x, y)`, or `None` if the pixel is masked out or outside
    /// of the image.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        self.mask
            .at(x, y)
            .then(|| self.data[y as usize * self.width as usize + x as usize])
    }

    /// The smallest and largest valid value.
    ///
    /// Returns `None` if no pixel is valid.
    pub fn value_range(&self) -> Option<(f32, f32)> {
        (0..self.height)
            .flat_map(|y| (0..self.width).map(move |x| (x, y)))
            .filter_map(|(x, y)| self.get(x, y))
            .fold(None, |range, v| match range {
                None => Some((v, v)),
                Some((min, max)) => Some((v.min(min), v.max(max))),
            })
    }
}

/// Decode a Lerc1 blob.
///
/// # Example
/// ```rust,no_run
/// let data = std::fs::read("elevation.lerc").unwrap();
/// let image = lerc1::decode(&data).unwrap();
/// println!("{} valid pixels", image.mask.count_valid());
/// ```
pub fn decode(data: &[u8]) -> Result<Image> {
    let header = header::parse(data, &DecodeSettings::default())?;
    let mask = mask::build(data, &header)?;
    let data = tile::decode(data, &header, &mask)?;

    Ok(Image {
        width: header.width,
        height: header.height,
        data,
        mask,
    })
}
