//! Integration with the [image] crate

use ::image::{GrayImage, ImageBuffer, Luma};

use crate::Image;

impl Image {
    /// Convert the samples into a single channel float buffer.
    ///
    /// Masked-out pixels are 0.
    pub fn to_luma32f(&self) -> ImageBuffer<Luma<f32>, Vec<f32>> {
        ImageBuffer::from_fn(self.width, self.height, |x, y| {
            Luma([self.get(x, y).unwrap_or(0.0)])
        })
    }

    /// Convert the samples into an 8-bit grayscale image.
    ///
    /// Valid values are scaled linearly so that the smallest one maps to 0
    /// and the largest one to 255. Masked-out pixels are 0.
    pub fn to_luma8(&self) -> GrayImage {
        let (min, max) = self.value_range().unwrap_or((0.0, 0.0));
        let scale = if max > min { 255.0 / (max - min) } else { 0.0 };

        GrayImage::from_fn(self.width, self.height, |x, y| {
            let luma = self
                .get(x, y)
                .map_or(0, |v| ((v - min) * scale).round().clamp(0.0, 255.0) as u8);

            Luma([luma])
        })
    }
}
