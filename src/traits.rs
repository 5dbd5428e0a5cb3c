//! Contains the [`PixelSource`] trait for reading pixels out of decoded images.

use crate::{MatchError, PixelBuffer};
use palette::Srgb;

#[cfg(feature = "image")]
use image::{RgbImage, RgbaImage};

/// A rendered image whose pixels can be read back, either one at a time or all at once.
///
/// Alpha is never part of the returned colors; transparent pixels are matched by their color.
pub trait PixelSource {
    /// Returns the `(width, height)` of the image.
    fn dimensions(&self) -> (u32, u32);

    /// Returns the color of the pixel at `(x, y)`, or `None` if it is out of bounds.
    fn get(&self, x: u32, y: u32) -> Option<Srgb<u8>>;

    /// Returns the number of pixels in the image.
    fn num_pixels(&self) -> usize {
        let (width, height) = self.dimensions();
        width as usize * height as usize
    }

    /// Returns the color of the pixel at `(x, y)`.
    ///
    /// # Errors
    /// Returns [`MatchError::InvalidPixel`] if `(x, y)` is outside of the image.
    fn pixel(&self, x: u32, y: u32) -> Result<Srgb<u8>, MatchError> {
        self.get(x, y).ok_or_else(|| {
            let (width, height) = self.dimensions();
            MatchError::InvalidPixel(format!(
                "({x}, {y}) is outside of the {width}x{height} image"
            ))
        })
    }

    /// Returns every `stride`-th pixel in row-major order, starting with the first pixel.
    ///
    /// # Panics
    /// Panics if `stride` is `0`.
    /// [`Extractor`](crate::Extractor) rejects a zero stride before sampling.
    fn samples(&self, stride: usize) -> Vec<Srgb<u8>> {
        let (width, _) = self.dimensions();
        if width == 0 {
            return Vec::new();
        }
        let width = width as usize;

        #[allow(clippy::cast_possible_truncation)]
        (0..self.num_pixels())
            .step_by(stride)
            .filter_map(|i| self.get((i % width) as u32, (i / width) as u32))
            .collect()
    }
}

impl PixelSource for PixelBuffer<'_> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn get(&self, x: u32, y: u32) -> Option<Srgb<u8>> {
        if x < self.width() && y < self.height() {
            let i = y as usize * self.width() as usize + x as usize;
            Some(self.pixels()[i].color)
        } else {
            None
        }
    }

    fn num_pixels(&self) -> usize {
        self.pixels().len()
    }

    fn samples(&self, stride: usize) -> Vec<Srgb<u8>> {
        self.pixels().iter().step_by(stride).map(|p| p.color).collect()
    }
}

#[cfg(feature = "image")]
impl PixelSource for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbaImage::dimensions(self)
    }

    fn get(&self, x: u32, y: u32) -> Option<Srgb<u8>> {
        self.get_pixel_checked(x, y).map(|p| {
            let [r, g, b, _] = p.0;
            Srgb::new(r, g, b)
        })
    }

    fn samples(&self, stride: usize) -> Vec<Srgb<u8>> {
        self.pixels()
            .step_by(stride)
            .map(|p| {
                let [r, g, b, _] = p.0;
                Srgb::new(r, g, b)
            })
            .collect()
    }
}

#[cfg(feature = "image")]
impl PixelSource for RgbImage {
    fn dimensions(&self) -> (u32, u32) {
        RgbImage::dimensions(self)
    }

    fn get(&self, x: u32, y: u32) -> Option<Srgb<u8>> {
        self.get_pixel_checked(x, y).map(|p| Srgb::from(p.0))
    }

    fn samples(&self, stride: usize) -> Vec<Srgb<u8>> {
        self.pixels().step_by(stride).map(|p| Srgb::from(p.0)).collect()
    }
}
