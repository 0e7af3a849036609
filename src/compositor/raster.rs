use std::io::Cursor;

use image::{ImageBuffer, ImageOutputFormat, Rgb, RgbImage};

use crate::error::{CompositeError, Result};

/// A decoded raster image
///
/// This is a simple wrapper around an RGB image buffer that provides
/// the decode/encode boundary and the pixel access used by the compositor.
/// Channel order is RGB end-to-end.
#[derive(Clone, Debug)]
pub struct Raster {
    buffer: RgbImage,
}

impl Raster {
    /// Create a raster from an RGB image buffer
    pub fn new(buffer: RgbImage) -> Self {
        Self { buffer }
    }

    /// Create a raster with the given dimensions filled with the specified color
    pub fn new_filled(width: u32, height: u32, color: [u8; 3]) -> Self {
        let buffer = ImageBuffer::from_fn(width, height, |_, _| Rgb(color));
        Self { buffer }
    }

    /// Decode a raster from encoded image bytes (PNG, JPEG, ...)
    ///
    /// Fails with [`CompositeError::DecodeFailed`] on malformed or empty input
    /// and [`CompositeError::InvalidDimensions`] when the decoded image has a
    /// zero-sized axis.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let decoded = image::load_from_memory(bytes).map_err(|e| CompositeError::DecodeFailed {
            reason: e.to_string(),
        })?;

        let buffer = decoded.to_rgb8();
        let raster = Self { buffer };
        raster.ensure_non_empty()?;
        Ok(raster)
    }

    /// Check that both dimensions are non-zero
    pub fn ensure_non_empty(&self) -> Result<()> {
        if self.width() == 0 || self.height() == 0 {
            return Err(CompositeError::InvalidDimensions {
                width: self.width(),
                height: self.height(),
            }
            .into());
        }
        Ok(())
    }

    /// Get the width of the raster
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    /// Get the height of the raster
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    /// Get a pixel at the given coordinates (returns RGB array)
    pub fn get_pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let pixel = self.buffer.get_pixel(x, y);
        [pixel[0], pixel[1], pixel[2]]
    }

    /// Set a pixel at the given coordinates
    pub fn set_pixel(&mut self, x: u32, y: u32, color: [u8; 3]) {
        self.buffer.put_pixel(x, y, Rgb(color));
    }

    /// Get the underlying image buffer
    pub fn as_image(&self) -> &RgbImage {
        &self.buffer
    }

    /// Encode the raster as PNG bytes
    ///
    /// PNG is lossless, so encoded covers round-trip to the exact pixel
    /// values the compositor produced.
    pub fn to_png_bytes(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        self.buffer
            .write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)
            .map_err(|e| CompositeError::EncodeFailed {
                reason: e.to_string(),
            })?;
        Ok(bytes)
    }

    /// Save the raster as a PNG file
    pub fn save_png<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        self.buffer
            .save(path.as_ref())
            .map_err(|e| CompositeError::EncodeFailed {
                reason: e.to_string(),
            })?;
        Ok(())
    }
}
