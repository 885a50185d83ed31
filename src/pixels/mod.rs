// Pixel buffers in the layout TessBaseAPISetImage expects.

#[cfg(feature = "array")]
pub mod array;
pub mod dynamic;

use crate::config::settings::DEFAULT_RESOLUTION;
use crate::error::{Result, TessyError};

/// Bytes-per-pixel values the engine accepts: grey, RGB, RGBA.
pub const SUPPORTED_BYTES_PER_PIXEL: [u32; 3] = [1, 3, 4];

/// Borrowed image buffer plus its geometry.
///
/// Rows run top to bottom. Channel order is whatever the caller's decoder
/// produced; no colour conversion happens here.
#[derive(Debug, Clone, Copy)]
pub struct ImageDescriptor<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
    bytes_per_pixel: u32,
    bytes_per_line: u32,
    resolution: u32,
}

impl<'a> ImageDescriptor<'a> {
    /// Describe a buffer with packed rows (`bytes_per_line = width * bytes_per_pixel`).
    pub fn packed(pixels: &'a [u8], width: u32, height: u32, bytes_per_pixel: u32) -> Result<Self> {
        let Some(bytes_per_line) = width.checked_mul(bytes_per_pixel) else {
            return Err(TessyError::invalid_image(format!(
                "row stride overflows: width {width} at {bytes_per_pixel} bytes per pixel"
            )));
        };
        Self::with_stride(pixels, width, height, bytes_per_pixel, bytes_per_line)
    }

    /// Describe a buffer whose rows may be padded to `bytes_per_line`.
    pub fn with_stride(
        pixels: &'a [u8],
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        bytes_per_line: u32,
    ) -> Result<Self> {
        let descriptor = ImageDescriptor {
            pixels,
            width,
            height,
            bytes_per_pixel,
            bytes_per_line,
            resolution: DEFAULT_RESOLUTION,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Set the source resolution in dots per inch.
    pub fn with_resolution(mut self, dpi: u32) -> Result<Self> {
        if dpi == 0 || dpi > i32::MAX as u32 {
            return Err(TessyError::invalid_image(format!(
                "resolution must be between 1 and i32::MAX, got {dpi}"
            )));
        }
        self.resolution = dpi;
        Ok(self)
    }

    fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TessyError::invalid_image(format!(
                "image must not be empty ({}x{})",
                self.width, self.height
            )));
        }
        if !SUPPORTED_BYTES_PER_PIXEL.contains(&self.bytes_per_pixel) {
            return Err(TessyError::invalid_image(format!(
                "bytes per pixel must be 1, 3 or 4, got {}",
                self.bytes_per_pixel
            )));
        }
        for (name, value) in [
            ("width", self.width),
            ("height", self.height),
            ("bytes_per_line", self.bytes_per_line),
        ] {
            if value > i32::MAX as u32 {
                return Err(TessyError::invalid_image(format!(
                    "{name} exceeds i32::MAX ({value})"
                )));
            }
        }

        let min_stride = self.width as u64 * self.bytes_per_pixel as u64;
        if (self.bytes_per_line as u64) < min_stride {
            return Err(TessyError::invalid_image(format!(
                "bytes per line {} is smaller than width * bytes per pixel ({})",
                self.bytes_per_line, min_stride
            )));
        }

        let required = self.bytes_per_line as u64 * self.height as u64;
        if (self.pixels.len() as u64) < required {
            return Err(TessyError::invalid_image(format!(
                "buffer too small: expected at least {} bytes, got {}",
                required,
                self.pixels.len()
            )));
        }
        Ok(())
    }

    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn bytes_per_pixel(&self) -> u32 {
        self.bytes_per_pixel
    }

    pub fn bytes_per_line(&self) -> u32 {
        self.bytes_per_line
    }

    pub fn resolution(&self) -> u32 {
        self.resolution
    }
}
