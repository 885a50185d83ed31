// image crate input: DynamicImage -> packed pixel rows

use std::borrow::Cow;

use image::DynamicImage;

/// Packed pixel rows taken from a decoded image.
pub struct PackedPixels<'a> {
    pub data: Cow<'a, [u8]>,
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u32,
}

/// Borrow the pixel rows of `image` in a layout the engine accepts.
///
/// 8-bit grey, RGB and RGBA buffers are borrowed as-is. Every other pixel
/// type (grey+alpha, 16-bit, float) is converted to RGBA8.
pub fn packed_pixels(image: &DynamicImage) -> PackedPixels<'_> {
    let (width, height) = (image.width(), image.height());
    match image {
        DynamicImage::ImageLuma8(buf) => PackedPixels {
            data: Cow::Borrowed(buf.as_raw().as_slice()),
            width,
            height,
            bytes_per_pixel: 1,
        },
        DynamicImage::ImageRgb8(buf) => PackedPixels {
            data: Cow::Borrowed(buf.as_raw().as_slice()),
            width,
            height,
            bytes_per_pixel: 3,
        },
        DynamicImage::ImageRgba8(buf) => PackedPixels {
            data: Cow::Borrowed(buf.as_raw().as_slice()),
            width,
            height,
            bytes_per_pixel: 4,
        },
        other => PackedPixels {
            data: Cow::Owned(other.to_rgba8().into_raw()),
            width,
            height,
            bytes_per_pixel: 4,
        },
    }
}
