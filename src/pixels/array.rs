// ndarray input: (height, width) greyscale or (height, width, channels) colour

use ndarray::{ArrayBase, CowArray, Data, Dimension};

use crate::error::{Result, TessyError};

/// Image geometry inferred from an array shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayGeometry {
    pub width: u32,
    pub height: u32,
    pub bytes_per_pixel: u32,
}

fn dimension(name: &str, value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| TessyError::invalid_shape(format!("{name} {value} does not fit in u32")))
}

/// Infer width, height and bytes per pixel from an array shape.
///
/// A 2-D shape `(h, w)` is single-channel; a 3-D shape `(h, w, c)` has `c`
/// bytes per pixel. Any other rank is rejected.
pub fn array_geometry(shape: &[usize]) -> Result<ArrayGeometry> {
    match *shape {
        [height, width] => Ok(ArrayGeometry {
            width: dimension("width", width)?,
            height: dimension("height", height)?,
            bytes_per_pixel: 1,
        }),
        [height, width, channels] => Ok(ArrayGeometry {
            width: dimension("width", width)?,
            height: dimension("height", height)?,
            bytes_per_pixel: dimension("channels", channels)?,
        }),
        _ => Err(TessyError::invalid_shape(format!(
            "image array must be 2- or 3-dimensional, got {} dimensions {:?}",
            shape.len(),
            shape
        ))),
    }
}

/// Row-major view of `array`, copying only when its memory is not already
/// in standard layout (e.g. a transposed or sliced view).
pub fn row_major<S, D>(array: &ArrayBase<S, D>) -> CowArray<'_, u8, D>
where
    S: Data<Elem = u8>,
    D: Dimension,
{
    array.as_standard_layout()
}
