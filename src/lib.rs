//! In-process bindings to the Tesseract-OCR C API.
//!
//! The shared library is located and loaded at runtime; [`Tessy`] owns one
//! initialised engine handle and turns raw pixel buffers, `ndarray` arrays or
//! decoded `image` buffers into text.
//!
//! ```no_run
//! use tessy::{ImageDescriptor, OutputMode, Settings, Tessy};
//!
//! # fn main() -> tessy::Result<()> {
//! let mut ocr = Tessy::new(&Settings::default())?;
//! let pixels = vec![255u8; 200 * 50];
//! let image = ImageDescriptor::packed(&pixels, 200, 50, 1)?.with_resolution(300)?;
//! let text = ocr.read(&image, OutputMode::Text, None)?.into_text()?;
//! println!("{text}");
//! # Ok(())
//! # }
//! ```

pub mod batch;
pub mod config;
pub mod discovery;
pub mod engine;
pub mod error;
pub mod ffi;
pub mod pixels;

pub use config::modes::{OcrEngineMode, OutputMode, PageSegMode};
pub use config::settings::Settings;
pub use engine::{Lifecycle, OcrOutput, Tessy};
pub use error::{Result, TessyError};
pub use pixels::ImageDescriptor;
