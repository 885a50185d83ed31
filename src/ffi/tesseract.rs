// Safe wrapper around the TessBaseAPI handle (RAII Drop)

use std::ffi::{CStr, CString};
use std::path::Path;
use std::ptr::NonNull;

use libc::c_char;
use tracing::debug;

use super::tesseract_sys::{TessBaseAPI, TesseractLib};
use crate::error::{Result, TessyError};

/// Owned TessBaseAPI handle.
///
/// Created with `TessBaseAPICreate`, released with `TessBaseAPIDelete` when
/// dropped. The handle must not be used by two threads at once, so it is
/// `Send` but not `Sync`; every call that mutates engine state takes
/// `&mut self`.
pub struct BaseApi {
    ptr: NonNull<TessBaseAPI>,
    lib: &'static TesseractLib,
}

// SAFETY: TessBaseAPI has no thread affinity. Exclusive access is enforced
// through `&mut self`, and the type is not `Sync`.
unsafe impl Send for BaseApi {}

/// Convert an identifier (language code, variable name) to a C string.
fn identifier(kind: &str, value: &str) -> Result<CString> {
    if !value.is_ascii() {
        return Err(TessyError::invalid_argument(format!(
            "{kind} must be ASCII, got '{value}'"
        )));
    }
    Ok(CString::new(value)?)
}

/// Validate that a dimension fits in a C `int`.
fn c_int_arg(name: &str, value: u32) -> Result<libc::c_int> {
    libc::c_int::try_from(value)
        .map_err(|_| TessyError::invalid_argument(format!("{name} exceeds i32::MAX ({value})")))
}

/// Copy one entry of the engine's language list. Entries must be UTF-8.
fn language_entry(entry: &CStr) -> Result<String> {
    Ok(String::from_utf8(entry.to_bytes().to_vec())?)
}

impl BaseApi {
    /// Allocate a new, uninitialised engine handle.
    pub fn create(lib: &'static TesseractLib) -> Result<Self> {
        let raw = unsafe { (lib.create)() };
        let ptr = NonNull::new(raw)
            .ok_or_else(|| TessyError::initialization(-1, "TessBaseAPICreate returned null"))?;
        debug!("created TessBaseAPI handle");
        Ok(BaseApi { ptr, lib })
    }

    /// Initialise the handle with a tessdata directory and language.
    ///
    /// On failure the handle is still owned by `self` and is released when
    /// it is dropped.
    pub fn init(&mut self, data_path: &Path, language: &str) -> Result<()> {
        let data_path_str = data_path
            .to_str()
            .ok_or_else(|| TessyError::invalid_argument("tessdata path is not valid UTF-8"))?;
        let c_path = CString::new(data_path_str)?;
        let c_lang = identifier("language", language)?;

        let api = self.ptr.as_ptr();
        let status = unsafe { (self.lib.init3)(api, c_path.as_ptr(), c_lang.as_ptr()) };
        if status != 0 {
            return Err(TessyError::initialization(
                status,
                format!(
                    "TessBaseAPIInit3 failed for language '{}' with data path '{}'",
                    language,
                    data_path.display()
                ),
            ));
        }
        debug!(language, data_path = %data_path.display(), "initialised TessBaseAPI");
        Ok(())
    }

    /// Languages the engine can load from its data path.
    ///
    /// A non-UTF-8 entry fails the whole list with `TextDecodeError`. The
    /// engine's array is released either way.
    pub fn available_languages(&self) -> Result<Vec<String>> {
        let arr = unsafe { (self.lib.get_available_languages)(self.ptr.as_ptr()) };
        if arr.is_null() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        unsafe {
            let mut i = 0;
            loop {
                let entry: *mut c_char = *arr.add(i);
                if entry.is_null() {
                    break;
                }
                entries.push(language_entry(CStr::from_ptr(entry)));
                i += 1;
            }
            (self.lib.delete_text_array)(arr);
        }
        entries.into_iter().collect()
    }

    /// Submit raw pixel data. The engine copies the buffer before returning.
    ///
    /// # Arguments
    /// * `data`            - Pixel rows, top to bottom
    /// * `width`           - Image width in pixels
    /// * `height`          - Image height in pixels
    /// * `bytes_per_pixel` - 1 (grey), 3 (RGB) or 4 (RGBA)
    /// * `bytes_per_line`  - Row stride in bytes
    pub fn set_image(
        &mut self,
        data: &[u8],
        width: u32,
        height: u32,
        bytes_per_pixel: u32,
        bytes_per_line: u32,
    ) -> Result<()> {
        let w = c_int_arg("width", width)?;
        let h = c_int_arg("height", height)?;
        let bpp = c_int_arg("bytes_per_pixel", bytes_per_pixel)?;
        let bpl = c_int_arg("bytes_per_line", bytes_per_line)?;

        let required = (bytes_per_line as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| TessyError::invalid_image("overflow computing image buffer size"))?;
        if data.len() < required {
            return Err(TessyError::invalid_image(format!(
                "buffer too small: need {} bytes, got {}",
                required,
                data.len()
            )));
        }

        unsafe { (self.lib.set_image)(self.ptr.as_ptr(), data.as_ptr(), w, h, bpp, bpl) };
        Ok(())
    }

    pub fn set_source_resolution(&mut self, dpi: u32) -> Result<()> {
        let ppi = c_int_arg("resolution", dpi)?;
        unsafe { (self.lib.set_source_resolution)(self.ptr.as_ptr(), ppi) };
        Ok(())
    }

    pub fn set_page_seg_mode(&mut self, mode: i32) {
        unsafe { (self.lib.set_page_seg_mode)(self.ptr.as_ptr(), mode) };
    }

    pub fn page_seg_mode(&self) -> i32 {
        unsafe { (self.lib.get_page_seg_mode)(self.ptr.as_ptr()) }
    }

    /// Set an engine variable. Returns `false` if the name is unknown.
    pub fn set_variable(&mut self, name: &str, value: &str) -> Result<bool> {
        let c_name = identifier("variable name", name)?;
        let c_value = CString::new(value)?;
        let api = self.ptr.as_ptr();
        let ok = unsafe { (self.lib.set_variable)(api, c_name.as_ptr(), c_value.as_ptr()) };
        Ok(ok != 0)
    }

    /// Run recognition on the current image and return the UTF-8 bytes.
    ///
    /// The engine-allocated string is copied into a `Vec` before any other
    /// engine call and then handed back to `TessDeleteText`.
    pub fn utf8_text(&mut self) -> Result<Vec<u8>> {
        let raw = unsafe { (self.lib.get_utf8_text)(self.ptr.as_ptr()) };
        if raw.is_null() {
            return Err(TessyError::recognition(
                "TessBaseAPIGetUTF8Text returned null (no image set or recognition failed)",
            ));
        }
        let bytes = unsafe { CStr::from_ptr(raw) }.to_bytes().to_vec();
        unsafe { (self.lib.delete_text)(raw) };
        Ok(bytes)
    }

    /// Mean word confidence of the last recognition, as reported by the engine.
    pub fn mean_text_conf(&mut self) -> i32 {
        unsafe { (self.lib.mean_text_conf)(self.ptr.as_ptr()) }
    }

    /// Version string of the bound library.
    pub fn version(&self) -> String {
        library_version(self.lib)
    }
}

/// Version string reported by `TessVersion`.
pub fn library_version(lib: &TesseractLib) -> String {
    let raw = unsafe { (lib.version)() };
    if raw.is_null() {
        return String::new();
    }
    // TessVersion returns a static string owned by the library.
    unsafe { CStr::from_ptr(raw) }
        .to_string_lossy()
        .into_owned()
}

impl Drop for BaseApi {
    fn drop(&mut self) {
        unsafe { (self.lib.delete)(self.ptr.as_ptr()) };
        debug!("released TessBaseAPI handle");
    }
}
