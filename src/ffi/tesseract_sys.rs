// Raw Tesseract C API declarations, resolved at runtime from the shared library.
//
// Signatures follow tesseract/capi.h. Nothing links against libtesseract at
// build time; symbols are looked up with libloading on first bind.

use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock, PoisonError};

use libc::{c_char, c_int, c_uchar};
use libloading::{Library, Symbol};
use tracing::{debug, info};

use crate::error::{Result, TessyError};

/// Opaque representation of tesseract's TessBaseAPI.
/// We never access internal fields; all interaction goes through the C API.
#[repr(C)]
pub struct TessBaseAPI {
    _opaque: [u8; 0],
}

// --- Creation and destruction ---

pub type TessBaseAPICreateFn = unsafe extern "C" fn() -> *mut TessBaseAPI;
pub type TessBaseAPIDeleteFn = unsafe extern "C" fn(handle: *mut TessBaseAPI);
pub type TessBaseAPIInit3Fn = unsafe extern "C" fn(
    handle: *mut TessBaseAPI,
    datapath: *const c_char,
    language: *const c_char,
) -> c_int;

// --- Queries ---

pub type TessVersionFn = unsafe extern "C" fn() -> *const c_char;
pub type TessBaseAPIGetAvailableLanguagesAsVectorFn =
    unsafe extern "C" fn(handle: *const TessBaseAPI) -> *mut *mut c_char;
pub type TessBaseAPIGetPageSegModeFn = unsafe extern "C" fn(handle: *const TessBaseAPI) -> c_int;
pub type TessBaseAPIMeanTextConfFn = unsafe extern "C" fn(handle: *mut TessBaseAPI) -> c_int;

// --- Image input and configuration ---

pub type TessBaseAPISetImageFn = unsafe extern "C" fn(
    handle: *mut TessBaseAPI,
    imagedata: *const c_uchar,
    width: c_int,
    height: c_int,
    bytes_per_pixel: c_int,
    bytes_per_line: c_int,
);
pub type TessBaseAPISetSourceResolutionFn =
    unsafe extern "C" fn(handle: *mut TessBaseAPI, ppi: c_int);
pub type TessBaseAPISetPageSegModeFn = unsafe extern "C" fn(handle: *mut TessBaseAPI, mode: c_int);
/// Returns capi.h's `BOOL` (an `int`): zero when the variable name is unknown.
pub type TessBaseAPISetVariableFn = unsafe extern "C" fn(
    handle: *mut TessBaseAPI,
    name: *const c_char,
    value: *const c_char,
) -> c_int;

// --- Recognition output ---

pub type TessBaseAPIGetUTF8TextFn = unsafe extern "C" fn(handle: *mut TessBaseAPI) -> *mut c_char;
pub type TessDeleteTextFn = unsafe extern "C" fn(text: *const c_char);
pub type TessDeleteTextArrayFn = unsafe extern "C" fn(arr: *mut *mut c_char);

/// Function table for a loaded Tesseract shared library.
///
/// The `Library` is kept alongside the function pointers so they stay valid
/// for as long as the table exists. Bound tables live in a process-wide static
/// and are never unloaded.
pub struct TesseractLib {
    path: PathBuf,
    pub create: TessBaseAPICreateFn,
    pub delete: TessBaseAPIDeleteFn,
    pub init3: TessBaseAPIInit3Fn,
    pub version: TessVersionFn,
    pub get_available_languages: TessBaseAPIGetAvailableLanguagesAsVectorFn,
    pub set_image: TessBaseAPISetImageFn,
    pub set_source_resolution: TessBaseAPISetSourceResolutionFn,
    pub set_page_seg_mode: TessBaseAPISetPageSegModeFn,
    pub get_page_seg_mode: TessBaseAPIGetPageSegModeFn,
    pub set_variable: TessBaseAPISetVariableFn,
    pub get_utf8_text: TessBaseAPIGetUTF8TextFn,
    pub mean_text_conf: TessBaseAPIMeanTextConfFn,
    pub delete_text: TessDeleteTextFn,
    pub delete_text_array: TessDeleteTextArrayFn,
    _lib: Library,
}

/// Resolve one symbol and copy the function pointer out of it.
///
/// # Safety
/// `T` must be the exact function pointer type the library exports under `name`.
unsafe fn symbol<T: Copy>(lib: &Library, name: &str) -> Result<T> {
    let sym: Symbol<T> = unsafe { lib.get(name.as_bytes()) }
        .map_err(|e| TessyError::library_load(format!("missing symbol '{name}': {e}")))?;
    Ok(*sym)
}

impl TesseractLib {
    /// Load the shared library at `path` and resolve every entry point.
    ///
    /// # Safety
    /// Loading a library runs its initialisers. The caller must make sure the
    /// file is a Tesseract build whose C API matches the declarations above.
    pub unsafe fn load(path: &Path) -> Result<Self> {
        let lib = unsafe { Library::new(path) }.map_err(|e| {
            TessyError::library_load(format!("failed to load '{}': {e}", path.display()))
        })?;

        unsafe {
            Ok(TesseractLib {
                path: path.to_path_buf(),
                create: symbol(&lib, "TessBaseAPICreate")?,
                delete: symbol(&lib, "TessBaseAPIDelete")?,
                init3: symbol(&lib, "TessBaseAPIInit3")?,
                version: symbol(&lib, "TessVersion")?,
                get_available_languages: symbol(&lib, "TessBaseAPIGetAvailableLanguagesAsVector")?,
                set_image: symbol(&lib, "TessBaseAPISetImage")?,
                set_source_resolution: symbol(&lib, "TessBaseAPISetSourceResolution")?,
                set_page_seg_mode: symbol(&lib, "TessBaseAPISetPageSegMode")?,
                get_page_seg_mode: symbol(&lib, "TessBaseAPIGetPageSegMode")?,
                set_variable: symbol(&lib, "TessBaseAPISetVariable")?,
                get_utf8_text: symbol(&lib, "TessBaseAPIGetUTF8Text")?,
                mean_text_conf: symbol(&lib, "TessBaseAPIMeanTextConf")?,
                delete_text: symbol(&lib, "TessDeleteText")?,
                delete_text_array: symbol(&lib, "TessDeleteTextArray")?,
                _lib: lib,
            })
        }
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

static LIBRARY: OnceLock<TesseractLib> = OnceLock::new();
static BIND_LOCK: Mutex<()> = Mutex::new(());

/// Bind the process-wide Tesseract library.
///
/// The first successful call loads `path`; every later call returns that same
/// binding, whatever path it is given.
pub fn bind(path: &Path) -> Result<&'static TesseractLib> {
    if let Some(lib) = LIBRARY.get() {
        log_rebind(lib, path);
        return Ok(lib);
    }

    let _guard = BIND_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(lib) = LIBRARY.get() {
        log_rebind(lib, path);
        return Ok(lib);
    }

    // SAFETY: the symbol table above mirrors capi.h; any library exporting
    // these names with other signatures is outside the supported contract.
    let lib = unsafe { TesseractLib::load(path)? };
    info!(path = %path.display(), "bound Tesseract library");
    Ok(LIBRARY.get_or_init(|| lib))
}

/// The process-wide binding, if [`bind`] has succeeded.
pub fn bound() -> Option<&'static TesseractLib> {
    LIBRARY.get()
}

fn log_rebind(lib: &TesseractLib, requested: &Path) {
    if lib.path() != requested {
        debug!(
            bound = %lib.path().display(),
            requested = %requested.display(),
            "Tesseract library already bound; ignoring requested path"
        );
    }
}
