// Tessy: one initialised TessBaseAPI handle plus configuration and path discovery

use std::fmt;

use image::DynamicImage;
use tracing::{debug, warn};

use crate::config::modes::{OutputMode, PageSegMode};
use crate::config::settings::Settings;
use crate::discovery::{self, FsProbe, InstallPaths, Platform, SystemProbe};
use crate::error::{Result, TessyError};
use crate::ffi::tesseract::{BaseApi, library_version};
use crate::ffi::tesseract_sys;
use crate::pixels::ImageDescriptor;
use crate::pixels::dynamic::packed_pixels;

pub const VAR_PAGESEG_MODE: &str = "tessedit_pageseg_mode";
pub const VAR_OCR_ENGINE_MODE: &str = "tessedit_ocr_engine_mode";
pub const VAR_CHAR_WHITELIST: &str = "tessedit_char_whitelist";

/// Recognised text in the form requested by [`OutputMode`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OcrOutput {
    Text(String),
    Raw(Vec<u8>),
}

impl OcrOutput {
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            OcrOutput::Text(s) => s.as_bytes(),
            OcrOutput::Raw(b) => b,
        }
    }

    /// Decode into a `String`. Raw output is validated as UTF-8.
    pub fn into_text(self) -> Result<String> {
        match self {
            OcrOutput::Text(s) => Ok(s),
            OcrOutput::Raw(b) => Ok(String::from_utf8(b)?),
        }
    }
}

/// Where a [`Tessy`] is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Unconfigured,
    Ready,
    Closed,
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Lifecycle::Unconfigured => f.write_str("unconfigured"),
            Lifecycle::Ready => f.write_str("ready"),
            Lifecycle::Closed => f.write_str("closed"),
        }
    }
}

enum EngineState {
    Unconfigured,
    Ready(BaseApi),
    Closed,
}

/// In-process Tesseract OCR reader.
///
/// Owns exactly one engine handle. Calls block until the engine returns and
/// must not overlap: every engine call takes `&mut self`. Use one `Tessy` per
/// worker thread for parallel reads.
pub struct Tessy {
    state: EngineState,
    settings: Settings,
    paths: InstallPaths,
    psm: PageSegMode,
}

impl Tessy {
    /// Discover the install, bind the library and initialise a handle.
    pub fn new(settings: &Settings) -> Result<Self> {
        Self::with_probe(settings, &Platform::current(), &SystemProbe)
    }

    /// Like [`Tessy::new`], with an explicit platform and filesystem probe.
    pub fn with_probe(
        settings: &Settings,
        platform: &Platform,
        probe: &dyn FsProbe,
    ) -> Result<Self> {
        settings.validate()?;
        let paths = discovery::resolve(settings, platform, probe)?;
        debug!(
            library = %paths.library.display(),
            data_dir = %paths.data_dir.display(),
            "resolved Tesseract install"
        );

        let mut tessy = Tessy {
            state: EngineState::Unconfigured,
            settings: settings.clone(),
            paths,
            psm: settings.psm,
        };
        tessy.start()?;
        Ok(tessy)
    }

    /// Unconfigured -> Ready. On error the partially built handle is dropped.
    fn start(&mut self) -> Result<()> {
        let lib = tesseract_sys::bind(&self.paths.library)?;
        let mut api = BaseApi::create(lib)?;
        api.init(&self.paths.data_dir, &self.settings.language)?;

        let mut initial: Vec<(&str, String)> = vec![
            (VAR_PAGESEG_MODE, self.settings.psm.to_string()),
            (VAR_OCR_ENGINE_MODE, self.settings.oem.to_string()),
        ];
        let whitelist = self.settings.char_whitelist.as_deref().unwrap_or_default();
        if !whitelist.is_empty() {
            initial.push((VAR_CHAR_WHITELIST, whitelist.to_string()));
        }
        for (name, value) in &self.settings.variables {
            initial.push((name.as_str(), value.clone()));
        }
        for (name, value) in initial {
            if !api.set_variable(name, &value)? {
                warn!(name, value = %value, "Tesseract rejected variable");
            }
        }

        self.state = EngineState::Ready(api);
        Ok(())
    }

    pub fn lifecycle(&self) -> Lifecycle {
        match self.state {
            EngineState::Unconfigured => Lifecycle::Unconfigured,
            EngineState::Ready(_) => Lifecycle::Ready,
            EngineState::Closed => Lifecycle::Closed,
        }
    }

    fn api(&mut self) -> Result<&mut BaseApi> {
        match &mut self.state {
            EngineState::Ready(api) => Ok(api),
            EngineState::Unconfigured => Err(TessyError::not_ready("engine is unconfigured")),
            EngineState::Closed => Err(TessyError::not_ready("engine is closed")),
        }
    }

    /// Recognise text in `image`.
    ///
    /// `psm` overrides the page segmentation mode for this and later reads;
    /// `None` keeps the last configured mode.
    pub fn read(
        &mut self,
        image: &ImageDescriptor<'_>,
        output: OutputMode,
        psm: Option<PageSegMode>,
    ) -> Result<OcrOutput> {
        let mode = psm.unwrap_or(self.psm);
        // The engine keeps the mode even if recognition below fails.
        self.api()?.set_page_seg_mode(mode.as_i32());
        self.psm = mode;

        let api = self.api()?;
        api.set_image(
            image.pixels(),
            image.width(),
            image.height(),
            image.bytes_per_pixel(),
            image.bytes_per_line(),
        )?;
        api.set_source_resolution(image.resolution())?;
        let bytes = api.utf8_text()?;

        match output {
            OutputMode::Raw => Ok(OcrOutput::Raw(bytes)),
            OutputMode::Text => Ok(OcrOutput::Text(String::from_utf8(bytes)?)),
        }
    }

    /// Recognise text and return it as a `String`, using the configured mode.
    pub fn read_text(&mut self, image: &ImageDescriptor<'_>) -> Result<String> {
        self.read(image, OutputMode::Text, None)?.into_text()
    }

    /// Recognise text in a 2-D (grey) or 3-D (height, width, channels) array.
    #[cfg(feature = "array")]
    pub fn read_from_array<S, D>(
        &mut self,
        array: &ndarray::ArrayBase<S, D>,
        resolution: u32,
        output: OutputMode,
        psm: Option<PageSegMode>,
    ) -> Result<OcrOutput>
    where
        S: ndarray::Data<Elem = u8>,
        D: ndarray::Dimension,
    {
        use crate::pixels::array::{array_geometry, row_major};

        let geometry = array_geometry(array.shape())?;
        let contiguous = row_major(array);
        let pixels = contiguous
            .as_slice()
            .ok_or_else(|| TessyError::invalid_shape("array is not contiguous after relayout"))?;
        let image = ImageDescriptor::packed(
            pixels,
            geometry.width,
            geometry.height,
            geometry.bytes_per_pixel,
        )?
        .with_resolution(resolution)?;
        self.read(&image, output, psm)
    }

    /// Recognise text in a decoded image.
    pub fn read_image(
        &mut self,
        image: &DynamicImage,
        resolution: u32,
        output: OutputMode,
        psm: Option<PageSegMode>,
    ) -> Result<OcrOutput> {
        let packed = packed_pixels(image);
        let descriptor = ImageDescriptor::packed(
            &packed.data,
            packed.width,
            packed.height,
            packed.bytes_per_pixel,
        )?
        .with_resolution(resolution)?;
        self.read(&descriptor, output, psm)
    }

    pub fn page_seg_mode(&mut self) -> Result<PageSegMode> {
        let raw = self.api()?.page_seg_mode();
        PageSegMode::try_from(raw)
    }

    pub fn set_page_seg_mode(&mut self, mode: PageSegMode) -> Result<()> {
        self.api()?.set_page_seg_mode(mode.as_i32());
        self.psm = mode;
        Ok(())
    }

    /// Set an engine variable, as in a Tesseract config file.
    /// Returns `false` if the engine does not know `name`.
    pub fn set_variable(&mut self, name: &str, value: &str) -> Result<bool> {
        let accepted = self.api()?.set_variable(name, value)?;
        if accepted && name == VAR_PAGESEG_MODE {
            let parsed = value.trim().parse::<i32>().ok();
            if let Some(mode) = parsed.and_then(|v| PageSegMode::try_from(v).ok()) {
                self.psm = mode;
            }
        }
        Ok(accepted)
    }

    /// Mean word confidence (0-100) of the last read, `None` if the engine
    /// reports a value outside that range.
    pub fn mean_text_conf(&mut self) -> Result<Option<u8>> {
        let conf = self.api()?.mean_text_conf();
        Ok(u8::try_from(conf).ok().filter(|c| *c <= 100))
    }

    /// Version string of the bound Tesseract library.
    ///
    /// The binding is process-wide, so this also works after `close`.
    pub fn tesseract_version(&self) -> Result<String> {
        match &self.state {
            EngineState::Ready(api) => Ok(api.version()),
            _ => tesseract_sys::bound()
                .map(library_version)
                .ok_or_else(|| TessyError::not_ready("Tesseract library is not bound")),
        }
    }

    /// Languages installed in the resolved tessdata directory.
    pub fn available_languages(&mut self) -> Result<Vec<String>> {
        self.api()?.available_languages()
    }

    pub fn paths(&self) -> &InstallPaths {
        &self.paths
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Release the engine handle. Calling `close` again does nothing.
    pub fn close(&mut self) {
        if let EngineState::Ready(api) = std::mem::replace(&mut self.state, EngineState::Closed) {
            drop(api);
            debug!("closed Tessy engine");
        }
    }
}

impl Drop for Tessy {
    fn drop(&mut self) {
        self.close();
    }
}

impl fmt::Debug for Tessy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tessy")
            .field("lifecycle", &self.lifecycle())
            .field("paths", &self.paths)
            .field("language", &self.settings.language)
            .field("psm", &self.psm)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_output_into_text() {
        let out = OcrOutput::Raw(b"Test Word\n".to_vec());
        assert_eq!(out.into_text().unwrap(), "Test Word\n");
    }

    #[test]
    fn test_raw_output_invalid_utf8() {
        let out = OcrOutput::Raw(vec![0xff, 0xfe]);
        assert!(matches!(
            out.into_text(),
            Err(TessyError::TextDecodeError(_))
        ));
    }

    #[test]
    fn test_as_bytes_matches_for_both_modes() {
        let text = OcrOutput::Text("abc".to_string());
        let raw = OcrOutput::Raw(b"abc".to_vec());
        assert_eq!(text.as_bytes(), raw.as_bytes());
    }

    #[test]
    fn test_lifecycle_display() {
        assert_eq!(Lifecycle::Closed.to_string(), "closed");
    }
}
