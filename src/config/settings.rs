use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use super::modes::{OcrEngineMode, PageSegMode};

/// Resolution used when the caller does not supply one.
pub const DEFAULT_RESOLUTION: u32 = 96;

/// Tesseract's own fallback resolution when none is set. Kept for reference:
/// reads always set an explicit resolution.
pub const ENGINE_DEFAULT_RESOLUTION: u32 = 70;

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Tesseract language code, e.g. `eng` or `eng+deu`.
    pub language: String,
    pub psm: PageSegMode,
    pub oem: OcrEngineMode,
    pub char_whitelist: Option<String>,
    pub resolution: u32,
    /// Exact path to the Tesseract shared library.
    pub lib_path: Option<PathBuf>,
    /// tessdata directory.
    pub data_path: Option<PathBuf>,
    /// Extra directory to search for the library before the platform defaults.
    pub tesseract_dir: Option<PathBuf>,
    /// Windows DLL name suffix, e.g. `-5` for `libtesseract-5.dll`.
    pub api_version: Option<String>,
    /// Additional engine variables applied at construction.
    pub variables: BTreeMap<String, String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            language: "eng".to_string(),
            psm: PageSegMode::default(),
            oem: OcrEngineMode::default(),
            char_whitelist: None,
            resolution: DEFAULT_RESOLUTION,
            lib_path: None,
            data_path: None,
            tesseract_dir: None,
            api_version: None,
            variables: BTreeMap::new(),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        let settings: Settings = serde_yml::from_str(yaml).map_err(|e| {
            crate::error::TessyError::config(format!("Failed to parse settings YAML: {e}"))
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Check values the type system does not already constrain.
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.language.is_empty() || !self.language.is_ascii() {
            return Err(crate::error::TessyError::config(format!(
                "language must be a non-empty ASCII code, got '{}'",
                self.language
            )));
        }
        if self.resolution == 0 {
            return Err(crate::error::TessyError::config(
                "resolution must be a positive dpi value",
            ));
        }
        Ok(())
    }
}
