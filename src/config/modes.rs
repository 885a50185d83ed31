use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TessyError;

/// Page segmentation mode, as per capi.h `TessPageSegMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum PageSegMode {
    OsdOnly = 0,
    AutoOsd = 1,
    AutoOnly = 2,
    Auto = 3,
    SingleColumn = 4,
    SingleBlockVertText = 5,
    SingleBlock = 6,
    #[default]
    SingleLine = 7,
    SingleWord = 8,
    CircleWord = 9,
    SingleChar = 10,
    SparseText = 11,
    SparseTextOsd = 12,
    RawLine = 13,
}

impl PageSegMode {
    pub const ALL: [PageSegMode; 14] = [
        PageSegMode::OsdOnly,
        PageSegMode::AutoOsd,
        PageSegMode::AutoOnly,
        PageSegMode::Auto,
        PageSegMode::SingleColumn,
        PageSegMode::SingleBlockVertText,
        PageSegMode::SingleBlock,
        PageSegMode::SingleLine,
        PageSegMode::SingleWord,
        PageSegMode::CircleWord,
        PageSegMode::SingleChar,
        PageSegMode::SparseText,
        PageSegMode::SparseTextOsd,
        PageSegMode::RawLine,
    ];

    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for PageSegMode {
    type Error = TessyError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        usize::try_from(value)
            .ok()
            .and_then(|i| Self::ALL.get(i).copied())
            .ok_or_else(|| {
                TessyError::config(format!("page segmentation mode must be 0-13, got {value}"))
            })
    }
}

impl From<PageSegMode> for i32 {
    fn from(mode: PageSegMode) -> i32 {
        mode.as_i32()
    }
}

impl fmt::Display for PageSegMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// OCR engine mode, as per capi.h `TessOcrEngineMode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
#[repr(i32)]
pub enum OcrEngineMode {
    TesseractOnly = 0,
    #[default]
    LstmOnly = 1,
    TesseractLstmCombined = 2,
    Default = 3,
}

impl OcrEngineMode {
    pub fn as_i32(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for OcrEngineMode {
    type Error = TessyError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OcrEngineMode::TesseractOnly),
            1 => Ok(OcrEngineMode::LstmOnly),
            2 => Ok(OcrEngineMode::TesseractLstmCombined),
            3 => Ok(OcrEngineMode::Default),
            other => Err(TessyError::config(format!(
                "OCR engine mode must be 0-3, got {other}"
            ))),
        }
    }
}

impl From<OcrEngineMode> for i32 {
    fn from(mode: OcrEngineMode) -> i32 {
        mode.as_i32()
    }
}

impl fmt::Display for OcrEngineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_i32())
    }
}

/// How a read returns the recognised text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// UTF-8 decoded `String`.
    #[default]
    Text,
    /// Undecoded bytes as returned by the engine.
    Raw,
}
