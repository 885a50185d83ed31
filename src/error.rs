use thiserror::Error;

#[derive(Debug, Error)]
pub enum TessyError {
    #[error("Tesseract library not found: {0}")]
    LibraryNotFoundError(String),

    #[error("Tesseract library load error: {0}")]
    LibraryLoadError(String),

    #[error("Unsupported platform: {0}")]
    UnsupportedPlatformError(String),

    #[error("tessdata directory not found: {0}")]
    DataDirectoryNotFoundError(String),

    #[error("Initialization error (status {status}): {message}")]
    InitializationError { status: i32, message: String },

    #[error("Engine not ready: {0}")]
    NotReadyError(String),

    #[error("Invalid array shape: {0}")]
    InvalidShapeError(String),

    #[error("Invalid image: {0}")]
    InvalidImageError(String),

    #[error("Invalid argument: {0}")]
    InvalidArgumentError(String),

    #[error("Recognition error: {0}")]
    RecognitionError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Text decode error: {0}")]
    TextDecodeError(#[from] std::string::FromUtf8Error),

    #[error("Image error: {0}")]
    ImageError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Generates factory methods for [`TessyError`] variants that wrap a `String`.
macro_rules! error_constructors {
    ($(
        $(#[doc = $doc:expr])*
        $method:ident => $variant:ident
    ),* $(,)?) => {
        impl TessyError {
            $(
                $(#[doc = $doc])*
                pub fn $method(msg: impl Into<String>) -> Self {
                    Self::$variant(msg.into())
                }
            )*
        }
    };
}

error_constructors! {
    /// Create a library-not-found error.
    library_not_found => LibraryNotFoundError,
    /// Create a library load error.
    library_load => LibraryLoadError,
    /// Create an unsupported platform error.
    unsupported_platform => UnsupportedPlatformError,
    /// Create a data-directory-not-found error.
    data_dir_not_found => DataDirectoryNotFoundError,
    /// Create a not-ready error.
    not_ready => NotReadyError,
    /// Create an invalid shape error.
    invalid_shape => InvalidShapeError,
    /// Create an invalid image error.
    invalid_image => InvalidImageError,
    /// Create an invalid argument error.
    invalid_argument => InvalidArgumentError,
    /// Create a recognition error.
    recognition => RecognitionError,
    /// Create a configuration error.
    config => ConfigError,
    /// Create an image error.
    image => ImageError,
}

impl TessyError {
    /// Create an initialization error carrying the native status code.
    pub fn initialization(status: i32, msg: impl Into<String>) -> Self {
        Self::InitializationError {
            status,
            message: msg.into(),
        }
    }

    /// Copy of this error with the same variant, for reporting one failure
    /// against several items.
    pub fn duplicate(&self) -> Self {
        match self {
            Self::LibraryNotFoundError(m) => Self::LibraryNotFoundError(m.clone()),
            Self::LibraryLoadError(m) => Self::LibraryLoadError(m.clone()),
            Self::UnsupportedPlatformError(m) => Self::UnsupportedPlatformError(m.clone()),
            Self::DataDirectoryNotFoundError(m) => Self::DataDirectoryNotFoundError(m.clone()),
            Self::InitializationError { status, message } => Self::InitializationError {
                status: *status,
                message: message.clone(),
            },
            Self::NotReadyError(m) => Self::NotReadyError(m.clone()),
            Self::InvalidShapeError(m) => Self::InvalidShapeError(m.clone()),
            Self::InvalidImageError(m) => Self::InvalidImageError(m.clone()),
            Self::InvalidArgumentError(m) => Self::InvalidArgumentError(m.clone()),
            Self::RecognitionError(m) => Self::RecognitionError(m.clone()),
            Self::ConfigError(m) => Self::ConfigError(m.clone()),
            Self::TextDecodeError(e) => Self::TextDecodeError(e.clone()),
            Self::ImageError(m) => Self::ImageError(m.clone()),
            Self::IoError(e) => Self::IoError(std::io::Error::new(e.kind(), e.to_string())),
        }
    }
}

impl From<libloading::Error> for TessyError {
    fn from(e: libloading::Error) -> Self {
        Self::LibraryLoadError(e.to_string())
    }
}

impl From<serde_yml::Error> for TessyError {
    fn from(e: serde_yml::Error) -> Self {
        Self::ConfigError(e.to_string())
    }
}

impl From<image::ImageError> for TessyError {
    fn from(e: image::ImageError) -> Self {
        Self::ImageError(e.to_string())
    }
}

impl From<std::ffi::NulError> for TessyError {
    fn from(e: std::ffi::NulError) -> Self {
        Self::InvalidArgumentError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TessyError>;
