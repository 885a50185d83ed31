use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Filesystem and environment queries used by path discovery.
///
/// Discovery never touches `std::fs` or `std::env` directly, so the search
/// order can be tested against a fake layout.
pub trait FsProbe {
    fn is_file(&self, path: &Path) -> bool;
    fn is_dir(&self, path: &Path) -> bool;
    fn env_var(&self, key: &str) -> Option<OsString>;
    fn current_dir(&self) -> Option<PathBuf>;
}

/// [`FsProbe`] backed by the real filesystem and process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProbe;

impl FsProbe for SystemProbe {
    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn env_var(&self, key: &str) -> Option<OsString> {
        std::env::var_os(key)
    }

    fn current_dir(&self) -> Option<PathBuf> {
        std::env::current_dir().ok()
    }
}
