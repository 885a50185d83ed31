// Locating the Tesseract shared library and tessdata directory.
//
// Each platform has an ordered list of candidate generators. Generators are
// evaluated lazily and the first existing candidate wins.

pub mod platform;
pub mod probe;

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::settings::Settings;
use crate::error::{Result, TessyError};
pub use platform::Platform;
pub use probe::{FsProbe, SystemProbe};

pub const TESSDATA_DIRNAME: &str = "tessdata";
pub const TESSERACT_DIRNAME: &str = "Tesseract-OCR";
pub const TESSDATA_PREFIX_VAR: &str = "TESSDATA_PREFIX";

const WINDOWS_DEFAULT_LIBRARY: &str = "libtesseract-5";
const WINDOWS_PROGRAM_FILES_VARS: &[&str] = &["PROGRAMFILES", "PROGRAMFILES(X86)"];
const LINUX_LIBRARY_NAMES: &[&str] = &["libtesseract.so.5", "libtesseract.so.4", "libtesseract.so"];
const MACOS_LIBRARY_NAMES: &[&str] = &["libtesseract.5.dylib", "libtesseract.dylib"];
const TESSERACT_EXECUTABLE: &str = "tesseract";

const MACOS_PREFIXES: &[&str] = &["/opt/homebrew", "/usr/local", "/opt/local"];
const LINUX_TESSDATA_DIRS: &[&str] = &[
    "/usr/share/tesseract-ocr/5/tessdata",
    "/usr/share/tesseract-ocr/4.00/tessdata",
    "/usr/share/tessdata",
    "/usr/local/share/tessdata",
];

/// Paths resolved once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallPaths {
    pub library: PathBuf,
    pub data_dir: PathBuf,
}

/// Inputs shared by every candidate generator.
pub struct SearchContext<'a> {
    pub settings: &'a Settings,
    /// Parent of the working directory: where a side-by-side install lives.
    pub run_dir: PathBuf,
    /// Resolved library, once known. Data-directory generators use it.
    pub library: Option<PathBuf>,
}

impl<'a> SearchContext<'a> {
    pub fn new(settings: &'a Settings, probe: &dyn FsProbe) -> Self {
        let run_dir = probe
            .current_dir()
            .map(|cwd| cwd.parent().map(Path::to_path_buf).unwrap_or(cwd))
            .unwrap_or_else(|| PathBuf::from("."));
        SearchContext {
            settings,
            run_dir,
            library: None,
        }
    }
}

type CandidateFn = fn(&SearchContext<'_>, &dyn FsProbe) -> Vec<PathBuf>;

/// Resolve both the library and the tessdata directory.
pub fn resolve(
    settings: &Settings,
    platform: &Platform,
    probe: &dyn FsProbe,
) -> Result<InstallPaths> {
    let mut ctx = SearchContext::new(settings, probe);
    let library = resolve_library(&ctx, platform, probe)?;
    ctx.library = Some(library.clone());
    let data_dir = resolve_data_dir(&ctx, platform, probe)?;
    Ok(InstallPaths { library, data_dir })
}

/// Resolve the shared library path.
///
/// An explicit `lib_path` must exist; it is never silently replaced by a
/// searched candidate.
pub fn resolve_library(
    ctx: &SearchContext<'_>,
    platform: &Platform,
    probe: &dyn FsProbe,
) -> Result<PathBuf> {
    if let Some(explicit) = &ctx.settings.lib_path {
        if probe.is_file(explicit) {
            return Ok(explicit.clone());
        }
        return Err(TessyError::library_not_found(format!(
            "lib_path '{}' does not exist",
            explicit.display()
        )));
    }

    let generators = library_generators(platform).ok_or_else(|| {
        TessyError::unsupported_platform(format!(
            "no Tesseract library search strategy for '{platform}'; set lib_path explicitly"
        ))
    })?;

    debug!(%platform, "searching for Tesseract library");
    let found = first_match(generators, ctx, probe, |p, path| p.is_file(path));
    found.ok_or_else(|| {
        TessyError::library_not_found("Cannot locate Tesseract-OCR library; set lib_path")
    })
}

/// Resolve the tessdata directory.
///
/// An explicit `data_path` is used when it is a directory; otherwise the
/// search runs as if none had been given.
pub fn resolve_data_dir(
    ctx: &SearchContext<'_>,
    platform: &Platform,
    probe: &dyn FsProbe,
) -> Result<PathBuf> {
    if let Some(explicit) = &ctx.settings.data_path {
        if probe.is_dir(explicit) {
            return Ok(explicit.clone());
        }
        debug!(path = %explicit.display(), "data_path is not a directory, searching instead");
    }

    let generators = data_dir_generators(platform);
    let found = first_match(generators, ctx, probe, |p, path| p.is_dir(path));
    found.ok_or_else(|| {
        TessyError::data_dir_not_found(format!(
            "no \"{TESSDATA_DIRNAME}\" directory found; set data_path or {TESSDATA_PREFIX_VAR}"
        ))
    })
}

/// Every library candidate for `platform`, in probe order.
pub fn library_candidates(
    settings: &Settings,
    platform: &Platform,
    probe: &dyn FsProbe,
) -> Result<Vec<PathBuf>> {
    let ctx = SearchContext::new(settings, probe);
    let generators = library_generators(platform)
        .ok_or_else(|| TessyError::unsupported_platform(platform.to_string()))?;
    Ok(generators.iter().flat_map(|g| g(&ctx, probe)).collect())
}

/// Every tessdata candidate for `platform`, given the resolved library.
pub fn data_dir_candidates(
    settings: &Settings,
    platform: &Platform,
    probe: &dyn FsProbe,
    library: &Path,
) -> Vec<PathBuf> {
    let mut ctx = SearchContext::new(settings, probe);
    ctx.library = Some(library.to_path_buf());
    data_dir_generators(platform)
        .iter()
        .flat_map(|g| g(&ctx, probe))
        .collect()
}

fn first_match(
    generators: &[CandidateFn],
    ctx: &SearchContext<'_>,
    probe: &dyn FsProbe,
    exists: fn(&dyn FsProbe, &Path) -> bool,
) -> Option<PathBuf> {
    for generate in generators {
        for candidate in generate(ctx, probe) {
            if exists(probe, &candidate) {
                debug!(path = %candidate.display(), "probe SUCCESS");
                return Some(candidate);
            }
            debug!(path = %candidate.display(), "probe FAILED");
        }
    }
    None
}

const WINDOWS_LIBRARY_SEARCH: &[CandidateFn] = &[
    windows_configured_dir,
    windows_run_dirs,
    windows_program_files,
];
const LINUX_LIBRARY_SEARCH: &[CandidateFn] =
    &[linux_path_adjacent, linux_configured_dir, linux_system_dirs];
const MACOS_LIBRARY_SEARCH: &[CandidateFn] =
    &[macos_path_adjacent, macos_configured_dir, macos_prefixes];

const COMMON_TESSDATA_SEARCH: &[CandidateFn] = &[
    tessdata_prefix,
    run_dir_tessdata,
    library_tessdata,
    configured_tessdata,
];
const LINUX_TESSDATA_SEARCH: &[CandidateFn] = &[
    tessdata_prefix,
    run_dir_tessdata,
    library_tessdata,
    configured_tessdata,
    linux_tessdata,
];
const MACOS_TESSDATA_SEARCH: &[CandidateFn] = &[
    tessdata_prefix,
    run_dir_tessdata,
    library_tessdata,
    configured_tessdata,
    macos_tessdata,
];

fn library_generators(platform: &Platform) -> Option<&'static [CandidateFn]> {
    match platform {
        Platform::Windows => Some(WINDOWS_LIBRARY_SEARCH),
        Platform::Linux => Some(LINUX_LIBRARY_SEARCH),
        Platform::MacOs => Some(MACOS_LIBRARY_SEARCH),
        Platform::Other(_) => None,
    }
}

fn data_dir_generators(platform: &Platform) -> &'static [CandidateFn] {
    match platform {
        Platform::Linux => LINUX_TESSDATA_SEARCH,
        Platform::MacOs => MACOS_TESSDATA_SEARCH,
        Platform::Windows | Platform::Other(_) => COMMON_TESSDATA_SEARCH,
    }
}

fn join_all(dirs: &[PathBuf], names: &[&str]) -> Vec<PathBuf> {
    dirs.iter()
        .flat_map(|dir| names.iter().map(move |name| dir.join(name)))
        .collect()
}

/// Directories on `PATH` that contain a `tesseract` executable.
fn executable_dirs(probe: &dyn FsProbe) -> Vec<PathBuf> {
    probe
        .env_var("PATH")
        .map(|path| {
            std::env::split_paths(&path)
                .filter(|dir| probe.is_file(&dir.join(TESSERACT_EXECUTABLE)))
                .collect()
        })
        .unwrap_or_default()
}

// --- Windows ---

fn windows_library_file(settings: &Settings) -> String {
    match &settings.api_version {
        Some(version) => format!("libtesseract{version}.dll"),
        None => format!("{WINDOWS_DEFAULT_LIBRARY}.dll"),
    }
}

fn windows_configured_dir(ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    let name = windows_library_file(ctx.settings);
    ctx.settings
        .tesseract_dir
        .iter()
        .map(|dir| dir.join(&name))
        .collect()
}

fn windows_run_dirs(ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    let name = windows_library_file(ctx.settings);
    vec![
        ctx.run_dir.join(&name),
        ctx.run_dir.join(TESSERACT_DIRNAME).join(&name),
    ]
}

fn windows_program_files(ctx: &SearchContext<'_>, probe: &dyn FsProbe) -> Vec<PathBuf> {
    let name = windows_library_file(ctx.settings);
    WINDOWS_PROGRAM_FILES_VARS
        .iter()
        .filter_map(|var| probe.env_var(var))
        .map(|dir| PathBuf::from(dir).join(TESSERACT_DIRNAME).join(&name))
        .collect()
}

// --- Linux ---

fn linux_multiarch() -> String {
    format!("{}-linux-gnu", std::env::consts::ARCH)
}

fn linux_path_adjacent(_ctx: &SearchContext<'_>, probe: &dyn FsProbe) -> Vec<PathBuf> {
    let multiarch = linux_multiarch();
    let lib_dirs: Vec<PathBuf> = executable_dirs(probe)
        .iter()
        .filter_map(|bin| bin.parent())
        .flat_map(|prefix| {
            [
                prefix.join("lib"),
                prefix.join("lib64"),
                prefix.join("lib").join(&multiarch),
            ]
        })
        .collect();
    join_all(&lib_dirs, LINUX_LIBRARY_NAMES)
}

fn linux_configured_dir(ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = ctx.settings.tesseract_dir.iter().cloned().collect();
    join_all(&dirs, LINUX_LIBRARY_NAMES)
}

fn linux_system_dirs(_ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    let dirs = [
        PathBuf::from("/usr/lib").join(linux_multiarch()),
        PathBuf::from("/usr/lib64"),
        PathBuf::from("/usr/lib"),
        PathBuf::from("/usr/local/lib"),
    ];
    join_all(&dirs, LINUX_LIBRARY_NAMES)
}

fn linux_tessdata(_ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    LINUX_TESSDATA_DIRS.iter().map(PathBuf::from).collect()
}

// --- macOS ---

fn macos_path_adjacent(_ctx: &SearchContext<'_>, probe: &dyn FsProbe) -> Vec<PathBuf> {
    let lib_dirs: Vec<PathBuf> = executable_dirs(probe)
        .iter()
        .filter_map(|bin| bin.parent())
        .map(|prefix| prefix.join("lib"))
        .collect();
    join_all(&lib_dirs, MACOS_LIBRARY_NAMES)
}

fn macos_configured_dir(ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = ctx.settings.tesseract_dir.iter().cloned().collect();
    join_all(&dirs, MACOS_LIBRARY_NAMES)
}

fn macos_prefixes(_ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    let dirs: Vec<PathBuf> = MACOS_PREFIXES
        .iter()
        .map(|prefix| Path::new(prefix).join("lib"))
        .collect();
    join_all(&dirs, MACOS_LIBRARY_NAMES)
}

fn macos_tessdata(_ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    MACOS_PREFIXES
        .iter()
        .map(|prefix| Path::new(prefix).join("share").join(TESSDATA_DIRNAME))
        .collect()
}

// --- tessdata, all platforms ---

fn tessdata_prefix(_ctx: &SearchContext<'_>, probe: &dyn FsProbe) -> Vec<PathBuf> {
    match probe.env_var(TESSDATA_PREFIX_VAR) {
        Some(prefix) if !prefix.is_empty() => {
            let prefix = PathBuf::from(prefix);
            vec![prefix.join(TESSDATA_DIRNAME), prefix]
        }
        _ => Vec::new(),
    }
}

fn run_dir_tessdata(ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    vec![
        ctx.run_dir.join(TESSDATA_DIRNAME),
        ctx.run_dir.join(TESSERACT_DIRNAME).join(TESSDATA_DIRNAME),
    ]
}

fn library_tessdata(ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    let Some(lib_dir) = ctx.library.as_deref().and_then(Path::parent) else {
        return Vec::new();
    };
    let mut dirs = vec![lib_dir.join(TESSDATA_DIRNAME)];
    if let Some(prefix) = lib_dir.parent() {
        dirs.push(prefix.join("share").join(TESSDATA_DIRNAME));
    }
    dirs
}

fn configured_tessdata(ctx: &SearchContext<'_>, _probe: &dyn FsProbe) -> Vec<PathBuf> {
    ctx.settings
        .tesseract_dir
        .iter()
        .map(|dir| dir.join(TESSDATA_DIRNAME))
        .collect()
}
