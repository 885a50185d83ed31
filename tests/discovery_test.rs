// Library and tessdata discovery against a fake filesystem

mod common;

use std::path::{Path, PathBuf};

use common::FakeProbe;
use tessy::discovery::{self, Platform, SearchContext, data_dir_candidates, library_candidates};
use tessy::{Settings, Tessy, TessyError};

fn multiarch_lib(name: &str) -> PathBuf {
    PathBuf::from("/usr/lib")
        .join(format!("{}-linux-gnu", std::env::consts::ARCH))
        .join(name)
}

// ============================================================
// 1. Run directory
// ============================================================

#[test]
fn test_run_dir_is_parent_of_working_dir() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app");
    let ctx = SearchContext::new(&settings, &probe);
    assert_eq!(ctx.run_dir, PathBuf::from("/work"));
}

#[test]
fn test_run_dir_at_filesystem_root() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/");
    let ctx = SearchContext::new(&settings, &probe);
    assert_eq!(ctx.run_dir, PathBuf::from("/"));
}

// ============================================================
// 2. Explicit library path
// ============================================================

#[test]
fn test_explicit_lib_path_used_when_present() {
    let settings = Settings {
        lib_path: Some(PathBuf::from("/custom/libtesseract.so.5")),
        ..Settings::default()
    };
    let probe = FakeProbe::new("/work/app")
        .file("/custom/libtesseract.so.5")
        .file("/usr/lib/libtesseract.so.5");
    let ctx = SearchContext::new(&settings, &probe);

    let library = discovery::resolve_library(&ctx, &Platform::Linux, &probe)
        .expect("explicit library should resolve");
    assert_eq!(library, PathBuf::from("/custom/libtesseract.so.5"));
}

#[test]
fn test_explicit_lib_path_missing_is_not_replaced() {
    let settings = Settings {
        lib_path: Some(PathBuf::from("/custom/libtesseract.so.5")),
        ..Settings::default()
    };
    // A system library exists, but the explicit path must win or fail.
    let probe = FakeProbe::new("/work/app").file("/usr/lib/libtesseract.so.5");
    let ctx = SearchContext::new(&settings, &probe);

    let result = discovery::resolve_library(&ctx, &Platform::Linux, &probe);
    assert!(
        matches!(result, Err(TessyError::LibraryNotFoundError(_))),
        "got {result:?}"
    );
}

#[test]
fn test_explicit_lib_path_on_unsupported_platform() {
    let settings = Settings {
        lib_path: Some(PathBuf::from("/opt/tess/libtesseract.so")),
        ..Settings::default()
    };
    let probe = FakeProbe::new("/work/app").file("/opt/tess/libtesseract.so");
    let ctx = SearchContext::new(&settings, &probe);

    let platform = Platform::Other("freebsd".into());
    let library = discovery::resolve_library(&ctx, &platform, &probe)
        .expect("explicit path bypasses the platform search");
    assert_eq!(library, PathBuf::from("/opt/tess/libtesseract.so"));
}

#[test]
fn test_unsupported_platform_without_lib_path() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app");
    let ctx = SearchContext::new(&settings, &probe);

    let result = discovery::resolve_library(&ctx, &Platform::Other("freebsd".into()), &probe);
    assert!(
        matches!(result, Err(TessyError::UnsupportedPlatformError(_))),
        "got {result:?}"
    );
}

// ============================================================
// 3. Windows search
// ============================================================

#[test]
fn test_windows_candidate_order() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app")
        .env("PROGRAMFILES", "/pf")
        .env("PROGRAMFILES(X86)", "/pf86");

    let candidates = library_candidates(&settings, &Platform::Windows, &probe)
        .expect("windows has a search strategy");
    assert_eq!(
        candidates,
        vec![
            PathBuf::from("/work/libtesseract-5.dll"),
            PathBuf::from("/work/Tesseract-OCR/libtesseract-5.dll"),
            PathBuf::from("/pf/Tesseract-OCR/libtesseract-5.dll"),
            PathBuf::from("/pf86/Tesseract-OCR/libtesseract-5.dll"),
        ]
    );
}

#[test]
fn test_windows_configured_dir_first() {
    let settings = Settings {
        tesseract_dir: Some(PathBuf::from("/custom")),
        ..Settings::default()
    };
    let probe = FakeProbe::new("/work/app");

    let candidates = library_candidates(&settings, &Platform::Windows, &probe).unwrap();
    assert_eq!(candidates[0], PathBuf::from("/custom/libtesseract-5.dll"));
}

#[test]
fn test_windows_api_version_changes_file_name() {
    let settings = Settings {
        api_version: Some("-4".to_string()),
        ..Settings::default()
    };
    let probe = FakeProbe::new("/work/app");

    let candidates = library_candidates(&settings, &Platform::Windows, &probe).unwrap();
    assert!(!candidates.is_empty());
    for candidate in &candidates {
        assert_eq!(
            candidate.file_name().and_then(|n| n.to_str()),
            Some("libtesseract-4.dll")
        );
    }
}

#[test]
fn test_windows_missing_program_files_vars_skipped() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app");

    let candidates = library_candidates(&settings, &Platform::Windows, &probe).unwrap();
    assert_eq!(
        candidates.len(),
        2,
        "only the run directory candidates remain"
    );
}

#[test]
fn test_windows_first_existing_candidate_wins() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app")
        .env("PROGRAMFILES", "/pf")
        .env("PROGRAMFILES(X86)", "/pf86")
        .file("/pf/Tesseract-OCR/libtesseract-5.dll")
        .file("/pf86/Tesseract-OCR/libtesseract-5.dll");
    let ctx = SearchContext::new(&settings, &probe);

    let library = discovery::resolve_library(&ctx, &Platform::Windows, &probe).unwrap();
    assert_eq!(
        library,
        PathBuf::from("/pf/Tesseract-OCR/libtesseract-5.dll")
    );
}

#[test]
fn test_windows_side_by_side_install_beats_program_files() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app")
        .env("PROGRAMFILES", "/pf")
        .file("/pf/Tesseract-OCR/libtesseract-5.dll")
        .file("/work/Tesseract-OCR/libtesseract-5.dll");
    let ctx = SearchContext::new(&settings, &probe);

    let library = discovery::resolve_library(&ctx, &Platform::Windows, &probe).unwrap();
    assert_eq!(
        library,
        PathBuf::from("/work/Tesseract-OCR/libtesseract-5.dll")
    );
}

// ============================================================
// 4. Linux search
// ============================================================

#[test]
fn test_linux_path_adjacent_candidates_first() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app")
        .path_var(&["/opt/tess/bin", "/usr/bin"])
        .file("/opt/tess/bin/tesseract");

    let candidates = library_candidates(&settings, &Platform::Linux, &probe).unwrap();
    assert_eq!(
        candidates[0],
        PathBuf::from("/opt/tess/lib/libtesseract.so.5")
    );
    let lib64 = PathBuf::from("/opt/tess/lib64/libtesseract.so.5");
    assert!(candidates.contains(&lib64));
    // /usr/bin has no tesseract executable, so /usr/lib only comes from the system list.
    let first_system = candidates
        .iter()
        .position(|c| c == &multiarch_lib("libtesseract.so.5"))
        .expect("system candidates present");
    let last_adjacent = candidates
        .iter()
        .rposition(|c| c.starts_with("/opt/tess"))
        .expect("adjacent candidates present");
    assert!(last_adjacent < first_system);
}

#[test]
fn test_linux_path_adjacent_library_wins() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app")
        .path_var(&["/opt/tess/bin"])
        .file("/opt/tess/bin/tesseract")
        .file("/opt/tess/lib/libtesseract.so.5")
        .file("/usr/lib/libtesseract.so.5");
    let ctx = SearchContext::new(&settings, &probe);

    let library = discovery::resolve_library(&ctx, &Platform::Linux, &probe).unwrap();
    assert_eq!(library, PathBuf::from("/opt/tess/lib/libtesseract.so.5"));
}

#[test]
fn test_linux_system_dir_without_executable() {
    let settings = Settings::default();
    let lib = multiarch_lib("libtesseract.so.4");
    let probe = FakeProbe::new("/work/app").file(lib.clone());
    let ctx = SearchContext::new(&settings, &probe);

    let library = discovery::resolve_library(&ctx, &Platform::Linux, &probe).unwrap();
    assert_eq!(library, lib);
}

#[test]
fn test_linux_prefers_newer_soname() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app")
        .file("/usr/lib/libtesseract.so.4")
        .file("/usr/lib/libtesseract.so.5");
    let ctx = SearchContext::new(&settings, &probe);

    let library = discovery::resolve_library(&ctx, &Platform::Linux, &probe).unwrap();
    assert_eq!(library, PathBuf::from("/usr/lib/libtesseract.so.5"));
}

#[test]
fn test_linux_nothing_found() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app");
    let ctx = SearchContext::new(&settings, &probe);

    let result = discovery::resolve_library(&ctx, &Platform::Linux, &probe);
    assert!(
        matches!(result, Err(TessyError::LibraryNotFoundError(_))),
        "got {result:?}"
    );
}

// ============================================================
// 5. macOS search
// ============================================================

#[test]
fn test_macos_homebrew_library() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/Users/me/proj").file("/opt/homebrew/lib/libtesseract.5.dylib");
    let ctx = SearchContext::new(&settings, &probe);

    let library = discovery::resolve_library(&ctx, &Platform::MacOs, &probe).unwrap();
    assert_eq!(
        library,
        PathBuf::from("/opt/homebrew/lib/libtesseract.5.dylib")
    );
}

#[test]
fn test_macos_homebrew_tessdata() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/Users/me/proj")
        .file("/opt/homebrew/lib/libtesseract.5.dylib")
        .dir("/opt/homebrew/share/tessdata");

    let paths = discovery::resolve(&settings, &Platform::MacOs, &probe).unwrap();
    assert_eq!(
        paths.data_dir,
        PathBuf::from("/opt/homebrew/share/tessdata")
    );
}

// ============================================================
// 6. tessdata search
// ============================================================

#[test]
fn test_data_dir_candidate_order() {
    let settings = Settings {
        tesseract_dir: Some(PathBuf::from("/custom")),
        ..Settings::default()
    };
    let probe = FakeProbe::new("/work/app").env("TESSDATA_PREFIX", "/prefix");
    let library = Path::new("/opt/tess/lib/libtesseract.so.5");

    let candidates = data_dir_candidates(&settings, &Platform::Windows, &probe, library);
    assert_eq!(
        candidates,
        vec![
            PathBuf::from("/prefix/tessdata"),
            PathBuf::from("/prefix"),
            PathBuf::from("/work/tessdata"),
            PathBuf::from("/work/Tesseract-OCR/tessdata"),
            PathBuf::from("/opt/tess/lib/tessdata"),
            PathBuf::from("/opt/tess/share/tessdata"),
            PathBuf::from("/custom/tessdata"),
        ]
    );
}

#[test]
fn test_data_dir_linux_conventional_dirs_last() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app");
    let library = Path::new("/usr/lib/libtesseract.so.5");

    let candidates = data_dir_candidates(&settings, &Platform::Linux, &probe, library);
    assert_eq!(
        candidates.last(),
        Some(&PathBuf::from("/usr/local/share/tessdata"))
    );
    let packaged = PathBuf::from("/usr/share/tesseract-ocr/5/tessdata");
    assert!(candidates.contains(&packaged));
}

#[test]
fn test_tessdata_prefix_takes_precedence() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app")
        .env("TESSDATA_PREFIX", "/prefix")
        .file("/usr/lib/libtesseract.so.5")
        .dir("/prefix")
        .dir("/usr/share/tessdata");

    let paths = discovery::resolve(&settings, &Platform::Linux, &probe).unwrap();
    assert_eq!(paths.data_dir, PathBuf::from("/prefix"));
}

#[test]
fn test_empty_tessdata_prefix_ignored() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app").env("TESSDATA_PREFIX", "");
    let library = Path::new("/usr/lib/libtesseract.so.5");

    let candidates = data_dir_candidates(&settings, &Platform::Linux, &probe, library);
    assert_eq!(candidates[0], PathBuf::from("/work/tessdata"));
}

#[test]
fn test_explicit_data_path_used_when_present() {
    let settings = Settings {
        data_path: Some(PathBuf::from("/data/tessdata")),
        ..Settings::default()
    };
    let probe = FakeProbe::new("/work/app")
        .file("/usr/lib/libtesseract.so.5")
        .dir("/data/tessdata")
        .dir("/usr/share/tessdata");

    let paths = discovery::resolve(&settings, &Platform::Linux, &probe).unwrap();
    assert_eq!(paths.library, PathBuf::from("/usr/lib/libtesseract.so.5"));
    assert_eq!(paths.data_dir, PathBuf::from("/data/tessdata"));
}

#[test]
fn test_explicit_data_path_missing_falls_back_to_search() {
    let settings = Settings {
        data_path: Some(PathBuf::from("/data/tessdata")),
        ..Settings::default()
    };
    let probe = FakeProbe::new("/work/app")
        .file("/usr/lib/libtesseract.so.5")
        .dir("/usr/share/tessdata");

    let paths = discovery::resolve(&settings, &Platform::Linux, &probe).unwrap();
    assert_eq!(paths.data_dir, PathBuf::from("/usr/share/tessdata"));
}

#[test]
fn test_data_dir_next_to_library() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app")
        .env("PROGRAMFILES", "/pf")
        .file("/pf/Tesseract-OCR/libtesseract-5.dll")
        .dir("/pf/Tesseract-OCR/tessdata");

    let paths = discovery::resolve(&settings, &Platform::Windows, &probe).unwrap();
    assert_eq!(paths.data_dir, PathBuf::from("/pf/Tesseract-OCR/tessdata"));
}

#[test]
fn test_no_data_dir_found() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app").file("/usr/lib/libtesseract.so.5");

    let result = discovery::resolve(&settings, &Platform::Linux, &probe);
    assert!(
        matches!(result, Err(TessyError::DataDirectoryNotFoundError(_))),
        "got {result:?}"
    );
}

// ============================================================
// 7. Construction fails before touching the library
// ============================================================

#[test]
fn test_engine_construction_without_tessdata() {
    let settings = Settings {
        lib_path: Some(PathBuf::from("/fake/libtesseract.so.5")),
        ..Settings::default()
    };
    let probe = FakeProbe::new("/work/app").file("/fake/libtesseract.so.5");

    let result = Tessy::with_probe(&settings, &Platform::Linux, &probe);
    assert!(
        matches!(result, Err(TessyError::DataDirectoryNotFoundError(_))),
        "got {result:?}"
    );
}

#[test]
fn test_engine_construction_on_unsupported_platform() {
    let settings = Settings::default();
    let probe = FakeProbe::new("/work/app");

    let result = Tessy::with_probe(&settings, &Platform::Other("haiku".into()), &probe);
    assert!(
        matches!(result, Err(TessyError::UnsupportedPlatformError(_))),
        "got {result:?}"
    );
}

#[test]
fn test_engine_construction_with_invalid_settings() {
    let settings = Settings {
        resolution: 0,
        ..Settings::default()
    };
    let probe = FakeProbe::new("/work/app");

    let result = Tessy::with_probe(&settings, &Platform::Linux, &probe);
    assert!(matches!(result, Err(TessyError::ConfigError(_))));
}
