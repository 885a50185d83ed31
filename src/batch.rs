// 複数画像の一括読み取り: エンジンはスレッド間で共有しない

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::modes::OutputMode;
use crate::config::settings::Settings;
use crate::engine::Tessy;
use crate::error::{Result, TessyError};

/// Text read from one image file.
#[derive(Debug, Clone, Serialize)]
pub struct PageText {
    pub path: PathBuf,
    pub text: String,
    /// Mean word confidence 0-100, if the engine reported one.
    pub confidence: Option<u8>,
}

/// Decode one image file and read it with `engine`.
pub fn read_file(engine: &mut Tessy, path: &Path) -> Result<PageText> {
    let image = image::open(path)?;
    let resolution = engine.settings().resolution;
    let text = engine
        .read_image(&image, resolution, OutputMode::Text, None)?
        .into_text()?;
    let confidence = engine.mean_text_conf()?;
    Ok(PageText {
        path: path.to_path_buf(),
        text,
        confidence,
    })
}

/// Read every file in `paths`, preserving order.
///
/// Files are spread over a rayon pool of `workers` threads (0 = rayon's
/// default). Engines are built lazily by `map_init`: at least one per worker
/// thread, and possibly one per job split, so more than `workers` engines may
/// be created. An engine never moves between threads. One failing file does
/// not stop the others.
///
/// If an engine cannot be built, every file it would have read fails with the
/// construction error (for example [`TessyError::LibraryNotFoundError`]).
pub fn read_files(paths: &[PathBuf], settings: &Settings, workers: usize) -> Vec<Result<PageText>> {
    let pool = match rayon::ThreadPoolBuilder::new().num_threads(workers).build() {
        Ok(pool) => pool,
        Err(e) => {
            let msg = format!("failed to build worker pool: {e}");
            return paths
                .iter()
                .map(|_| Err(TessyError::config(msg.clone())))
                .collect();
        }
    };

    pool.install(|| {
        paths
            .par_iter()
            .map_init(
                || Tessy::new(settings),
                |engine, path| match engine {
                    Ok(engine) => {
                        debug!(path = %path.display(), "reading image");
                        read_file(engine, path)
                    }
                    Err(e) => {
                        warn!(error = %e, "worker engine failed to start");
                        Err(e.duplicate())
                    }
                },
            )
            .collect()
    })
}
