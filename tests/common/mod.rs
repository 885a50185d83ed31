// Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use tessy::discovery::FsProbe;
use tessy::{Settings, Tessy};

// ============================================================
// Fake filesystem for discovery tests
// ============================================================

#[derive(Debug, Default)]
pub struct FakeProbe {
    files: HashSet<PathBuf>,
    dirs: HashSet<PathBuf>,
    env: HashMap<String, OsString>,
    cwd: Option<PathBuf>,
}

impl FakeProbe {
    pub fn new(cwd: &str) -> Self {
        FakeProbe {
            cwd: Some(PathBuf::from(cwd)),
            ..Default::default()
        }
    }

    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.files.insert(path.into());
        self
    }

    pub fn dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.dirs.insert(path.into());
        self
    }

    pub fn env(mut self, key: &str, value: impl Into<OsString>) -> Self {
        self.env.insert(key.to_string(), value.into());
        self
    }

    /// Set `PATH` from a list of directories, joined the host's way.
    pub fn path_var(self, dirs: &[&str]) -> Self {
        let joined = std::env::join_paths(dirs.iter().map(PathBuf::from)).expect("join PATH");
        self.env("PATH", joined)
    }
}

impl FsProbe for FakeProbe {
    fn is_file(&self, path: &Path) -> bool {
        self.files.contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.dirs.contains(path)
    }

    fn env_var(&self, key: &str) -> Option<OsString> {
        self.env.get(key).cloned()
    }

    fn current_dir(&self) -> Option<PathBuf> {
        self.cwd.clone()
    }
}

// ============================================================
// Engine availability
// ============================================================

/// Build an engine from default settings, or `None` when no usable
/// Tesseract install (library plus `eng` data) is present.
pub fn engine() -> Option<Tessy> {
    engine_with(&Settings::default())
}

pub fn engine_with(settings: &Settings) -> Option<Tessy> {
    match Tessy::new(settings) {
        Ok(engine) => Some(engine),
        Err(e) => {
            eprintln!("Skipping: Tesseract not available ({e})");
            None
        }
    }
}

// ============================================================
// Bitmap text rendering (5x7 glyphs)
// ============================================================

const GLYPH_W: usize = 5;
const GLYPH_H: usize = 7;

fn glyph(c: char) -> [&'static str; GLYPH_H] {
    match c {
        'T' => ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."],
        'W' => ["#...#", "#...#", "#...#", "#.#.#", "#.#.#", "##.##", "#...#"],
        'd' => ["....#", "....#", ".##.#", "#..##", "#...#", "#...#", ".####"],
        'e' => [".....", ".....", ".###.", "#...#", "#####", "#....", ".###."],
        'o' => [".....", ".....", ".###.", "#...#", "#...#", "#...#", ".###."],
        'r' => [".....", ".....", "#.##.", "##..#", "#....", "#....", "#...."],
        's' => [".....", ".....", ".####", "#....", ".###.", "....#", "####."],
        't' => ["..#..", "..#..", "#####", "..#..", "..#..", "..#..", "...##"],
        '0' => [".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."],
        '1' => ["..#..", ".##..", "..#..", "..#..", "..#..", "..#..", ".###."],
        '2' => [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"],
        '3' => ["#####", "...#.", "..#..", "...#.", "....#", "#...#", ".###."],
        '4' => ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."],
        '5' => ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."],
        '6' => ["..##.", ".#...", "#....", "####.", "#...#", "#...#", ".###."],
        '7' => ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."],
        '8' => [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."],
        '9' => [".###.", "#...#", "#...#", ".####", "....#", "...#.", ".##.."],
        '.' => [".....", ".....", ".....", ".....", ".....", ".##..", ".##.."],
        ' ' => [".....", ".....", ".....", ".....", ".....", ".....", "....."],
        other => panic!("no test glyph for {other:?}"),
    }
}

/// Greyscale rendering of `text`: black glyphs on white, one byte per pixel.
pub struct RenderedText {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl RenderedText {
    /// Same image with each grey value repeated `channels` times.
    pub fn expand_channels(&self, channels: usize) -> Vec<u8> {
        self.pixels
            .iter()
            .flat_map(|&v| std::iter::repeat_n(v, channels))
            .collect()
    }
}

/// Render `text` with every glyph cell scaled by `scale` and a white margin.
pub fn render_text(text: &str, scale: usize) -> RenderedText {
    let margin = 8 * scale;
    let advance = GLYPH_W + 1;
    let width = margin * 2 + text.chars().count() * advance * scale;
    let height = margin * 2 + GLYPH_H * scale;
    let mut pixels = vec![255u8; width * height];

    for (i, c) in text.chars().enumerate() {
        let rows = glyph(c);
        let origin_x = margin + i * advance * scale;
        for (gy, row) in rows.iter().enumerate() {
            for (gx, cell) in row.bytes().enumerate() {
                if cell != b'#' {
                    continue;
                }
                for dy in 0..scale {
                    let y = margin + gy * scale + dy;
                    let start = y * width + origin_x + gx * scale;
                    pixels[start..start + scale].fill(0);
                }
            }
        }
    }

    RenderedText {
        pixels,
        width: width as u32,
        height: height as u32,
    }
}
