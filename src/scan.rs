//! Settings file discovery and batch decoding.
//!
//! Walks a photo library to find every Picasa settings file, then decodes
//! them in parallel. One settings file describes one folder.
//!
//! ## Directory Structure
//!
//! ```text
//! Pictures/                        # Scan root
//! ├── picasa-export.toml           # Exporter configuration (optional)
//! ├── 2020-vacation/
//! │   ├── .picasa.ini              # Picasa 3 settings file
//! │   ├── IMG_0001.JPG
//! │   └── IMG_0002.JPG
//! ├── 2019/
//! │   └── party/
//! │       ├── Picasa.ini           # Older Picasa spelling
//! │       └── DSC_1001.JPG
//! └── scans/                       # No settings file: skipped
//!     └── notes.txt
//! ```
//!
//! ## Rules
//!
//! - Only names listed in `input.file_names` are picked up, matched exactly.
//! - When a folder holds more than one of those names, the one listed first
//!   wins. Picasa 3 leaves a stale `Picasa.ini` behind after upgrading.
//! - Results come back in walk order (sorted by file name, depth first),
//!   whatever order the parallel decode finished in.
//! - A settings file that can't be read or parsed is reported in its
//!   [`ScanEntry`]; the rest of the batch still decodes.

use crate::config::{self, ExportConfig, InputConfig};
use crate::export;
use crate::settings::{self, FolderReport, LoadError};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// One discovered settings file and its decode result.
#[derive(Debug)]
pub struct ScanEntry {
    pub path: PathBuf,
    pub result: Result<FolderReport, LoadError>,
}

impl ScanEntry {
    /// Where `scan --write` puts this folder's JSON.
    pub fn json_path(&self, file_name: &str) -> PathBuf {
        self.path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(file_name)
    }
}

/// Everything a scan produced.
#[derive(Debug)]
pub struct ScanOutput {
    pub root: PathBuf,
    pub config: ExportConfig,
    pub entries: Vec<ScanEntry>,
}

impl ScanOutput {
    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| e.result.is_err()).count()
    }
}

/// Scan `root` using the `picasa-export.toml` found there (or defaults).
pub fn scan(root: &Path) -> Result<ScanOutput, ScanError> {
    let config = config::load_config(root)?;
    scan_with_config(root, config)
}

/// Scan `root` with an already resolved configuration.
pub fn scan_with_config(root: &Path, config: ExportConfig) -> Result<ScanOutput, ScanError> {
    let paths = find_settings_files(root, &config.input)?;
    let entries = decode_all(&paths);
    Ok(ScanOutput {
        root: root.to_path_buf(),
        config,
        entries,
    })
}

/// Find settings files under `root`, in walk order.
pub fn find_settings_files(root: &Path, input: &InputConfig) -> Result<Vec<PathBuf>, ScanError> {
    let mut walker = WalkDir::new(root).sort_by_file_name();
    if !input.recursive {
        walker = walker.max_depth(1);
    }

    let mut found = Vec::new();
    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if let Some(rank) = input.file_names.iter().position(|n| *n == name) {
            found.push((entry.into_path(), rank));
        }
    }

    // Lowest rank per folder
    let mut best: HashMap<PathBuf, usize> = HashMap::new();
    for (path, rank) in &found {
        let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
        best.entry(dir)
            .and_modify(|r| *r = (*r).min(*rank))
            .or_insert(*rank);
    }

    Ok(found
        .into_iter()
        .filter(|(path, rank)| {
            let dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
            best.get(&dir) == Some(rank)
        })
        .map(|(path, _)| path)
        .collect())
}

/// Decode every settings file in parallel. Output order matches `paths`.
pub fn decode_all(paths: &[PathBuf]) -> Vec<ScanEntry> {
    paths
        .par_iter()
        .map(|path| ScanEntry {
            path: path.clone(),
            result: settings::load(path),
        })
        .collect()
}

/// Write each decoded folder's JSON next to its settings file.
///
/// Entries that failed to decode are skipped. Returns the written paths.
pub fn write_exports(output: &ScanOutput) -> Result<Vec<PathBuf>, ScanError> {
    let mut written = Vec::new();
    for entry in &output.entries {
        let Ok(report) = &entry.result else {
            continue;
        };
        let json = export::render(&report.settings, &output.config.output.indent)?;
        let target = entry.json_path(&output.config.output.file_name);
        std::fs::write(&target, json)?;
        written.push(target);
    }
    Ok(written)
}
