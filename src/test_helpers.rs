//! Shared test utilities for the picasa-export test suite.
//!
//! Provides fixture setup, lookup helpers, and bulk extractors over the
//! decoded model (`FolderSettings`, `FileSettings`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = setup_fixtures();
//! let report = load(&tmp.path().join("2020-vacation/.picasa.ini")).unwrap();
//!
//! let file = find_file(&report.settings, "IMG_0002.JPG");
//! assert_eq!(filter_commands(file), vec!["crop64", "tilt", "finetune2"]);
//! ```

use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::settings::{FileSettings, FolderSettings};

// =========================================================================
// Fixture setup
// =========================================================================

/// Copy `fixtures/albums/` to a temp directory and return it.
///
/// Tests get an isolated copy they can mutate without affecting other tests
/// or the source fixtures.
pub fn setup_fixtures() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/albums");
    copy_dir_recursive(&fixtures, tmp.path()).unwrap();
    tmp
}

fn copy_dir_recursive(src: &Path, dst: &Path) -> std::io::Result<()> {
    for entry in std::fs::read_dir(src)? {
        let entry = entry?;
        let src_path = entry.path();
        let dst_path = dst.join(entry.file_name());

        if src_path.is_dir() {
            std::fs::create_dir_all(&dst_path)?;
            copy_dir_recursive(&src_path, &dst_path)?;
        } else {
            std::fs::copy(&src_path, &dst_path)?;
        }
    }
    Ok(())
}

/// Write a settings file into `dir` (creating it) and return its path.
pub fn write_settings(dir: &Path, name: &str, contents: &str) -> PathBuf {
    std::fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

// =========================================================================
// Model lookups (panic with a clear message on miss)
// =========================================================================

/// Find a file's settings by name. Panics if not found.
pub fn find_file<'a>(folder: &'a FolderSettings, filename: &str) -> &'a FileSettings {
    folder.file(filename).unwrap_or_else(|| {
        let names = file_names(folder);
        panic!("file '{filename}' not found. Available: {names:?}")
    })
}

// =========================================================================
// Bulk extractors
// =========================================================================

/// All file names in section order.
pub fn file_names(folder: &FolderSettings) -> Vec<&str> {
    folder.files.iter().map(|f| f.filename.as_str()).collect()
}

/// Filter command names of one file, in stack order.
pub fn filter_commands(file: &FileSettings) -> Vec<&str> {
    file.filters.iter().map(|f| f.command()).collect()
}
