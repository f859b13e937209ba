//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Output is **information-centric, not file-centric**. The primary display
//! for every folder is its album name and for every file its positional index
//! and name, with settings file paths shown as secondary context via indented
//! `Source:` lines. The output reads as an inventory of edits while still
//! letting users trace each entry back to the settings file it came from.
//!
//! # Entity Display Contract
//!
//! 1. **Header line**: album name (+ file count), or index + file name
//! 2. **Context lines**: indented `Source:`, `Rotate:`, `Crop:`, `Filters:`,
//!    `Warning:`, `Failed:`
//!
//! Albums without a name show their folder name in parens instead.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Summer Vacation (3 files)
//!     Source: 2020-vacation/.picasa.ini
//!     Date: 1596240000.000000
//!     001 IMG_0001.JPG ★
//!         Rotate: 90°
//!     002 IMG_0002.JPG
//!         Crop: 0.1067, 0.1803 → 0.7814, 0.8880
//!         Filters: crop64, tilt, finetune2
//!     003 IMG_0003.JPG
//!         Filters: redeye, fill, unsharp2
//!     Warning: IMG_0003.JPG: filter 'redeye' is not yet supported, kept as-is
//! ```
//!
//! ## Scan
//!
//! ```text
//! 001 (party) (2 files)
//!     Source: 2019/party/Picasa.ini
//!     Failed: DSC_1002.JPG: Filter 'tilt' expects exactly 3 parameters, found 2
//! 002 Summer Vacation (3 files)
//!     Source: 2020-vacation/.picasa.ini
//!
//! Scanned 2 settings files, 0 failed
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper. Format functions are pure: no I/O,
//! no side effects. Reports go to stdout; warnings, failures and load errors
//! go to stderr.

use crate::codec::RotationMode;
use crate::scan::{ScanEntry, ScanOutput};
use crate::settings::{FileSettings, FolderReport, FolderSettings, LoadError};
use std::path::Path;

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Path relative to `root` when it lies inside it, else as given.
fn display_path(path: &Path, root: Option<&Path>) -> String {
    let shown = root
        .and_then(|r| path.strip_prefix(r).ok())
        .unwrap_or(path);
    shown.display().to_string()
}

/// Album name, or the folder name in parens when Picasa recorded none.
///
/// ```text
/// Summer Vacation     // named
/// (party)             // unnamed: folder name IS the identity
/// ```
fn album_title(settings: &FolderSettings) -> String {
    if !settings.name.is_empty() {
        return settings.name.clone();
    }
    let folder = settings
        .settings_path
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    format!("({})", folder)
}

fn album_header(settings: &FolderSettings) -> String {
    format!("{} ({} files)", album_title(settings), settings.files.len())
}

fn rotation_label(rotation: RotationMode) -> String {
    format!("{}°", rotation.degrees())
}

/// File header plus its edit lines, at the given depth.
fn file_lines(index: usize, file: &FileSettings, depth: usize) -> Vec<String> {
    let marker = if file.star {
        " ★"
    } else if file.is_unedited() {
        " (no edits)"
    } else {
        ""
    };
    let mut lines = vec![format!(
        "{}{} {}{}",
        indent(depth),
        format_index(index),
        file.filename,
        marker
    )];
    let ctx = indent(depth + 1);

    if file.rotation != RotationMode::NoRotation {
        lines.push(format!("{}Rotate: {}", ctx, rotation_label(file.rotation)));
    }
    if let Some(crop) = &file.crop {
        lines.push(format!(
            "{}Crop: {:.4}, {:.4} → {:.4}, {:.4}",
            ctx, crop.left, crop.top, crop.right, crop.bottom
        ));
    }
    if !file.filters.is_empty() {
        let commands: Vec<&str> = file.filters.iter().map(|f| f.command()).collect();
        lines.push(format!("{}Filters: {}", ctx, commands.join(", ")));
    }
    lines
}

// ============================================================================
// Folder reports
// ============================================================================

/// Warning and failure lines for one folder, at the given depth.
pub fn format_problems(report: &FolderReport, depth: usize) -> Vec<String> {
    let ctx = indent(depth);
    let mut lines = Vec::new();
    for diagnostic in &report.diagnostics {
        lines.push(format!("{}Warning: {}", ctx, diagnostic));
    }
    for failure in &report.failures {
        lines.push(format!("{}Failed: {}: {}", ctx, failure.filename, failure.error));
    }
    lines
}

/// Full report for one folder: album header, every file with its edits, and
/// any problems.
pub fn format_folder_report(report: &FolderReport, root: Option<&Path>) -> Vec<String> {
    let settings = &report.settings;
    let mut lines = vec![
        album_header(settings),
        format!(
            "{}Source: {}",
            indent(1),
            display_path(&settings.settings_path, root)
        ),
    ];
    if settings.date != 0.0 {
        lines.push(format!("{}Date: {}", indent(1), settings.date_text));
    }
    for (i, file) in settings.files.iter().enumerate() {
        lines.extend(file_lines(i + 1, file, 1));
    }
    lines.extend(format_problems(report, 1));
    lines
}

pub fn print_folder_report(report: &FolderReport, root: Option<&Path>) {
    for line in format_folder_report(report, root) {
        println!("{}", line);
    }
}

/// Problems only, for commands whose stdout is JSON.
pub fn print_problems(path: &Path, report: &FolderReport) {
    if report.is_clean() {
        return;
    }
    eprintln!("{}", path.display());
    for line in format_problems(report, 1) {
        eprintln!("{}", line);
    }
}

/// A settings file that could not be decoded at all.
pub fn format_load_error(path: &Path, error: &LoadError) -> Vec<String> {
    vec![
        format!("Error: {}", path.display()),
        format!("{}{}", indent(1), error),
    ]
}

pub fn print_load_error(path: &Path, error: &LoadError) {
    for line in format_load_error(path, error) {
        eprintln!("{}", line);
    }
}

/// Totals for `check`: clean folders, folders with warnings or failed
/// files, and settings files that could not be decoded.
pub fn format_check_summary(entries: &[ScanEntry]) -> Vec<String> {
    let failed = entries.iter().filter(|e| e.result.is_err()).count();
    let clean = entries
        .iter()
        .filter(|e| e.result.as_ref().is_ok_and(FolderReport::is_clean))
        .count();
    let with_problems = entries.len() - failed - clean;
    vec![format!(
        "Checked {} settings files: {} clean, {} with problems, {} failed",
        entries.len(),
        clean,
        with_problems,
        failed
    )]
}

pub fn print_check_summary(entries: &[ScanEntry]) {
    for line in format_check_summary(entries) {
        println!("{}", line);
    }
}

// ============================================================================
// Scan
// ============================================================================

/// One header per folder with its source and problems, then a total.
pub fn format_scan_output(output: &ScanOutput) -> Vec<String> {
    let root = Some(output.root.as_path());
    let mut lines = Vec::new();

    for (i, entry) in output.entries.iter().enumerate() {
        let source = format!("{}Source: {}", indent(1), display_path(&entry.path, root));
        match &entry.result {
            Ok(report) => {
                lines.push(format!(
                    "{} {}",
                    format_index(i + 1),
                    album_header(&report.settings)
                ));
                lines.push(source);
                lines.extend(format_problems(report, 1));
            }
            Err(error) => {
                lines.push(format!("{} (unreadable)", format_index(i + 1)));
                lines.push(source);
                lines.push(format!("{}Error: {}", indent(1), error));
            }
        }
    }

    if !lines.is_empty() {
        lines.push(String::new());
    }
    lines.push(format!(
        "Scanned {} settings files, {} failed",
        output.entries.len(),
        output.failed_count()
    ));
    lines
}

pub fn print_scan_output(output: &ScanOutput) {
    for line in format_scan_output(output) {
        println!("{}", line);
    }
}

/// Lines for JSON files written by `scan --write`.
pub fn format_written(paths: &[std::path::PathBuf], root: &Path) -> Vec<String> {
    paths
        .iter()
        .map(|p| format!("Wrote {}", display_path(p, Some(root))))
        .collect()
}
