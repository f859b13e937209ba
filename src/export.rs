//! JSON export and re-import.
//!
//! The export schema:
//!
//! ```json
//! {
//!     "_metadata": { "name": "Vacation", "date": "1600000000.0" },
//!     "files": {
//!         "IMG_0001.JPG": { "star": true, "rotate": 1 },
//!         "IMG_0002.JPG": {
//!             "star": false,
//!             "crop": { "hash64": "...", "left": 0.1, "top": 0.2, "right": 0.8, "bottom": 0.9 },
//!             "filters": [ { "command": "tilt", "params": "1,0.5,0", "amount": "0.5" } ]
//!         }
//!     }
//! }
//! ```
//!
//! Default-valued fields are left out (`rotate` when there is no rotation,
//! `crop` when absent, `filters` when empty). `star` is always present.
//! Files appear in settings-file section order.
//!
//! [`import`] goes the other way: it rebuilds the model from an export by
//! running the stored `hash64`, `command`/`params` and `rotate` values back
//! through the decoders. Rendering the imported model reproduces the export
//! byte for byte.

use crate::codec::{DecodeError, RotationMode, decode_rect};
use crate::diagnostics::{Diagnostic, Warning};
use crate::filters::parse_filter;
use crate::settings::{FileFailure, FileSettings, FolderReport, FolderSettings};
use serde::{Deserialize, Serialize};
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Album metadata error: {0}")]
    Decode(#[from] DecodeError),
}

/// Serialize to a JSON value tree, keeping key order.
pub fn to_tree(folder: &FolderSettings) -> Result<serde_json::Value, serde_json::Error> {
    serde_json::to_value(folder)
}

/// Render pretty JSON using `indent` for each nesting level.
pub fn render(folder: &FolderSettings, indent: &str) -> Result<String, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(indent.as_bytes());
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    folder.serialize(&mut serializer)?;
    String::from_utf8(out).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

#[derive(Deserialize)]
struct ExportedFolder {
    #[serde(rename = "_metadata")]
    metadata: ExportedMetadata,
    files: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
struct ExportedMetadata {
    name: String,
    date: String,
}

#[derive(Deserialize)]
struct ExportedFile {
    #[serde(default)]
    star: bool,
    rotate: Option<u8>,
    crop: Option<ExportedRect>,
    #[serde(default)]
    filters: Vec<ExportedFilter>,
}

#[derive(Deserialize)]
struct ExportedRect {
    hash64: String,
}

#[derive(Deserialize)]
struct ExportedFilter {
    command: String,
    params: String,
}

/// Rebuild a folder from its JSON export.
///
/// Per-file errors are isolated the same way as when reading the settings
/// file: an entry under `files` with the wrong JSON shape, or with values
/// that don't decode, becomes a [`FileFailure`]. Only malformed JSON, a
/// wrong top-level shape, or a bad album date is fatal.
pub fn import(json: &str, settings_path: impl Into<PathBuf>) -> Result<FolderReport, ImportError> {
    let exported: ExportedFolder = serde_json::from_str(json)?;

    let mut folder = FolderSettings::new(settings_path);
    folder.set_album(&exported.metadata.name, &exported.metadata.date)?;

    let mut diagnostics = Vec::new();
    let mut failures = Vec::new();

    for (filename, value) in exported.files {
        let file = match ExportedFile::deserialize(&value) {
            Ok(file) => file,
            Err(_) => {
                failures.push(FileFailure {
                    filename,
                    error: DecodeError::Format(value.to_string()),
                });
                continue;
            }
        };
        let mut warnings = Vec::new();
        match rebuild_file(&filename, &folder.settings_path, file, &mut warnings) {
            Ok(settings) => folder.files.push(settings),
            Err(error) => failures.push(FileFailure {
                filename: filename.clone(),
                error,
            }),
        }
        diagnostics.extend(warnings.into_iter().map(|warning| Diagnostic {
            filename: filename.clone(),
            warning,
        }));
    }

    Ok(FolderReport {
        settings: folder,
        diagnostics,
        failures,
    })
}

fn rebuild_file(
    filename: &str,
    path: &Path,
    file: ExportedFile,
    warnings: &mut Vec<Warning>,
) -> Result<FileSettings, DecodeError> {
    let rotation = match file.rotate {
        Some(code) => RotationMode::from_code(code).unwrap_or_else(|| {
            warnings.push(Warning::UnknownRotation {
                value: code.to_string(),
            });
            RotationMode::NoRotation
        }),
        None => RotationMode::NoRotation,
    };

    let crop = file
        .crop
        .map(|rect| decode_rect(&rect.hash64))
        .transpose()?;

    let filters = file
        .filters
        .iter()
        .map(|f| parse_filter(&format!("{}={}", f.command, f.params), warnings))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(FileSettings {
        filename: filename.to_string(),
        path: path.to_path_buf(),
        star: file.star,
        rotation,
        crop,
        filters,
    })
}
