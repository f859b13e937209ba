//! Per-file and per-folder settings decoded from a `.picasa.ini` document.
//!
//! ## Document layout
//!
//! ```text
//! [Picasa]                      ← optional album section
//! name=Vacation
//! date=1600000000.000000
//! category=Folders on Disk      ← ignored
//! [IMG_0001.JPG]                ← one section per media file
//! star=yes
//! rotate=rotate(1)
//! crop=rect64(1b502e26c807e353)
//! filters=tilt=1,0.183642,0.000000;fill=1,0.300000;
//! ```
//!
//! ## Failure isolation
//!
//! A file section that fails to decode (bad wrapper, wrong filter arity,
//! unparseable number) is recorded as a [`FileFailure`] and left out of
//! [`FolderSettings::files`]. Its siblings still decode, so one corrupt entry
//! never costs the whole album. Only an unreadable document, a syntax error,
//! or a malformed album date fails the whole folder ([`LoadError`]).

use crate::codec::{
    CropRect, DecodeError, RotationMode, decode_rect, extract_hex64, parse_float, parse_rotation,
};
use crate::diagnostics::{Diagnostic, Warning};
use crate::filters::{FilterSettings, parse_filter_stack};
use crate::ini::{IniDocument, IniError, Section};
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the album metadata section.
pub const ALBUM_SECTION: &str = "Picasa";

const STAR_KEY: &str = "star";
const CROP_KEY: &str = "crop";
const ROTATE_KEY: &str = "rotate";
const FILTERS_KEY: &str = "filters";

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("INI syntax error: {0}")]
    Ini(#[from] IniError),
    #[error("Album metadata error: {0}")]
    Decode(#[from] DecodeError),
}

/// Edits Picasa recorded for one media file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FileSettings {
    /// Section name: the file name, no directory.
    pub filename: String,
    /// The settings file this entry came from. Kept for later metadata
    /// lookups next to the media file; never opened here.
    pub path: PathBuf,
    pub star: bool,
    pub rotation: RotationMode,
    pub crop: Option<CropRect>,
    pub filters: Vec<FilterSettings>,
}

impl FileSettings {
    /// Decode one file section.
    ///
    /// Any `star` key means starred, whatever its value. Keys this decoder
    /// doesn't know are ignored so newer Picasa keys don't break decoding.
    pub fn decode(
        filename: &str,
        path: &Path,
        section: &Section,
        warnings: &mut Vec<Warning>,
    ) -> Result<Self, DecodeError> {
        let star = section.contains_key(STAR_KEY);

        let crop = section
            .get(CROP_KEY)
            .map(|value| extract_hex64(value).and_then(decode_rect))
            .transpose()?;

        let rotation = match section.get(ROTATE_KEY) {
            Some(value) => parse_rotation(value, warnings)?,
            None => RotationMode::NoRotation,
        };

        let filters = match section.get(FILTERS_KEY) {
            Some(value) => parse_filter_stack(value, warnings)?,
            None => Vec::new(),
        };

        Ok(Self {
            filename: filename.to_string(),
            path: path.to_path_buf(),
            star,
            rotation,
            crop,
            filters,
        })
    }

    /// True when nothing beyond the defaults was recorded.
    pub fn is_unedited(&self) -> bool {
        !self.star
            && self.rotation == RotationMode::NoRotation
            && self.crop.is_none()
            && self.filters.is_empty()
    }
}

impl Serialize for FileSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("star", &self.star)?;
        if self.rotation != RotationMode::NoRotation {
            map.serialize_entry("rotate", &self.rotation)?;
        }
        if let Some(crop) = &self.crop {
            map.serialize_entry("crop", crop)?;
        }
        if !self.filters.is_empty() {
            map.serialize_entry("filters", &self.filters)?;
        }
        map.end()
    }
}

/// A file section that could not be decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct FileFailure {
    pub filename: String,
    pub error: DecodeError,
}

/// Album metadata plus every decoded file, in document order.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderSettings {
    /// Where the settings were read from.
    pub settings_path: PathBuf,
    pub name: String,
    /// The date exactly as written (a Unix timestamp with fraction).
    pub date_text: String,
    pub date: f64,
    pub files: Vec<FileSettings>,
}

impl FolderSettings {
    pub fn new(settings_path: impl Into<PathBuf>) -> Self {
        Self {
            settings_path: settings_path.into(),
            name: String::new(),
            date_text: "0.0".to_string(),
            date: 0.0,
            files: Vec::new(),
        }
    }

    /// Look up a file's settings by section name.
    pub fn file(&self, filename: &str) -> Option<&FileSettings> {
        self.files.iter().find(|f| f.filename == filename)
    }

    /// Set the album name and date, keeping the date text for export.
    pub fn set_album(&mut self, name: &str, date_text: &str) -> Result<(), DecodeError> {
        self.date = parse_float("album date", date_text)?;
        self.date_text = date_text.to_string();
        self.name = name.to_string();
        Ok(())
    }

    /// Decode a parsed document.
    ///
    /// The `[Picasa]` section is optional; without it the name stays empty
    /// and the date stays `0.0`. A present section missing `name` or `date`
    /// keeps the default for that key.
    pub fn from_document(
        settings_path: impl Into<PathBuf>,
        doc: &IniDocument,
    ) -> Result<FolderReport, LoadError> {
        let mut folder = FolderSettings::new(settings_path);

        if let Some(album) = doc.section(ALBUM_SECTION) {
            let name = album.get("name").unwrap_or("");
            let date_text = album.get("date").unwrap_or("0.0");
            folder.set_album(name, date_text)?;
        }

        let mut diagnostics = Vec::new();
        let mut failures = Vec::new();

        for section in doc.sections().iter().filter(|s| s.name != ALBUM_SECTION) {
            let mut warnings = Vec::new();
            match FileSettings::decode(
                &section.name,
                &folder.settings_path,
                section,
                &mut warnings,
            ) {
                Ok(file) => folder.files.push(file),
                Err(error) => failures.push(FileFailure {
                    filename: section.name.clone(),
                    error,
                }),
            }
            diagnostics.extend(warnings.into_iter().map(|warning| Diagnostic {
                filename: section.name.clone(),
                warning,
            }));
        }

        Ok(FolderReport {
            settings: folder,
            diagnostics,
            failures,
        })
    }
}

impl Serialize for FolderSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        struct Metadata<'a>(&'a FolderSettings);
        impl Serialize for Metadata<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("name", &self.0.name)?;
                map.serialize_entry("date", &self.0.date_text)?;
                map.end()
            }
        }

        struct Files<'a>(&'a [FileSettings]);
        impl Serialize for Files<'_> {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let mut map = serializer.serialize_map(Some(self.0.len()))?;
                for file in self.0 {
                    map.serialize_entry(&file.filename, file)?;
                }
                map.end()
            }
        }

        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("_metadata", &Metadata(self))?;
        map.serialize_entry("files", &Files(&self.files))?;
        map.end()
    }
}

/// Result of decoding one folder: the settings plus everything that went
/// wrong along the way.
#[derive(Debug, Clone, PartialEq)]
pub struct FolderReport {
    pub settings: FolderSettings,
    pub diagnostics: Vec<Diagnostic>,
    pub failures: Vec<FileFailure>,
}

impl FolderReport {
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.failures.is_empty()
    }
}

/// Read and decode a settings file.
pub fn load(path: &Path) -> Result<FolderReport, LoadError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let doc = IniDocument::parse(&text)?;
    FolderSettings::from_document(path, &doc)
}
