//! `rect64(...)` / `crop64(...)` packed rectangle decoding.
//!
//! Picasa packs a crop rectangle into one 64-bit hex number: four 16-bit
//! fields (left, top, right, bottom), each a fraction of the image size
//! scaled to `0..=0xFFFF`. Multiplying by the image dimensions gives pixel
//! coordinates; this module stops at the relative values.

use super::{DecodeError, strip_prefix_wrapper};
use serde::Serialize;

const WRAPPER_PREFIXES: &[&str] = &["rect64", "crop64"];
const MAX_U16: f64 = 65535.0;

/// Crop rectangle in relative coordinates (nominally `0.0..=1.0`).
///
/// No ordering is enforced between the edges: inverted or empty rectangles
/// are kept exactly as encoded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropRect {
    /// The 16-digit hex string this was decoded from.
    #[serde(rename = "hash64")]
    pub source: String,
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

/// Strip a `rect64(...)` or `crop64(...)` wrapper, returning the hex string.
///
/// Both wrappers mean the same thing; Picasa writes `rect64` for the `crop`
/// key and `crop64` inside filter stacks.
pub fn extract_hex64(text: &str) -> Result<&str, DecodeError> {
    for prefix in WRAPPER_PREFIXES {
        if text.starts_with(&format!("{prefix}(")) {
            return strip_prefix_wrapper(text, prefix);
        }
    }
    Err(DecodeError::Format(text.to_string()))
}

/// Decode a 16-digit hex string into a [`CropRect`].
///
/// Digits `[0:4]`, `[4:8]`, `[8:12]`, `[12:16]` become left, top, right and
/// bottom, each divided by `0xFFFF`. There is no separate length check: a
/// short or non-hex string fails when its group is parsed.
pub fn decode_rect(hex: &str) -> Result<CropRect, DecodeError> {
    let group = |field: &'static str, start: usize| -> Result<f64, DecodeError> {
        let digits = hex.get(start..start + 4).ok_or_else(|| DecodeError::Numeric {
            field,
            text: hex.to_string(),
        })?;
        let value = u16::from_str_radix(digits, 16).map_err(|_| DecodeError::Numeric {
            field,
            text: digits.to_string(),
        })?;
        Ok(f64::from(value) / MAX_U16)
    };

    Ok(CropRect {
        source: hex.to_string(),
        left: group("rect left", 0)?,
        top: group("rect top", 4)?,
        right: group("rect right", 8)?,
        bottom: group("rect bottom", 12)?,
    })
}
