//! Filter stack decoding.
//!
//! Picasa records non-destructive edits as a `filters` value holding a stack
//! of commands applied in order:
//!
//! ```text
//! filters=crop64=1,1b502e26c807e353;tilt=1,0.183642,0.000000;finetune2=1,0.000000,0.000000,0.190000,00000000,0.000000;
//! ```
//!
//! Each entry is `command=p0,p1,...`. Slot `p0` is an echo slot Picasa always
//! writes (usually `1`); the values that matter start at `p1`.
//!
//! ## Recognized commands
//!
//! | Command | Variant | Params | Fields |
//! |---|---|---|---|
//! | `crop64` | [`FilterSettings::Crop64`] | exactly 2 | `p1` = packed rectangle |
//! | `tilt` | [`FilterSettings::Tilt`] | exactly 3 | `p1` = amount, `-1.0..=1.0` |
//! | `fill` | [`FilterSettings::FillLight`] | exactly 2 | `p1` = fill, `0.0..=1.0` |
//! | `finetune2` | [`FilterSettings::FineTune`] | at least 6 | fill, highlight, shadow, autocolor, color temperature |
//! | `unsharp2` | [`FilterSettings::Sharpen`] | exactly 2 | `p1` = amount, `0.0..=3.0` |
//!
//! Ranges are documentation only. Out-of-range values are kept as written.
//! Anything else becomes [`FilterSettings::Generic`] plus a warning, so files
//! edited with newer Picasa versions still decode. Adding a command means one
//! variant and one row in [`FILTER_DECODERS`].
//!
//! A recognized command with the wrong number of parameters is an error, not
//! a generic fallback.

use crate::codec::{Arity, CropRect, DecodeError, decode_rect, parse_float};
use crate::diagnostics::Warning;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// A numeric parameter together with the exact text it was parsed from.
///
/// The export reproduces some fields from their text, so both are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericParam {
    pub text: String,
    pub value: f64,
}

/// The undecoded form every filter keeps: command name, parameter text, and
/// the comma-split parameter list.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFilter {
    pub command: String,
    /// Parameters exactly as written, still comma-joined.
    pub params: String,
    /// `params` split on `,`; index 0 is the echo slot.
    pub values: Vec<String>,
}

impl RawFilter {
    /// Split `command=p0,p1,...` on the first `=` and then on `,`.
    pub fn parse(entry: &str) -> Result<Self, DecodeError> {
        let (command, params) = entry
            .split_once('=')
            .ok_or_else(|| DecodeError::Format(entry.to_string()))?;
        Ok(Self {
            command: command.to_string(),
            params: params.to_string(),
            values: params.split(',').map(String::from).collect(),
        })
    }

    fn expect_arity(&self, arity: Arity) -> Result<(), DecodeError> {
        if arity.accepts(self.values.len()) {
            Ok(())
        } else {
            Err(DecodeError::Arity {
                command: self.command.clone(),
                expected: arity,
                found: self.values.len(),
            })
        }
    }

    // Callers check arity first, so `index` is always in range.
    fn text(&self, index: usize) -> String {
        self.values[index].clone()
    }

    fn numeric(&self, field: &'static str, index: usize) -> Result<NumericParam, DecodeError> {
        let text = self.text(index);
        let value = parse_float(field, &text)?;
        Ok(NumericParam { text, value })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CropFilter {
    pub raw: RawFilter,
    pub crop_rect: CropRect,
}

/// Straighten. Mapping `amount` to an angle is not known.
#[derive(Debug, Clone, PartialEq)]
pub struct TiltFilter {
    pub raw: RawFilter,
    pub amount: NumericParam,
}

/// The main tab's "Fill Light" slider.
#[derive(Debug, Clone, PartialEq)]
pub struct FillLightFilter {
    pub raw: RawFilter,
    pub fill: NumericParam,
}

/// `finetune2`, the combined tuning panel.
///
/// Highlight and shadow are documented up to 0.5, but the Picasa UI only ever
/// lets you reach 0.48. Neither bound is enforced.
#[derive(Debug, Clone, PartialEq)]
pub struct FineTuneFilter {
    pub raw: RawFilter,
    pub fill: NumericParam,
    pub highlight: NumericParam,
    pub shadow: NumericParam,
    /// Hex color, kept as text.
    pub autocolor: String,
    pub color_temp: NumericParam,
}

/// `unsharp2`. Picasa's default amount is 0.6.
#[derive(Debug, Clone, PartialEq)]
pub struct SharpenFilter {
    pub raw: RawFilter,
    pub amount: NumericParam,
}

/// One decoded entry of a filter stack.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterSettings {
    Generic(RawFilter),
    Crop64(CropFilter),
    Tilt(TiltFilter),
    FillLight(FillLightFilter),
    FineTune(FineTuneFilter),
    Sharpen(SharpenFilter),
}

impl FilterSettings {
    pub fn raw(&self) -> &RawFilter {
        match self {
            FilterSettings::Generic(raw) => raw,
            FilterSettings::Crop64(f) => &f.raw,
            FilterSettings::Tilt(f) => &f.raw,
            FilterSettings::FillLight(f) => &f.raw,
            FilterSettings::FineTune(f) => &f.raw,
            FilterSettings::Sharpen(f) => &f.raw,
        }
    }

    pub fn command(&self) -> &str {
        &self.raw().command
    }
}

pub type FilterDecoder = fn(RawFilter) -> Result<FilterSettings, DecodeError>;

/// Command name → decoder. Commands not listed here decode as generic.
pub const FILTER_DECODERS: &[(&str, FilterDecoder)] = &[
    ("finetune2", decode_finetune),
    ("crop64", decode_crop),
    ("tilt", decode_tilt),
    ("fill", decode_fill_light),
    ("unsharp2", decode_sharpen),
];

fn decode_crop(raw: RawFilter) -> Result<FilterSettings, DecodeError> {
    raw.expect_arity(Arity::Exactly(2))?;
    let crop_rect = decode_rect(&raw.values[1])?;
    Ok(FilterSettings::Crop64(CropFilter { raw, crop_rect }))
}

fn decode_tilt(raw: RawFilter) -> Result<FilterSettings, DecodeError> {
    raw.expect_arity(Arity::Exactly(3))?;
    let amount = raw.numeric("tilt amount", 1)?;
    Ok(FilterSettings::Tilt(TiltFilter { raw, amount }))
}

fn decode_fill_light(raw: RawFilter) -> Result<FilterSettings, DecodeError> {
    raw.expect_arity(Arity::Exactly(2))?;
    let fill = raw.numeric("fill", 1)?;
    Ok(FilterSettings::FillLight(FillLightFilter { raw, fill }))
}

fn decode_finetune(raw: RawFilter) -> Result<FilterSettings, DecodeError> {
    raw.expect_arity(Arity::AtLeast(6))?;
    let fill = raw.numeric("finetune fill", 1)?;
    let highlight = raw.numeric("finetune highlight", 2)?;
    let shadow = raw.numeric("finetune shadow", 3)?;
    let autocolor = raw.text(4);
    let color_temp = raw.numeric("finetune color temperature", 5)?;
    Ok(FilterSettings::FineTune(FineTuneFilter {
        raw,
        fill,
        highlight,
        shadow,
        autocolor,
        color_temp,
    }))
}

fn decode_sharpen(raw: RawFilter) -> Result<FilterSettings, DecodeError> {
    raw.expect_arity(Arity::Exactly(2))?;
    let amount = raw.numeric("sharpen amount", 1)?;
    Ok(FilterSettings::Sharpen(SharpenFilter { raw, amount }))
}

/// Decode one `command=p0,p1,...` entry.
pub fn parse_filter(
    entry: &str,
    warnings: &mut Vec<Warning>,
) -> Result<FilterSettings, DecodeError> {
    let raw = RawFilter::parse(entry)?;

    match FILTER_DECODERS
        .iter()
        .find(|(command, _)| *command == raw.command)
    {
        Some((_, decode)) => decode(raw),
        None => {
            warnings.push(Warning::UnknownFilter {
                command: raw.command.clone(),
            });
            Ok(FilterSettings::Generic(raw))
        }
    }
}

/// Decode a whole `;`-separated stack, skipping empty segments (the stack
/// usually ends with a trailing `;`).
pub fn parse_filter_stack(
    text: &str,
    warnings: &mut Vec<Warning>,
) -> Result<Vec<FilterSettings>, DecodeError> {
    text.split(';')
        .filter(|entry| !entry.is_empty())
        .map(|entry| parse_filter(entry, warnings))
        .collect()
}

impl Serialize for FilterSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let raw = self.raw();
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("command", &raw.command)?;
        map.serialize_entry("params", &raw.params)?;

        match self {
            FilterSettings::Generic(_) => {}
            FilterSettings::Crop64(f) => {
                map.serialize_entry("cropRect", &f.crop_rect)?;
            }
            FilterSettings::Tilt(f) => {
                map.serialize_entry("amount", &f.amount.text)?;
            }
            FilterSettings::FillLight(f) => {
                map.serialize_entry("fill", &f.fill.text)?;
            }
            FilterSettings::FineTune(f) => {
                map.serialize_entry("fill", &f.fill.text)?;
                map.serialize_entry("highlight", &f.highlight.text)?;
                // Shadow goes out as the parsed number while its neighbours
                // go out as text. Existing exports look like this.
                map.serialize_entry("shadow", &f.shadow.value)?;
                map.serialize_entry("autocolor", &f.autocolor)?;
                map.serialize_entry("colorTemp", &f.color_temp.text)?;
            }
            FilterSettings::Sharpen(f) => {
                map.serialize_entry("amount", &f.amount.text)?;
            }
        }
        map.end()
    }
}
