//! `rotate(n)` decoding.

use super::{DecodeError, strip_prefix_wrapper};
use crate::diagnostics::Warning;
use serde::{Serialize, Serializer};

/// Rotation applied in Picasa's viewer, stored as `rotate(0..3)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RotationMode {
    #[default]
    NoRotation,
    /// Rotated right.
    ClockwiseQuarter,
    /// Upside down.
    HalfTurn,
    /// Rotated left.
    CounterClockwiseQuarter,
}

impl RotationMode {
    pub fn code(self) -> u8 {
        match self {
            RotationMode::NoRotation => 0,
            RotationMode::ClockwiseQuarter => 1,
            RotationMode::HalfTurn => 2,
            RotationMode::CounterClockwiseQuarter => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(RotationMode::NoRotation),
            1 => Some(RotationMode::ClockwiseQuarter),
            2 => Some(RotationMode::HalfTurn),
            3 => Some(RotationMode::CounterClockwiseQuarter),
            _ => None,
        }
    }

    /// Clockwise rotation in degrees.
    pub fn degrees(self) -> u16 {
        u16::from(self.code()) * 90
    }
}

impl Serialize for RotationMode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.code())
    }
}

/// Decode a `rotate(n)` value.
///
/// The code is matched as text, so `rotate(01)` or `rotate(1.0)` are unknown
/// rather than silently accepted. An unknown code degrades to
/// [`RotationMode::NoRotation`] with a warning; only a malformed wrapper is
/// an error.
pub fn parse_rotation(
    text: &str,
    warnings: &mut Vec<Warning>,
) -> Result<RotationMode, DecodeError> {
    let value = strip_prefix_wrapper(text, "rotate")?;

    let mode = match value {
        "0" => RotationMode::NoRotation,
        "1" => RotationMode::ClockwiseQuarter,
        "2" => RotationMode::HalfTurn,
        "3" => RotationMode::CounterClockwiseQuarter,
        other => {
            warnings.push(Warning::UnknownRotation {
                value: other.to_string(),
            });
            RotationMode::NoRotation
        }
    };
    Ok(mode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_all_four_codes_in_order() {
        let mut warnings = Vec::new();
        let modes: Vec<RotationMode> = ["rotate(0)", "rotate(1)", "rotate(2)", "rotate(3)"]
            .iter()
            .map(|s| parse_rotation(s, &mut warnings).unwrap())
            .collect();
        assert_eq!(
            modes,
            vec![
                RotationMode::NoRotation,
                RotationMode::ClockwiseQuarter,
                RotationMode::HalfTurn,
                RotationMode::CounterClockwiseQuarter,
            ]
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn unknown_code_degrades_with_warning() {
        let mut warnings = Vec::new();
        let mode = parse_rotation("rotate(4)", &mut warnings).unwrap();
        assert_eq!(mode, RotationMode::NoRotation);
        assert_eq!(
            warnings,
            vec![Warning::UnknownRotation {
                value: "4".to_string()
            }]
        );
    }

    #[test]
    fn padded_code_is_unknown_not_parsed() {
        let mut warnings = Vec::new();
        assert_eq!(
            parse_rotation("rotate(01)", &mut warnings).unwrap(),
            RotationMode::NoRotation
        );
        assert_eq!(
            parse_rotation("rotate(1.0)", &mut warnings).unwrap(),
            RotationMode::NoRotation
        );
        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn wrong_wrapper_is_error() {
        let mut warnings = Vec::new();
        let err = parse_rotation("turn(1)", &mut warnings).unwrap_err();
        assert_eq!(err, DecodeError::Format("turn(1)".to_string()));
    }

    #[test]
    fn code_roundtrip() {
        for code in 0..4 {
            assert_eq!(RotationMode::from_code(code).unwrap().code(), code);
        }
        assert_eq!(RotationMode::from_code(4), None);
    }

    #[test]
    fn degrees_per_mode() {
        assert_eq!(RotationMode::NoRotation.degrees(), 0);
        assert_eq!(RotationMode::ClockwiseQuarter.degrees(), 90);
        assert_eq!(RotationMode::HalfTurn.degrees(), 180);
        assert_eq!(RotationMode::CounterClockwiseQuarter.degrees(), 270);
    }

    #[test]
    fn serializes_as_integer_code() {
        let json = serde_json::to_string(&RotationMode::HalfTurn).unwrap();
        assert_eq!(json, "2");
    }
}
