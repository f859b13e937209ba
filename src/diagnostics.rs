//! Non-fatal decode diagnostics.
//!
//! Decoding never writes to a stream. Values that are unknown but have a
//! documented fallback (an out-of-range rotation code, an unsupported filter
//! command) push a [`Warning`] into a caller-supplied list and decoding
//! carries on. The folder decoder tags each warning with the file section it
//! came from, producing [`Diagnostic`]s the caller can print, collect, or drop.

use std::fmt;

/// Something unexpected that was resolved by a fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// `rotate(n)` with `n` outside `0..=3`; treated as no rotation.
    UnknownRotation { value: String },
    /// A filter command with no typed decoder; kept as a generic filter.
    UnknownFilter { command: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::UnknownRotation { value } => {
                write!(f, "unknown rotation mode '{value}', using no rotation")
            }
            Warning::UnknownFilter { command } => {
                write!(f, "filter '{command}' is not yet supported, kept as-is")
            }
        }
    }
}

/// A [`Warning`] attributed to the file section that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub filename: String,
    pub warning: Warning,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.filename, self.warning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn warning_display_rotation() {
        let w = Warning::UnknownRotation {
            value: "7".to_string(),
        };
        assert_eq!(w.to_string(), "unknown rotation mode '7', using no rotation");
    }

    #[test]
    fn diagnostic_display_prefixes_filename() {
        let d = Diagnostic {
            filename: "IMG_0001.JPG".to_string(),
            warning: Warning::UnknownFilter {
                command: "redeye".to_string(),
            },
        };
        assert_eq!(
            d.to_string(),
            "IMG_0001.JPG: filter 'redeye' is not yet supported, kept as-is"
        );
    }
}
