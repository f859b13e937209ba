//! Value codecs for the compact micro-formats inside `.picasa.ini` values.
//!
//! | Format | Example | Decoder |
//! |---|---|---|
//! | Prefix wrapper | `rotate(1)` | [`strip_prefix_wrapper`] |
//! | Rotation code | `rotate(0..3)` | [`parse_rotation`] |
//! | Packed rectangle | `rect64(1b502e26c807e353)` | [`extract_hex64`] + [`decode_rect`] |
//!
//! Filter stacks (`filters=crop64=1,...;tilt=1,0.2,0;`) build on these and
//! live in [`crate::filters`].
//!
//! Every codec is a pure function over `&str`. Failures that make a value
//! unusable are [`DecodeError`]s; values that are merely unknown resolve to a
//! documented fallback and push a [`Warning`](crate::diagnostics::Warning).

mod rect;
mod rotation;
mod wrapper;

pub use rect::{CropRect, decode_rect, extract_hex64};
pub use rotation::{RotationMode, parse_rotation};
pub use wrapper::strip_prefix_wrapper;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Value doesn't follow its expected format: '{0}'")]
    Format(String),
    #[error("Prefix wrapper has an empty body: '{0}'")]
    EmptyWrapper(String),
    #[error("Filter '{command}' expects {expected} parameters, found {found}")]
    Arity {
        command: String,
        expected: Arity,
        found: usize,
    },
    #[error("Cannot parse {field} from '{text}'")]
    Numeric { field: &'static str, text: String },
}

/// Parameter count a recognized filter command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exactly(n) => count == n,
            Arity::AtLeast(n) => count >= n,
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "exactly {n}"),
            Arity::AtLeast(n) => write!(f, "at least {n}"),
        }
    }
}

/// Parse a float the way Picasa's own tooling reads them: surrounding
/// whitespace is tolerated, nothing else is.
pub(crate) fn parse_float(field: &'static str, text: &str) -> Result<f64, DecodeError> {
    text.trim()
        .parse::<f64>()
        .map_err(|_| DecodeError::Numeric {
            field,
            text: text.to_string(),
        })
}
