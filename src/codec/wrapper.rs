//! `name(value)` wrapper stripping.

use super::DecodeError;

/// Extract `value` from a string of the form `prefix(value)`.
///
/// The format guard only rejects strings that don't start with `prefix(`
/// but do end with `)`. A string that starts correctly but lacks the closing
/// parenthesis passes the guard.
///
/// The body is sliced by position (after `prefix(`, before the last byte),
/// so anything that slips past the guard without a usable body comes back
/// as [`DecodeError::EmptyWrapper`].
pub fn strip_prefix_wrapper<'a>(text: &'a str, prefix: &str) -> Result<&'a str, DecodeError> {
    let opening = format!("{prefix}(");

    if !text.starts_with(&opening) && text.ends_with(')') {
        return Err(DecodeError::Format(text.to_string()));
    }

    let start = opening.len();
    let end = text.len().saturating_sub(1);
    let value = if start < end {
        text.get(start..end).unwrap_or("")
    } else {
        ""
    };

    if value.is_empty() {
        return Err(DecodeError::EmptyWrapper(text.to_string()));
    }
    Ok(value)
}
