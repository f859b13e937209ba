//! Minimal INI reader for `.picasa.ini` files.
//!
//! Picasa writes a plain section/key document:
//!
//! ```text
//! [Picasa]
//! name=Vacation
//! date=1600000000.000000
//! [IMG_0001.JPG]
//! star=yes
//! rotate=rotate(1)
//! ```
//!
//! Rules, matching what a standard INI parser accepts:
//! - Blank lines and full-line `#` / `;` comments are skipped.
//! - `[name]` opens a section; the name is kept verbatim.
//! - `key=value` or `key: value`, whichever delimiter comes first. Keys are
//!   trimmed and lower-cased, values trimmed.
//! - A line without a delimiter is a bare key with no value (`star`).
//! - A line indented deeper than the previous key's line continues that
//!   key's value. Keys at the same indent stay separate keys.
//! - Keys before the first section, duplicate sections, and duplicate keys
//!   within a section are errors.
//!
//! Sections and keys keep their document order.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum IniError {
    #[error("line {line}: key outside of any section: '{text}'")]
    MissingSectionHeader { line: usize, text: String },
    #[error("line {line}: duplicate section [{name}]")]
    DuplicateSection { line: usize, name: String },
    #[error("line {line}: duplicate key '{key}' in section [{section}]")]
    DuplicateKey {
        line: usize,
        section: String,
        key: String,
    },
}

/// One `[section]` and its entries in document order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Section {
    pub name: String,
    entries: Vec<(String, Option<String>)>,
}

impl Section {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Add an entry, lower-casing the key.
    #[cfg(test)]
    pub fn with(mut self, key: &str, value: Option<&str>) -> Self {
        self.entries
            .push((key.to_lowercase(), value.map(String::from)));
        self
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entry(key).is_some()
    }

    /// Value of `key`. Bare keys (no `=`) read as the empty string.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entry(key).map(|value| value.unwrap_or(""))
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    fn entry(&self, key: &str) -> Option<Option<&str>> {
        let key = key.to_lowercase();
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_deref())
    }
}

/// A parsed INI document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IniDocument {
    sections: Vec<Section>,
}

impl IniDocument {
    #[cfg(test)]
    pub fn from_sections(sections: Vec<Section>) -> Self {
        Self { sections }
    }

    pub fn parse(text: &str) -> Result<Self, IniError> {
        let text = text.strip_prefix('\u{feff}').unwrap_or(text);
        let mut sections: Vec<Section> = Vec::new();
        // Indent of the line that opened the current key
        let mut key_indent = 0;

        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = line.trim();

            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
                continue;
            }

            let line_indent = line.len() - line.trim_start().len();

            // Continuation: indented deeper than the key it follows
            if line_indent > key_indent {
                if let Some((_, Some(value))) =
                    sections.last_mut().and_then(|s| s.entries.last_mut())
                {
                    value.push('\n');
                    value.push_str(trimmed);
                    continue;
                }
            }
            key_indent = line_indent;

            if trimmed.starts_with('[') && trimmed.ends_with(']') && trimmed.len() >= 3 {
                let name = &trimmed[1..trimmed.len() - 1];
                if sections.iter().any(|s| s.name == name) {
                    return Err(IniError::DuplicateSection {
                        line: line_no,
                        name: name.to_string(),
                    });
                }
                sections.push(Section::new(name));
                continue;
            }

            let Some(section) = sections.last_mut() else {
                return Err(IniError::MissingSectionHeader {
                    line: line_no,
                    text: trimmed.to_string(),
                });
            };

            let (key, value) = match trimmed.find(['=', ':']) {
                Some(pos) => (
                    trimmed[..pos].trim().to_lowercase(),
                    Some(trimmed[pos + 1..].trim().to_string()),
                ),
                None => (trimmed.to_lowercase(), None),
            };

            if section.entries.iter().any(|(k, _)| *k == key) {
                return Err(IniError::DuplicateKey {
                    line: line_no,
                    section: section.name.clone(),
                    key,
                });
            }
            section.entries.push((key, value));
        }

        Ok(Self { sections })
    }

    pub fn section(&self, name: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.name == name)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_sections_in_order() {
        let doc = IniDocument::parse(
            "[Picasa]\nname=Vacation\ndate=1600000000.0\n[b.jpg]\nstar=yes\n[a.jpg]\nrotate=rotate(1)\n",
        )
        .unwrap();
        let names: Vec<&str> = doc.sections().iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["Picasa", "b.jpg", "a.jpg"]);
        assert_eq!(doc.section("Picasa").unwrap().get("name"), Some("Vacation"));
        assert_eq!(
            doc.section("a.jpg").unwrap().get("rotate"),
            Some("rotate(1)")
        );
    }

    #[test]
    fn keys_are_lowercased_and_trimmed() {
        let doc = IniDocument::parse("[x.jpg]\n  Star = yes \n").unwrap();
        let section = doc.section("x.jpg").unwrap();
        assert_eq!(section.keys().collect::<Vec<_>>(), vec!["star"]);
        assert_eq!(section.get("STAR"), Some("yes"));
    }

    #[test]
    fn colon_delimiter_accepted() {
        let doc = IniDocument::parse("[x.jpg]\ncaption: hello=world\n").unwrap();
        assert_eq!(
            doc.section("x.jpg").unwrap().get("caption"),
            Some("hello=world")
        );
    }

    #[test]
    fn value_keeps_later_equals_signs() {
        let doc = IniDocument::parse("[x.jpg]\nfilters=crop64=1,0000ffff0000ffff;\n").unwrap();
        assert_eq!(
            doc.section("x.jpg").unwrap().get("filters"),
            Some("crop64=1,0000ffff0000ffff;")
        );
    }

    #[test]
    fn bare_key_has_empty_value() {
        let doc = IniDocument::parse("[x.jpg]\nstar\n").unwrap();
        let section = doc.section("x.jpg").unwrap();
        assert!(section.contains_key("star"));
        assert_eq!(section.get("star"), Some(""));
    }

    #[test]
    fn comments_and_blank_lines_skipped() {
        let doc = IniDocument::parse("# header\n\n[x.jpg]\n; note\n  # indented\nstar=yes\n")
            .unwrap();
        assert_eq!(doc.section("x.jpg").unwrap().keys().count(), 1);
    }

    #[test]
    fn indented_line_continues_value() {
        let doc = IniDocument::parse("[x.jpg]\ncaption=first\n  second\n").unwrap();
        assert_eq!(
            doc.section("x.jpg").unwrap().get("caption"),
            Some("first\nsecond")
        );
    }

    #[test]
    fn equally_indented_keys_stay_separate() {
        let doc = IniDocument::parse("[a.jpg]\n  star=yes\n  rotate=rotate(1)\n").unwrap();
        let section = doc.section("a.jpg").unwrap();
        assert_eq!(section.get("star"), Some("yes"));
        assert_eq!(section.get("rotate"), Some("rotate(1)"));
    }

    #[test]
    fn deeper_indent_continues_indented_key() {
        let doc = IniDocument::parse("[a.jpg]\n  caption=first\n    second\n  star=yes\n").unwrap();
        let section = doc.section("a.jpg").unwrap();
        assert_eq!(section.get("caption"), Some("first\nsecond"));
        assert_eq!(section.get("star"), Some("yes"));
    }

    #[test]
    fn bom_is_ignored() {
        let doc = IniDocument::parse("\u{feff}[Picasa]\nname=A\n").unwrap();
        assert!(doc.section("Picasa").is_some());
    }

    #[test]
    fn crlf_line_endings() {
        let doc = IniDocument::parse("[x.jpg]\r\nstar=yes\r\n").unwrap();
        assert_eq!(doc.section("x.jpg").unwrap().get("star"), Some("yes"));
    }

    #[test]
    fn key_before_section_is_error() {
        let err = IniDocument::parse("star=yes\n[x.jpg]\n").unwrap_err();
        assert_eq!(
            err,
            IniError::MissingSectionHeader {
                line: 1,
                text: "star=yes".to_string()
            }
        );
    }

    #[test]
    fn duplicate_section_is_error() {
        let err = IniDocument::parse("[x.jpg]\nstar=yes\n[x.jpg]\n").unwrap_err();
        assert!(matches!(err, IniError::DuplicateSection { line: 3, .. }));
    }

    #[test]
    fn duplicate_key_is_error() {
        let err = IniDocument::parse("[x.jpg]\nstar=yes\nSTAR=yes\n").unwrap_err();
        assert!(matches!(err, IniError::DuplicateKey { line: 3, .. }));
    }

    #[test]
    fn section_builder_matches_parsed() {
        let parsed = IniDocument::parse("[x.jpg]\nstar\nrotate=rotate(2)\n").unwrap();
        let built = IniDocument::from_sections(vec![
            Section::new("x.jpg")
                .with("star", None)
                .with("rotate", Some("rotate(2)")),
        ]);
        assert_eq!(parsed, built);
    }
}
