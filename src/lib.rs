//! # picasa-export
//!
//! Reads the per-folder settings files Picasa left behind (`.picasa.ini`, or
//! `Picasa.ini` from older versions) and turns them into a typed model and
//! JSON. Picasa never touched the original photos: stars, rotations, crops
//! and its whole non-destructive filter stack live only in these files, so
//! decoding them is the only way to carry those edits out of a retired
//! library.
//!
//! # Pipeline
//!
//! ```text
//! 1. Read     .picasa.ini  →  IniDocument      (sections + keys, document order)
//! 2. Decode   IniDocument  →  FolderReport     (typed settings + diagnostics)
//! 3. Export   FolderSettings → picasa.json     (order-preserving JSON)
//! ```
//!
//! Each step is a plain function over values. Decoding never writes to a
//! stream: unknown-but-recoverable values become [`diagnostics::Warning`]s,
//! and a file section that can't be decoded becomes a
//! [`settings::FileFailure`] while its siblings still decode.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`ini`] | Minimal INI reader: sections, bare keys, comments, continuations |
//! | [`codec`] | Micro-format decoders: `prefix(...)` wrapper, `rotate(n)`, `rect64(...)` |
//! | [`filters`] | Filter stack parsing and per-command typed decoders |
//! | [`settings`] | Per-file and per-folder models, folder decoding, [`settings::load`] |
//! | [`diagnostics`] | Non-fatal warnings raised while decoding |
//! | [`export`] | JSON tree, pretty rendering, and re-import of an export |
//! | [`scan`] | Finds settings files under a directory and decodes them in parallel |
//! | [`config`] | `picasa-export.toml` loading, validation, and merging |
//! | [`output`] | CLI output formatting for folder reports and scans |
//!
//! # Example
//!
//! ```no_run
//! use picasa_export::{export, settings};
//! use std::path::Path;
//!
//! let report = settings::load(Path::new("Pictures/2020-vacation/.picasa.ini"))?;
//! for diagnostic in &report.diagnostics {
//!     eprintln!("warning: {diagnostic}");
//! }
//! println!("{}", export::render(&report.settings, "\t")?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Design Decisions
//!
//! ## Filters Stay Raw
//!
//! Every decoded filter keeps its command name and parameter text verbatim
//! next to the typed fields. Commands without a typed decoder (`redeye`,
//! `bw`, `sepia`, ...) survive as generic filters, so nothing Picasa recorded
//! is lost in the export and [`export::import`] can rebuild the model from
//! the JSON alone.
//!
//! ## Document Order Everywhere
//!
//! Sections, keys and filters keep the order Picasa wrote them. The filter
//! stack is applied in sequence, so order is meaning; the JSON export keeps
//! files in section order as well.

pub mod codec;
pub mod config;
pub mod diagnostics;
pub mod export;
pub mod filters;
pub mod ini;
pub mod output;
pub mod scan;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_helpers;
