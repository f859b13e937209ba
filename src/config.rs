//! Exporter configuration.
//!
//! Handles loading, validating, and merging `picasa-export.toml`. Stock
//! defaults are overridden by the user's file, key by key.
//!
//! ## Config File Location
//!
//! `picasa-export.toml` is looked up in the directory being scanned (for
//! `scan`) or the current directory (for `export` / `check`). `--config`
//! points at an explicit file instead.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [input]
//! file_names = [".picasa.ini", "Picasa.ini"]  # Settings file names to look for
//! recursive = true                            # Descend into subdirectories
//!
//! [output]
//! indent = "\t"                # JSON indentation (whitespace only)
//! file_name = "picasa.json"    # Written next to each settings file by `scan --write`
//!
//! [processing]
//! max_processes = 4            # Max parallel workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: override just the values you want:
//!
//! ```toml
//! [output]
//! indent = "  "
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name looked up by [`load_config`].
pub const CONFIG_FILE_NAME: &str = "picasa-export.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Exporter configuration loaded from `picasa-export.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Which settings files to pick up.
    pub input: InputConfig,
    /// How JSON is written.
    pub output: OutputConfig,
    /// Parallel decoding settings.
    pub processing: ProcessingConfig,
}

impl ExportConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.input.file_names.is_empty() {
            return Err(ConfigError::Validation(
                "input.file_names must not be empty".into(),
            ));
        }
        if self.input.file_names.iter().any(|n| !is_plain_file_name(n)) {
            return Err(ConfigError::Validation(
                "input.file_names entries must be plain file names".into(),
            ));
        }
        if !self.output.indent.chars().all(char::is_whitespace) {
            return Err(ConfigError::Validation(
                "output.indent must contain only whitespace".into(),
            ));
        }
        if !is_plain_file_name(&self.output.file_name) {
            return Err(ConfigError::Validation(
                "output.file_name must be a plain file name".into(),
            ));
        }
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

fn is_plain_file_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\'])
}

/// Settings file discovery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    /// Settings file names, matched exactly. Picasa 3 writes `.picasa.ini`;
    /// older versions wrote `Picasa.ini`.
    pub file_names: Vec<String>,
    /// Scan subdirectories too.
    pub recursive: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            file_names: vec![".picasa.ini".to_string(), "Picasa.ini".to_string()],
            recursive: true,
        }
    }
}

/// JSON output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Indentation for one nesting level.
    pub indent: String,
    /// Name of the JSON file `scan --write` puts next to each settings file.
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: "\t".to_string(),
            file_name: "picasa.json".to_string(),
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel decoding workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config.max_processes.map(|n| n.min(cores)).unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ExportConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config must serialize: {e}")))
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Read a TOML file as a raw value. `Ok(None)` if it doesn't exist.
pub fn load_raw_config(config_path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and
/// validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ExportConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ExportConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `picasa-export.toml` from the given directory, falling back to stock
/// defaults when there is none.
pub fn load_config(dir: &Path) -> Result<ExportConfig, ConfigError> {
    resolve_config(load_raw_config(&dir.join(CONFIG_FILE_NAME))?)
}

/// Load an explicitly named config file. Unlike [`load_config`], a missing
/// file is an error.
pub fn load_config_file(path: &Path) -> Result<ExportConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(value))
}

/// Returns a fully-commented stock `picasa-export.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# picasa-export Configuration
# ===========================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Settings file discovery (used by `scan`)
# ---------------------------------------------------------------------------
[input]
# File names to treat as Picasa settings files.
# Picasa 3 writes ".picasa.ini"; earlier versions wrote "Picasa.ini".
file_names = [".picasa.ini", "Picasa.ini"]

# Descend into subdirectories.
recursive = true

# ---------------------------------------------------------------------------
# JSON output
# ---------------------------------------------------------------------------
[output]
# Indentation for one nesting level. Whitespace only.
indent = "\t"

# File name `scan --write` uses for the JSON written next to each settings file.
file_name = "picasa.json"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel decoding workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_values() {
        let config = ExportConfig::default();
        assert_eq!(config.input.file_names, vec![".picasa.ini", "Picasa.ini"]);
        assert!(config.input.recursive);
        assert_eq!(config.output.indent, "\t");
        assert_eq!(config.output.file_name, "picasa.json");
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[output]
indent = "  "
"#;
        let config: ExportConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.output.indent, "  ");
        // Defaults preserved
        assert_eq!(config.output.file_name, "picasa.json");
        assert!(config.input.recursive);
    }

    // =========================================================================
    // load_config tests
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.output.indent, "\t");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            r#"
[input]
file_names = ["Picasa.ini"]
recursive = false

[processing]
max_processes = 2
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.input.file_names, vec!["Picasa.ini"]);
        assert!(!config.input.recursive);
        assert_eq!(config.processing.max_processes, Some(2));
        assert_eq!(config.output.indent, "\t");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE_NAME), "this is not valid toml [[[").unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn load_config_file_missing_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load_config_file(&tmp.path().join("nope.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE_NAME),
            "[output]\nindent = \"xx\"\n",
        )
        .unwrap();
        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    // =========================================================================
    // Unknown keys
    // =========================================================================

    #[test]
    fn unknown_key_rejected() {
        let result: Result<ExportConfig, _> = toml::from_str("verbose = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn unknown_nested_key_rejected() {
        let result: Result<ExportConfig, _> = toml::from_str("[output]\npretty = true\n");
        assert!(result.is_err());
    }

    // =========================================================================
    // Validation
    // =========================================================================

    #[test]
    fn validate_default_config_passes() {
        assert!(ExportConfig::default().validate().is_ok());
    }

    #[test]
    fn validate_empty_file_names() {
        let mut config = ExportConfig::default();
        config.input.file_names.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_file_name_with_separator() {
        let mut config = ExportConfig::default();
        config.output.file_name = "out/picasa.json".to_string();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_zero_processes() {
        let mut config = ExportConfig::default();
        config.processing.max_processes = Some(0);
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_indent_is_compact_but_valid() {
        let mut config = ExportConfig::default();
        config.output.indent = String::new();
        assert!(config.validate().is_ok());
    }

    // =========================================================================
    // merge_toml tests
    // =========================================================================

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("a = 1\nb = 2").unwrap();
        let overlay: toml::Value = toml::from_str("b = 3").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"].as_integer(), Some(1));
        assert_eq!(merged["b"].as_integer(), Some(3));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value =
            toml::from_str("[output]\nindent = \"\\t\"\nfile_name = \"a.json\"").unwrap();
        let overlay: toml::Value = toml::from_str("[output]\nfile_name = \"b.json\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["output"]["indent"].as_str(), Some("\t"));
        assert_eq!(merged["output"]["file_name"].as_str(), Some("b.json"));
    }

    // =========================================================================
    // Threads & stock config
    // =========================================================================

    #[test]
    fn effective_threads_user_constrains_down() {
        let config = ProcessingConfig {
            max_processes: Some(1),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    #[test]
    fn effective_threads_auto_is_positive() {
        assert!(effective_threads(&ProcessingConfig::default()) >= 1);
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: ExportConfig = toml::from_str(stock_config_toml()).unwrap();
        let defaults = ExportConfig::default();
        assert_eq!(config.input.file_names, defaults.input.file_names);
        assert_eq!(config.input.recursive, defaults.input.recursive);
        assert_eq!(config.output.indent, defaults.output.indent);
        assert_eq!(config.output.file_name, defaults.output.file_name);
        assert_eq!(config.processing.max_processes, None);
    }
}
