//! Archive configuration module.
//!
//! Handles loading, validating, and merging `archive.toml`. Stock defaults
//! reproduce the conventional layout, so the file is optional:
//!
//! ```text
//! site/
//! ├── archive.toml            # Optional overrides
//! ├── img/Archive/
//! │   ├── 2022/               # One directory per configured year
//! │   ├── 2023/
//! │   └── 2024/
//! └── data/
//!     └── archive-data.json   # Written by `scan`, read by `browse`/`render`
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [scan]
//! root = "img/Archive"                 # Directory holding the year folders
//! output = "data/archive-data.json"    # Where the index is written
//! years = ["2022", "2023", "2024"]     # Year folders, in index order
//! extensions = ["jpg", "jpeg", "png", "gif"]
//! path_prefix = "img/Archive"          # Prefix of each record's `path`
//!
//! [browser]
//! index = "data/archive-data.json"     # Index file the browser loads
//! title = "Archive"
//! lazy_margin = 50                     # Lookahead margin in px for lazy images
//! columns = 4                          # Grid columns used for viewport math
//! ```
//!
//! Config files are sparse: override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Archive configuration loaded from `archive.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ArchiveConfig {
    /// Indexer settings.
    pub scan: ScanConfig,
    /// Browser settings.
    pub browser: BrowserConfig,
}

impl ArchiveConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.scan.years.is_empty() {
            return Err(ConfigError::Validation(
                "scan.years must not be empty".into(),
            ));
        }
        for (i, year) in self.scan.years.iter().enumerate() {
            if year.is_empty() || year.contains(['/', '\\']) {
                return Err(ConfigError::Validation(format!(
                    "scan.years entry {year:?} is not a directory name"
                )));
            }
            if self.scan.years[..i].contains(year) {
                return Err(ConfigError::Validation(format!(
                    "scan.years lists {year} twice"
                )));
            }
        }
        if self.scan.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "scan.extensions must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .scan
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.starts_with('.') || e.to_lowercase() != **e)
        {
            return Err(ConfigError::Validation(format!(
                "scan.extensions entry {bad:?} must be lowercase without a leading dot"
            )));
        }
        if self.browser.columns == 0 {
            return Err(ConfigError::Validation(
                "browser.columns must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Indexer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScanConfig {
    /// Directory holding one subdirectory per year.
    pub root: String,
    /// Output path of the JSON index.
    pub output: String,
    /// Years to scan, in the order they appear in the index.
    pub years: Vec<String>,
    /// Recognized image extensions, lowercase, no leading dot.
    pub extensions: Vec<String>,
    /// Prefix of each record's `path`, as seen from the browsing page.
    pub path_prefix: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            root: "img/Archive".to_string(),
            output: "data/archive-data.json".to_string(),
            years: ["2022", "2023", "2024"].map(String::from).to_vec(),
            extensions: ["jpg", "jpeg", "png", "gif"].map(String::from).to_vec(),
            path_prefix: "img/Archive".to_string(),
        }
    }
}

/// Browser settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BrowserConfig {
    /// Index file to load.
    pub index: String,
    /// Page title.
    pub title: String,
    /// Images start loading this many pixels before they become visible.
    pub lazy_margin: u32,
    /// Grid columns, used to estimate which cells the first screen shows.
    pub columns: usize,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            index: "data/archive-data.json".to_string(),
            title: "Archive".to_string(),
            lazy_margin: 50,
            columns: 4,
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(ArchiveConfig::default())
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

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<ArchiveConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: ArchiveConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from the given file.
///
/// A missing file yields the stock defaults; an unreadable or invalid one is
/// an error.
pub fn load_config(path: &Path) -> Result<ArchiveConfig, ConfigError> {
    if !path.exists() {
        return resolve_config(None);
    }
    let content = fs::read_to_string(path)?;
    let overlay: toml::Value = toml::from_str(&content)?;
    resolve_config(Some(overlay))
}

/// Returns a fully-commented stock `archive.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Archive Browser Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Indexer
# ---------------------------------------------------------------------------
[scan]
# Directory holding one subdirectory per year.
root = "img/Archive"

# Where the JSON index is written. Parent directories are created.
output = "data/archive-data.json"

# Year folders to scan, in the order they appear in the index.
# A missing folder yields an empty list for that year.
years = ["2022", "2023", "2024"]

# Recognized image extensions (case-insensitive match, lowercase here).
extensions = ["jpg", "jpeg", "png", "gif"]

# Prefix of each record's `path`, relative to the browsing page.
path_prefix = "img/Archive"

# ---------------------------------------------------------------------------
# Browser
# ---------------------------------------------------------------------------
[browser]
# Index file to load.
index = "data/archive-data.json"

# Page title for rendered HTML.
title = "Archive"

# Images start loading this many pixels before they scroll into view.
lazy_margin = 50

# Grid columns, used to estimate which images the first screen loads.
columns = 4
"##
}
