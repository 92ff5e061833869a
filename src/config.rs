//! Project configuration.
//!
//! Handles loading, validating, and merging `navtree.toml`. The file lives
//! in the project directory, next to the site's source directory:
//!
//! ```text
//! my-site/
//! ├── navtree.toml          # Optional; stock defaults apply without it
//! ├── source/               # Scanned
//! └── data/
//!     └── tree.yml          # Written
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! source_dir = "source"
//! data_dir = "data"
//! data_file = "tree.yml"
//! automatic_updates = true
//! ignore_files = ["sitemap.xml", "robots.txt"]
//! ignore_dirs = ["assets"]
//! ext_whitelist = []
//!
//! [site]                    # Generated asset directories, never navigable
//! js_dir = "javascripts"
//! css_dir = "stylesheets"
//! fonts_dir = "fonts"
//! images_dir = "images"
//! helpers_dir = "helpers"
//! layouts_dir = "layouts"
//! partials_dir = "partials"
//!
//! [watch]
//! debounce_ms = 200
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse: tables merge key by key, everything else (lists
//! included) replaces the default wholesale. Unknown keys are rejected to
//! catch typos early.
//!
//! ## Ignore Set Assembly
//!
//! The scan itself only sees fully resolved ignore sets. The `[site]`
//! directory names are folded into `ignore_dirs` by
//! [`NavTreeConfig::scan_options`] before the scan starts.

use crate::datafile::{DataFileError, DataFormat};
use crate::scan::ScanOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Name of the config file inside the project directory.
pub const CONFIG_FILENAME: &str = "navtree.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[from] toml::ser::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Project configuration loaded from `navtree.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavTreeConfig {
    /// Directory to scan, relative to the project directory.
    pub source_dir: String,
    /// Directory the data file is written into, relative to the project directory.
    pub data_dir: String,
    /// Data file name; its extension picks the format (`.yml`, `.yaml`, `.json`).
    pub data_file: String,
    /// Whether builds (re)write the data file.
    pub automatic_updates: bool,
    /// Filenames excluded from the tree.
    pub ignore_files: Vec<String>,
    /// Directory names excluded from the tree, with everything inside them.
    pub ignore_dirs: Vec<String>,
    /// If non-empty, only files with these extensions (`.html`) are included.
    pub ext_whitelist: Vec<String>,
    /// The site generator's asset directories.
    pub site: SiteDirs,
    /// Watch mode settings.
    pub watch: WatchConfig,
}

impl Default for NavTreeConfig {
    fn default() -> Self {
        Self {
            source_dir: "source".to_string(),
            data_dir: "data".to_string(),
            data_file: "tree.yml".to_string(),
            automatic_updates: true,
            ignore_files: vec!["sitemap.xml".to_string(), "robots.txt".to_string()],
            ignore_dirs: vec!["assets".to_string()],
            ext_whitelist: Vec::new(),
            site: SiteDirs::default(),
            watch: WatchConfig::default(),
        }
    }
}

/// Directories the site generator uses for generated or non-page content.
///
/// Every non-empty name here is added to the ignored directory set. Set a
/// name to `""` to keep that directory in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteDirs {
    pub js_dir: String,
    pub css_dir: String,
    pub fonts_dir: String,
    pub images_dir: String,
    pub helpers_dir: String,
    pub layouts_dir: String,
    pub partials_dir: String,
}

impl Default for SiteDirs {
    fn default() -> Self {
        Self {
            js_dir: "javascripts".to_string(),
            css_dir: "stylesheets".to_string(),
            fonts_dir: "fonts".to_string(),
            images_dir: "images".to_string(),
            helpers_dir: "helpers".to_string(),
            layouts_dir: "layouts".to_string(),
            partials_dir: "partials".to_string(),
        }
    }
}

impl SiteDirs {
    fn names(&self) -> impl Iterator<Item = &str> {
        [
            &self.js_dir,
            &self.css_dir,
            &self.fonts_dir,
            &self.images_dir,
            &self.helpers_dir,
            &self.layouts_dir,
            &self.partials_dir,
        ]
        .into_iter()
        .map(String::as_str)
        .filter(|name| !name.is_empty())
    }
}

/// Watch mode settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchConfig {
    /// Quiet period after the last filesystem event before rebuilding.
    pub debounce_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self { debounce_ms: 200 }
    }
}

impl WatchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

impl NavTreeConfig {
    /// Validate config values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source_dir.trim().is_empty() {
            return Err(ConfigError::Validation("source_dir must not be empty".into()));
        }
        if self.data_file.trim().is_empty() {
            return Err(ConfigError::Validation("data_file must not be empty".into()));
        }
        if self.data_file.contains(['/', '\\']) {
            return Err(ConfigError::Validation(format!(
                "data_file must be a file name, not a path: {:?} (use data_dir for the location)",
                self.data_file
            )));
        }
        if let Err(DataFileError::UnsupportedFormat(name)) =
            DataFormat::from_path(Path::new(&self.data_file))
        {
            return Err(ConfigError::Validation(format!(
                "data_file {name:?} must end in .yml, .yaml or .json"
            )));
        }
        if let Some(ext) = self
            .ext_whitelist
            .iter()
            .find(|ext| !ext.starts_with('.') || ext.len() < 2)
        {
            return Err(ConfigError::Validation(format!(
                "ext_whitelist entries must look like \".html\", got {ext:?}"
            )));
        }
        Ok(())
    }

    /// Assemble the resolved filtering rules for a scan.
    ///
    /// `ignore_dirs` is extended with every configured `[site]` directory,
    /// and the data file is excluded when `data_dir` lies inside `source_dir`.
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            ignore_files: self.ignore_files.iter().cloned().collect(),
            ignore_dirs: self
                .ignore_dirs
                .iter()
                .map(String::as_str)
                .chain(self.site.names())
                .map(str::to_string)
                .collect(),
            ext_whitelist: self.ext_whitelist.iter().cloned().collect(),
            exclude_paths: self.data_file_in_source().into_iter().collect(),
        }
    }

    /// Root-relative path of the data file, if it is written under the source.
    fn data_file_in_source(&self) -> Option<String> {
        let data_path = normalized(&Path::new(&self.data_dir).join(&self.data_file));
        let inside = data_path.strip_prefix(normalized(Path::new(&self.source_dir))).ok()?;
        let parts: Vec<_> = inside
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect();
        Some(format!("/{}", parts.join("/")))
    }

    /// Absolute (or project-relative) path of the scan root.
    pub fn source_path(&self, project: &Path) -> PathBuf {
        project.join(&self.source_dir)
    }

    /// Path the data file is written to.
    pub fn data_path(&self, project: &Path) -> PathBuf {
        project.join(&self.data_dir).join(&self.data_file)
    }
}

/// Drop `.` components so `./source` and `source` compare equal.
fn normalized(path: &Path) -> PathBuf {
    path.components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect()
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer user overrides are merged on top of.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    Ok(toml::Value::try_from(NavTreeConfig::default())?)
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

/// Load a config file as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto the stock defaults, then deserialize and validate.
pub fn resolve_config(overlay: Option<toml::Value>) -> Result<NavTreeConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: NavTreeConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load `navtree.toml` from the project directory (defaults if absent).
pub fn load_config(project: &Path) -> Result<NavTreeConfig, ConfigError> {
    load_config_file(&project.join(CONFIG_FILENAME))
}

/// Load a specific config file (defaults if absent).
pub fn load_config_file(path: &Path) -> Result<NavTreeConfig, ConfigError> {
    let config = resolve_config(load_raw_config(path)?)?;
    tracing::debug!(path = %path.display(), ?config, "Config resolved");
    Ok(config)
}

/// Returns a fully-commented stock `navtree.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# navtree configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Lists replace the defaults entirely; tables merge key by key.
# Unknown keys will cause an error.

# Directory to scan, relative to this file.
source_dir = "source"

# Where the tree data file is written, relative to this file.
data_dir = "data"

# Data file name. The extension picks the format: .yml / .yaml or .json.
data_file = "tree.yml"

# Rewrite the data file on every build. When false, `navtree build` only
# reports the tree (use `navtree build --force` to write anyway).
automatic_updates = true

# Filenames that never appear in the tree.
ignore_files = ["sitemap.xml", "robots.txt"]

# Directory names that never appear in the tree (contents included).
ignore_dirs = ["assets"]

# When non-empty, only files with these extensions appear in the tree.
# Example: [".html"]
ext_whitelist = []

# ---------------------------------------------------------------------------
# Site generator directories
# ---------------------------------------------------------------------------
# These hold scripts, styles and templates rather than pages. Each name is
# added to ignore_dirs. Set one to "" to keep that directory in the tree.
[site]
js_dir = "javascripts"
css_dir = "stylesheets"
fonts_dir = "fonts"
images_dir = "images"
helpers_dir = "helpers"
layouts_dir = "layouts"
partials_dir = "partials"

# ---------------------------------------------------------------------------
# Watch mode
# ---------------------------------------------------------------------------
[watch]
# Quiet period (milliseconds) after the last change before rebuilding.
debounce_ms = 200
"##
}
