//! Export configuration.
//!
//! Handles loading, validating, and layering `fitpack.toml`. Values are
//! resolved from three layers, later layers winning key by key:
//!
//! ```text
//! stock defaults  →  fitpack.toml  →  command-line flags
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [export]
//! size = "web"            # web (1200x628) | social (1080x1080) | blog (600x400)
//! start_number = "1"      # first sequence number, as typed by the user
//! sharpen = true          # apply the sharpening kernel before resizing
//! naming = "sequenced"    # sequenced (c001.jpg, ...) | original (upload names)
//!
//! [processing]
//! max_processes = 4       # Max parallel preview workers (omit for auto = CPU cores)
//! ```
//!
//! ## Start Number
//!
//! `start_number` is kept as the raw string the user typed. It is only parsed
//! when an export is requested ([`ExportSettings::resolve`]), so a bad value
//! blocks the export up front but never blocks previews.
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::{OutputPolicy, SizePreset, SizeSpec, TransformParams};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Default config filename, looked up in the working directory.
pub const CONFIG_FILE: &str = "fitpack.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Start number is required for sequenced export")]
    MissingStartNumber,
    #[error("Start number must be a non-negative integer, got {0:?}")]
    InvalidStartNumber(String),
}

/// Application configuration loaded from `fitpack.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Size, numbering, sharpening and naming for exports and previews.
    pub export: ExportSettings,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.processing.max_processes == Some(0) {
            return Err(ConfigError::Validation(
                "processing.max_processes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// How exported files are named inside the archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum NamingPolicy {
    /// `prefix + NNN + .jpg`, JPEG output.
    #[default]
    Sequenced,
    /// Keep the uploaded filename and the source container.
    Original,
}

impl NamingPolicy {
    pub fn output_policy(self) -> OutputPolicy {
        match self {
            NamingPolicy::Sequenced => OutputPolicy::ForceJpeg,
            NamingPolicy::Original => OutputPolicy::PreserveSource,
        }
    }
}

/// Export settings as configured, before validation of the start number.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportSettings {
    pub size: SizePreset,
    /// Raw user input; parsed by [`parse_start_number`].
    pub start_number: String,
    pub sharpen: bool,
    pub naming: NamingPolicy,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            size: SizePreset::default(),
            start_number: "1".to_string(),
            sharpen: true,
            naming: NamingPolicy::default(),
        }
    }
}

impl ExportSettings {
    /// Pipeline parameters for previews. Never needs a start number.
    pub fn transform_params(&self) -> TransformParams {
        TransformParams {
            size: self.size.spec(),
            sharpen: self.sharpen,
            output: self.naming.output_policy(),
        }
    }

    /// Turn settings into a ready-to-run [`ExportConfig`].
    ///
    /// Fails with [`ConfigError::MissingStartNumber`] or
    /// [`ConfigError::InvalidStartNumber`] for sequenced exports whose start
    /// number does not parse. Original-name exports ignore it.
    pub fn resolve(&self) -> Result<ExportConfig, ConfigError> {
        let naming = match self.naming {
            NamingPolicy::Sequenced => ExportNaming::Sequenced {
                start: parse_start_number(&self.start_number)?,
            },
            NamingPolicy::Original => ExportNaming::Original,
        };
        Ok(ExportConfig {
            size: self.size.spec(),
            sharpen: self.sharpen,
            naming,
        })
    }
}

/// Resolved naming policy for one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportNaming {
    Sequenced { start: u32 },
    Original,
}

impl ExportNaming {
    /// The configured policy this resolved naming came from.
    pub fn policy(self) -> NamingPolicy {
        match self {
            ExportNaming::Sequenced { .. } => NamingPolicy::Sequenced,
            ExportNaming::Original => NamingPolicy::Original,
        }
    }

    pub fn output_policy(self) -> OutputPolicy {
        self.policy().output_policy()
    }
}

/// Validated configuration for one export run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportConfig {
    pub size: SizeSpec,
    pub sharpen: bool,
    pub naming: ExportNaming,
}

impl ExportConfig {
    pub fn transform_params(&self) -> TransformParams {
        TransformParams {
            size: self.size,
            sharpen: self.sharpen,
            output: self.naming.output_policy(),
        }
    }
}

/// Parse a start number typed by the user.
///
/// Surrounding whitespace is ignored. Only plain decimal digits are accepted:
/// no sign, no separators, and the value must fit in a `u32`.
pub fn parse_start_number(raw: &str) -> Result<u32, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::MissingStartNumber);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConfigError::InvalidStartNumber(raw.to_string()));
    }
    trimmed
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidStartNumber(raw.to_string()))
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel preview workers.
    /// When absent or null, defaults to the number of CPU cores.
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
///
/// This is the canonical representation of all default values, used as the
/// base layer for merging user overrides on top.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
        .map_err(|e| ConfigError::Validation(format!("default config does not serialize: {e}")))
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
/// Returns `Err` if the file exists but contains invalid TOML.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge layers in order onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlays: impl IntoIterator<Item = toml::Value>,
) -> Result<AppConfig, ConfigError> {
    let merged = overlays.into_iter().fold(base, merge_toml);
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `path` (if it exists) with `overrides` layered on top.
///
/// `overrides` is a sparse table, typically built from command-line flags.
pub fn load_config(path: &Path, overrides: toml::Value) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let file = load_raw_config(path)?;
    resolve_config(base, file.into_iter().chain(std::iter::once(overrides)))
}

/// Returns a fully-commented stock `fitpack.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# fitpack configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Command-line flags override them.
# Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Export
# ---------------------------------------------------------------------------
[export]
# Output box. Every image is scaled to cover it, then center-cropped.
#   web    = 1200 x 628   (prefix "c")  website headers, OGP cards
#   social = 1080 x 1080  (prefix "s")  square social posts
#   blog   = 600 x 400    (prefix "m")  blog thumbnails
size = "web"

# First number of the sequence (sequenced naming only).
# Must be a non-negative integer; export is refused otherwise.
start_number = "1"

# Sharpen with a 3x3 Laplacian kernel before downscaling.
sharpen = true

# How files are named inside the archive:
#   sequenced = <prefix><NNN>.jpg, always re-encoded as JPEG
#   original  = the uploaded filename, re-encoded in its own format
naming = "sequenced"

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel preview workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}
