//! Application configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! serialized to a TOML table, the user's file is merged over it key by key,
//! and the result is deserialized and validated.
//!
//! ## Config File Location
//!
//! `config.toml` lives in the application root (`--root`, default `.`).
//! Relative directory settings resolve against that root.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! sites_dir = "sites"              # Generated microsites
//! uploads_dir = "static/uploads"   # Stored logo and product uploads
//! records_path = "microsites.json" # Business and product records
//!
//! [images]
//! logo_max = [400, 300]            # Logo bound (width, height)
//! product_max = [600, 400]         # Product image bound (width, height)
//! quality = 85                     # Re-encode quality (1-100)
//!
//! [server]
//! host = "127.0.0.1"
//! port = 5001
//! max_upload_bytes = 16777216      # Request body limit (16 MiB)
//!
//! [processing]
//! max_processes = 4                # Max parallel rebuild workers (omit for auto = CPU cores)
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Override just the values you want:
//!
//! ```toml
//! [server]
//! port = 8080
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use crate::imaging::Bounds;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
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

/// Application configuration loaded from `config.toml`.
///
/// All fields have defaults. User config files need only specify the values
/// they want to override. Unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Root directory for generated sites, one subdirectory per slug.
    pub sites_dir: String,
    /// Storage area for uploaded logo and product images.
    pub uploads_dir: String,
    /// JSON document holding every business and product record.
    pub records_path: String,
    /// Upload bounds and encoding quality.
    pub images: ImagesConfig,
    /// HTTP listener settings.
    pub server: ServerConfig,
    /// Parallel rebuild settings.
    pub processing: ProcessingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            sites_dir: "sites".to_string(),
            uploads_dir: "static/uploads".to_string(),
            records_path: "microsites.json".to_string(),
            images: ImagesConfig::default(),
            server: ServerConfig::default(),
            processing: ProcessingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, value) in [
            ("sites_dir", &self.sites_dir),
            ("uploads_dir", &self.uploads_dir),
            ("records_path", &self.records_path),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if !(1..=100).contains(&self.images.quality) {
            return Err(ConfigError::Validation(
                "images.quality must be 1-100".into(),
            ));
        }
        for (key, bounds) in [
            ("images.logo_max", self.images.logo_max),
            ("images.product_max", self.images.product_max),
        ] {
            if bounds.width == 0 || bounds.height == 0 {
                return Err(ConfigError::Validation(format!(
                    "{key} values must be non-zero"
                )));
            }
        }
        if self.server.max_upload_bytes == 0 {
            return Err(ConfigError::Validation(
                "server.max_upload_bytes must be non-zero".into(),
            ));
        }
        Ok(())
    }

    /// Resolve the configured directories against `root`.
    pub fn paths(&self, root: &Path) -> ResolvedPaths {
        ResolvedPaths {
            sites: root.join(&self.sites_dir),
            uploads: root.join(&self.uploads_dir),
            records: root.join(&self.records_path),
        }
    }
}

/// Absolute (or root-relative) locations derived from [`AppConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub sites: PathBuf,
    pub uploads: PathBuf,
    pub records: PathBuf,
}

/// Upload bounds and encoding quality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImagesConfig {
    /// Logo bound as `[width, height]`.
    pub logo_max: Bounds,
    /// Product image bound as `[width, height]`.
    pub product_max: Bounds,
    /// Re-encode quality for lossy formats.
    pub quality: u32,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            logo_max: Bounds::new(400, 300),
            product_max: Bounds::new(600, 400),
            quality: 85,
        }
    }
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Largest accepted request body, in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5001,
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

impl ServerConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel rebuild workers.
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
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> Result<toml::Value, ConfigError> {
    toml::Value::try_from(AppConfig::default())
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

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if no `config.toml` exists in the directory.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Load config from `config.toml` in the given directory.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<AppConfig, ConfigError> {
    let base = stock_defaults_value()?;
    let merged = match load_raw_config(root)? {
        Some(overlay) => merge_toml(base, overlay),
        None => base,
    };
    let config: AppConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Microsite Generator Configuration
# ==================================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys will cause an error.
# Relative paths resolve against the directory holding this file.

# Root directory for generated sites (one subdirectory per business slug)
sites_dir = "sites"

# Storage area for uploaded logos and product images
uploads_dir = "static/uploads"

# JSON document holding business and product records
records_path = "microsites.json"

# ---------------------------------------------------------------------------
# Uploaded images
# ---------------------------------------------------------------------------
[images]
# Images are shrunk (never enlarged) to fit [width, height], keeping aspect.
logo_max = [400, 300]
product_max = [600, 400]

# Re-encode quality for JPEG uploads (1 = worst, 100 = best).
quality = 85

# ---------------------------------------------------------------------------
# HTTP server
# ---------------------------------------------------------------------------
[server]
host = "127.0.0.1"
port = 5001

# Largest accepted submission, in bytes.
max_upload_bytes = 16777216

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel workers for `rebuild`.
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
        let config = AppConfig::default();
        assert_eq!(config.sites_dir, "sites");
        assert_eq!(config.uploads_dir, "static/uploads");
        assert_eq!(config.images.logo_max, Bounds::new(400, 300));
        assert_eq!(config.images.product_max, Bounds::new(600, 400));
        assert_eq!(config.images.quality, 85);
        assert_eq!(config.server.max_upload_bytes, 16 * 1024 * 1024);
        assert_eq!(config.server.address(), "127.0.0.1:5001");
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[images]
logo_max = [200, 100]
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.images.logo_max, Bounds::new(200, 100));
        // Defaults preserved
        assert_eq!(config.images.product_max, Bounds::new(600, 400));
        assert_eq!(config.sites_dir, "sites");
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
sites_dir = "out/sites"

[server]
port = 8080
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.sites_dir, "out/sites");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[images]\nqualty = 90\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn validate_quality_bounds() {
        let mut config = AppConfig::default();
        config.images.quality = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
        config.images.quality = 101;
        assert!(config.validate().is_err());
        config.images.quality = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_zero_bounds() {
        let mut config = AppConfig::default();
        config.images.product_max = Bounds::new(0, 400);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("images.product_max"));
    }

    #[test]
    fn validate_empty_dirs() {
        let mut config = AppConfig::default();
        config.sites_dir = "  ".into();
        assert!(config.validate().unwrap_err().to_string().contains("sites_dir"));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[server]\nmax_upload_bytes = 0\n").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn paths_resolve_against_root() {
        let config = AppConfig::default();
        let paths = config.paths(Path::new("/srv/app"));
        assert_eq!(paths.sites, Path::new("/srv/app/sites"));
        assert_eq!(paths.uploads, Path::new("/srv/app/static/uploads"));
        assert_eq!(paths.records, Path::new("/srv/app/microsites.json"));
    }

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
        let config: AppConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config, AppConfig::default());
    }
}
