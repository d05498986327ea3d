//! Configuration loading.
//!
//! Precedence, lowest first: built-in defaults, the TOML file given with
//! `--config`, environment variables, command-line flags. Flags are
//! applied by the caller.

use std::path::{Path, PathBuf};

use fire_outlook_models::config::OutlookConfig;

/// Output directory override.
pub const ENV_OUTPUT_DIR: &str = "FIRE_OUTLOOK_OUTPUT_DIR";
/// Basemap tile URL template override.
pub const ENV_TILE_URL: &str = "FIRE_OUTLOOK_TILE_URL";
/// Local font file.
pub const ENV_FONT_PATH: &str = "FIRE_OUTLOOK_FONT_PATH";
/// BOM fire danger layer URL override.
pub const ENV_BOM_URL: &str = "FIRE_OUTLOOK_BOM_URL";

/// Errors that can occur while loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config file is not valid TOML for [`OutlookConfig`].
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Loads the config file if one is given, otherwise the defaults.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_file(path: Option<&Path>) -> Result<OutlookConfig, ConfigError> {
    let Some(path) = path else {
        return Ok(OutlookConfig::default());
    };

    log::debug!("Loading config from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Applies environment overrides. `lookup` returns a variable's value, or
/// `None` if it is unset.
pub fn apply_env(config: &mut OutlookConfig, lookup: impl Fn(&str) -> Option<String>) {
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(dir) = var(ENV_OUTPUT_DIR) {
        config.output_dir = PathBuf::from(dir);
    }
    if let Some(url) = var(ENV_TILE_URL) {
        config.basemap.url_template = url;
    }
    if let Some(path) = var(ENV_FONT_PATH) {
        config.font.path = Some(PathBuf::from(path));
    }
    if let Some(url) = var(ENV_BOM_URL) {
        config.bom_url = Some(url);
    }
}
