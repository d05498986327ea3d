//! Run configuration.
//!
//! Every field has a default so that an empty (or absent) config file
//! yields a working setup. The CLI layers environment variables and flags
//! on top of whatever is deserialized here.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::MAX_WINDOW_DAYS;

/// Default `XYZ` tile template. `{s}` is replaced by one of the configured
/// subdomains.
pub const DEFAULT_TILE_URL: &str =
    "https://{s}.basemaps.cartocdn.com/rastertiles/voyager/{z}/{x}/{y}.png";

/// Attribution drawn in the corner of every map using the default tiles.
pub const DEFAULT_TILE_ATTRIBUTION: &str = "(c) OpenStreetMap contributors, (c) CARTO";

/// Space Mono from the Google Fonts repository.
pub const DEFAULT_FONT_URL: &str =
    "https://github.com/google/fonts/raw/main/ofl/spacemono/SpaceMono-Regular.ttf";

/// Top-level configuration for a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlookConfig {
    /// Directory the rendered maps are written to.
    pub output_dir: PathBuf,
    /// Number of forecast days to render (1 to [`MAX_WINDOW_DAYS`]).
    pub window_days: u8,
    /// Replaces the embedded BOM fire danger layer URL.
    pub bom_url: Option<String>,
    /// HTTP client settings.
    pub http: HttpConfig,
    /// Basemap tile settings.
    pub basemap: BasemapConfig,
    /// Output image settings.
    pub figure: FigureConfig,
    /// Label font settings.
    pub font: FontConfig,
}

impl Default for OutlookConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("outputs"),
            window_days: MAX_WINDOW_DAYS,
            bom_url: None,
            http: HttpConfig::default(),
            basemap: BasemapConfig::default(),
            figure: FigureConfig::default(),
            font: FontConfig::default(),
        }
    }
}

impl OutlookConfig {
    /// Window length clamped to `1..=MAX_WINDOW_DAYS`.
    #[must_use]
    pub fn window(&self) -> u8 {
        self.window_days.clamp(1, MAX_WINDOW_DAYS)
    }
}

/// HTTP client settings shared by every request of a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    /// `User-Agent` header. Tile servers reject anonymous clients.
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 60,
            user_agent: concat!("fire_outlook/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Raster basemap settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BasemapConfig {
    /// When `false`, panels get a flat background instead of tiles.
    pub enabled: bool,
    /// `XYZ` URL template with `{z}`, `{x}`, `{y}` and optional `{s}`.
    pub url_template: String,
    /// Values substituted for `{s}`.
    pub subdomains: Vec<String>,
    /// Tile zoom level.
    pub zoom: u8,
    /// Attribution text drawn on the map.
    pub attribution: String,
}

impl Default for BasemapConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url_template: DEFAULT_TILE_URL.to_string(),
            subdomains: ["a", "b", "c", "d"].map(String::from).to_vec(),
            zoom: 4,
            attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }
}

/// Output image settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureConfig {
    /// Summary image width in pixels.
    pub width: u32,
    /// Summary image height in pixels.
    pub height: u32,
    /// Also write one image per forecast day.
    pub write_panels: bool,
}

impl Default for FigureConfig {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            write_panels: false,
        }
    }
}

/// Label font settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    /// Local TTF to use instead of downloading.
    pub path: Option<PathBuf>,
    /// Where the downloaded font is fetched from.
    pub url: String,
    /// Where the downloaded font is cached. Defaults to the system temp
    /// directory.
    pub cache_path: Option<PathBuf>,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            path: None,
            url: DEFAULT_FONT_URL.to_string(),
            cache_path: None,
        }
    }
}

impl FontConfig {
    /// Cache location for the downloaded font.
    #[must_use]
    pub fn resolved_cache_path(&self) -> PathBuf {
        self.cache_path.clone().unwrap_or_else(|| {
            std::env::temp_dir()
                .join("fire_outlook")
                .join("SpaceMono-Regular.ttf")
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let config: OutlookConfig = toml::from_str("").unwrap();
        assert_eq!(config, OutlookConfig::default());
    }

    #[test]
    fn partial_toml_overrides_only_given_fields() {
        let config: OutlookConfig = toml::from_str(
            r#"
            window_days = 2

            [basemap]
            zoom = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.window_days, 2);
        assert_eq!(config.basemap.zoom, 5);
        assert_eq!(config.basemap.url_template, DEFAULT_TILE_URL);
        assert_eq!(config.output_dir, PathBuf::from("outputs"));
    }

    #[test]
    fn window_is_clamped() {
        let mut config = OutlookConfig::default();
        config.window_days = 0;
        assert_eq!(config.window(), 1);
        config.window_days = 9;
        assert_eq!(config.window(), MAX_WINDOW_DAYS);
    }
}
