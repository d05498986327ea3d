#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Fire outlook map rendering.
//!
//! Draws classified [`ForecastDay`](fire_outlook_models::ForecastDay)s over
//! a Web Mercator raster basemap and writes the result as PNG. Only active
//! features are drawn; the legend lists exactly the categories that
//! appear.

pub mod basemap;
pub mod draw;
pub mod figure;
pub mod font;
pub mod legend;
pub mod output;
pub mod panel;
pub mod projection;
pub mod style;

pub use figure::{FigureContext, render_day, render_summary};

/// Errors that can occur while rendering or writing maps.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// Tile or font download failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// Decoding a tile or encoding the output failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// The font data is not a usable font.
    #[error("Invalid font: {0}")]
    Font(#[from] ab_glyph::InvalidFont),

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
