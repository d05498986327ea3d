//! Raster basemap from `XYZ` tiles.
//!
//! Tiles covering a region are fetched once, stitched into one image and
//! cropped to the region's extent. Panels then scale that image to their
//! map area.

use fire_outlook_models::config::BasemapConfig;
use image::{RgbaImage, imageops};

use crate::{RenderError, projection::Projection};

/// Tile edge length in pixels.
pub const TILE_SIZE: u32 = 256;

/// Background used when tiles are disabled.
pub const FLAT_LAND: image::Rgba<u8> = image::Rgba([242, 239, 233, 255]);

/// An `XYZ` tile server.
#[derive(Debug, Clone)]
pub struct TileSource {
    url_template: String,
    subdomains: Vec<String>,
    zoom: u8,
}

impl TileSource {
    #[must_use]
    pub fn new(config: &BasemapConfig) -> Self {
        Self {
            url_template: config.url_template.clone(),
            subdomains: config.subdomains.clone(),
            zoom: config.zoom,
        }
    }

    /// URL of tile `(x, y)`. The subdomain rotates with the tile position
    /// to spread requests across hosts.
    #[must_use]
    pub fn tile_url(&self, x: u32, y: u32) -> String {
        let mut url = self
            .url_template
            .replace("{z}", &self.zoom.to_string())
            .replace("{x}", &x.to_string())
            .replace("{y}", &y.to_string());

        if !self.subdomains.is_empty() {
            let index = (x + y) as usize % self.subdomains.len();
            url = url.replace("{s}", &self.subdomains[index]);
        }
        url
    }

    /// Inclusive tile index ranges `(x0, y0, x1, y1)` covering the
    /// projection's extent.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tile_range(&self, projection: &Projection) -> (u32, u32, u32, u32) {
        let (left, top, right, bottom) = projection.world_pixel_bounds(self.zoom);
        let max = (1_u32 << self.zoom.min(31)).saturating_sub(1);
        let tile = |px: f64| ((px / f64::from(TILE_SIZE)).floor().max(0.0) as u32).min(max);
        (tile(left), tile(top), tile(right), tile(bottom))
    }
}

/// Downloads and stitches the tiles covering `projection`, cropped to the
/// extent at native tile resolution.
///
/// # Errors
///
/// Returns [`RenderError`] if any tile fails to download or decode.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub async fn fetch_basemap(
    client: &reqwest::Client,
    source: &TileSource,
    projection: &Projection,
) -> Result<RgbaImage, RenderError> {
    let (x0, y0, x1, y1) = source.tile_range(projection);
    let cols = x1 - x0 + 1;
    let rows = y1 - y0 + 1;

    log::info!(
        "Fetching {} basemap tiles at zoom {}",
        cols * rows,
        source.zoom
    );

    let mut stitched = RgbaImage::new(cols * TILE_SIZE, rows * TILE_SIZE);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let url = source.tile_url(x, y);
            log::debug!("Fetching tile {url}");

            let resp = client.get(&url).send().await?;
            if !resp.status().is_success() {
                return Err(RenderError::Status {
                    url,
                    status: resp.status().as_u16(),
                });
            }
            let bytes = resp.bytes().await?;
            let tile = image::load_from_memory(&bytes)?.to_rgba8();

            imageops::replace(
                &mut stitched,
                &tile,
                i64::from((x - x0) * TILE_SIZE),
                i64::from((y - y0) * TILE_SIZE),
            );
        }
    }

    let (left, top, right, bottom) = projection.world_pixel_bounds(source.zoom);
    let offset_x = left - f64::from(x0 * TILE_SIZE);
    let offset_y = top - f64::from(y0 * TILE_SIZE);
    let crop_x = offset_x.max(0.0).round() as u32;
    let crop_y = offset_y.max(0.0).round() as u32;
    let crop_w = ((right - left).round() as u32)
        .clamp(1, stitched.width().saturating_sub(crop_x).max(1));
    let crop_h = ((bottom - top).round() as u32)
        .clamp(1, stitched.height().saturating_sub(crop_y).max(1));

    Ok(imageops::crop_imm(&stitched, crop_x, crop_y, crop_w, crop_h).to_image())
}

/// Scales a cropped basemap to a panel's map area over [`FLAT_LAND`].
/// Without a basemap the area is plain [`FLAT_LAND`]. The result is always
/// opaque.
#[must_use]
pub fn panel_background(basemap: Option<&RgbaImage>, width: u32, height: u32) -> RgbaImage {
    let mut background = RgbaImage::from_pixel(width, height, FLAT_LAND);
    if let Some(image) = basemap {
        let scaled = imageops::resize(image, width, height, imageops::FilterType::Triangle);
        imageops::overlay(&mut background, &scaled, 0, 0);
    }
    background
}
