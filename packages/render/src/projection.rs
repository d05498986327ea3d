//! Web Mercator projection from longitude/latitude to panel pixels.
//!
//! Coordinates are first mapped to normalized Mercator space (`0.0..=1.0`
//! on both axes, origin at the north-west corner), which lines up with
//! `XYZ` raster tiles at any zoom level.

use fire_outlook_models::Extent;

/// Latitude limit of the Web Mercator square.
pub const MAX_LATITUDE: f64 = 85.051_128_78;

/// Normalized Mercator x of a longitude.
#[must_use]
pub fn mercator_x(lon: f64) -> f64 {
    (lon + 180.0) / 360.0
}

/// Normalized Mercator y of a latitude, clamped to [`MAX_LATITUDE`].
#[must_use]
pub fn mercator_y(lat: f64) -> f64 {
    let lat_rad = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / std::f64::consts::PI) / 2.0
}

/// Number of tiles along each axis at `zoom`.
#[must_use]
pub fn tiles_per_axis(zoom: u8) -> f64 {
    2_f64.powi(i32::from(zoom))
}

/// Maps an [`Extent`] onto a pixel rectangle with a uniform scale, so the
/// map keeps its shape inside a box of any aspect ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    /// Normalized Mercator x of the western edge.
    pub origin_x: f64,
    /// Normalized Mercator y of the northern edge.
    pub origin_y: f64,
    /// Pixels per normalized Mercator unit.
    pub scale: f64,
    /// Width of the projected extent in pixels.
    pub width: u32,
    /// Height of the projected extent in pixels.
    pub height: u32,
}

impl Projection {
    /// Largest projection of `extent` that fits in `max_width` by
    /// `max_height` pixels.
    #[must_use]
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn fit(extent: Extent, max_width: u32, max_height: u32) -> Self {
        let origin_x = mercator_x(extent.min_lon);
        let origin_y = mercator_y(extent.max_lat);
        let span_x = (mercator_x(extent.max_lon) - origin_x).max(f64::EPSILON);
        let span_y = (mercator_y(extent.min_lat) - origin_y).max(f64::EPSILON);

        let scale = (f64::from(max_width) / span_x).min(f64::from(max_height) / span_y);

        Self {
            origin_x,
            origin_y,
            scale,
            width: ((span_x * scale).round() as u32).clamp(1, max_width.max(1)),
            height: ((span_y * scale).round() as u32).clamp(1, max_height.max(1)),
        }
    }

    /// Pixel position of a longitude/latitude pair. Points outside the
    /// extent land outside `0..width` / `0..height`.
    #[must_use]
    pub fn project(&self, lon: f64, lat: f64) -> (f64, f64) {
        (
            (mercator_x(lon) - self.origin_x) * self.scale,
            (mercator_y(lat) - self.origin_y) * self.scale,
        )
    }

    /// The extent in world pixels at `zoom` with 256 px tiles, as
    /// `(left, top, right, bottom)`.
    #[must_use]
    pub fn world_pixel_bounds(&self, zoom: u8) -> (f64, f64, f64, f64) {
        let world = tiles_per_axis(zoom) * 256.0;
        (
            self.origin_x * world,
            self.origin_y * world,
            (self.origin_x + f64::from(self.width) / self.scale) * world,
            (self.origin_y + f64::from(self.height) / self.scale) * world,
        )
    }
}
