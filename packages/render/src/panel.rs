//! A single day's map panel.

use fire_outlook_models::{ForecastDay, LayerKind};
use image::{RgbaImage, imageops};
use imageproc::rect::Rect;

use crate::{
    basemap::panel_background,
    draw::{Text, border, boxed, fill_path, multipolygon_path, opaque, stroke_path, with_pixmap},
    projection::Projection,
    style::{self, EDGE_WIDTH, feature_style},
};

/// Text shown on days without any active feature.
pub const NO_CONCERNS_TEXT: &str = "Limited Fire Weather Concerns";

/// Title format, e.g. `Monday Jul 01`.
pub const TITLE_FORMAT: &str = "%A %b %d";

/// Draws a day's map (background plus active features) at the
/// projection's size.
#[must_use]
pub fn render_map(
    day: &ForecastDay,
    projection: &Projection,
    basemap: Option<&RgbaImage>,
    text: Text<'_>,
    px: f32,
) -> RgbaImage {
    let mut map = panel_background(basemap, projection.width, projection.height);

    // Filled tiers first so that outline-only layers stay visible on top.
    let (outlines, filled): (Vec<_>, Vec<_>) = day.active_features().partition(|f| {
        f.layer == LayerKind::DryLightning
            || feature_style(day.region, f.category, f.outline_hint)
                .is_some_and(|s| s.fill.is_none())
    });

    with_pixmap(&mut map, |pixmap| {
        for feature in filled.iter().chain(outlines.iter()) {
            let Some(style) = feature_style(day.region, feature.category, feature.outline_hint)
            else {
                continue;
            };
            let Some(path) = multipolygon_path(&feature.geometry, projection) else {
                continue;
            };
            if let Some(fill) = style.fill {
                fill_path(pixmap, &path, fill);
            }
            stroke_path(pixmap, &path, style.edge, EDGE_WIDTH);
        }
    });

    if day.status().shows_no_concerns() {
        draw_no_concerns(&mut map, text, px);
    }

    border(
        &mut map,
        Rect::at(0, 0).of_size(projection.width, projection.height),
        opaque(style::BLACK),
        1,
    );

    map
}

/// Draws the "no concerns" box in the centre of the map.
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn draw_no_concerns(map: &mut RgbaImage, text: Text<'_>, px: f32) {
    let (map_w, map_h) = map.dimensions();
    let (text_w, text_h) = text.size(NO_CONCERNS_TEXT, px);
    let pad = (px / 2.0).max(6.0) as u32;

    let (box_w, box_h) = if text.is_available() {
        (text_w + 2 * pad, text_h + 2 * pad)
    } else {
        (map_w / 3, map_h / 10)
    };
    let box_w = box_w.clamp(1, map_w);
    let box_h = box_h.clamp(1, map_h);

    let left = ((map_w - box_w) / 2) as i32;
    let top = ((map_h - box_h) / 2) as i32;
    boxed(
        map,
        Rect::at(left, top).of_size(box_w, box_h),
        opaque(style::WHITE),
        opaque(style::GREEN),
        2,
    );
    text.draw(
        map,
        NO_CONCERNS_TEXT,
        left + pad as i32,
        top + pad as i32,
        px,
        style::GREEN,
    );
}

/// Draws a full panel (title above the map) into a `width` by `height`
/// cell. The map is centred horizontally below the title.
#[must_use]
#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
pub fn render_panel(
    day: &ForecastDay,
    basemap: Option<&RgbaImage>,
    text: Text<'_>,
    width: u32,
    height: u32,
) -> RgbaImage {
    let mut cell = RgbaImage::from_pixel(width, height, opaque(style::WHITE));

    let title_px = (f64::from(height) * 0.06).clamp(12.0, 32.0) as f32;
    let title_band = (title_px * 1.6) as u32;

    let map_height = height.saturating_sub(title_band).max(1);
    let projection = Projection::fit(day.region.extent(), width.max(1), map_height);
    let map = render_map(day, &projection, basemap, text, title_px * 0.75);

    let title = day.date.format(TITLE_FORMAT).to_string();
    text.draw_centered(
        &mut cell,
        &title,
        (width / 2) as i32,
        ((title_band as f32 - title_px) / 2.0) as i32,
        title_px,
        style::BLACK,
    );

    let map_left = (width - projection.width) / 2;
    imageops::overlay(&mut cell, &map, i64::from(map_left), i64::from(title_band));

    cell
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fire_outlook_models::{LayerStatus, Region, RiskCategory, RiskFeature};
    use geo::{MultiPolygon, polygon};
    use image::Rgba;

    fn day(features: Vec<RiskFeature>, primary: LayerStatus) -> ForecastDay {
        ForecastDay {
            region: Region::Us,
            day: 1,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            features,
            primary,
            dry_lightning: Some(LayerStatus::NoData),
        }
    }

    fn kansas(category: RiskCategory) -> RiskFeature {
        RiskFeature {
            geometry: MultiPolygon(vec![polygon![
                (x: -102.0, y: 37.0),
                (x: -94.6, y: 37.0),
                (x: -94.6, y: 40.0),
                (x: -102.0, y: 40.0),
            ]]),
            category,
            layer: LayerKind::FireWeather,
            level: None,
            outline_hint: None,
        }
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn pixel_at(map: &RgbaImage, projection: &Projection, lon: f64, lat: f64) -> Rgba<u8> {
        let (x, y) = projection.project(lon, lat);
        *map.get_pixel(x as u32, y as u32)
    }

    #[test]
    fn active_feature_is_filled() {
        let projection = Projection::fit(Region::Us.extent(), 600, 400);
        let map = render_map(
            &day(vec![kansas(RiskCategory::Critical)], LayerStatus::ActiveRisk),
            &projection,
            None,
            Text::new(None),
            16.0,
        );

        let inside = pixel_at(&map, &projection, -98.0, 38.5);
        assert_ne!(inside, crate::basemap::FLAT_LAND);
        assert!(inside[0] > inside[1]);
        assert_eq!(
            pixel_at(&map, &projection, -80.0, 30.0),
            crate::basemap::FLAT_LAND
        );
    }

    #[test]
    fn zero_level_feature_is_not_drawn() {
        let projection = Projection::fit(Region::Us.extent(), 600, 400);
        let map = render_map(
            &day(vec![kansas(RiskCategory::NoRisk)], LayerStatus::NoRisk),
            &projection,
            None,
            Text::new(None),
            16.0,
        );

        assert_eq!(
            pixel_at(&map, &projection, -101.5, 39.8),
            crate::basemap::FLAT_LAND
        );
        // No-concerns box sits in the middle of the map.
        assert_eq!(*map.get_pixel(300, map.height() / 2), opaque(style::WHITE));
    }

    #[test]
    fn panel_has_requested_size() {
        let panel = render_panel(
            &day(Vec::new(), LayerStatus::NoData),
            None,
            Text::new(None),
            480,
            360,
        );
        assert_eq!(panel.dimensions(), (480, 360));
    }
}
