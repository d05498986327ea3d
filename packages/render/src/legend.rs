//! Shared legend listing the categories drawn across a figure.

use std::collections::BTreeSet;

use fire_outlook_models::{ForecastDay, Region, RiskCategory};
use image::{Pixel as _, RgbaImage};
use imageproc::rect::Rect;

use crate::{
    draw::{Text, boxed, opaque},
    style::{self, legend_style},
};

const PADDING: u32 = 12;
const SWATCH_WIDTH: u32 = 36;
const SWATCH_HEIGHT: u32 = 20;
const ROW_GAP: u32 = 10;
const SWATCH_EDGE: u32 = 2;

/// One legend row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    pub label: &'static str,
    pub style: style::FeatureStyle,
}

/// Entries for the categories present among the active features of
/// `days`, in tier order. Empty when nothing is drawn.
#[must_use]
pub fn legend_entries(region: Region, days: &[&ForecastDay]) -> Vec<LegendEntry> {
    let categories: BTreeSet<RiskCategory> = days
        .iter()
        .flat_map(|day| day.legend_categories())
        .collect();

    categories
        .into_iter()
        .filter_map(|category| {
            legend_style(region, category).map(|style| LegendEntry {
                label: category.label(region),
                style,
            })
        })
        .collect()
}

/// Draws the legend with its top-right corner at `(right, top)`.
///
/// Returns the legend's bounds, or `None` if there were no entries and
/// nothing was drawn.
#[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
pub fn draw_legend(
    canvas: &mut RgbaImage,
    entries: &[LegendEntry],
    title: &str,
    text: Text<'_>,
    right: i32,
    top: i32,
    px: f32,
) -> Option<Rect> {
    if entries.is_empty() {
        return None;
    }

    let (title_w, title_h) = text.size(title, px);
    let label_w = entries
        .iter()
        .map(|e| text.size(e.label, px * 0.85).0)
        .max()
        .unwrap_or(0);

    let row_h = SWATCH_HEIGHT.max(text.size("Ag", px * 0.85).1);
    let title_block = if title_h > 0 { title_h + ROW_GAP } else { 0 };
    let width = (PADDING * 2 + SWATCH_WIDTH + PADDING + label_w).max(PADDING * 2 + title_w);
    let height = PADDING * 2 + title_block + entries.len() as u32 * (row_h + ROW_GAP) - ROW_GAP;

    let bounds = Rect::at(right - width as i32, top).of_size(width, height);
    boxed(canvas, bounds, opaque(style::WHITE), opaque(style::BLACK), 1);

    let left = bounds.left() + PADDING as i32;
    text.draw(canvas, title, left, top + PADDING as i32, px, style::BLACK);

    let mut y = top + (PADDING + title_block) as i32;
    for entry in entries {
        let swatch = Rect::at(left, y + ((row_h - SWATCH_HEIGHT) / 2) as i32)
            .of_size(SWATCH_WIDTH, SWATCH_HEIGHT);
        let fill = entry.style.fill.map_or(opaque(style::WHITE), |fill| {
            let mut swatch = opaque(style::WHITE);
            swatch.blend(&fill);
            swatch
        });
        boxed(canvas, swatch, fill, opaque(entry.style.edge), SWATCH_EDGE);

        text.draw(
            canvas,
            entry.label,
            left + (SWATCH_WIDTH + PADDING) as i32,
            y,
            px * 0.85,
            style::BLACK,
        );
        y += (row_h + ROW_GAP) as i32;
    }

    Some(bounds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use fire_outlook_models::{LayerKind, LayerStatus, RiskFeature};
    use geo::{MultiPolygon, polygon};
    use image::Rgba;

    fn day(categories: &[RiskCategory]) -> ForecastDay {
        ForecastDay {
            region: Region::Us,
            day: 1,
            date: NaiveDate::from_ymd_opt(2025, 7, 1).unwrap(),
            features: categories
                .iter()
                .map(|&category| RiskFeature {
                    geometry: MultiPolygon(vec![polygon![
                        (x: -100.0, y: 35.0),
                        (x: -99.0, y: 35.0),
                        (x: -99.0, y: 36.0),
                    ]]),
                    category,
                    layer: LayerKind::FireWeather,
                    level: None,
                    outline_hint: None,
                })
                .collect(),
            primary: LayerStatus::ActiveRisk,
            dry_lightning: Some(LayerStatus::NoData),
        }
    }

    #[test]
    fn lists_only_present_categories_in_tier_order() {
        let first = day(&[RiskCategory::Extreme, RiskCategory::NoRisk]);
        let second = day(&[RiskCategory::Elevated, RiskCategory::DryLightning]);
        let third = day(&[RiskCategory::Unrecognized(7)]);

        let labels: Vec<_> = legend_entries(Region::Us, &[&first, &second, &third])
            .into_iter()
            .map(|e| e.label)
            .collect();
        assert_eq!(labels, vec!["Elevated", "Extreme", "Dry Lightning"]);
    }

    #[test]
    fn empty_legend_is_not_drawn() {
        let quiet = day(&[RiskCategory::NoRisk]);
        let entries = legend_entries(Region::Us, &[&quiet]);
        assert!(entries.is_empty());

        let mut canvas = RgbaImage::from_pixel(200, 200, Rgba([1, 2, 3, 255]));
        let drawn = draw_legend(
            &mut canvas,
            &entries,
            "Fire Weather Outlook",
            Text::new(None),
            200,
            0,
            18.0,
        );
        assert!(drawn.is_none());
        assert!(canvas.pixels().all(|p| *p == Rgba([1, 2, 3, 255])));
    }

    #[test]
    fn draws_swatches_without_font() {
        let critical = day(&[RiskCategory::Critical]);
        let entries = legend_entries(Region::Us, &[&critical]);

        let mut canvas = RgbaImage::from_pixel(200, 200, Rgba([255, 255, 255, 255]));
        let bounds = draw_legend(
            &mut canvas,
            &entries,
            "Fire Weather Outlook",
            Text::new(None),
            200,
            0,
            18.0,
        )
        .unwrap();

        assert_eq!(bounds.right(), 199);
        assert!(canvas.pixels().any(|p| *p == opaque(style::DARK_RED)));
    }
}
