//! Figure composition: panel grid, title, legend and footer.

use chrono::{DateTime, Utc};
use fire_outlook_models::{ForecastDay, Region};
use image::{RgbaImage, imageops};

use crate::{
    draw::{Text, opaque},
    legend::{draw_legend, legend_entries},
    panel::render_panel,
    style,
};

const MARGIN: u32 = 20;
const GRID_GAP: u32 = 16;

/// Everything a figure needs besides the days themselves.
#[derive(Clone, Copy)]
pub struct FigureContext<'a> {
    pub region: Region,
    pub width: u32,
    pub height: u32,
    /// Cropped region basemap; `None` draws a flat background.
    pub basemap: Option<&'a RgbaImage>,
    /// Drawn in the lower right; `None` when no tiles are used.
    pub attribution: Option<&'a str>,
    pub text: Text<'a>,
    pub issued: DateTime<Utc>,
}

/// Renders the summary figure: up to four days in a 2x2 grid.
#[must_use]
pub fn render_summary(days: &[ForecastDay], ctx: &FigureContext<'_>) -> RgbaImage {
    let days: Vec<&ForecastDay> = days.iter().take(4).collect();
    compose(&days, 2, 2, ctx)
}

/// Renders a single day as its own figure.
#[must_use]
pub fn render_day(day: &ForecastDay, ctx: &FigureContext<'_>) -> RgbaImage {
    compose(&[day], 1, 1, ctx)
}

#[allow(
    clippy::cast_possible_wrap,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn compose(days: &[&ForecastDay], cols: u32, rows: u32, ctx: &FigureContext<'_>) -> RgbaImage {
    let (width, height) = (ctx.width.max(320), ctx.height.max(240));
    let mut canvas = RgbaImage::from_pixel(width, height, opaque(style::WHITE));

    let title_px = (height as f32 * 0.035).clamp(16.0, 48.0);
    let legend_px = (title_px * 0.6).max(12.0);
    let footer_px = (title_px * 0.45).max(10.0);

    let title_band = (title_px * 2.0) as u32;
    let footer_band = (footer_px * 2.5) as u32;
    let legend_band = width / 7;

    ctx.text.draw_centered(
        &mut canvas,
        ctx.region.title(),
        (width / 2) as i32,
        ((title_band as f32 - title_px) / 2.0) as i32,
        title_px,
        style::BLACK,
    );

    let grid_left = MARGIN;
    let grid_top = title_band;
    let grid_w = width.saturating_sub(MARGIN * 2 + legend_band);
    let grid_h = height.saturating_sub(title_band + footer_band);
    let cell_w = (grid_w.saturating_sub(GRID_GAP * (cols - 1)) / cols).max(1);
    let cell_h = (grid_h.saturating_sub(GRID_GAP * (rows - 1)) / rows).max(1);

    for (i, day) in days.iter().enumerate() {
        let i = i as u32;
        let (col, row) = (i % cols, i / cols);
        if row >= rows {
            break;
        }
        let panel = render_panel(day, ctx.basemap, ctx.text, cell_w, cell_h);
        imageops::overlay(
            &mut canvas,
            &panel,
            i64::from(grid_left + col * (cell_w + GRID_GAP)),
            i64::from(grid_top + row * (cell_h + GRID_GAP)),
        );
    }

    let entries = legend_entries(ctx.region, days);
    if draw_legend(
        &mut canvas,
        &entries,
        ctx.region.legend_title(),
        ctx.text,
        (width - MARGIN) as i32,
        title_band as i32,
        legend_px,
    )
    .is_none()
    {
        log::debug!("No categories to show, legend omitted");
    }

    let footer_y = (height - footer_band + (footer_band - footer_px as u32) / 2) as i32;
    let issued = format!("Issued: {} UTC", ctx.issued.format("%Y-%m-%d %H:%M"));
    ctx.text.draw(
        &mut canvas,
        &issued,
        MARGIN as i32,
        footer_y,
        footer_px,
        style::BLACK,
    );

    if let Some(attribution) = ctx.attribution {
        let (w, _) = ctx.text.size(attribution, footer_px);
        ctx.text.draw(
            &mut canvas,
            attribution,
            right_aligned(width - MARGIN, w),
            footer_y,
            footer_px,
            style::BLACK,
        );
    }

    canvas
}

/// Left edge of text `text_w` wide ending at `right`, pinned at zero when
/// the text is wider than the space.
#[allow(clippy::cast_possible_wrap)]
const fn right_aligned(right: u32, text_w: u32) -> i32 {
    right.saturating_sub(text_w) as i32
}
