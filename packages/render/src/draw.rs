//! Polygon and text primitives on RGBA canvases.

use ab_glyph::{FontVec, PxScale};
use geo::MultiPolygon;
use image::{Rgb, Rgba, RgbaImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size},
    rect::Rect,
};
use tiny_skia::{Color, FillRule, Paint, Path, PathBuilder, PixmapMut, Shader, Stroke, Transform};

use crate::projection::Projection;

/// Opaque RGBA from an RGB colour.
#[must_use]
pub const fn opaque(Rgb([r, g, b]): Rgb<u8>) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

/// Runs `draw` on a `tiny-skia` view of `canvas`.
///
/// `tiny-skia` reads the bytes as premultiplied RGBA, so the canvas must be
/// opaque.
pub fn with_pixmap(canvas: &mut RgbaImage, draw: impl FnOnce(&mut PixmapMut<'_>)) {
    let (width, height) = canvas.dimensions();
    match PixmapMut::from_bytes(canvas, width, height) {
        Some(mut pixmap) => draw(&mut pixmap),
        None => log::warn!("Cannot draw on a {width}x{height} canvas"),
    }
}

/// Projects every ring of `geometry` into one closed path. Returns `None`
/// when nothing drawable is left.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn multipolygon_path(geometry: &MultiPolygon<f64>, projection: &Projection) -> Option<Path> {
    let mut builder = PathBuilder::new();

    for polygon in geometry {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            let mut points = ring.coords().map(|c| projection.project(c.x, c.y));
            let Some((x, y)) = points.next() else {
                continue;
            };
            builder.move_to(x as f32, y as f32);
            for (x, y) in points {
                builder.line_to(x as f32, y as f32);
            }
            builder.close();
        }
    }

    builder.finish()
}

fn solid(Rgba([r, g, b, a]): Rgba<u8>) -> Paint<'static> {
    Paint {
        shader: Shader::SolidColor(Color::from_rgba8(r, g, b, a)),
        anti_alias: true,
        ..Default::default()
    }
}

/// Fills `path` with `color`, blended over the canvas. Interior rings cut
/// holes (even-odd rule).
pub fn fill_path(pixmap: &mut PixmapMut<'_>, path: &Path, color: Rgba<u8>) {
    pixmap.fill_path(
        path,
        &solid(color),
        FillRule::EvenOdd,
        Transform::identity(),
        None,
    );
}

/// Strokes the outline of `path`, `width` pixels wide.
pub fn stroke_path(pixmap: &mut PixmapMut<'_>, path: &Path, color: Rgb<u8>, width: f32) {
    pixmap.stroke_path(
        path,
        &solid(opaque(color)),
        &Stroke {
            width,
            ..Default::default()
        },
        Transform::identity(),
        None,
    );
}

/// Draws a rectangle outline `width` pixels wide, growing inwards.
#[allow(clippy::cast_possible_wrap)]
pub fn border(canvas: &mut RgbaImage, rect: Rect, color: Rgba<u8>, width: u32) {
    for inset in 0..width {
        if rect.width() <= 2 * inset || rect.height() <= 2 * inset {
            break;
        }
        let inner = Rect::at(rect.left() + inset as i32, rect.top() + inset as i32)
            .of_size(rect.width() - 2 * inset, rect.height() - 2 * inset);
        draw_hollow_rect_mut(canvas, inner, color);
    }
}

/// A filled box with an outline.
pub fn boxed(canvas: &mut RgbaImage, rect: Rect, fill: Rgba<u8>, edge: Rgba<u8>, width: u32) {
    draw_filled_rect_mut(canvas, rect, fill);
    border(canvas, rect, edge, width);
}

/// Text renderer with an optional font. Without a font nothing is drawn
/// and every measured string is empty.
#[derive(Clone, Copy)]
pub struct Text<'a> {
    font: Option<&'a FontVec>,
}

impl<'a> Text<'a> {
    #[must_use]
    pub const fn new(font: Option<&'a FontVec>) -> Self {
        Self { font }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.font.is_some()
    }

    /// Width and height of `text` at `px` pixels.
    #[must_use]
    pub fn size(&self, text: &str, px: f32) -> (u32, u32) {
        self.font
            .map_or((0, 0), |font| text_size(PxScale::from(px), font, text))
    }

    /// Draws `text` with its top-left corner at `(x, y)`.
    pub fn draw(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        x: i32,
        y: i32,
        px: f32,
        color: Rgb<u8>,
    ) {
        if let Some(font) = self.font {
            draw_text_mut(canvas, opaque(color), x, y, PxScale::from(px), font, text);
        }
    }

    /// Draws `text` horizontally centred on `center_x`.
    #[allow(clippy::cast_possible_wrap)]
    pub fn draw_centered(
        &self,
        canvas: &mut RgbaImage,
        text: &str,
        center_x: i32,
        y: i32,
        px: f32,
        color: Rgb<u8>,
    ) {
        let (w, _) = self.size(text, px);
        self.draw(canvas, text, center_x - (w / 2) as i32, y, px, color);
    }
}
