//! Fill and edge colours per risk category.

use fire_outlook_models::{Region, RiskCategory};
use image::{Rgb, Rgba};

/// Fill opacity of risk polygons.
pub const FILL_ALPHA: u8 = 128;

/// Edge width of risk polygons in pixels.
pub const EDGE_WIDTH: f32 = 2.0;

pub const ORANGE: Rgb<u8> = Rgb([255, 165, 0]);
pub const DARK_ORANGE: Rgb<u8> = Rgb([255, 140, 0]);
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);
pub const DARK_RED: Rgb<u8> = Rgb([139, 0, 0]);
pub const PURPLE: Rgb<u8> = Rgb([128, 0, 128]);
pub const INDIGO: Rgb<u8> = Rgb([0x4B, 0x00, 0x82]);
pub const YELLOW: Rgb<u8> = Rgb([255, 255, 0]);
pub const OLIVE_YELLOW: Rgb<u8> = Rgb([0xCC, 0xCC, 0x00]);
pub const SADDLE_BROWN: Rgb<u8> = Rgb([139, 69, 19]);
pub const GREEN: Rgb<u8> = Rgb([0, 128, 0]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// How one feature is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureStyle {
    /// Semi-transparent fill; `None` for outline-only styles.
    pub fill: Option<Rgba<u8>>,
    /// Edge colour.
    pub edge: Rgb<u8>,
}

impl FeatureStyle {
    const fn filled(fill: Rgb<u8>, edge: Rgb<u8>) -> Self {
        let Rgb([r, g, b]) = fill;
        Self {
            fill: Some(Rgba([r, g, b, FILL_ALPHA])),
            edge,
        }
    }

    const fn outline(edge: Rgb<u8>) -> Self {
        Self { fill: None, edge }
    }
}

/// Style of a category in a region. `hint` is the outline colour the
/// source suggested, used for categories without a fixed colour.
///
/// Returns `None` for [`RiskCategory::NoRisk`], which is never drawn.
#[must_use]
pub const fn feature_style(
    region: Region,
    category: RiskCategory,
    hint: Option<[u8; 3]>,
) -> Option<FeatureStyle> {
    let style = match (region, category) {
        (_, RiskCategory::NoRisk) => return None,
        (Region::Us, RiskCategory::Elevated) | (Region::Au, RiskCategory::Critical) => {
            FeatureStyle::filled(ORANGE, DARK_ORANGE)
        }
        (Region::Us, RiskCategory::Critical) | (Region::Au, RiskCategory::Extreme) => {
            FeatureStyle::filled(RED, DARK_RED)
        }
        (Region::Us, RiskCategory::Extreme) => FeatureStyle::filled(PURPLE, INDIGO),
        (Region::Au, RiskCategory::Elevated) => FeatureStyle::filled(YELLOW, OLIVE_YELLOW),
        (_, RiskCategory::DryLightning) => FeatureStyle::outline(SADDLE_BROWN),
        (_, RiskCategory::Unrecognized(_)) => match hint {
            Some(rgb) => FeatureStyle::outline(Rgb(rgb)),
            None => FeatureStyle::outline(BLACK),
        },
    };
    Some(style)
}

/// Legend swatch for a category. Hints are ignored so that every day's
/// entry looks the same.
#[must_use]
pub const fn legend_style(region: Region, category: RiskCategory) -> Option<FeatureStyle> {
    feature_style(region, category, None)
}
