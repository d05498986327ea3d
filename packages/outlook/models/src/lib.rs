#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Forecast day and risk feature types for fire outlook maps.
//!
//! These types are the hand-off between the fetch, validation and render
//! stages. Every [`ForecastDay`] is built fresh from fetched payloads on each
//! run and is never mutated after it has been classified.

pub mod config;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use geo::{HasDimensions as _, MultiPolygon};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Number of forecast days shown on a summary map.
pub const MAX_WINDOW_DAYS: u8 = 4;

/// A forecast region with its own data source and map extent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Region {
    /// Continental United States (Storm Prediction Center).
    Us,
    /// Australia (Bureau of Meteorology).
    Au,
}

impl Region {
    /// Returns all regions in processing order.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Us, Self::Au]
    }

    /// Short code of the agency publishing this region's data. Used in
    /// output file names.
    #[must_use]
    pub const fn source_code(self) -> &'static str {
        match self {
            Self::Us => "spc",
            Self::Au => "bom",
        }
    }

    /// Figure title for this region's summary map.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Us => "Storm Prediction Center Fire Weather Outlooks",
            Self::Au => "Bureau of Meteorology Fire Danger Ratings",
        }
    }

    /// Title of the shared legend.
    #[must_use]
    pub const fn legend_title(self) -> &'static str {
        match self {
            Self::Us => "Fire Weather Outlook",
            Self::Au => "Fire Danger",
        }
    }

    /// WGS84 extent drawn for this region.
    #[must_use]
    pub const fn extent(self) -> Extent {
        match self {
            Self::Us => Extent {
                min_lon: -122.006_010_610_589_44,
                max_lon: -71.734_068_694_784_53,
                min_lat: 21.727_238_911_948_035,
                max_lat: 49.879_472_253_540_195,
            },
            Self::Au => Extent {
                min_lon: 105.338_953_078,
                max_lon: 161.569_469_029,
                min_lat: -42.034_597_263_4,
                max_lat: -8.568_185_723_5,
            },
        }
    }

    /// Whether this region publishes a separate dry-lightning layer.
    #[must_use]
    pub const fn has_dry_lightning(self) -> bool {
        matches!(self, Self::Us)
    }
}

/// A longitude/latitude bounding box in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    /// Western edge.
    pub min_lon: f64,
    /// Eastern edge.
    pub max_lon: f64,
    /// Southern edge.
    pub min_lat: f64,
    /// Northern edge.
    pub max_lat: f64,
}

/// The dataset a [`RiskFeature`] came from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LayerKind {
    /// SPC general fire weather outlook.
    FireWeather,
    /// SPC dry thunderstorm (dry lightning) risk areas.
    DryLightning,
    /// BOM fire danger rating districts.
    FireDanger,
}

/// Risk tier of a feature.
///
/// The three graded tiers are shared by both regions; each region labels
/// and colours them itself (SPC Elevated/Critical/Extreme, BOM
/// High/Extreme/Catastrophic).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum RiskCategory {
    /// Lowest graded tier.
    Elevated,
    /// Middle graded tier.
    Critical,
    /// Highest graded tier.
    Extreme,
    /// Dry thunderstorm risk area.
    DryLightning,
    /// Geometry is present but carries no risk (`dn == 0`).
    NoRisk,
    /// Non-zero SPC level outside the known table. Still active, but only
    /// drawn as an outline and never listed in the legend.
    Unrecognized(i64),
}

impl RiskCategory {
    /// Maps an SPC fire weather `dn` value to a category.
    ///
    /// Accepts both the `MapServer` codes (5/8/10) and the compact tier
    /// codes (2/3/4).
    #[must_use]
    pub const fn from_spc_level(dn: i64) -> Self {
        match dn {
            0 => Self::NoRisk,
            2 | 5 => Self::Elevated,
            3 | 8 => Self::Critical,
            4 | 10 => Self::Extreme,
            other => Self::Unrecognized(other),
        }
    }

    /// Maps a dry-lightning `dn` value to a category. Any non-zero level is
    /// a risk area.
    #[must_use]
    pub const fn from_dry_lightning_level(dn: i64) -> Self {
        if dn == 0 {
            Self::NoRisk
        } else {
            Self::DryLightning
        }
    }

    /// Maps a BOM fire danger rating (e.g. `"High"`) to a category.
    ///
    /// Returns `None` for text that is not an AFDRS rating.
    #[must_use]
    pub fn from_bom_rating(rating: &str) -> Option<Self> {
        match rating.trim().to_ascii_lowercase().as_str() {
            "no rating" | "none" | "moderate" => Some(Self::NoRisk),
            "high" => Some(Self::Elevated),
            "extreme" => Some(Self::Critical),
            "catastrophic" => Some(Self::Extreme),
            _ => None,
        }
    }

    /// Maps a BOM fire behaviour index to a category using the AFDRS
    /// bands.
    #[must_use]
    pub fn from_bom_index(index: f64) -> Self {
        if index >= 100.0 {
            Self::Extreme
        } else if index >= 50.0 {
            Self::Critical
        } else if index >= 24.0 {
            Self::Elevated
        } else {
            Self::NoRisk
        }
    }

    /// Whether this category counts as risk.
    #[must_use]
    pub const fn is_risk(self) -> bool {
        !matches!(self, Self::NoRisk)
    }

    /// Whether this category gets a legend entry.
    #[must_use]
    pub const fn in_legend(self) -> bool {
        matches!(
            self,
            Self::Elevated | Self::Critical | Self::Extreme | Self::DryLightning
        )
    }

    /// Legend label for this category in the given region.
    #[must_use]
    pub const fn label(self, region: Region) -> &'static str {
        match (region, self) {
            (Region::Us, Self::Elevated) => "Elevated",
            (Region::Us, Self::Critical) => "Critical",
            (Region::Us, Self::Extreme) | (Region::Au, Self::Critical) => "Extreme",
            (Region::Au, Self::Elevated) => "High",
            (Region::Au, Self::Extreme) => "Catastrophic",
            (_, Self::DryLightning) => "Dry Lightning",
            (_, Self::NoRisk) => "No Risk",
            (_, Self::Unrecognized(_)) => "Unrecognized",
        }
    }
}

/// Outcome of validating one layer for one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerStatus {
    /// No usable geometry was returned.
    NoData,
    /// Geometry was returned, but every feature has a zero risk level.
    NoRisk,
    /// At least one feature has geometry and a non-zero risk level.
    ActiveRisk,
}

impl LayerStatus {
    /// Whether the layer has anything to draw.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::ActiveRisk)
    }
}

/// Combined status of a day's general outlook and dry-lightning layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// Both layers have active risk.
    Both,
    /// Only the general outlook (or fire danger) layer has active risk.
    FireWeatherOnly,
    /// Only the dry-lightning layer has active risk.
    DryLightningOnly,
    /// Neither layer has active risk.
    NoConcerns,
}

impl DayStatus {
    /// Combines the two layer statuses. Regions without a dry-lightning
    /// layer pass `None`.
    #[must_use]
    pub const fn from_layers(primary: LayerStatus, dry_lightning: Option<LayerStatus>) -> Self {
        let dry_active = match dry_lightning {
            Some(status) => status.is_active(),
            None => false,
        };
        match (primary.is_active(), dry_active) {
            (true, true) => Self::Both,
            (true, false) => Self::FireWeatherOnly,
            (false, true) => Self::DryLightningOnly,
            (false, false) => Self::NoConcerns,
        }
    }

    /// Log message describing the status.
    #[must_use]
    pub const fn message(self, region: Region) -> &'static str {
        match (region, self) {
            (Region::Au, Self::FireWeatherOnly) => "Elevated fire danger ratings found",
            (Region::Au, Self::NoConcerns) => "No elevated fire danger ratings",
            (_, Self::Both) => "Both fire weather outlooks and dry lightning risk areas found",
            (_, Self::FireWeatherOnly) => "Fire weather outlooks found (no dry lightning risk)",
            (_, Self::DryLightningOnly) => {
                "Dry lightning risk areas found (no general fire weather outlooks)"
            }
            (_, Self::NoConcerns) => {
                "No active fire weather outlooks (no elevated fire weather conditions)"
            }
        }
    }

    /// Whether the map panel should show the "no concerns" indicator.
    #[must_use]
    pub const fn shows_no_concerns(self) -> bool {
        matches!(self, Self::NoConcerns)
    }
}

/// A single risk polygon (or multipolygon) from one layer.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskFeature {
    /// Geometry in WGS84 longitude/latitude.
    pub geometry: MultiPolygon<f64>,
    /// Classified risk tier.
    pub category: RiskCategory,
    /// Dataset the feature came from.
    pub layer: LayerKind,
    /// Raw risk level (`dn` for SPC, fire behaviour index for BOM).
    pub level: Option<f64>,
    /// Outline colour suggested by the source (SPC `fill` attribute).
    pub outline_hint: Option<[u8; 3]>,
}

impl RiskFeature {
    /// A feature is active iff its geometry is non-empty and its category
    /// is not [`RiskCategory::NoRisk`].
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.geometry.is_empty() && self.category.is_risk()
    }
}

/// All validated data for one forecast day in one region.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDay {
    /// Region the day belongs to.
    pub region: Region,
    /// 1-based position in the forecast window.
    pub day: u8,
    /// Calendar date of the forecast.
    pub date: NaiveDate,
    /// Features in source order, including no-risk ones.
    pub features: Vec<RiskFeature>,
    /// Status of the general outlook / fire danger layer.
    pub primary: LayerStatus,
    /// Status of the dry-lightning layer; `None` when the region has none.
    pub dry_lightning: Option<LayerStatus>,
}

impl ForecastDay {
    /// Combined status of the day's layers.
    #[must_use]
    pub const fn status(&self) -> DayStatus {
        DayStatus::from_layers(self.primary, self.dry_lightning)
    }

    /// Features that should be drawn.
    pub fn active_features(&self) -> impl Iterator<Item = &RiskFeature> {
        self.features.iter().filter(|f| f.is_active())
    }

    /// Legend categories present among the day's active features.
    #[must_use]
    pub fn legend_categories(&self) -> BTreeSet<RiskCategory> {
        self.active_features()
            .map(|f| f.category)
            .filter(|c| c.in_legend())
            .collect()
    }

    /// Label used in log lines (e.g. `"Day 2"`).
    #[must_use]
    pub fn label(&self) -> String {
        format!("Day {}", self.day)
    }
}
