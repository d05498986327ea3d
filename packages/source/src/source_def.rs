//! Endpoint definitions for the forecast sources.
//!
//! Deserialized from the TOML files under `packages/source/sources/`.

use serde::{Deserialize, Serialize};

/// The SPC fire weather outlook service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpcSource {
    /// Unique source identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Layer URLs for each forecast day, in day order.
    pub days: Vec<SpcDayLayers>,
}

impl SpcSource {
    /// Layer definitions for the first `window` days.
    #[must_use]
    pub fn window(&self, window: u8) -> &[SpcDayLayers] {
        let n = usize::from(window).min(self.days.len());
        &self.days[..n]
    }
}

/// The two `MapServer` layers published for one SPC forecast day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpcDayLayers {
    /// 1-based forecast day.
    pub day: u8,
    /// General fire weather outlook layer (up to the layer id, without
    /// `/query`).
    pub fire_weather_url: String,
    /// Dry thunderstorm layer.
    pub dry_lightning_url: String,
}

/// The BOM fire danger rating service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomSource {
    /// Unique source identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Layer URL (without `/query`).
    pub url: String,
    /// Records requested per page (default: 1000).
    pub page_size: Option<u32>,
    /// Attribute names of the district features.
    pub fields: BomFieldMapping,
}

/// Attribute names used by the BOM district features.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BomFieldMapping {
    /// Forecast period number (0 = today).
    pub period: String,
    /// Period start as an ISO-8601 UTC string, e.g.
    /// `"2025-10-22T13:00:00Z"`.
    pub start_time: String,
    /// AFDRS rating text.
    pub rating: String,
    /// Fire behaviour index.
    pub index: String,
    /// District name, used in log output.
    pub district: String,
}

/// Parses an [`SpcSource`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_spc_toml(toml_str: &str) -> Result<SpcSource, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

/// Parses a [`BomSource`] from a TOML string.
///
/// # Errors
///
/// Returns an error if the TOML is malformed or missing required fields.
pub fn parse_bom_toml(toml_str: &str) -> Result<BomSource, String> {
    toml::de::from_str(toml_str).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_truncates_days() {
        let source = parse_spc_toml(
            r#"
            id = "spc"
            name = "SPC"

            [[days]]
            day = 1
            fire_weather_url = "https://example.com/1"
            dry_lightning_url = "https://example.com/2"

            [[days]]
            day = 2
            fire_weather_url = "https://example.com/4"
            dry_lightning_url = "https://example.com/5"
            "#,
        )
        .unwrap();

        assert_eq!(source.window(1).len(), 1);
        assert_eq!(source.window(4).len(), 2);
        assert_eq!(source.window(1)[0].day, 1);
    }

    #[test]
    fn rejects_missing_fields() {
        assert!(parse_bom_toml("id = \"bom\"\nname = \"BOM\"").is_err());
    }
}
