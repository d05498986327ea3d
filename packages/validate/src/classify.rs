//! Per-layer classification of raw `GeoJSON` payloads.
//!
//! Geometry alone does not make a feature a risk area: the level field
//! (`dn` for SPC, the rating or fire behaviour index for BOM) must also be
//! non-zero. Malformed features are skipped rather than treated as errors.

use fire_outlook_models::{LayerKind, LayerStatus, RiskCategory, RiskFeature};
use fire_outlook_source::source_def::BomFieldMapping;
use geo::{HasDimensions as _, MultiPolygon};

/// SPC risk level attribute.
const LEVEL_FIELD: &str = "dn";

/// SPC outline colour attribute.
const FILL_FIELD: &str = "fill";

/// Status of one layer plus the features that were parsed from it.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerClassification {
    pub status: LayerStatus,
    pub features: Vec<RiskFeature>,
}

impl LayerClassification {
    const fn no_data() -> Self {
        Self {
            status: LayerStatus::NoData,
            features: Vec::new(),
        }
    }

    fn from_features(features: Vec<RiskFeature>) -> Self {
        let status = if features.is_empty() {
            LayerStatus::NoData
        } else if features.iter().any(RiskFeature::is_active) {
            LayerStatus::ActiveRisk
        } else {
            LayerStatus::NoRisk
        };
        Self { status, features }
    }
}

/// Classifies one SPC layer payload.
///
/// `kind` selects the level table: [`LayerKind::DryLightning`] maps every
/// non-zero level to [`RiskCategory::DryLightning`], anything else uses the
/// fire weather outlook table.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn classify_layer(payload: &serde_json::Value, kind: LayerKind) -> LayerClassification {
    let Some(features) = payload
        .get("features")
        .and_then(serde_json::Value::as_array)
    else {
        return LayerClassification::no_data();
    };

    let parsed = features
        .iter()
        .filter_map(|feature| {
            let geometry = feature_geometry(feature)?;
            let Some(dn) = property(feature, LEVEL_FIELD).and_then(as_level) else {
                log::debug!("Skipping {kind} feature without a {LEVEL_FIELD} value");
                return None;
            };

            let category = match kind {
                LayerKind::DryLightning => RiskCategory::from_dry_lightning_level(dn),
                LayerKind::FireWeather | LayerKind::FireDanger => {
                    RiskCategory::from_spc_level(dn)
                }
            };

            Some(RiskFeature {
                geometry,
                category,
                layer: kind,
                level: Some(dn as f64),
                outline_hint: property(feature, FILL_FIELD)
                    .and_then(serde_json::Value::as_str)
                    .and_then(parse_hex_color),
            })
        })
        .collect();

    LayerClassification::from_features(parsed)
}

/// Classifies BOM fire danger district features of one forecast period.
///
/// The rating text decides the tier; the fire behaviour index is only used
/// when the rating is missing or not an AFDRS rating.
#[must_use]
pub fn classify_bom_features(
    features: &[serde_json::Value],
    fields: &BomFieldMapping,
) -> LayerClassification {
    let parsed = features
        .iter()
        .filter_map(|feature| {
            let geometry = feature_geometry(feature)?;
            let index = property(feature, &fields.index).and_then(as_number);

            let category = property(feature, &fields.rating)
                .and_then(serde_json::Value::as_str)
                .and_then(RiskCategory::from_bom_rating)
                .or_else(|| index.map(RiskCategory::from_bom_index));

            let Some(category) = category else {
                log::debug!(
                    "Skipping district {:?} without rating or index",
                    property(feature, &fields.district)
                        .and_then(serde_json::Value::as_str)
                        .unwrap_or("unknown")
                );
                return None;
            };

            Some(RiskFeature {
                geometry,
                category,
                layer: LayerKind::FireDanger,
                level: index,
                outline_hint: None,
            })
        })
        .collect();

    LayerClassification::from_features(parsed)
}

fn property<'a>(feature: &'a serde_json::Value, name: &str) -> Option<&'a serde_json::Value> {
    feature.get("properties")?.get(name)
}

/// Parses a feature's geometry as a (multi)polygon. Missing, null, empty
/// and non-areal geometries yield `None`.
fn feature_geometry(feature: &serde_json::Value) -> Option<MultiPolygon<f64>> {
    let geom = feature.get("geometry")?;
    if geom.is_null() {
        return None;
    }

    let geom: geojson::Geometry = serde_json::from_value(geom.clone()).ok()?;
    let geo_geom: geo::Geometry<f64> = geom.try_into().ok()?;
    let multi = match geo_geom {
        geo::Geometry::MultiPolygon(mp) => mp,
        geo::Geometry::Polygon(p) => MultiPolygon(vec![p]),
        _ => return None,
    };

    if multi.is_empty() { None } else { Some(multi) }
}

/// Reads an integral level from an integer, a float without fractional
/// part, or a numeric string.
fn as_level(value: &serde_json::Value) -> Option<i64> {
    match value {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| integral(n.as_f64()?)),
        serde_json::Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| integral(s.parse::<f64>().ok()?))
        }
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0).then_some(f as i64)
}

fn as_number(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses `#RRGGBB`.
fn parse_hex_color(hex: &str) -> Option<[u8; 3]> {
    let hex = hex.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some([channel(0)?, channel(2)?, channel(4)?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn polygon() -> serde_json::Value {
        json!({
            "type": "Polygon",
            "coordinates": [[[-100.0, 35.0], [-99.0, 35.0], [-99.0, 36.0], [-100.0, 36.0], [-100.0, 35.0]]]
        })
    }

    fn collection(features: Vec<serde_json::Value>) -> serde_json::Value {
        json!({"type": "FeatureCollection", "features": features})
    }

    fn spc_feature(geometry: serde_json::Value, dn: serde_json::Value) -> serde_json::Value {
        json!({"type": "Feature", "geometry": geometry, "properties": {"dn": dn, "fill": "#FF0000"}})
    }

    #[test]
    fn zero_level_geometry_is_no_risk() {
        let result = classify_layer(
            &collection(vec![spc_feature(polygon(), json!(0))]),
            LayerKind::FireWeather,
        );
        assert_eq!(result.status, LayerStatus::NoRisk);
        assert_eq!(result.features.len(), 1);
        assert!(!result.features[0].is_active());
    }

    #[test]
    fn non_zero_level_geometry_is_active() {
        for (dn, category) in [
            (5, RiskCategory::Elevated),
            (8, RiskCategory::Critical),
            (10, RiskCategory::Extreme),
            (3, RiskCategory::Critical),
        ] {
            let result = classify_layer(
                &collection(vec![spc_feature(polygon(), json!(dn))]),
                LayerKind::FireWeather,
            );
            assert_eq!(result.status, LayerStatus::ActiveRisk);
            assert_eq!(result.features[0].category, category);
        }
    }

    #[test]
    fn missing_geometry_is_no_data_regardless_of_level() {
        for dn in [0, 3, 10] {
            let result = classify_layer(
                &collection(vec![spc_feature(serde_json::Value::Null, json!(dn))]),
                LayerKind::FireWeather,
            );
            assert_eq!(result.status, LayerStatus::NoData);
            assert!(result.features.is_empty());
        }

        let empty = json!({"type": "MultiPolygon", "coordinates": []});
        let result = classify_layer(
            &collection(vec![spc_feature(empty, json!(8))]),
            LayerKind::FireWeather,
        );
        assert_eq!(result.status, LayerStatus::NoData);
    }

    #[test]
    fn malformed_payloads_are_no_data() {
        for payload in [
            json!(null),
            json!([]),
            json!({"type": "FeatureCollection"}),
            json!({"features": "nope"}),
            collection(vec![]),
        ] {
            assert_eq!(
                classify_layer(&payload, LayerKind::FireWeather).status,
                LayerStatus::NoData
            );
        }

        let no_level = json!({"type": "Feature", "geometry": polygon(), "properties": {}});
        assert_eq!(
            classify_layer(&collection(vec![no_level]), LayerKind::FireWeather).status,
            LayerStatus::NoData
        );
    }

    #[test]
    fn levels_accept_floats_and_strings() {
        let result = classify_layer(
            &collection(vec![
                spc_feature(polygon(), json!(8.0)),
                spc_feature(polygon(), json!(" 10 ")),
                spc_feature(polygon(), json!(5.5)),
            ]),
            LayerKind::FireWeather,
        );
        assert_eq!(
            result
                .features
                .iter()
                .map(|f| f.category)
                .collect::<Vec<_>>(),
            vec![RiskCategory::Critical, RiskCategory::Extreme]
        );
    }

    #[test]
    fn unknown_level_stays_active_but_unrecognized() {
        let result = classify_layer(
            &collection(vec![spc_feature(polygon(), json!(7))]),
            LayerKind::FireWeather,
        );
        assert_eq!(result.status, LayerStatus::ActiveRisk);
        assert_eq!(result.features[0].category, RiskCategory::Unrecognized(7));
        assert_eq!(result.features[0].outline_hint, Some([255, 0, 0]));
    }

    #[test]
    fn dry_lightning_levels_are_binary() {
        let result = classify_layer(
            &collection(vec![
                spc_feature(polygon(), json!(0)),
                spc_feature(polygon(), json!(2)),
            ]),
            LayerKind::DryLightning,
        );
        assert_eq!(result.status, LayerStatus::ActiveRisk);
        assert_eq!(result.features[0].category, RiskCategory::NoRisk);
        assert_eq!(result.features[1].category, RiskCategory::DryLightning);
        assert_eq!(result.features[1].layer, LayerKind::DryLightning);
    }

    #[test]
    fn bom_rating_wins_over_index() {
        let fields = BomFieldMapping {
            period: "Forecast_Period".to_string(),
            start_time: "Start_Time_UTC_str".to_string(),
            rating: "FireDanger".to_string(),
            index: "FireBehavIndex".to_string(),
            district: "DIST_NAME".to_string(),
        };
        let features = vec![
            json!({"geometry": polygon(), "properties": {"FireDanger": "Extreme", "FireBehavIndex": 10}}),
            json!({"geometry": polygon(), "properties": {"FireDanger": null, "FireBehavIndex": "120"}}),
            json!({"geometry": polygon(), "properties": {"FireDanger": "Moderate", "FireBehavIndex": 12}}),
            json!({"geometry": polygon(), "properties": {"DIST_NAME": "Nowhere"}}),
        ];

        let result = classify_bom_features(&features, &fields);
        assert_eq!(result.status, LayerStatus::ActiveRisk);
        assert_eq!(
            result
                .features
                .iter()
                .map(|f| f.category)
                .collect::<Vec<_>>(),
            vec![
                RiskCategory::Critical,
                RiskCategory::Extreme,
                RiskCategory::NoRisk
            ]
        );
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#8B4513"), Some([0x8B, 0x45, 0x13]));
        assert_eq!(parse_hex_color("8B4513"), None);
        assert_eq!(parse_hex_color("#FFF"), None);
    }
}
