#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Turns fetched payloads into classified [`ForecastDay`]s.
//!
//! Each layer of each day ends up as no data, no risk (geometry with a zero
//! level) or active risk. The day builders log one status line per day so a
//! run's console output reads as a forecast summary.

pub mod classify;
pub mod summary;

pub use classify::{LayerClassification, classify_bom_features, classify_layer};

use chrono::{Days, NaiveDate};
use fire_outlook_models::{ForecastDay, LayerKind, LayerStatus, Region, RiskCategory};
use fire_outlook_source::{bom::ForecastPeriod, source_def::BomFieldMapping, spc::SpcDayPayload};

/// Builds a US forecast day from both SPC layers.
///
/// SPC day 1 is `today`; later days follow on consecutive dates.
#[must_use]
pub fn build_spc_day(payload: &SpcDayPayload, today: NaiveDate) -> ForecastDay {
    let fire_weather = classify_layer(&payload.fire_weather, LayerKind::FireWeather);
    let dry_lightning = classify_layer(&payload.dry_lightning, LayerKind::DryLightning);

    let date = today
        .checked_add_days(Days::new(u64::from(payload.day.saturating_sub(1))))
        .unwrap_or(today);

    let mut features = fire_weather.features;
    features.extend(dry_lightning.features);

    let day = ForecastDay {
        region: Region::Us,
        day: payload.day,
        date,
        features,
        primary: fire_weather.status,
        dry_lightning: Some(dry_lightning.status),
    };

    log_layer("fire weather", &day, fire_weather.status);
    log_layer("dry lightning", &day, dry_lightning.status);
    log::info!("  {}: {}", day.label(), day.status().message(Region::Us));

    day
}

/// Builds an Australian forecast day from one forecast period's districts.
///
/// `day` is the 1-based position of the period in the window.
#[must_use]
pub fn build_bom_day(period: &ForecastPeriod, day: u8, fields: &BomFieldMapping) -> ForecastDay {
    let fire_danger = classify_bom_features(&period.features, fields);

    let day = ForecastDay {
        region: Region::Au,
        day,
        date: period.date,
        features: fire_danger.features,
        primary: fire_danger.status,
        dry_lightning: None,
    };

    log_layer("fire danger", &day, fire_danger.status);
    log::info!(
        "  {} ({}): {}",
        day.label(),
        day.date,
        day.status().message(Region::Au)
    );

    day
}

fn log_layer(layer: &str, day: &ForecastDay, status: LayerStatus) {
    match status {
        LayerStatus::NoData => log::debug!("  {}: no {layer} data returned", day.label()),
        LayerStatus::NoRisk => {
            log::debug!("  {}: {layer} geometry present, all levels zero", day.label());
        }
        LayerStatus::ActiveRisk => {}
    }
}

/// Whether any day has a district rated Extreme or Catastrophic.
#[must_use]
pub fn has_extreme_or_catastrophic(days: &[ForecastDay]) -> bool {
    days.iter()
        .filter(|day| day.region == Region::Au)
        .flat_map(ForecastDay::active_features)
        .any(|f| matches!(f.category, RiskCategory::Critical | RiskCategory::Extreme))
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

    fn layer(geometry: serde_json::Value, dn: i64) -> serde_json::Value {
        json!({
            "type": "FeatureCollection",
            "features": [{"type": "Feature", "geometry": geometry, "properties": {"dn": dn}}]
        })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 1).unwrap()
    }

    fn fields() -> BomFieldMapping {
        BomFieldMapping {
            period: "Forecast_Period".to_string(),
            start_time: "Start_Time_UTC_str".to_string(),
            rating: "FireDanger".to_string(),
            index: "FireBehavIndex".to_string(),
            district: "DIST_NAME".to_string(),
        }
    }

    #[test]
    fn zero_level_day_has_no_concerns() {
        let payload = SpcDayPayload {
            day: 1,
            fire_weather: layer(polygon(), 0),
            dry_lightning: layer(serde_json::Value::Null, 0),
        };
        let day = build_spc_day(&payload, today());

        assert_eq!(day.status(), fire_outlook_models::DayStatus::NoConcerns);
        assert!(day.status().message(Region::Us).starts_with("No active fire weather outlooks"));
        assert_eq!(day.active_features().count(), 0);
        assert_eq!(day.primary, LayerStatus::NoRisk);
        assert_eq!(day.dry_lightning, Some(LayerStatus::NoData));
    }

    #[test]
    fn critical_day_without_dry_lightning() {
        let payload = SpcDayPayload {
            day: 3,
            fire_weather: layer(polygon(), 3),
            dry_lightning: json!({"type": "FeatureCollection", "features": [{"geometry": null}]}),
        };
        let day = build_spc_day(&payload, today());

        assert_eq!(
            day.status().message(Region::Us),
            "Fire weather outlooks found (no dry lightning risk)"
        );
        let active: Vec<_> = day.active_features().collect();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].category, RiskCategory::Critical);
        assert_eq!(day.date, NaiveDate::from_ymd_opt(2025, 7, 3).unwrap());
    }

    #[test]
    fn both_layers_active() {
        let payload = SpcDayPayload {
            day: 2,
            fire_weather: layer(polygon(), 8),
            dry_lightning: layer(polygon(), 2),
        };
        let day = build_spc_day(&payload, today());

        assert_eq!(
            day.status().message(Region::Us),
            "Both fire weather outlooks and dry lightning risk areas found"
        );
        assert_eq!(day.active_features().count(), 2);
    }

    #[test]
    fn bom_day_flags_extreme_ratings() {
        let period = ForecastPeriod {
            period: 0,
            date: today(),
            features: vec![
                json!({"geometry": polygon(), "properties": {"FireDanger": "High"}}),
                json!({"geometry": polygon(), "properties": {"FireDanger": "Catastrophic"}}),
            ],
        };
        let day = build_bom_day(&period, 1, &fields());

        assert_eq!(day.region, Region::Au);
        assert_eq!(day.dry_lightning, None);
        assert_eq!(day.status().message(Region::Au), "Elevated fire danger ratings found");
        assert!(has_extreme_or_catastrophic(&[day]));
    }

    #[test]
    fn high_ratings_alone_are_not_extreme() {
        let period = ForecastPeriod {
            period: 1,
            date: today(),
            features: vec![json!({"geometry": polygon(), "properties": {"FireDanger": "High"}})],
        };
        let day = build_bom_day(&period, 2, &fields());
        assert!(!has_extreme_or_catastrophic(&[day]));
    }
}
