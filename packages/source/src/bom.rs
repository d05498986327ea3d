//! Bureau of Meteorology fire danger ratings.
//!
//! The service returns one feature per fire weather district per forecast
//! period. [`group_by_forecast_period`] splits them into one group per day.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::{
    SourceError, arcgis,
    source_def::{BomFieldMapping, BomSource},
};

/// District features of one forecast period.
#[derive(Debug, Clone)]
pub struct ForecastPeriod {
    /// Period number as published (0 = today).
    pub period: i64,
    /// Calendar date of the period.
    pub date: NaiveDate,
    /// Raw `GeoJSON` features of the period.
    pub features: Vec<serde_json::Value>,
}

/// Fetches every district feature for all forecast periods.
///
/// `url_override` replaces the source's configured layer URL.
///
/// # Errors
///
/// Returns [`SourceError`] if the request fails or the response cannot be
/// parsed.
pub async fn fetch_fire_danger(
    client: &reqwest::Client,
    source: &BomSource,
    url_override: Option<&str>,
) -> Result<Vec<serde_json::Value>, SourceError> {
    log::info!("Fetching {}...", source.name);

    let url = url_override.unwrap_or(&source.url);
    let collection = arcgis::fetch_layer(client, url, source.page_size).await?;

    let features = match collection {
        serde_json::Value::Object(mut obj) => match obj.remove("features") {
            Some(serde_json::Value::Array(features)) => features,
            _ => Vec::new(),
        },
        _ => Vec::new(),
    };

    log::info!("  Total features: {}", features.len());
    Ok(features)
}

/// Groups district features by forecast period, in ascending period order,
/// keeping at most `window` groups.
///
/// Each group is dated from the date part of the start time of its first
/// feature. Groups without a parseable start time are skipped. If no
/// feature carries a period at all, everything becomes a single group
/// dated `today`.
#[must_use]
pub fn group_by_forecast_period(
    features: Vec<serde_json::Value>,
    fields: &BomFieldMapping,
    today: NaiveDate,
    window: u8,
) -> Vec<ForecastPeriod> {
    let has_periods = features
        .iter()
        .any(|f| property_i64(f, &fields.period).is_some());

    if !has_periods {
        log::warn!("  No {} attribute found, using current date", fields.period);
        if features.is_empty() {
            return Vec::new();
        }
        return vec![ForecastPeriod {
            period: 0,
            date: today,
            features,
        }];
    }

    let mut by_period: BTreeMap<i64, Vec<serde_json::Value>> = BTreeMap::new();
    for feature in features {
        match property_i64(&feature, &fields.period) {
            Some(period) => by_period.entry(period).or_default().push(feature),
            None => log::debug!("Dropping feature without {}", fields.period),
        }
    }

    log::info!(
        "  Found forecast periods: {:?}",
        by_period.keys().collect::<Vec<_>>()
    );

    by_period
        .into_iter()
        .filter_map(|(period, features)| {
            let date = features
                .first()
                .and_then(|f| property_str(f, &fields.start_time))
                .and_then(parse_start_date);

            if let Some(date) = date {
                Some(ForecastPeriod {
                    period,
                    date,
                    features,
                })
            } else {
                log::warn!("  No {} found for period {period}", fields.start_time);
                None
            }
        })
        .take(usize::from(window))
        .collect()
}

/// Extracts the date from a start time such as `"2025-10-22T13:00:00Z"`.
fn parse_start_date(start_time: &str) -> Option<NaiveDate> {
    let date_part = start_time.split('T').next()?.trim();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn property<'a>(feature: &'a serde_json::Value, name: &str) -> Option<&'a serde_json::Value> {
    feature.get("properties")?.get(name)
}

fn property_str<'a>(feature: &'a serde_json::Value, name: &str) -> Option<&'a str> {
    property(feature, name)?.as_str()
}

fn property_i64(feature: &serde_json::Value, name: &str) -> Option<i64> {
    match property(feature, name)? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields() -> BomFieldMapping {
        BomFieldMapping {
            period: "Forecast_Period".to_string(),
            start_time: "Start_Time_UTC_str".to_string(),
            rating: "FireDanger".to_string(),
            index: "FireBehavIndex".to_string(),
            district: "DIST_NAME".to_string(),
        }
    }

    fn district(period: serde_json::Value, start: Option<&str>) -> serde_json::Value {
        json!({
            "type": "Feature",
            "geometry": null,
            "properties": {
                "Forecast_Period": period,
                "Start_Time_UTC_str": start,
                "DIST_NAME": "Central Ranges",
            }
        })
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 10, 21).unwrap()
    }

    #[test]
    fn groups_in_ascending_period_order() {
        let features = vec![
            district(json!(2), Some("2025-10-23T13:00:00Z")),
            district(json!(0), Some("2025-10-21T13:00:00Z")),
            district(json!("1"), Some("2025-10-22T13:00:00Z")),
            district(json!(0), Some("2025-10-21T13:00:00Z")),
        ];

        let periods = group_by_forecast_period(features, &fields(), today(), 4);

        assert_eq!(
            periods.iter().map(|p| p.period).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        assert_eq!(periods[0].features.len(), 2);
        assert_eq!(
            periods[1].date,
            NaiveDate::from_ymd_opt(2025, 10, 22).unwrap()
        );
    }

    #[test]
    fn keeps_at_most_window_periods() {
        let features = (0..6)
            .map(|p| district(json!(p), Some("2025-10-21T13:00:00Z")))
            .collect();
        assert_eq!(
            group_by_forecast_period(features, &fields(), today(), 4).len(),
            4
        );
    }

    #[test]
    fn skips_periods_without_start_time() {
        let features = vec![
            district(json!(0), None),
            district(json!(1), Some("2025-10-22T13:00:00Z")),
        ];
        let periods = group_by_forecast_period(features, &fields(), today(), 4);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].period, 1);
    }

    #[test]
    fn falls_back_to_today_without_periods() {
        let features = vec![json!({"type": "Feature", "properties": {"DIST_NAME": "x"}})];
        let periods = group_by_forecast_period(features, &fields(), today(), 4);
        assert_eq!(periods.len(), 1);
        assert_eq!(periods[0].date, today());
    }

    #[test]
    fn empty_input_yields_no_periods() {
        assert!(group_by_forecast_period(Vec::new(), &fields(), today(), 4).is_empty());
    }
}
