//! Storm Prediction Center fire weather outlooks.

use crate::{SourceError, arcgis, progress::ProgressCallback, source_def::SpcSource};

/// Raw payloads of one SPC forecast day.
#[derive(Debug, Clone)]
pub struct SpcDayPayload {
    /// 1-based forecast day.
    pub day: u8,
    /// General fire weather outlook `GeoJSON`.
    pub fire_weather: serde_json::Value,
    /// Dry thunderstorm risk `GeoJSON`.
    pub dry_lightning: serde_json::Value,
}

/// Fetches both layers for each of the first `window` forecast days, in
/// day order.
///
/// # Errors
///
/// Returns [`SourceError`] on the first failed request. No further days
/// are fetched after a failure.
pub async fn fetch_outlooks(
    client: &reqwest::Client,
    source: &SpcSource,
    window: u8,
    progress: &dyn ProgressCallback,
) -> Result<Vec<SpcDayPayload>, SourceError> {
    log::info!("Getting {}", source.name);

    let mut payloads = Vec::with_capacity(usize::from(window));

    for layers in source.window(window) {
        progress.set_message(format!("SPC day {}", layers.day));

        let fire_weather = arcgis::fetch_layer(client, &layers.fire_weather_url, None).await?;
        let dry_lightning = arcgis::fetch_layer(client, &layers.dry_lightning_url, None).await?;

        payloads.push(SpcDayPayload {
            day: layers.day,
            fire_weather,
            dry_lightning,
        });
        progress.inc(1);
    }

    Ok(payloads)
}
