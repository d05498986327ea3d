//! End-of-run counts across all forecast days of a region.

use fire_outlook_models::{ForecastDay, Region};

/// Number of days with active risk, per layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub region: Option<Region>,
    pub fire_weather_days: usize,
    pub dry_lightning_days: usize,
}

impl RunSummary {
    #[must_use]
    pub fn from_days(days: &[ForecastDay]) -> Self {
        Self {
            region: days.first().map(|d| d.region),
            fire_weather_days: days.iter().filter(|d| d.primary.is_active()).count(),
            dry_lightning_days: days
                .iter()
                .filter(|d| d.dry_lightning.is_some_and(|s| s.is_active()))
                .count(),
        }
    }

    #[must_use]
    pub const fn any_active(&self) -> bool {
        self.fire_weather_days > 0 || self.dry_lightning_days > 0
    }

    /// Summary line logged after the last day.
    #[must_use]
    pub fn message(&self) -> String {
        if self.region == Some(Region::Au) {
            return if self.fire_weather_days > 0 {
                format!(
                    "Summary: {} day(s) with elevated fire danger ratings",
                    self.fire_weather_days
                )
            } else {
                "No elevated fire danger ratings found for any forecast day.".to_string()
            };
        }

        match (self.fire_weather_days, self.dry_lightning_days) {
            (0, 0) => "No active fire weather outlooks found for any forecast day.".to_string(),
            (fw, 0) => format!("Summary: {fw} day(s) with fire weather outlooks found"),
            (0, dl) => format!("Summary: {dl} day(s) with dry lightning risk areas found"),
            (fw, dl) => format!(
                "Summary: {fw} day(s) with fire weather outlooks, {dl} day(s) with dry lightning risk"
            ),
        }
    }
}
