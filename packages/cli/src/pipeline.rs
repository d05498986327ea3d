//! Per-region pipeline: fetch, validate, render, write.

use std::path::PathBuf;

use ab_glyph::FontVec;
use chrono::{DateTime, NaiveDate, Utc};
use fire_outlook_cli_utils::{IndicatifProgress, MultiProgress};
use fire_outlook_models::{ForecastDay, Region, config::OutlookConfig};
use fire_outlook_render::{
    FigureContext, RenderError,
    basemap::{TileSource, fetch_basemap},
    draw::Text,
    output,
    projection::Projection,
    render_day, render_summary,
};
use fire_outlook_source::{SourceError, bom, registry, spc};
use fire_outlook_validate::{
    build_bom_day, build_spc_day, has_extreme_or_catastrophic, summary::RunSummary,
};

/// Errors that abort a region.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    /// Fetching forecast data failed.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Rendering or writing a map failed.
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// State shared by every region of a run.
pub struct RunContext<'a> {
    pub client: &'a reqwest::Client,
    pub config: &'a OutlookConfig,
    pub multi: &'a MultiProgress,
    pub font: Option<&'a FontVec>,
    pub issued: DateTime<Utc>,
}

impl RunContext<'_> {
    fn today(&self) -> NaiveDate {
        self.issued.date_naive()
    }
}

/// Runs the whole pipeline for one region and returns the written files.
///
/// # Errors
///
/// Returns [`PipelineError`] on the first fetch, basemap or write failure.
pub async fn run_region(
    region: Region,
    ctx: &RunContext<'_>,
) -> Result<Vec<PathBuf>, PipelineError> {
    let days = match region {
        Region::Us => fetch_us_days(ctx).await?,
        Region::Au => fetch_au_days(ctx).await?,
    };

    let summary = RunSummary::from_days(&days);
    log::info!("  {}", summary.message());

    if region == Region::Au && has_extreme_or_catastrophic(&days) {
        log::warn!("Extreme or Catastrophic fire danger ratings are forecast");
    }

    let basemap = if ctx.config.basemap.enabled {
        let projection = Projection::fit(
            region.extent(),
            ctx.config.figure.width,
            ctx.config.figure.height,
        );
        let source = TileSource::new(&ctx.config.basemap);
        Some(fetch_basemap(ctx.client, &source, &projection).await?)
    } else {
        log::debug!("Basemap disabled, using flat background");
        None
    };

    let figure = FigureContext {
        region,
        width: ctx.config.figure.width,
        height: ctx.config.figure.height,
        basemap: basemap.as_ref(),
        attribution: basemap
            .as_ref()
            .map(|_| ctx.config.basemap.attribution.as_str()),
        text: Text::new(ctx.font),
        issued: ctx.issued,
    };

    write_maps(region, &days, &figure, ctx)
}

async fn fetch_us_days(ctx: &RunContext<'_>) -> Result<Vec<ForecastDay>, SourceError> {
    let source = registry::spc_source();
    let window = ctx.config.window();

    let bar = IndicatifProgress::steps_bar(ctx.multi, "SPC outlooks", u64::from(window));
    let payloads = spc::fetch_outlooks(ctx.client, &source, window, bar.as_ref()).await;
    bar.finish(match &payloads {
        Ok(days) => format!("Fetched {} SPC day(s)", days.len()),
        Err(_) => "SPC fetch failed".to_string(),
    });
    let payloads = payloads?;

    let today = ctx.today();
    Ok(payloads
        .iter()
        .map(|payload| build_spc_day(payload, today))
        .collect())
}

async fn fetch_au_days(ctx: &RunContext<'_>) -> Result<Vec<ForecastDay>, SourceError> {
    let source = registry::bom_source();
    let features =
        bom::fetch_fire_danger(ctx.client, &source, ctx.config.bom_url.as_deref()).await?;

    let periods =
        bom::group_by_forecast_period(features, &source.fields, ctx.today(), ctx.config.window());

    Ok(periods
        .iter()
        .zip(1_u8..)
        .map(|(period, day)| build_bom_day(period, day, &source.fields))
        .collect())
}

fn write_maps(
    region: Region,
    days: &[ForecastDay],
    figure: &FigureContext<'_>,
    ctx: &RunContext<'_>,
) -> Result<Vec<PathBuf>, PipelineError> {
    let dir = &ctx.config.output_dir;
    output::ensure_dir(dir)?;

    let run_date = ctx.today();
    let mut written = Vec::new();

    let image = render_summary(days, figure);
    written.push(output::save_png(
        &image,
        dir,
        &output::summary_filename(region, run_date),
    )?);

    if ctx.config.figure.write_panels {
        for day in days {
            let image = render_day(day, figure);
            written.push(output::save_png(
                &image,
                dir,
                &output::panel_filename(region, run_date, day.day),
            )?);
        }
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone as _;
    use fire_outlook_models::{LayerStatus, config::FigureConfig};

    use super::*;

    fn quiet_day(day: u8, date: NaiveDate) -> ForecastDay {
        ForecastDay {
            region: Region::Us,
            day,
            date,
            features: Vec::new(),
            primary: LayerStatus::NoData,
            dry_lightning: Some(LayerStatus::NoData),
        }
    }

    fn written_maps(write_panels: bool) -> Vec<String> {
        let dir = std::env::temp_dir().join(format!(
            "fire_outlook_pipeline_{}_{write_panels}",
            std::process::id()
        ));

        let config = OutlookConfig {
            output_dir: dir.join("outputs"),
            figure: FigureConfig {
                width: 480,
                height: 270,
                write_panels,
            },
            ..OutlookConfig::default()
        };

        let client = reqwest::Client::new();
        let multi = MultiProgress::new();
        let ctx = RunContext {
            client: &client,
            config: &config,
            multi: &multi,
            font: None,
            issued: Utc.with_ymd_and_hms(2025, 10, 21, 6, 0, 0).unwrap(),
        };

        let today = ctx.today();
        let days: Vec<_> = (1..=3)
            .map(|n| quiet_day(n, today + chrono::Days::new(u64::from(n - 1))))
            .collect();
        let figure = FigureContext {
            region: Region::Us,
            width: config.figure.width,
            height: config.figure.height,
            basemap: None,
            attribution: None,
            text: Text::new(None),
            issued: ctx.issued,
        };

        let written = write_maps(Region::Us, &days, &figure, &ctx).unwrap();
        assert!(written.iter().all(|path| path.is_file()));

        let mut names: Vec<String> = written
            .iter()
            .filter_map(|path| path.file_name()?.to_str().map(ToString::to_string))
            .collect();
        names.sort();

        std::fs::remove_dir_all(&dir).unwrap();
        names
    }

    #[test]
    fn writes_one_summary_per_region() {
        assert_eq!(
            written_maps(false),
            vec!["fire_wx_outlook_spc_20251021.png".to_string()]
        );
    }

    #[test]
    fn panels_add_one_file_per_day() {
        assert_eq!(
            written_maps(true),
            vec![
                "fire_wx_outlook_spc_20251021.png".to_string(),
                "fire_wx_outlook_spc_20251021_day1.png".to_string(),
                "fire_wx_outlook_spc_20251021_day2.png".to_string(),
                "fire_wx_outlook_spc_20251021_day3.png".to_string(),
            ]
        );
    }
}
