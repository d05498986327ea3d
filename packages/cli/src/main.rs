#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! CLI entry point for the fire weather outlook maps.
//!
//! Fetches the SPC (US) and BOM (Australia) forecasts, classifies each
//! forecast day and writes one summary map per region to the output
//! directory.
//!
//! Uses `indicatif-log-bridge` (via [`fire_outlook_cli_utils::init_logger`])
//! to route `log` output through `indicatif::MultiProgress` so that log
//! lines and progress bars never fight for the terminal.

mod config;
mod pipeline;

use std::path::PathBuf;

use chrono::Utc;
use clap::{Parser, ValueEnum};
use fire_outlook_models::{MAX_WINDOW_DAYS, Region, config::OutlookConfig};
use fire_outlook_render::font;
use fire_outlook_source::client::build_client;

use crate::pipeline::{RunContext, run_region};

#[derive(Parser)]
#[command(name = "fire_outlook", about = "Fire weather outlook map generator")]
struct Cli {
    /// Which region(s) to render
    #[arg(long, value_enum, default_value_t = RegionArg::All)]
    region: RegionArg,
    /// Directory the maps are written to (overrides config and
    /// `FIRE_OUTLOOK_OUTPUT_DIR`)
    #[arg(long)]
    output_dir: Option<PathBuf>,
    /// TOML config file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of forecast days to render
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=i64::from(MAX_WINDOW_DAYS)))]
    days: Option<u8>,
    /// Also write one image per forecast day
    #[arg(long)]
    panels: bool,
    /// Skip basemap tiles and draw on a flat background
    #[arg(long)]
    no_basemap: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum RegionArg {
    Us,
    Au,
    All,
}

impl RegionArg {
    const fn regions(self) -> &'static [Region] {
        match self {
            Self::Us => &[Region::Us],
            Self::Au => &[Region::Au],
            Self::All => Region::all(),
        }
    }
}

impl Cli {
    fn apply(&self, config: &mut OutlookConfig) {
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if let Some(days) = self.days {
            config.window_days = days;
        }
        if self.panels {
            config.figure.write_panels = true;
        }
        if self.no_basemap {
            config.basemap.enabled = false;
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = fire_outlook_cli_utils::init_logger();
    let cli = Cli::parse();

    let mut config = config::load_file(cli.config.as_deref())?;
    config::apply_env(&mut config, |name| std::env::var(name).ok());
    cli.apply(&mut config);

    let client = build_client(&config.http)?;

    let font = match font::load_font(&client, &config.font).await {
        Ok(font) => Some(font),
        Err(e) => {
            log::warn!("Could not load label font, maps will have no text: {e}");
            None
        }
    };

    let ctx = RunContext {
        client: &client,
        config: &config,
        multi: &multi,
        font: font.as_ref(),
        issued: Utc::now(),
    };

    let mut failed = Vec::new();
    for &region in cli.region.regions() {
        log::info!("=== {} ===", region.title());
        match run_region(region, &ctx).await {
            Ok(written) => log::info!("{region}: wrote {} map(s)", written.len()),
            Err(e) => {
                log::error!("{region}: {e}");
                failed.push(region.to_string());
            }
        }
    }

    if !failed.is_empty() {
        return Err(format!("Failed region(s): {}", failed.join(", ")).into());
    }

    Ok(())
}
