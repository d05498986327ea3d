//! Writes rendered figures to the output directory.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use fire_outlook_models::Region;
use image::RgbaImage;

use crate::RenderError;

/// Creates `dir` (and its parents) if it does not exist yet.
///
/// # Errors
///
/// Returns [`RenderError::Io`] if the directory cannot be created.
pub fn ensure_dir(dir: &Path) -> Result<(), RenderError> {
    if !dir.is_dir() {
        log::info!("Creating output directory {}", dir.display());
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// `fire_wx_outlook_{spc|bom}_{YYYYMMDD}.png`
#[must_use]
pub fn summary_filename(region: Region, run_date: NaiveDate) -> String {
    format!(
        "fire_wx_outlook_{}_{}.png",
        region.source_code(),
        run_date.format("%Y%m%d")
    )
}

/// `fire_wx_outlook_{spc|bom}_{YYYYMMDD}_day{N}.png`
#[must_use]
pub fn panel_filename(region: Region, run_date: NaiveDate, day: u8) -> String {
    format!(
        "fire_wx_outlook_{}_{}_day{day}.png",
        region.source_code(),
        run_date.format("%Y%m%d")
    )
}

/// Saves `image` as PNG under `dir` and returns the full path. An existing
/// file of the same name is overwritten.
///
/// # Errors
///
/// Returns [`RenderError`] if the file cannot be encoded or written.
pub fn save_png(image: &RgbaImage, dir: &Path, filename: &str) -> Result<PathBuf, RenderError> {
    let path = dir.join(filename);
    image.save_with_format(&path, image::ImageFormat::Png)?;
    log::info!("Saved {}", path.display());
    Ok(path)
}
