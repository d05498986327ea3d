//! Label font resources.

use std::path::Path;

use ab_glyph::FontVec;
use fire_outlook_models::config::FontConfig;

use crate::RenderError;

/// Loads the label font.
///
/// A configured local path wins. Otherwise the font is read from the cache,
/// downloading it there first if it is missing.
///
/// # Errors
///
/// Returns [`RenderError`] if the font cannot be read, downloaded or
/// parsed.
pub async fn load_font(
    client: &reqwest::Client,
    config: &FontConfig,
) -> Result<FontVec, RenderError> {
    if let Some(path) = &config.path {
        log::debug!("Loading font from {}", path.display());
        return read_font(path);
    }

    let cache = config.resolved_cache_path();
    if cache.is_file() {
        log::debug!("Using cached font {}", cache.display());
        return read_font(&cache);
    }

    log::info!("Downloading font from {}", config.url);
    let resp = client.get(&config.url).send().await?;
    if !resp.status().is_success() {
        return Err(RenderError::Status {
            url: config.url.clone(),
            status: resp.status().as_u16(),
        });
    }
    let data = resp.bytes().await?.to_vec();
    let font = FontVec::try_from_vec(data.clone())?;

    if let Some(parent) = cache.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&cache, &data)?;

    Ok(font)
}

fn read_font(path: &Path) -> Result<FontVec, RenderError> {
    let data = std::fs::read(path)?;
    Ok(FontVec::try_from_vec(data)?)
}
