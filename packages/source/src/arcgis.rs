//! `ArcGIS` `MapServer` / `FeatureServer` layer fetcher.
//!
//! Queries `{layer_url}/query` with `f=geojson` to get standard `GeoJSON`
//! output. The first request carries no paging parameters because not every
//! `MapServer` layer supports them; follow-up pages are only requested with
//! `resultOffset` when the server sets `exceededTransferLimit`.

use crate::SourceError;

/// Default number of records requested per follow-up page.
const DEFAULT_PAGE_SIZE: u32 = 1000;

/// Upper bound on requests per layer, first page included.
const MAX_PAGES: usize = 100;

/// One parsed response page.
#[derive(Debug)]
struct Page {
    /// The full response body.
    body: serde_json::Value,
    /// Number of features on this page, `None` if the body has no
    /// `features` array.
    feature_count: Option<usize>,
    /// Whether the server holds more records beyond this page.
    exceeded: bool,
}

/// Builds the query URL for a layer.
#[must_use]
pub fn query_url(layer_url: &str, offset: Option<(u64, u32)>) -> String {
    let base = layer_url.trim_end_matches('/');
    let mut url = format!(
        "{base}/query\
         ?where=1%3D1\
         &outFields=*\
         &f=geojson\
         &returnGeometry=true"
    );
    if let Some((offset, page_size)) = offset {
        url.push_str(&format!(
            "&resultOffset={offset}&resultRecordCount={page_size}"
        ));
    }
    url
}

/// Fetches every feature of a layer as a single `GeoJSON`
/// `FeatureCollection`.
///
/// A body without a `features` array is returned unchanged so that the
/// validation stage can classify it as "no data".
///
/// # Errors
///
/// Returns [`SourceError`] if a request fails, the server answers with a
/// non-success status or an `ArcGIS` error body, or the body is not JSON.
pub async fn fetch_layer(
    client: &reqwest::Client,
    layer_url: &str,
    page_size: Option<u32>,
) -> Result<serde_json::Value, SourceError> {
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE);

    let first = fetch_page(client, &query_url(layer_url, None)).await?;
    let Some(first_count) = first.feature_count else {
        log::debug!("{layer_url}: response has no features array");
        return Ok(first.body);
    };

    let mut collection = first.body;
    let mut last_page = page_features(&collection);
    let mut exceeded = first.exceeded;
    let mut fetched = first_count as u64;
    let mut pages = 1;

    while exceeded {
        if pages >= MAX_PAGES {
            return Err(SourceError::Paging {
                url: layer_url.to_string(),
                reason: format!("still more records after {MAX_PAGES} pages"),
            });
        }

        let url = query_url(layer_url, Some((fetched, page_size)));
        log::debug!("{layer_url}: fetching page at offset {fetched}");

        let mut page = fetch_page(client, &url).await?;
        pages += 1;

        let features = page_features(&page.body);
        if features.is_empty() {
            break;
        }
        // Servers without paging support answer every offset with the
        // first page.
        if features == last_page {
            return Err(SourceError::Paging {
                url: layer_url.to_string(),
                reason: format!("offset {fetched} returned the previous page again"),
            });
        }

        fetched += features.len() as u64;
        append_features(&mut collection, std::mem::take(&mut page.body));
        last_page = features;
        exceeded = page.exceeded;
    }

    if let Some(obj) = collection.as_object_mut() {
        obj.remove("exceededTransferLimit");
    }

    log::debug!("{layer_url}: {fetched} features");
    Ok(collection)
}

async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<Page, SourceError> {
    let resp = client.get(url).send().await?;
    if !resp.status().is_success() {
        return Err(SourceError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }
    let body = resp.text().await?;
    parse_page(url, &body)
}

/// Parses a response body, turning `ArcGIS` error bodies (which are sent
/// with HTTP 200) into [`SourceError::Api`].
fn parse_page(url: &str, body: &str) -> Result<Page, SourceError> {
    let json: serde_json::Value = serde_json::from_str(body)?;

    if let Some(error) = json.get("error") {
        return Err(SourceError::Api {
            url: url.to_string(),
            message: error
                .get("message")
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_string(),
        });
    }

    let feature_count = json
        .get("features")
        .and_then(serde_json::Value::as_array)
        .map(Vec::len);

    // Services answering with `f=geojson` put the flag either at the top
    // level or under `properties`.
    let exceeded = json
        .get("exceededTransferLimit")
        .or_else(|| json.pointer("/properties/exceededTransferLimit"))
        .and_then(serde_json::Value::as_bool)
        .unwrap_or(false);

    Ok(Page {
        body: json,
        feature_count,
        exceeded,
    })
}

fn page_features(body: &serde_json::Value) -> Vec<serde_json::Value> {
    body.get("features")
        .and_then(serde_json::Value::as_array)
        .cloned()
        .unwrap_or_default()
}

fn append_features(collection: &mut serde_json::Value, mut page: serde_json::Value) {
    let Some(new_features) = page
        .get_mut("features")
        .and_then(serde_json::Value::as_array_mut)
        .map(std::mem::take)
    else {
        return;
    };

    if let Some(features) = collection
        .get_mut("features")
        .and_then(serde_json::Value::as_array_mut)
    {
        features.extend(new_features);
    }
}
