#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Forecast data fetching.
//!
//! Downloads the SPC fire weather outlook layers and the BOM fire danger
//! rating districts from their `ArcGIS` map services. Payloads are returned
//! as raw `GeoJSON` values; deciding what they mean is left to the
//! validation stage.

pub mod arcgis;
pub mod bom;
pub mod client;
pub mod progress;
pub mod registry;
pub mod source_def;
pub mod spc;

/// Errors that can occur while fetching forecast data.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    /// The server answered with a non-success status.
    #[error("{url} returned HTTP {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },

    /// A layer kept reporting more records without paging forward.
    #[error("Paging stalled for {url}: {reason}")]
    Paging {
        /// Layer URL.
        url: String,
        /// What went wrong.
        reason: String,
    },

    /// The `ArcGIS` service answered with an error body.
    #[error("ArcGIS error from {url}: {message}")]
    Api {
        /// Requested URL.
        url: String,
        /// Message reported by the service.
        message: String,
    },
}
