//! Shared HTTP client construction.

use std::time::Duration;

use fire_outlook_models::config::HttpConfig;

use crate::SourceError;

/// Builds the client used for every request of a run.
///
/// Requests time out after [`HttpConfig::timeout_secs`]; there is no retry
/// on top of what `reqwest` does itself.
///
/// # Errors
///
/// Returns [`SourceError::Http`] if the TLS backend cannot be initialized.
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, SourceError> {
    Ok(reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}
