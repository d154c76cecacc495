use std::time::Duration;

use reqwest::Client;
use tracing::error;

use crate::args::DEFAULT_USER_AGENT;
use crate::error::HttpError;

/// Builds the pooled client shared by every slot of a run.
///
/// `request_timeout` bounds a whole attempt (send plus body read), so it has
/// to cover the slowest upstream response the run is meant to observe.
///
/// # Errors
///
/// Returns an error when the TLS backend or client cannot be initialised.
pub fn build_client(
    request_timeout: Duration,
    connect_timeout: Duration,
) -> Result<Client, HttpError> {
    Client::builder()
        .timeout(request_timeout)
        .connect_timeout(connect_timeout)
        .user_agent(DEFAULT_USER_AGENT)
        .build()
        .map_err(|err| {
            error!("Failed to build HTTP client: {}", err);
            HttpError::BuildClientFailed { source: err }
        })
}
