//! Single-shot page fetching with transport-failure classification.

use std::time::Duration;

use log::debug;
use url::Url;

use crate::error::ExtractError;

/// Default timeout for the whole request, connect included.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// A successfully fetched page body.
#[derive(Debug)]
pub struct FetchedPage {
    pub status: u16,
    pub body: String,
}

/// Performs exactly one GET per call. Redirects are followed (reqwest default
/// policy); there are no retries here, retrying is a caller decision.
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    pub fn new() -> Self {
        Self::with_timeout(FETCH_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .expect("failed to create HTTP client");

        Self { client }
    }

    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, ExtractError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(classify_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(ExtractError::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(classify_transport_error)?;
        debug!("fetched {} ({} bytes)", url, body.len());

        Ok(FetchedPage {
            status: status.as_u16(),
            body,
        })
    }
}

impl Default for PageFetcher {
    fn default() -> Self {
        Self::new()
    }
}

fn classify_transport_error(err: reqwest::Error) -> ExtractError {
    if err.is_timeout() {
        ExtractError::Timeout
    } else if err.is_connect() {
        ExtractError::Connect
    } else {
        ExtractError::Network
    }
}
