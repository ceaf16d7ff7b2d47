use std::time::Duration;

use datestream_core::{JobId, SearchOutcome};
use datestream_logging::{ds_debug, ds_info};
use url::Url;

use crate::wire::{ExtractRequestBody, SearchRequestBody, SearchResponseBody};
use crate::SubmitError;

/// Correlation header carrying the job id on `POST /extract`.
pub const REQUEST_ID_HEADER: &str = "X-Request-ID";

#[derive(Debug, Clone)]
pub struct SubmitSettings {
    pub base_url: Url,
    pub connect_timeout: Duration,
    /// `None` waits for the acknowledgement as long as it takes.
    pub request_timeout: Option<Duration>,
}

impl Default for SubmitSettings {
    fn default() -> Self {
        Self {
            base_url: Url::parse("http://127.0.0.1:3000").expect("static url"),
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
        }
    }
}

/// Request/response half of the protocol.
#[async_trait::async_trait]
pub trait JobSubmitter: Send + Sync {
    /// Posts the extraction job. The acknowledgement body is ignored; results
    /// arrive on the job's channel.
    async fn submit_extraction(&self, job_id: JobId, urls: &[String]) -> Result<(), SubmitError>;

    /// Posts a search; the full result list comes back in the response.
    async fn submit_search(
        &self,
        urls: &[String],
        search_term: &str,
    ) -> Result<SearchOutcome, SubmitError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSubmitter {
    settings: SubmitSettings,
    client: reqwest::Client,
}

impl ReqwestSubmitter {
    pub fn new(settings: SubmitSettings) -> Result<Self, SubmitError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| SubmitError::Network(err.to_string()))?;
        Ok(Self { settings, client })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SubmitError> {
        self.settings
            .base_url
            .join(path)
            .map_err(|err| SubmitError::InvalidUrl(err.to_string()))
    }
}

#[async_trait::async_trait]
impl JobSubmitter for ReqwestSubmitter {
    async fn submit_extraction(&self, job_id: JobId, urls: &[String]) -> Result<(), SubmitError> {
        let url = self.endpoint("/extract")?;
        ds_info!(job: job_id, "POST {} with {} urls", url, urls.len());

        let response = self
            .client
            .post(url)
            .header(REQUEST_ID_HEADER, job_id.to_string())
            .json(&ExtractRequestBody { urls })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::HttpStatus(status.as_u16()));
        }
        ds_debug!(job: job_id, "extraction acknowledged with {}", status);
        Ok(())
    }

    async fn submit_search(
        &self,
        urls: &[String],
        search_term: &str,
    ) -> Result<SearchOutcome, SubmitError> {
        let url = self.endpoint("/search")?;
        ds_info!("POST {} with {} urls", url, urls.len());

        let response = self
            .client
            .post(url)
            .json(&SearchRequestBody { urls, search_term })
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmitError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let parsed: SearchResponseBody =
            serde_json::from_slice(&body).map_err(|err| SubmitError::Decode(err.to_string()))?;
        Ok(parsed.into_domain())
    }
}

fn map_reqwest_error(err: reqwest::Error) -> SubmitError {
    if err.is_timeout() {
        return SubmitError::Timeout(err.to_string());
    }
    SubmitError::Network(err.to_string())
}
