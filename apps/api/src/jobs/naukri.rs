//! Naukri job provider: listings scraped by an Apify actor.
//!
//! A search is one actor run: start it, wait until the platform reports a
//! terminal status, then read the run's default dataset.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::jobs::models::lenient_string;
use crate::jobs::{JobProviderError, NaukriJobs};

pub const APIFY_API_BASE: &str = "https://api.apify.com/v2";
pub const NAUKRI_ACTOR_ID: &str = "alpcnRV9YI9lYVPWk";
pub const PROVIDER: &str = "apify";

pub const DEFAULT_FRESHNESS: &str = "all";
pub const DEFAULT_SORT_BY: &str = "relevance";
pub const DEFAULT_EXPERIENCE: &str = "all";

/// Upper bound on how long the platform may hold a start/poll request open.
const MAX_WAIT_FOR_FINISH_SECS: u64 = 60;
/// Headroom left between the platform's wait and the HTTP client timeout.
const WAIT_MARGIN_SECS: u64 = 5;

/// The `waitForFinish` window for a given HTTP client timeout, kept short
/// enough that the platform answers before the client gives up.
pub fn wait_for_finish_secs(http_timeout: Duration) -> u64 {
    http_timeout
        .as_secs()
        .saturating_sub(WAIT_MARGIN_SECS)
        .min(MAX_WAIT_FOR_FINISH_SECS)
}

/// Actor input fields that are not derived from the search itself.
#[derive(Debug, Clone, PartialEq)]
pub struct NaukriRunDefaults {
    pub freshness: String,
    pub sort_by: String,
    pub experience: String,
}

impl Default for NaukriRunDefaults {
    fn default() -> Self {
        Self {
            freshness: DEFAULT_FRESHNESS.to_string(),
            sort_by: DEFAULT_SORT_BY.to_string(),
            experience: DEFAULT_EXPERIENCE.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NaukriRunInput {
    pub keyword: String,
    pub max_jobs: u32,
    pub freshness: String,
    pub sort_by: String,
    pub experience: String,
}

impl NaukriRunInput {
    pub fn new(keyword: &str, max_jobs: u32, defaults: &NaukriRunDefaults) -> Self {
        Self {
            keyword: keyword.to_string(),
            max_jobs,
            freshness: defaults.freshness.clone(),
            sort_by: defaults.sort_by.clone(),
            experience: defaults.experience.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawNaukriPosting {
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub salary: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_description: Option<String>,
    #[serde(default, rename = "jdURL", deserialize_with = "lenient_string")]
    pub jd_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub logo_path: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ActorRun {
    id: String,
    status: String,
    default_dataset_id: String,
    status_message: Option<String>,
}

impl ActorRun {
    fn is_finished(&self) -> bool {
        matches!(
            self.status.as_str(),
            "SUCCEEDED" | "FAILED" | "ABORTED" | "TIMED-OUT"
        )
    }
}

#[derive(Clone)]
pub struct ApifyClient {
    client: Client,
    token: String,
    base_url: String,
    actor_id: String,
    run_timeout: Duration,
    wait_for_finish: u64,
    defaults: NaukriRunDefaults,
}

impl ApifyClient {
    pub fn new(
        token: String,
        http_timeout: Duration,
        run_timeout: Duration,
        defaults: NaukriRunDefaults,
    ) -> Result<Self, JobProviderError> {
        let client = Client::builder()
            .timeout(http_timeout)
            .build()
            .map_err(|e| JobProviderError::transport(PROVIDER, e))?;
        Ok(Self {
            client,
            token,
            base_url: APIFY_API_BASE.to_string(),
            actor_id: NAUKRI_ACTOR_ID.to_string(),
            run_timeout,
            wait_for_finish: wait_for_finish_secs(http_timeout),
            defaults,
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, JobProviderError> {
        let response = request
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| JobProviderError::transport(PROVIDER, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| JobProviderError::transport(PROVIDER, e))?;

        if !status.is_success() {
            return Err(JobProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| JobProviderError::Unexpected {
            provider: PROVIDER,
            detail: e.to_string(),
        })
    }

    async fn start_run(&self, input: &NaukriRunInput) -> Result<ActorRun, JobProviderError> {
        let url = format!("{}/acts/{}/runs", self.base_url, self.actor_id);
        let request = self
            .client
            .post(url)
            .query(&[("waitForFinish", self.wait_for_finish)])
            .json(input);
        let run: Envelope<ActorRun> = self.send_json(request).await?;
        info!("Started actor run {} ({})", run.data.id, run.data.status);
        Ok(run.data)
    }

    async fn wait_for_run(&self, mut run: ActorRun) -> Result<ActorRun, JobProviderError> {
        while !run.is_finished() {
            debug!("Actor run {} is {}, waiting", run.id, run.status);
            let url = format!("{}/actor-runs/{}", self.base_url, run.id);
            let request = self
                .client
                .get(url)
                .query(&[("waitForFinish", self.wait_for_finish)]);
            let polled: Envelope<ActorRun> = self.send_json(request).await?;
            run = polled.data;
        }

        if run.status != "SUCCEEDED" {
            warn!("Actor run {} ended with {}", run.id, run.status);
            return Err(JobProviderError::RunFailed {
                provider: PROVIDER,
                run_id: run.id,
                status: run.status,
                message: run.status_message.unwrap_or_default(),
            });
        }
        Ok(run)
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<RawNaukriPosting>, JobProviderError> {
        let url = format!("{}/datasets/{}/items", self.base_url, dataset_id);
        let request = self
            .client
            .get(url)
            .query(&[("format", "json"), ("clean", "true")]);
        self.send_json(request).await
    }

    async fn run_to_completion(
        &self,
        input: &NaukriRunInput,
    ) -> Result<Vec<RawNaukriPosting>, JobProviderError> {
        let run = self.start_run(input).await?;
        let run = self.wait_for_run(run).await?;
        self.dataset_items(&run.default_dataset_id).await
    }
}

#[async_trait]
impl NaukriJobs for ApifyClient {
    /// The actor input has no location field; `location` is only logged.
    async fn search(
        &self,
        keyword: &str,
        location: &str,
        max_results: u32,
    ) -> Result<Vec<RawNaukriPosting>, JobProviderError> {
        info!(
            "Searching Naukri jobs: keyword='{}' location='{}' max={}",
            keyword, location, max_results
        );
        let input = NaukriRunInput::new(keyword, max_results, &self.defaults);

        let items = tokio::time::timeout(self.run_timeout, self.run_to_completion(&input))
            .await
            .map_err(|_| JobProviderError::Timeout { provider: PROVIDER })??;

        info!("Apify dataset returned {} postings", items.len());
        Ok(items)
    }
}
