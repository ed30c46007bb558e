// Job Providers: one client per external listing source.
// Each returns its provider-specific rows; `models` normalizes them into `JobPosting`.

pub mod linkedin;
pub mod models;
pub mod naukri;

use async_trait::async_trait;
use thiserror::Error;

pub use linkedin::{LinkedInQuery, RawLinkedInPosting};
pub use models::JobPosting;
pub use naukri::RawNaukriPosting;

#[derive(Debug, Error)]
pub enum JobProviderError {
    #[error("{provider} request failed: {source}")]
    Http {
        provider: &'static str,
        source: reqwest::Error,
    },

    #[error("{provider} request timed out")]
    Timeout { provider: &'static str },

    #[error("{provider} request failed: {status} - {body}")]
    Status {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unexpected payload: {detail}")]
    Unexpected {
        provider: &'static str,
        detail: String,
    },

    #[error("{provider} run {run_id} finished with status {status}: {message}")]
    RunFailed {
        provider: &'static str,
        run_id: String,
        status: String,
        message: String,
    },
}

impl JobProviderError {
    pub fn provider(&self) -> &'static str {
        match self {
            JobProviderError::Http { provider, .. }
            | JobProviderError::Timeout { provider }
            | JobProviderError::Status { provider, .. }
            | JobProviderError::Unexpected { provider, .. }
            | JobProviderError::RunFailed { provider, .. } => provider,
        }
    }

    /// Wraps a transport failure. The URL is dropped because some providers
    /// authenticate with a query parameter.
    pub(crate) fn transport(provider: &'static str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            JobProviderError::Timeout { provider }
        } else {
            JobProviderError::Http {
                provider,
                source: err.without_url(),
            }
        }
    }
}

/// Real-time LinkedIn listings, one page per call.
#[async_trait]
pub trait LinkedInJobs: Send + Sync {
    async fn search(
        &self,
        query: &LinkedInQuery,
    ) -> Result<Vec<RawLinkedInPosting>, JobProviderError>;
}

/// Naukri listings scraped by a managed actor run.
#[async_trait]
pub trait NaukriJobs: Send + Sync {
    async fn search(
        &self,
        keyword: &str,
        location: &str,
        max_results: u32,
    ) -> Result<Vec<RawNaukriPosting>, JobProviderError>;
}
