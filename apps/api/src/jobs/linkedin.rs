//! LinkedIn job provider: listings through the Scrapingdog real-time API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::jobs::models::lenient_string;
use crate::jobs::{JobProviderError, LinkedInJobs};

pub const SCRAPINGDOG_LINKEDIN_URL: &str = "https://api.scrapingdog.com/linkedinjobs";
pub const PROVIDER: &str = "scrapingdog";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    Relevance,
    MostRecent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobType {
    FullTime,
    PartTime,
    Contract,
    Temporary,
    Internship,
    Volunteer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceLevel {
    Internship,
    EntryLevel,
    Associate,
    MidSenior,
    Director,
    Executive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    OnSite,
    Remote,
    Hybrid,
}

impl SortBy {
    pub fn as_param(self) -> &'static str {
        match self {
            SortBy::Relevance => "R",
            SortBy::MostRecent => "DD",
        }
    }
}

impl JobType {
    pub fn as_param(self) -> &'static str {
        match self {
            JobType::FullTime => "F",
            JobType::PartTime => "P",
            JobType::Contract => "C",
            JobType::Temporary => "T",
            JobType::Internship => "I",
            JobType::Volunteer => "V",
        }
    }
}

impl ExperienceLevel {
    pub fn as_param(self) -> &'static str {
        match self {
            ExperienceLevel::Internship => "1",
            ExperienceLevel::EntryLevel => "2",
            ExperienceLevel::Associate => "3",
            ExperienceLevel::MidSenior => "4",
            ExperienceLevel::Director => "5",
            ExperienceLevel::Executive => "6",
        }
    }
}

impl WorkType {
    pub fn as_param(self) -> &'static str {
        match self {
            WorkType::OnSite => "1",
            WorkType::Remote => "2",
            WorkType::Hybrid => "3",
        }
    }
}

/// One page of a LinkedIn search. Unset filters are sent as empty strings.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkedInQuery {
    pub query: String,
    pub location: String,
    pub page: u32,
    pub sort_by: Option<SortBy>,
    pub job_type: Option<JobType>,
    pub exp_level: Option<ExperienceLevel>,
    pub work_type: Option<WorkType>,
    pub company: Option<String>,
}

impl LinkedInQuery {
    pub fn new(query: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            location: location.into(),
            page: 1,
            sort_by: None,
            job_type: None,
            exp_level: None,
            work_type: None,
            company: None,
        }
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = page;
        self
    }

    /// Query parameters in the order the provider documents them.
    /// Every key is always present; the provider rejects omitted filters.
    pub fn params(&self, api_key: &str) -> Vec<(&'static str, String)> {
        let opt = |v: Option<&'static str>| v.unwrap_or_default().to_string();
        vec![
            ("api_key", api_key.to_string()),
            ("field", self.query.clone()),
            ("geoid", String::new()),
            ("location", self.location.clone()),
            ("page", self.page.to_string()),
            ("sort_by", opt(self.sort_by.map(SortBy::as_param))),
            ("job_type", opt(self.job_type.map(JobType::as_param))),
            ("exp_level", opt(self.exp_level.map(ExperienceLevel::as_param))),
            ("work_type", opt(self.work_type.map(WorkType::as_param))),
            (
                "filter_by_company",
                self.company.clone().unwrap_or_default(),
            ),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RawLinkedInPosting {
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_position: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_location: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_posting_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_description: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub job_link: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company_logo_url: Option<String>,
}

#[derive(Clone)]
pub struct ScrapingdogClient {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl ScrapingdogClient {
    pub fn new(api_key: String, timeout: Duration) -> Result<Self, JobProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| JobProviderError::transport(PROVIDER, e))?;
        Ok(Self {
            client,
            api_key,
            endpoint: SCRAPINGDOG_LINKEDIN_URL.to_string(),
        })
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }
}

#[async_trait]
impl LinkedInJobs for ScrapingdogClient {
    /// Issues exactly one GET per call; nothing is cached.
    async fn search(
        &self,
        query: &LinkedInQuery,
    ) -> Result<Vec<RawLinkedInPosting>, JobProviderError> {
        info!(
            "Searching LinkedIn jobs: field='{}' location='{}' page={}",
            query.query, query.location, query.page
        );

        let response = self
            .client
            .get(&self.endpoint)
            .query(&query.params(&self.api_key))
            .send()
            .await
            .map_err(|e| JobProviderError::transport(PROVIDER, e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| JobProviderError::transport(PROVIDER, e))?;

        if !status.is_success() {
            warn!("Scrapingdog returned {}", status);
            return Err(JobProviderError::Status {
                provider: PROVIDER,
                status: status.as_u16(),
                body,
            });
        }

        let postings = parse_postings(&body)?;
        info!("Scrapingdog returned {} postings", postings.len());
        Ok(postings)
    }
}

/// The provider answers errors such as exhausted credits with a 200 and a JSON object.
fn parse_postings(body: &str) -> Result<Vec<RawLinkedInPosting>, JobProviderError> {
    let unexpected = |detail: String| JobProviderError::Unexpected {
        provider: PROVIDER,
        detail,
    };

    match serde_json::from_str::<Value>(body) {
        Ok(value @ Value::Array(_)) => {
            serde_json::from_value(value).map_err(|e| unexpected(e.to_string()))
        }
        Ok(Value::Object(obj)) => {
            let detail = obj
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| body.to_string());
            Err(unexpected(detail))
        }
        Ok(_) => Err(unexpected(body.to_string())),
        Err(e) => Err(unexpected(format!("invalid JSON: {e}"))),
    }
}
