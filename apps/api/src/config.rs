use std::time::Duration;

use thiserror::Error;

use crate::jobs::linkedin::SCRAPINGDOG_LINKEDIN_URL;
use crate::jobs::naukri::{NaukriRunDefaults, APIFY_API_BASE};
use crate::llm_client::GEMINI_API_BASE;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 120;
const DEFAULT_APIFY_RUN_TIMEOUT_SECS: u64 = 300;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const DEFAULT_JOB_LOCATION: &str = "india";
const DEFAULT_NAUKRI_MAX_JOBS: u32 = 60;
const DEFAULT_NAUKRI_MAX_JOBS_LIMIT: u32 = 200;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Required environment variable '{key}' is not set")]
    Missing { key: &'static str },

    #[error("Environment variable '{key}' is invalid: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Application configuration loaded from environment variables.
/// Startup fails if any provider credential is missing.
#[derive(Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub scrapingdog_api_key: String,
    pub apify_token: String,
    pub port: u16,
    pub rust_log: String,
    pub http_timeout: Duration,
    pub apify_run_timeout: Duration,
    pub max_upload_bytes: usize,
    pub default_location: String,
    pub naukri_max_jobs: u32,
    /// Ceiling on the per-request Naukri result cap; actor runs are metered.
    pub naukri_max_jobs_limit: u32,
    pub naukri_defaults: NaukriRunDefaults,
    pub gemini_base_url: String,
    pub scrapingdog_url: String,
    pub apify_base_url: String,
}

// Secrets stay out of logs and panics.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field("http_timeout", &self.http_timeout)
            .field("apify_run_timeout", &self.apify_run_timeout)
            .field("max_upload_bytes", &self.max_upload_bytes)
            .field("default_location", &self.default_location)
            .field("naukri_max_jobs", &self.naukri_max_jobs)
            .field("naukri_max_jobs_limit", &self.naukri_max_jobs_limit)
            .field("naukri_defaults", &self.naukri_defaults)
            .field("gemini_base_url", &self.gemini_base_url)
            .field("scrapingdog_url", &self.scrapingdog_url)
            .field("apify_base_url", &self.apify_base_url)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let require = |key: &'static str| optional(key).ok_or(ConfigError::Missing { key });

        let naukri_defaults = {
            let fallback = NaukriRunDefaults::default();
            NaukriRunDefaults {
                freshness: optional("NAUKRI_FRESHNESS").unwrap_or(fallback.freshness),
                sort_by: optional("NAUKRI_SORT_BY").unwrap_or(fallback.sort_by),
                experience: optional("NAUKRI_EXPERIENCE").unwrap_or(fallback.experience),
            }
        };

        let naukri_max_jobs_limit = parse_or(
            "NAUKRI_MAX_JOBS_LIMIT",
            optional("NAUKRI_MAX_JOBS_LIMIT"),
            DEFAULT_NAUKRI_MAX_JOBS_LIMIT,
        )?;
        let naukri_max_jobs = parse_or(
            "NAUKRI_MAX_JOBS",
            optional("NAUKRI_MAX_JOBS"),
            DEFAULT_NAUKRI_MAX_JOBS,
        )?;
        if naukri_max_jobs > naukri_max_jobs_limit {
            return Err(ConfigError::Invalid {
                key: "NAUKRI_MAX_JOBS",
                reason: format!(
                    "{naukri_max_jobs} exceeds NAUKRI_MAX_JOBS_LIMIT ({naukri_max_jobs_limit})"
                ),
            });
        }

        Ok(Config {
            gemini_api_key: require("GEMINI_API_KEY")?,
            scrapingdog_api_key: require("SCRAPINGDOG_API_KEY")?,
            apify_token: require("APIFY_API_TOKEN")?,
            port: parse_or("PORT", optional("PORT"), DEFAULT_PORT)?,
            rust_log: optional("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            http_timeout: Duration::from_secs(parse_or(
                "HTTP_TIMEOUT_SECS",
                optional("HTTP_TIMEOUT_SECS"),
                DEFAULT_HTTP_TIMEOUT_SECS,
            )?),
            apify_run_timeout: Duration::from_secs(parse_or(
                "APIFY_RUN_TIMEOUT_SECS",
                optional("APIFY_RUN_TIMEOUT_SECS"),
                DEFAULT_APIFY_RUN_TIMEOUT_SECS,
            )?),
            max_upload_bytes: parse_or(
                "MAX_UPLOAD_BYTES",
                optional("MAX_UPLOAD_BYTES"),
                DEFAULT_MAX_UPLOAD_BYTES,
            )?,
            default_location: optional("DEFAULT_JOB_LOCATION")
                .unwrap_or_else(|| DEFAULT_JOB_LOCATION.to_string()),
            naukri_max_jobs,
            naukri_max_jobs_limit,
            naukri_defaults,
            gemini_base_url: optional("GEMINI_API_BASE")
                .unwrap_or_else(|| GEMINI_API_BASE.to_string()),
            scrapingdog_url: optional("SCRAPINGDOG_LINKEDIN_URL")
                .unwrap_or_else(|| SCRAPINGDOG_LINKEDIN_URL.to_string()),
            apify_base_url: optional("APIFY_API_BASE")
                .unwrap_or_else(|| APIFY_API_BASE.to_string()),
        })
    }
}

fn parse_or<T>(key: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        None => Ok(default),
        Some(value) => value.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            reason: format!("'{value}': {e}"),
        }),
    }
}
