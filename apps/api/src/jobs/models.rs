//! Normalized job posting shared by both providers.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::jobs::linkedin::RawLinkedInPosting;
use crate::jobs::naukri::RawNaukriPosting;

const MISSING_TITLE: &str = "N/A";
const MISSING_COMPANY: &str = "Unknown";
const MISSING_LOCATION: &str = "Not specified";
const MISSING_LINK: &str = "#";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobSource {
    Linkedin,
    Naukri,
}

/// A single listing, whichever provider it came from.
/// LinkedIn rows carry a posting date; Naukri rows carry a salary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub source: JobSource,
    pub title: String,
    pub company: String,
    pub location: String,
    pub posted_date: Option<String>,
    pub salary: Option<String>,
    pub description: Option<String>,
    pub apply_link: String,
    pub logo_url: Option<String>,
}

impl From<RawLinkedInPosting> for JobPosting {
    fn from(raw: RawLinkedInPosting) -> Self {
        JobPosting {
            source: JobSource::Linkedin,
            title: or_default(raw.job_position, MISSING_TITLE),
            company: or_default(raw.company_name, MISSING_COMPANY),
            location: or_default(raw.job_location, MISSING_LOCATION),
            posted_date: present(raw.job_posting_date),
            salary: None,
            description: present(raw.job_description),
            apply_link: or_default(raw.job_link, MISSING_LINK),
            logo_url: present(raw.company_logo_url),
        }
    }
}

impl From<RawNaukriPosting> for JobPosting {
    fn from(raw: RawNaukriPosting) -> Self {
        JobPosting {
            source: JobSource::Naukri,
            title: or_default(raw.title, MISSING_TITLE),
            company: or_default(raw.company_name, MISSING_COMPANY),
            location: or_default(raw.location, MISSING_LOCATION),
            posted_date: None,
            salary: present(raw.salary),
            description: present(raw.job_description),
            apply_link: or_default(raw.jd_url, MISSING_LINK),
            logo_url: present(raw.logo_path),
        }
    }
}

pub fn normalize_all<T: Into<JobPosting>>(raw: Vec<T>) -> Vec<JobPosting> {
    raw.into_iter().map(Into::into).collect()
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn or_default(value: Option<String>, default: &str) -> String {
    present(value).unwrap_or_else(|| default.to_string())
}

/// Scraped fields are mostly strings, but numbers and booleans show up too.
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        Some(other) => Some(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_linkedin_row_maps_fields() {
        let raw: RawLinkedInPosting = serde_json::from_value(json!({
            "job_position": "Data Scientist",
            "company_name": "Acme",
            "job_location": "Bengaluru, Karnataka, India",
            "job_posting_date": "2025-06-01",
            "job_description": "",
            "job_link": "https://www.linkedin.com/jobs/view/1",
            "company_logo_url": "https://media.licdn.com/logo.png",
            "job_id": "1"
        }))
        .unwrap();

        let posting = JobPosting::from(raw);
        assert_eq!(posting.source, JobSource::Linkedin);
        assert_eq!(posting.title, "Data Scientist");
        assert_eq!(posting.posted_date.as_deref(), Some("2025-06-01"));
        assert_eq!(posting.description, None);
        assert_eq!(posting.salary, None);
        assert_eq!(posting.apply_link, "https://www.linkedin.com/jobs/view/1");
    }

    #[test]
    fn test_naukri_row_uses_defaults_for_missing_fields() {
        let raw: RawNaukriPosting = serde_json::from_value(json!({
            "title": "ML Engineer",
            "salary": 1200000,
            "logoPath": null
        }))
        .unwrap();

        let posting = JobPosting::from(raw);
        assert_eq!(posting.source, JobSource::Naukri);
        assert_eq!(posting.company, "Unknown");
        assert_eq!(posting.location, "Not specified");
        assert_eq!(posting.apply_link, "#");
        assert_eq!(posting.salary.as_deref(), Some("1200000"));
        assert_eq!(posting.logo_url, None);
    }

    #[test]
    fn test_blank_title_falls_back() {
        let raw = RawLinkedInPosting {
            job_position: Some("   ".to_string()),
            ..Default::default()
        };
        assert_eq!(JobPosting::from(raw).title, "N/A");
    }

    #[test]
    fn test_serialized_source_is_lowercase() {
        let posting = JobPosting::from(RawNaukriPosting::default());
        let value = serde_json::to_value(&posting).unwrap();
        assert_eq!(value["source"], "naukri");
    }
}
