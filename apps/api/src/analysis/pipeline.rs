//! Analysis Pipeline: orchestrates the resume analysis and job recommendation stages.
//!
//! Analysis:        PDF → extract text → {summary, skill gaps, roadmap} (concurrent)
//! Recommendations: summary → job keywords → {LinkedIn, Naukri} (concurrent)
//!
//! Recommendations are a separate, user-triggered run that starts from a summary
//! produced by an earlier analysis. Every stage failure aborts the run; nothing
//! is retried or partially returned.

use std::sync::Arc;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::analysis::keywords::KeywordList;
use crate::analysis::prompts::{
    JOB_KEYWORDS_MAX_TOKENS, JOB_KEYWORDS_PROMPT, ROADMAP_MAX_TOKENS, ROADMAP_PROMPT,
    SKILL_GAPS_MAX_TOKENS, SKILL_GAPS_PROMPT, SUMMARY_MAX_TOKENS, SUMMARY_PROMPT,
};
use crate::errors::AppError;
use crate::extract;
use crate::jobs::models::normalize_all;
use crate::jobs::{JobPosting, LinkedInJobs, LinkedInQuery, NaukriJobs};
use crate::llm_client::executor::{PromptExecutor, PromptRequest};
use crate::llm_client::TextGenerator;

/// The three independent readings of one resume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub skill_gaps: String,
    pub roadmap: String,
}

/// Output of a full analysis run, including the extracted text it was built from.
#[derive(Debug, Clone)]
pub struct ResumeAnalysis {
    pub resume_text: String,
    pub analysis: AnalysisResult,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JobSearchOptions {
    pub location: String,
    pub page: u32,
    pub max_results: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecommendations {
    pub keywords: KeywordList,
    /// The single keyword LinkedIn was searched with.
    pub linkedin_query: String,
    pub linkedin: Vec<JobPosting>,
    pub naukri: Vec<JobPosting>,
}

/// Holds the process-wide clients; built once at startup and shared by reference.
pub struct AnalysisPipeline {
    prompts: PromptExecutor,
    linkedin: Arc<dyn LinkedInJobs>,
    naukri: Arc<dyn NaukriJobs>,
}

impl AnalysisPipeline {
    pub fn new(
        llm: Arc<dyn TextGenerator>,
        linkedin: Arc<dyn LinkedInJobs>,
        naukri: Arc<dyn NaukriJobs>,
    ) -> Self {
        Self {
            prompts: PromptExecutor::new(llm),
            linkedin,
            naukri,
        }
    }

    /// Extracts the resume and runs the three analysis prompts over it.
    pub async fn analyze_pdf(&self, pdf: Bytes) -> Result<ResumeAnalysis, AppError> {
        info!("Extracting text from {} byte upload", pdf.len());
        let resume_text = extract::extract(pdf).await?;
        info!("Extracted {} chars of resume text", resume_text.len());

        let analysis = self.analyze_text(&resume_text).await?;
        Ok(ResumeAnalysis {
            resume_text,
            analysis,
        })
    }

    /// Summary, skill gaps and roadmap share no data, so they run concurrently.
    pub async fn analyze_text(&self, resume_text: &str) -> Result<AnalysisResult, AppError> {
        let summary = PromptRequest::new("summary", SUMMARY_PROMPT, SUMMARY_MAX_TOKENS)
            .var("resume_text", resume_text);
        let gaps = PromptRequest::new("skill_gaps", SKILL_GAPS_PROMPT, SKILL_GAPS_MAX_TOKENS)
            .var("resume_text", resume_text);
        let roadmap = PromptRequest::new("roadmap", ROADMAP_PROMPT, ROADMAP_MAX_TOKENS)
            .var("resume_text", resume_text);

        let (summary, skill_gaps, roadmap) = tokio::try_join!(
            self.prompts.run(&summary),
            self.prompts.run(&gaps),
            self.prompts.run(&roadmap),
        )?;

        info!(
            "Analysis complete: summary={} gaps={} roadmap={} chars",
            summary.len(),
            skill_gaps.len(),
            roadmap.len()
        );
        Ok(AnalysisResult {
            summary,
            skill_gaps,
            roadmap,
        })
    }

    /// Asks the LLM for job titles matching the summary.
    pub async fn extract_keywords(&self, summary: &str) -> Result<KeywordList, AppError> {
        let request =
            PromptRequest::new("job_keywords", JOB_KEYWORDS_PROMPT, JOB_KEYWORDS_MAX_TOKENS)
                .var("summary", summary);
        let keywords = KeywordList::parse(&self.prompts.run(&request).await?);

        if keywords.is_empty() {
            return Err(AppError::Provider {
                provider: "llm",
                message: "completion contained no job keywords".to_string(),
            });
        }
        info!("Job keywords: {}", keywords.raw);
        Ok(keywords)
    }

    /// Derives keywords from the summary and queries both providers.
    ///
    /// LinkedIn is searched with the first keyword only while Naukri receives the
    /// whole comma-joined list. Whether that difference is intended is an open
    /// product question; both calls keep the behavior as it was shipped.
    pub async fn recommend_jobs(
        &self,
        summary: &str,
        options: &JobSearchOptions,
    ) -> Result<JobRecommendations, AppError> {
        let keywords = self.extract_keywords(summary).await?;
        let linkedin_query = keywords.first().unwrap_or_default().to_string();

        let query =
            LinkedInQuery::new(linkedin_query.as_str(), options.location.as_str()).page(options.page);

        let (linkedin, naukri) = tokio::try_join!(
            async { self.linkedin.search(&query).await.map_err(AppError::from) },
            async {
                self.naukri
                    .search(&keywords.raw, &options.location, options.max_results)
                    .await
                    .map_err(AppError::from)
            },
        )?;

        info!(
            "Job search complete: linkedin={} naukri={}",
            linkedin.len(),
            naukri.len()
        );
        Ok(JobRecommendations {
            keywords,
            linkedin_query,
            linkedin: normalize_all(linkedin),
            naukri: normalize_all(naukri),
        })
    }

    /// Direct LinkedIn search with every provider filter available.
    pub async fn search_linkedin(&self, query: &LinkedInQuery) -> Result<Vec<JobPosting>, AppError> {
        let raw = self.linkedin.search(query).await?;
        Ok(normalize_all(raw))
    }
}
