//! Axum route handlers for the Analysis and Jobs APIs.

use axum::{
    extract::{Multipart, Query, State},
    Json,
};
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, Instrument};
use uuid::Uuid;

use crate::analysis::pipeline::{AnalysisResult, JobRecommendations, JobSearchOptions};
use crate::errors::AppError;
use crate::jobs::linkedin::{ExperienceLevel, JobType, SortBy, WorkType};
use crate::jobs::{JobPosting, LinkedInQuery};
use crate::state::AppState;

/// Multipart field carrying the resume.
const RESUME_FIELD: &str = "resume";

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct AnalyzeResponse {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub resume_chars: usize,
    #[serde(flatten)]
    pub analysis: AnalysisResult,
}

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    pub summary: String,
    pub location: Option<String>,
    pub page: Option<u32>,
    pub max_results: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecommendResponse {
    pub run_id: Uuid,
    #[serde(flatten)]
    pub jobs: JobRecommendations,
}

#[derive(Debug, Deserialize)]
pub struct LinkedInSearchParams {
    pub query: String,
    pub location: Option<String>,
    pub page: Option<u32>,
    pub sort_by: Option<SortBy>,
    pub job_type: Option<JobType>,
    pub exp_level: Option<ExperienceLevel>,
    pub work_type: Option<WorkType>,
    pub company: Option<String>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/analysis
///
/// Multipart upload of a PDF resume in the `resume` field.
/// Returns the summary, skill gaps and roadmap.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let pdf = read_resume_field(multipart).await?;

    let run_id = Uuid::new_v4();
    let span = info_span!("analysis", %run_id);
    let result = state.pipeline.analyze_pdf(pdf).instrument(span).await?;

    Ok(Json(AnalyzeResponse {
        run_id,
        generated_at: Utc::now(),
        resume_chars: result.resume_text.chars().count(),
        analysis: result.analysis,
    }))
}

/// POST /api/v1/jobs/recommendations
///
/// Turns a resume summary into job keywords and searches both providers.
/// Either provider may legitimately return no postings.
pub async fn handle_recommend(
    State(state): State<AppState>,
    Json(request): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, AppError> {
    if request.summary.trim().is_empty() {
        return Err(AppError::Validation("summary cannot be empty".to_string()));
    }

    let options = JobSearchOptions {
        location: non_blank(request.location)
            .unwrap_or_else(|| state.config.default_location.clone()),
        page: request.page.unwrap_or(1).max(1),
        max_results: request
            .max_results
            .unwrap_or(state.config.naukri_max_jobs)
            .clamp(1, state.config.naukri_max_jobs_limit.max(1)),
    };

    let run_id = Uuid::new_v4();
    let span = info_span!("recommendations", %run_id);
    let jobs = state
        .pipeline
        .recommend_jobs(&request.summary, &options)
        .instrument(span)
        .await?;

    Ok(Json(RecommendResponse { run_id, jobs }))
}

/// GET /api/v1/jobs/linkedin
///
/// One page of LinkedIn results with the provider's filters.
pub async fn handle_linkedin_search(
    State(state): State<AppState>,
    Query(params): Query<LinkedInSearchParams>,
) -> Result<Json<Vec<JobPosting>>, AppError> {
    if params.query.trim().is_empty() {
        return Err(AppError::Validation("query cannot be empty".to_string()));
    }

    let location =
        non_blank(params.location).unwrap_or_else(|| state.config.default_location.clone());
    let query = LinkedInQuery {
        sort_by: params.sort_by,
        job_type: params.job_type,
        exp_level: params.exp_level,
        work_type: params.work_type,
        company: non_blank(params.company),
        ..LinkedInQuery::new(params.query.trim(), location).page(params.page.unwrap_or(1).max(1))
    };

    let postings = state.pipeline.search_linkedin(&query).await?;
    info!("LinkedIn search returned {} postings", postings.len());
    Ok(Json(postings))
}

async fn read_resume_field(mut multipart: Multipart) -> Result<Bytes, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {e}")))?
    {
        if field.name() == Some(RESUME_FIELD) {
            return field
                .bytes()
                .await
                .map_err(|e| AppError::Validation(format!("could not read upload: {e}")));
        }
    }
    Err(AppError::Validation(format!(
        "missing '{RESUME_FIELD}' file field"
    )))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::{JobProviderError, RawLinkedInPosting, RawNaukriPosting};
    use crate::analysis::pipeline::AnalysisPipeline;
    use crate::routes::build_router;
    use crate::test_support::{
        build_pdf, scripted_generator, test_config, FakeLinkedIn, FakeNaukri,
    };
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "jobfit-test-boundary";

    fn state(linkedin: Arc<FakeLinkedIn>, naukri: Arc<FakeNaukri>) -> AppState {
        AppState {
            pipeline: Arc::new(AnalysisPipeline::new(
                Arc::new(scripted_generator()),
                linkedin,
                naukri,
            )),
            config: test_config(),
        }
    }

    fn multipart_request(field: &str, filename: &str, content: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/api/v1/analysis")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn json_request(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_analyze_returns_three_readings() {
        let app = build_router(state(Arc::default(), Arc::default()));
        let pdf = build_pdf(&["5 years Python, AWS, Docker"]);

        let response = app
            .oneshot(multipart_request("resume", "cv.pdf", &pdf))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: AnalyzeResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert!(body.resume_chars > 0);
        assert!(!body.analysis.summary.is_empty());
        assert!(!body.analysis.skill_gaps.is_empty());
        assert!(!body.analysis.roadmap.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_without_resume_field_is_bad_request() {
        let app = build_router(state(Arc::default(), Arc::default()));
        let pdf = build_pdf(&["text"]);

        let response = app
            .oneshot(multipart_request("attachment", "cv.pdf", &pdf))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_analyze_rejects_non_pdf_upload() {
        let app = build_router(state(Arc::default(), Arc::default()));

        let response = app
            .oneshot(multipart_request("resume", "cv.txt", b"Jane Doe, engineer"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "EXTRACTION_ERROR");
    }

    #[tokio::test]
    async fn test_recommendations_use_defaults_and_render_empty_lists() {
        let linkedin = Arc::new(FakeLinkedIn::returning(vec![RawLinkedInPosting {
            job_position: Some("Data Scientist".to_string()),
            company_name: Some("Acme".to_string()),
            ..Default::default()
        }]));
        let naukri = Arc::new(FakeNaukri::default());
        let app = build_router(state(linkedin.clone(), naukri.clone()));

        let response = app
            .oneshot(json_request(
                "/api/v1/jobs/recommendations",
                json!({"summary": "Backend engineer, 5 years Python"}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: RecommendResponse = serde_json::from_value(body_json(response).await).unwrap();
        assert_eq!(body.jobs.linkedin_query, "Data Scientist");
        assert_eq!(body.jobs.linkedin.len(), 1);
        assert_eq!(body.jobs.linkedin[0].company, "Acme");
        assert!(body.jobs.naukri.is_empty());

        assert_eq!(linkedin.queries()[0].location, "india");
        assert_eq!(naukri.calls()[0].2, 60);
    }

    #[tokio::test]
    async fn test_recommendations_clamp_requested_result_cap() {
        let naukri = Arc::new(FakeNaukri::default());
        let app = build_router(state(Arc::default(), naukri.clone()));

        let response = app
            .oneshot(json_request(
                "/api/v1/jobs/recommendations",
                json!({"summary": "Backend engineer", "max_results": 1_000_000}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(naukri.calls()[0].2, 200);
    }

    #[tokio::test]
    async fn test_recommendations_reject_blank_summary() {
        let naukri = Arc::new(FakeNaukri::default());
        let app = build_router(state(Arc::default(), naukri.clone()));

        let response = app
            .oneshot(json_request(
                "/api/v1/jobs/recommendations",
                json!({"summary": "   "}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(naukri.calls().is_empty());
    }

    #[tokio::test]
    async fn test_recommendations_surface_provider_failure_as_bad_gateway() {
        let naukri = Arc::new(FakeNaukri::failing(|| JobProviderError::RunFailed {
            provider: "apify",
            run_id: "run-1".to_string(),
            status: "FAILED".to_string(),
            message: String::new(),
        }));
        let app = build_router(state(Arc::default(), naukri));

        let response = app
            .oneshot(json_request(
                "/api/v1/jobs/recommendations",
                json!({"summary": "Backend engineer", "location": "Pune", "max_results": 5}),
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "PROVIDER_ERROR");
    }

    #[tokio::test]
    async fn test_linkedin_search_passes_filters() {
        let linkedin = Arc::new(FakeLinkedIn::returning(vec![]));
        let naukri = Arc::new(FakeNaukri::returning(vec![RawNaukriPosting::default()]));
        let app = build_router(state(linkedin.clone(), naukri.clone()));

        let request = Request::builder()
            .uri("/api/v1/jobs/linkedin?query=SRE&location=Pune&page=2&sort_by=most_recent&exp_level=mid_senior&work_type=remote&company=Acme")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, json!([]));

        let queries = linkedin.queries();
        let query = &queries[0];
        assert_eq!(query.query, "SRE");
        assert_eq!(query.location, "Pune");
        assert_eq!(query.page, 2);
        assert_eq!(query.sort_by, Some(SortBy::MostRecent));
        assert_eq!(query.exp_level, Some(ExperienceLevel::MidSenior));
        assert_eq!(query.work_type, Some(WorkType::Remote));
        assert_eq!(query.job_type, None);
        assert_eq!(query.company.as_deref(), Some("Acme"));
        assert!(naukri.calls().is_empty());
    }
}
