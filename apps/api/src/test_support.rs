//! Shared fakes and fixtures for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use serde_json::Value;

use crate::config::Config;
use crate::jobs::{
    JobProviderError, LinkedInJobs, LinkedInQuery, NaukriJobs, RawLinkedInPosting,
    RawNaukriPosting,
};
use crate::llm_client::{LlmError, TextGenerator};

/// Serves `app` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

/// Collects whatever a fake server handler wants to remember about a request.
#[derive(Clone, Default)]
pub struct Recorder(Arc<Mutex<Vec<Value>>>);

impl Recorder {
    pub fn push(&self, value: Value) {
        self.0.lock().unwrap().push(value);
    }

    pub fn take(&self) -> Vec<Value> {
        std::mem::take(&mut *self.0.lock().unwrap())
    }

    pub fn len(&self) -> usize {
        self.0.lock().unwrap().len()
    }
}

type Responder = Box<dyn Fn(&str) -> Result<String, LlmError> + Send + Sync>;

/// In-memory LLM that records every prompt and its output-length hint.
pub struct FakeGenerator {
    responder: Responder,
    calls: Mutex<Vec<(String, u32)>>,
}

impl FakeGenerator {
    pub fn replying<F>(responder: F) -> Self
    where
        F: Fn(&str) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for FakeGenerator {
    async fn generate(&self, prompt: &str, max_output_tokens: u32) -> Result<String, LlmError> {
        self.calls
            .lock()
            .unwrap()
            .push((prompt.to_string(), max_output_tokens));
        (self.responder)(prompt)
    }
}

/// Answers each analysis prompt with a plausible completion.
pub fn scripted_generator() -> FakeGenerator {
    FakeGenerator::replying(|prompt| {
        let reply = if prompt.contains("career advisor") {
            "Data Scientist, ML Engineer, Backend Developer"
        } else if prompt.contains("Summarize this resume") {
            "Backend engineer with 5 years of Python on AWS and Docker."
        } else if prompt.contains("missing skills") {
            "No Kubernetes or cloud certifications listed."
        } else if prompt.contains("future roadmap") {
            "Earn an AWS certification, then learn Kubernetes."
        } else {
            "unexpected prompt"
        };
        Ok(reply.to_string())
    })
}

type ErrorFactory = Box<dyn Fn() -> JobProviderError + Send + Sync>;

#[derive(Default)]
pub struct FakeLinkedIn {
    postings: Vec<RawLinkedInPosting>,
    failure: Option<ErrorFactory>,
    queries: Mutex<Vec<LinkedInQuery>>,
}

impl FakeLinkedIn {
    pub fn returning(postings: Vec<RawLinkedInPosting>) -> Self {
        Self {
            postings,
            ..Default::default()
        }
    }

    pub fn failing<F>(failure: F) -> Self
    where
        F: Fn() -> JobProviderError + Send + Sync + 'static,
    {
        Self {
            failure: Some(Box::new(failure)),
            ..Default::default()
        }
    }

    pub fn queries(&self) -> Vec<LinkedInQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl LinkedInJobs for FakeLinkedIn {
    async fn search(
        &self,
        query: &LinkedInQuery,
    ) -> Result<Vec<RawLinkedInPosting>, JobProviderError> {
        self.queries.lock().unwrap().push(query.clone());
        match &self.failure {
            Some(failure) => Err(failure()),
            None => Ok(self.postings.clone()),
        }
    }
}

#[derive(Default)]
pub struct FakeNaukri {
    postings: Vec<RawNaukriPosting>,
    failure: Option<ErrorFactory>,
    calls: Mutex<Vec<(String, String, u32)>>,
}

impl FakeNaukri {
    pub fn returning(postings: Vec<RawNaukriPosting>) -> Self {
        Self {
            postings,
            ..Default::default()
        }
    }

    pub fn failing<F>(failure: F) -> Self
    where
        F: Fn() -> JobProviderError + Send + Sync + 'static,
    {
        Self {
            failure: Some(Box::new(failure)),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, String, u32)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl NaukriJobs for FakeNaukri {
    async fn search(
        &self,
        keyword: &str,
        location: &str,
        max_results: u32,
    ) -> Result<Vec<RawNaukriPosting>, JobProviderError> {
        self.calls
            .lock()
            .unwrap()
            .push((keyword.to_string(), location.to_string(), max_results));
        match &self.failure {
            Some(failure) => Err(failure()),
            None => Ok(self.postings.clone()),
        }
    }
}

pub fn test_config() -> Config {
    Config::from_lookup(|key| match key {
        "GEMINI_API_KEY" => Some("g-key".to_string()),
        "SCRAPINGDOG_API_KEY" => Some("sd-key".to_string()),
        "APIFY_API_TOKEN" => Some("apify-token".to_string()),
        _ => None,
    })
    .unwrap()
}

/// Builds a minimal PDF with one Helvetica text line per page.
pub fn build_pdf(pages: &[&str]) -> Vec<u8> {
    let page_count = pages.len();
    let mut objects: Vec<String> = Vec::new();

    objects.push("<< /Type /Catalog /Pages 2 0 R >>".to_string());
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();
    objects.push(format!(
        "<< /Type /Pages /Kids [{}] /Count {} >>",
        kids.join(" "),
        page_count
    ));
    objects.push(
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica /Encoding /WinAnsiEncoding >>"
            .to_string(),
    );
    for (i, text) in pages.iter().enumerate() {
        let escaped = text
            .replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)");
        let content = format!("BT /F1 12 Tf 72 720 Td ({escaped}) Tj ET");
        objects.push(format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
             /Resources << /Font << /F1 3 0 R >> >> /Contents {} 0 R >>",
            5 + 2 * i
        ));
        objects.push(format!(
            "<< /Length {} >>\nstream\n{}\nendstream",
            content.len(),
            content
        ));
    }

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, body));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n", objects.len() + 1));
    pdf.push_str("0000000000 65535 f \n");
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    pdf.into_bytes()
}
