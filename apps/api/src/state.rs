use std::sync::Arc;

use crate::analysis::pipeline::AnalysisPipeline;
use crate::config::Config;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the LLM and job-provider clients built once in `main`.
    pub pipeline: Arc<AnalysisPipeline>,
    pub config: Config,
}
