//! Prompt Executor: fills a template and sends it to the shared LLM.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::errors::AppError;
use crate::llm_client::template::fill;
use crate::llm_client::TextGenerator;

/// A template plus the values for its placeholders and an output-length hint.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    /// Short label used in logs, e.g. `"summary"`.
    pub name: &'static str,
    pub template: &'static str,
    pub variables: HashMap<String, String>,
    /// Enforced by the provider, not locally.
    pub max_output_tokens: u32,
}

impl PromptRequest {
    pub fn new(name: &'static str, template: &'static str, max_output_tokens: u32) -> Self {
        Self {
            name,
            template,
            variables: HashMap::new(),
            max_output_tokens,
        }
    }

    pub fn var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.variables.insert(key.into(), value.into());
        self
    }
}

#[derive(Clone)]
pub struct PromptExecutor {
    llm: Arc<dyn TextGenerator>,
}

impl PromptExecutor {
    pub fn new(llm: Arc<dyn TextGenerator>) -> Self {
        Self { llm }
    }

    /// Template problems are reported before anything is sent.
    /// Output is non-deterministic; identical requests may return different text.
    pub async fn run(&self, request: &PromptRequest) -> Result<String, AppError> {
        let prompt = fill(request.template, &request.variables)?;
        debug!(
            "Running prompt '{}' ({} chars, max {} tokens)",
            request.name,
            prompt.len(),
            request.max_output_tokens
        );

        let text = self
            .llm
            .generate(&prompt, request.max_output_tokens)
            .await?;

        debug!("Prompt '{}' returned {} chars", request.name, text.len());
        Ok(text)
    }
}
