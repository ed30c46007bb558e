// Resume analysis and job recommendations.
// All LLM calls go through llm_client; all listing calls go through jobs.

pub mod handlers;
pub mod keywords;
pub mod pipeline;
pub mod prompts;
