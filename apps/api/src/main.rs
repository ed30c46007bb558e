mod analysis;
mod config;
mod errors;
mod extract;
mod jobs;
mod llm_client;
mod routes;
mod state;
#[cfg(test)]
mod test_support;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::pipeline::AnalysisPipeline;
use crate::config::Config;
use crate::jobs::linkedin::ScrapingdogClient;
use crate::jobs::naukri::ApifyClient;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Missing provider credentials abort startup here, before anything is served.
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting JobFit API v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {config:?}");

    // Initialize LLM client
    let llm = LlmClient::new(config.gemini_api_key.clone(), config.http_timeout)?
        .with_base_url(config.gemini_base_url.clone());
    info!(
        "LLM client initialized (model: {}, temperature: {})",
        llm_client::MODEL,
        llm_client::TEMPERATURE
    );

    // Initialize job providers
    let linkedin = ScrapingdogClient::new(config.scrapingdog_api_key.clone(), config.http_timeout)?
        .with_endpoint(config.scrapingdog_url.clone());
    let naukri = ApifyClient::new(
        config.apify_token.clone(),
        config.http_timeout,
        config.apify_run_timeout,
        config.naukri_defaults.clone(),
    )?
    .with_base_url(config.apify_base_url.clone());
    info!("Job providers initialized (LinkedIn via Scrapingdog, Naukri via Apify)");

    let pipeline = AnalysisPipeline::new(Arc::new(llm), Arc::new(linkedin), Arc::new(naukri));

    // Build app state
    let state = AppState {
        pipeline: Arc::new(pipeline),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive()),
    );

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
