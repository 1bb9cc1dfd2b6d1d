pub mod assessment;
pub mod burnout;
pub mod clients;
pub mod config;
pub mod deserializers;
pub mod error;
pub mod http;
pub mod orchestration;

use std::sync::Arc;

use crate::clients::GeminiClient;
use crate::config::Config;
use crate::orchestration::{Orchestrator, RetryPolicy};

/// Wire the configured generator into an orchestrator.
pub fn build_orchestrator(config: &Config) -> anyhow::Result<Orchestrator> {
    let client = GeminiClient::new(&config.generation, config.runtime.gemini_api_key.clone())?;
    Ok(Orchestrator::new(
        Arc::new(client),
        RetryPolicy::from_config(&config.generation),
    ))
}
