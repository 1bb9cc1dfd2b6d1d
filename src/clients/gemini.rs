use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::clients::traits::{GenerationError, TextGenerator};
use crate::config::GenerationConfig;

const BODY_SNIPPET_CHARS: usize = 500;

/// Gemini `generateContent` client over HTTPS.
///
/// One instance is built at start-up and handed to the orchestrator; the
/// inner `reqwest::Client` pools connections across requests.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
    timeout: Duration,
    temperature: f32,
    max_output_tokens: u32,
}

impl GeminiClient {
    pub fn new(
        config: &GenerationConfig,
        api_key: Option<String>,
    ) -> Result<Self, GenerationError> {
        let timeout = Duration::from_millis(config.call_timeout_ms);
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                GenerationError::Transport(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self {
            http,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            model: config.model.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timeout,
            temperature: config.temperature,
            max_output_tokens: config.max_output_tokens,
        })
    }

    pub fn has_credentials(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(GenerationError::MissingCredentials)?;

        let body = json!({
            "contents": [
                { "parts": [ { "text": prompt } ] }
            ],
            "generationConfig": {
                "temperature": self.temperature,
                "maxOutputTokens": self.max_output_tokens
            }
        });

        tracing::debug!(
            "Calling Gemini (model={}, prompt_chars={})",
            self.model,
            prompt.len()
        );

        let resp = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_send_err(e))?;

        let status = resp.status();
        let body_text = resp.text().await.map_err(|e| self.map_send_err(e))?;
        if !status.is_success() {
            return Err(GenerationError::Upstream {
                status: status.as_u16(),
                body: truncate_chars(body_text.trim(), BODY_SNIPPET_CHARS),
            });
        }

        let envelope: Value = serde_json::from_str(&body_text)
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;
        let text = candidate_text(&envelope).ok_or_else(|| {
            GenerationError::InvalidResponse(format!(
                "no candidate text in response: {}",
                truncate_chars(&body_text, BODY_SNIPPET_CHARS)
            ))
        })?;
        Ok(text)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

impl GeminiClient {
    fn map_send_err(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::Timeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }
        } else {
            GenerationError::Transport(err.to_string())
        }
    }
}

/// Pull the generated text out of a `generateContent` envelope.
///
/// Concatenates every `text` part of the first candidate. Returns `None` when
/// the envelope carries no text at all (e.g. a safety block).
pub fn candidate_text(envelope: &Value) -> Option<String> {
    let parts = envelope
        .pointer("/candidates/0/content/parts")
        .and_then(|p| p.as_array())?;
    let out: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();
    if out.trim().is_empty() { None } else { Some(out) }
}

fn truncate_chars(input: &str, max: usize) -> String {
    let mut out = String::new();
    for (idx, ch) in input.chars().enumerate() {
        if idx >= max {
            out.push_str("...");
            break;
        }
        out.push(ch);
    }
    out
}
