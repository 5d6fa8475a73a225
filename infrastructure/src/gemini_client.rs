use anyhow::{anyhow, Context};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::telemetry::Telemetry;
use shared::types::Result;
use shared::utils::truncate_chars;
use std::sync::Arc;

use crate::config::Config;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Part {
    pub text: String,
}

/// One turn of a `generateContent` conversation. Gemini names the assistant role `model`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub role: String,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role("user", text)
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self::with_role("model", text)
    }

    fn with_role(role: &str, text: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: &'a [Content],
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first part of the first candidate, if non-empty.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|t| !t.trim().is_empty())
    }
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    client: Arc<Client>,
    base_url: String,
    model: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: Arc::new(Client::new()),
            base_url: base_url.into(),
            model: model.into(),
            api_key: api_key.into(),
        }
    }

    /// `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Option<Self> {
        config
            .gemini_api_key
            .as_ref()
            .map(|key| Self::new(&config.gemini_base_url, &config.gemini_model, key))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Single attempt, no retry. Errors on transport failure, non-2xx status, or an empty reply.
    pub async fn generate(&self, contents: &[Content], generation_config: GenerationConfig) -> Result<String> {
        let url = format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model);
        let request = GenerateRequest {
            contents,
            generation_config,
        };
        let telemetry = Telemetry::new();
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&request)
            .send()
            .await
            .context("Failed contacting Gemini")?;
        let status = response.status();
        let body = response.text().await.context("Failed reading Gemini response")?;
        tracing::debug!(
            model = %self.model,
            turns = contents.len(),
            status = %status,
            elapsed_ms = telemetry.elapsed_ms() as u64,
            "gemini generateContent"
        );
        if !status.is_success() {
            return Err(anyhow!("Gemini API error ({}): {}", status, truncate_chars(&body, 300)));
        }
        let parsed: GenerateResponse =
            serde_json::from_str(&body).context("Gemini response is not valid JSON")?;
        parsed
            .into_text()
            .ok_or_else(|| anyhow!("No response from Gemini"))
    }
}
