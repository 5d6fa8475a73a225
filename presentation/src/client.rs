use anyhow::{anyhow, Context};
use domain::advice::AdviceResult;
use domain::chat::ChatTurn;
use domain::selection::Selection;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use shared::types::Result;

use crate::api::{AdviceRequest, ChatRequest, ChatResponse, ErrorBody};

/// HTTP client the terminal wizard uses to reach `/api/*`.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn advice(&self, selection: &Selection) -> Result<AdviceResult> {
        let request = AdviceRequest {
            concerns: selection.concerns().collect(),
            age: Some(selection.age()),
        };
        let response = self
            .client
            .post(format!("{}/api/advice", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed contacting the advice API")?;
        read_json(response).await
    }

    pub async fn chat(&self, message: &str, selection: &Selection, history: Vec<ChatTurn>) -> Result<String> {
        let request = ChatRequest {
            message: Some(message.to_string()),
            concerns: selection.concerns().collect(),
            age: selection.age(),
            history,
        };
        let response = self
            .client
            .post(format!("{}/api/chat", self.base_url))
            .json(&request)
            .send()
            .await
            .context("Failed contacting the chat API")?;
        let body: ChatResponse = read_json(response).await?;
        Ok(body.response)
    }
}

/// Decode a success body, or surface the server's `{error}` message.
async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    let text = response.text().await?;
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.error)
            .unwrap_or(text);
        return Err(anyhow!("API error ({}): {}", status, message));
    }
    serde_json::from_str(&text).context("Unexpected API response")
}
