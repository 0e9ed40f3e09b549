use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use super::provider::LlmProvider;
use super::types::ChatMessage;
use crate::errors::ApiError;

/// Client for the Gemini-style HTTP API serving both embeddings and
/// streamed chat completions under one bearer token.
#[derive(Clone)]
pub struct GeminiProvider {
    base_url: String,
    api_key: String,
    embed_model: String,
    chat_model: String,
    client: Client,
}

impl GeminiProvider {
    pub fn new(
        base_url: String,
        api_key: String,
        embed_model: String,
        chat_model: String,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            embed_model,
            chat_model,
            client: Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ApiError> {
        if text.trim().is_empty() {
            return Err(ApiError::BadRequest(
                "question text must not be empty".to_string(),
            ));
        }

        let url = format!("{}/v1/embeddings", self.base_url);
        let body = json!({
            "model": self.embed_model,
            "content": text,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Embedding(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Embedding(format!(
                "embedding service returned {}: {}",
                status, text
            )));
        }

        let payload: EmbedResponse = res
            .json()
            .await
            .map_err(|e| ApiError::Embedding(format!("malformed embedding response: {}", e)))?;

        Ok(payload.embedding)
    }

    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError> {
        let url = format!("{}/v1/completions", self.base_url);
        let body = json!({
            "model": self.chat_model,
            "messages": messages,
            "stream": true,
        });

        let res = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Completion(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Completion(format!(
                "completion service returned {}: {}",
                status, text
            )));
        }

        let (tx, rx) = mpsc::channel(32);
        let mut stream = res.bytes_stream();

        tokio::spawn(async move {
            // SSE events may be split across network chunks; carry the
            // incomplete tail and only parse whole lines.
            let mut buf = String::new();
            while let Some(item) = stream.next().await {
                match item {
                    Ok(bytes) => {
                        buf.push_str(&String::from_utf8_lossy(&bytes));
                        while let Some(pos) = buf.find('\n') {
                            let line: String = buf.drain(..=pos).collect();
                            let line = line.trim();
                            if line.is_empty() {
                                continue;
                            }
                            if line == "data: [DONE]" {
                                return;
                            }
                            if let Some(data) = line.strip_prefix("data: ") {
                                if let Some(content) = decode_chunk(data) {
                                    if tx.send(Ok(content)).await.is_err() {
                                        return;
                                    }
                                }
                            }
                        }
                    }
                    Err(err) => {
                        let _ = tx.send(Err(ApiError::Stream(err.to_string()))).await;
                        return;
                    }
                }
            }
        });

        Ok(rx)
    }
}

/// Extract the generated text from one protocol chunk. Unknown shapes and
/// empty deltas produce no output chunk, not an error.
fn decode_chunk(data: &str) -> Option<String> {
    let event: Value = serde_json::from_str(data).ok()?;
    let content = event["choices"][0]["delta"]["content"].as_str()?;
    if content.is_empty() {
        return None;
    }
    Some(content.to_string())
}
