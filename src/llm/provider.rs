use async_trait::async_trait;
use tokio::sync::mpsc;

use super::types::ChatMessage;
use crate::errors::ApiError;

/// The language-model upstream: embeddings and streamed chat completions.
///
/// The pipeline takes this as a trait object so tests can substitute a stub
/// for the real HTTP client.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// return the provider name (e.g. "gemini")
    fn name(&self) -> &str;

    /// embed free text into a fixed-length vector
    ///
    /// Empty or whitespace-only input is rejected before any network call.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, ApiError>;

    /// chat completion (streaming)
    ///
    /// The receiver yields generated text chunks in arrival order. An
    /// upstream failure mid-stream delivers one terminal `Err` and closes
    /// the channel; a clean upstream close just closes the channel.
    async fn stream_chat(
        &self,
        messages: Vec<ChatMessage>,
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError>;
}
