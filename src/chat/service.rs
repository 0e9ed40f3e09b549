use std::sync::Arc;

use tokio::sync::mpsc;

use super::prompt;
use crate::config::Settings;
use crate::errors::ApiError;
use crate::index::VectorIndex;
use crate::llm::{ChatMessage, LlmProvider};

/// Orchestrates one chat turn: validate, embed, retrieve, compose, stream.
///
/// The stages run strictly in sequence on the request's task; the returned
/// receiver is the streaming tail. A failure at any stage is terminal for
/// the request.
#[derive(Clone)]
pub struct ChatService {
    provider: Arc<dyn LlmProvider>,
    index: Arc<dyn VectorIndex>,
    top_k: usize,
    namespace: String,
    embedding_dimension: usize,
}

impl ChatService {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        index: Arc<dyn VectorIndex>,
        settings: &Settings,
    ) -> Self {
        Self {
            provider,
            index,
            top_k: settings.top_k,
            namespace: settings.index_namespace.clone(),
            embedding_dimension: settings.embedding_dimension,
        }
    }

    pub async fn respond(
        &self,
        history: Vec<ChatMessage>,
    ) -> Result<mpsc::Receiver<Result<String, ApiError>>, ApiError> {
        let (last, prior) = history
            .split_last()
            .ok_or_else(|| ApiError::BadRequest("chat history must not be empty".to_string()))?;

        tracing::debug!(stage = "embedding", "embedding user question");
        let vector = self.provider.embed(&last.content).await?;
        if vector.len() != self.embedding_dimension {
            return Err(ApiError::Embedding(format!(
                "embedding has {} dimensions, index expects {}",
                vector.len(),
                self.embedding_dimension
            )));
        }

        tracing::debug!(
            stage = "retrieving",
            top_k = self.top_k,
            namespace = %self.namespace,
            "querying review index"
        );
        let matches = self
            .index
            .query(&vector, self.top_k, &self.namespace)
            .await?;
        if matches.is_empty() {
            tracing::info!("no matches in index; continuing with unaugmented prompt");
        }

        let rendered = prompt::render_matches(&matches);
        let messages = prompt::assemble(prior, &last.content, &rendered);

        tracing::debug!(
            stage = "streaming",
            provider = self.provider.name(),
            turns = messages.len(),
            "requesting completion"
        );
        self.provider.stream_chat(messages).await
    }
}
