use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::chat::ChatService;
use crate::config::Settings;
use crate::index::{PineconeIndex, VectorIndex};
use crate::llm::{GeminiProvider, LlmProvider};

pub struct AppState {
    pub settings: Settings,
    pub chat: ChatService,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    /// Build the shared state once at startup: the upstream clients are
    /// constructed here and injected into the pipeline, so tests can swap
    /// them for stubs through the same seams.
    pub fn initialize(settings: Settings) -> Arc<Self> {
        let provider: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::new(
            settings.llm_base_url.clone(),
            settings.gemini_api_key.clone(),
            settings.embed_model.clone(),
            settings.chat_model.clone(),
        ));
        let index: Arc<dyn VectorIndex> = Arc::new(PineconeIndex::new(
            settings.index_host.clone(),
            settings.pinecone_api_key.clone(),
        ));
        let chat = ChatService::new(provider, index, &settings);
        let started_at = Utc::now();

        Arc::new(AppState {
            settings,
            chat,
            started_at,
        })
    }
}
