use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use serde::Deserialize;

/// Runtime settings for the service.
///
/// Non-secret values come from an optional YAML file (`LECTERN_CONFIG_PATH`,
/// falling back to `./config.yml`) with serde defaults matching the
/// production deployment. The two upstream credentials are environment-only
/// and required: startup fails without them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Port for the HTTP listener. `PORT` in the environment wins.
    pub port: u16,
    /// Base URL of the language-model service (embeddings + completions).
    pub llm_base_url: String,
    /// Host of the vector index holding the professor reviews.
    pub index_host: String,
    /// Namespace within the index to query.
    pub index_namespace: String,
    /// Embedding model identifier.
    pub embed_model: String,
    /// Chat completion model identifier.
    pub chat_model: String,
    /// Number of nearest matches to retrieve per question.
    pub top_k: usize,
    /// Dimensionality the index was built with. Embeddings of any other
    /// length fail the request rather than being truncated or padded.
    pub embedding_dimension: usize,
    /// Origins allowed by the CORS layer.
    pub allowed_origins: Vec<String>,
    /// Directory for rolling log files.
    pub log_dir: PathBuf,
    #[serde(skip)]
    pub gemini_api_key: String,
    #[serde(skip)]
    pub pinecone_api_key: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            port: 8000,
            llm_base_url: "https://api.gemini.com".to_string(),
            index_host: "https://rag.svc.pinecone.io".to_string(),
            index_namespace: "ns1".to_string(),
            embed_model: "models/text-embedding-004".to_string(),
            chat_model: "gemini-1.5-flash".to_string(),
            top_k: 5,
            embedding_dimension: 768,
            allowed_origins: default_local_origins(),
            log_dir: PathBuf::from("logs"),
            gemini_api_key: String::new(),
            pinecone_api_key: String::new(),
        }
    }
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        let path = config_path();
        let mut settings = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Self::from_yaml(&contents)?
        } else {
            Self::default()
        };

        if let Some(port) = env::var("PORT").ok().and_then(|val| val.parse::<u16>().ok()) {
            settings.port = port;
        }

        settings.gemini_api_key =
            env::var("GEMINI_API_KEY").context("GEMINI_API_KEY is not set")?;
        settings.pinecone_api_key =
            env::var("PINECONE_API_KEY").context("PINECONE_API_KEY is not set")?;

        Ok(settings)
    }

    pub fn from_yaml(contents: &str) -> anyhow::Result<Self> {
        serde_yaml::from_str(contents).context("Invalid config file")
    }
}

fn config_path() -> PathBuf {
    env::var("LECTERN_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.yml"))
}

fn default_local_origins() -> Vec<String> {
    vec![
        "http://localhost".to_string(),
        "http://localhost:3000".to_string(),
        "http://localhost:5173".to_string(),
        "http://127.0.0.1".to_string(),
        "http://127.0.0.1:3000".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}
