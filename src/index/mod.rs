pub mod pinecone;

pub use pinecone::PineconeIndex;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::errors::ApiError;

/// Review metadata stored alongside each vector in the index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchMetadata {
    pub review: String,
    pub subject: String,
    pub stars: f64,
}

/// One ranked nearest-neighbor result for a professor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessorMatch {
    pub id: String,
    #[serde(default)]
    pub score: f32,
    pub metadata: MatchMetadata,
}

/// Read-only nearest-neighbor lookup against the external review index.
///
/// Results are ranked by non-increasing score and never exceed `top_k`.
/// An empty result set is a valid outcome, not an error.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<ProfessorMatch>, ApiError>;
}
