use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

use super::{ProfessorMatch, VectorIndex};
use crate::errors::ApiError;

/// Client for a Pinecone-style vector index REST endpoint.
#[derive(Clone)]
pub struct PineconeIndex {
    host: String,
    api_key: String,
    client: Client,
}

impl PineconeIndex {
    pub fn new(host: String, api_key: String) -> Self {
        Self {
            host: host.trim_end_matches('/').to_string(),
            api_key,
            client: Client::new(),
        }
    }
}

#[derive(Deserialize)]
struct QueryResponse {
    #[serde(default)]
    matches: Vec<ProfessorMatch>,
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn query(
        &self,
        vector: &[f32],
        top_k: usize,
        namespace: &str,
    ) -> Result<Vec<ProfessorMatch>, ApiError> {
        let url = format!("{}/query", self.host);
        let body = json!({
            "topK": top_k,
            "includeMetadata": true,
            "vector": vector,
            "namespace": namespace,
        });

        let res = self
            .client
            .post(&url)
            .header("Api-Key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ApiError::Retrieval(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(ApiError::Retrieval(format!(
                "index returned {}: {}",
                status, text
            )));
        }

        let payload: QueryResponse = res
            .json()
            .await
            .map_err(|e| ApiError::Retrieval(format!("malformed query response: {}", e)))?;

        // Rank order and the top-k bound are invariants of the result, so
        // enforce them here rather than trusting the upstream.
        let mut matches = payload.matches;
        matches.sort_by(|a, b| {
            b.score
                .partial_cmp(&a.score)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(top_k);

        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn index(server: &MockServer) -> PineconeIndex {
        PineconeIndex::new(server.uri(), "index-key".to_string())
    }

    fn match_json(id: &str, score: f32) -> serde_json::Value {
        json!({
            "id": id,
            "score": score,
            "metadata": {"review": "Great!", "subject": "CS101", "stars": 5.0}
        })
    }

    #[tokio::test]
    async fn query_sends_expected_body_and_parses_matches() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .and(header("api-key", "index-key"))
            .and(body_partial_json(json!({
                "topK": 5,
                "includeMetadata": true,
                "namespace": "ns1",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [match_json("Dr. Smith", 0.9)]
            })))
            .mount(&server)
            .await;

        let matches = index(&server).query(&[0.1, 0.2], 5, "ns1").await.unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].id, "Dr. Smith");
        assert_eq!(matches[0].metadata.subject, "CS101");
    }

    #[tokio::test]
    async fn results_are_ranked_and_bounded_by_top_k() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "matches": [
                    match_json("low", 0.2),
                    match_json("high", 0.9),
                    match_json("mid", 0.5),
                ]
            })))
            .mount(&server)
            .await;

        let matches = index(&server).query(&[0.1], 2, "ns1").await.unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].id, "high");
        assert_eq!(matches[1].id, "mid");
        assert!(matches[0].score >= matches[1].score);
    }

    #[tokio::test]
    async fn empty_match_set_is_a_valid_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"matches": []})))
            .mount(&server)
            .await;

        let matches = index(&server).query(&[0.1], 5, "ns1").await.unwrap();
        assert!(matches.is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_retrieval_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let err = index(&server).query(&[0.1], 5, "ns1").await.unwrap_err();
        assert!(matches!(err, ApiError::Retrieval(_)));
    }

    #[tokio::test]
    async fn malformed_response_maps_to_retrieval_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"matches": [{"id": "x", "score": "oops"}]})),
            )
            .mount(&server)
            .await;

        let err = index(&server).query(&[0.1], 5, "ns1").await.unwrap_err();
        assert!(matches!(err, ApiError::Retrieval(_)));
    }
}
