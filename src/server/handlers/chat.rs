use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::header;
use axum::response::Response;
use axum::Json;
use futures_util::StreamExt;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::llm::ChatMessage;
use crate::state::AppState;

/// `POST /api/chat`: run one chat turn and stream the completion back.
///
/// The body is the full conversation as an ordered JSON array; the response
/// is a plain-text body whose chunks are relayed as the model produces
/// them. Failures before streaming starts return a JSON error; a failure
/// mid-stream aborts the body so the client sees an error, not a clean end.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(history): Json<Vec<ChatMessage>>,
) -> Result<Response, ApiError> {
    let request_id = Uuid::new_v4();
    tracing::info!(%request_id, turns = history.len(), "chat request received");

    let rx = state.chat.respond(history).await?;

    let stream = futures_util::stream::unfold(rx, |mut rx| async move {
        rx.recv().await.map(|chunk| (chunk, rx))
    })
    .map(move |result| {
        if let Err(err) = &result {
            tracing::error!(%request_id, "{}", err);
        }
        result
    });

    Response::builder()
        .header(header::CONTENT_TYPE, "text/plain; charset=utf-8")
        .body(Body::from_stream(stream))
        .map_err(ApiError::internal)
}
