//! Controller for the simulated streaming chat-completion API.
//!
//! Lets client code that consumes streamed chat completions be exercised
//! without a real model behind it. Nothing here touches the SSE registry.

use crate::Error;

use axum::body::Bytes;
use axum::http::header;
use axum::response::IntoResponse;

use domain::chat_completion::ChatCompletionRequest;
use domain::simulator as SimulatorApi;
use log::*;

/// POST /chat-completions-simulator
///
/// Responds with a random number (1 to 50) of fabricated `data:` chunks
/// followed by `data: [DONE]`. The whole stream is built first and sent as a
/// single body, so a failure part way through returns a 500 and no `[DONE]`.
pub async fn create(body: Bytes) -> Result<impl IntoResponse, Error> {
    let request: ChatCompletionRequest = serde_json::from_slice(&body).map_err(|e| {
        warn!("Error decoding chat completion request body: {e}");
        Error::BadRequest("Error decoding request body".to_string())
    })?;

    debug!("Simulating chat completion stream for model {}", request.model);

    let stream = SimulatorApi::render(&request)?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        stream,
    ))
}
