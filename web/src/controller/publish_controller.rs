use crate::params::publish::PublishParams;
use crate::{AppState, Error};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use domain::completion as CompletionApi;
use log::*;

/// GET|POST /publish?prompt=<text>
///
/// Generate text for `prompt` upstream and broadcast it to every connected
/// SSE client. The caller gets no body back; the text only reaches subscribers.
pub async fn publish(
    State(app_state): State<AppState>,
    Query(params): Query<PublishParams>,
) -> Result<impl IntoResponse, Error> {
    let prompt = params
        .prompt()
        .ok_or_else(|| Error::BadRequest("Prompt is required".to_string()))?;

    debug!("Publishing completion for prompt of {} byte(s)", prompt.len());

    let text = CompletionApi::generate_text(&app_state.config, prompt).await?;
    app_state.sse_manager.broadcast(text);

    Ok(StatusCode::OK)
}
