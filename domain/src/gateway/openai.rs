//! Client for the upstream text-completion API.
//!
//! One plain HTTP call per prompt. There is no retry or backoff: any failure
//! is handed straight back to the caller.

use crate::error::{DomainErrorKind, Error, ExternalErrorKind, InternalErrorKind};
use log::*;
use serde::{Deserialize, Serialize};
use service::config::Config;

/// Request body for `POST /completions`
#[derive(Debug, Serialize)]
pub struct CompletionRequest<'a> {
    pub model: &'a str,
    pub prompt: &'a str,
}

/// The part of a completion response we read
#[derive(Debug, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    #[serde(default)]
    pub text: Option<String>,
}

impl CompletionResponse {
    /// Text of the first choice, if the response has one.
    pub fn into_text(self) -> Option<String> {
        self.choices.into_iter().next().and_then(|choice| choice.text)
    }
}

pub struct OpenAiClient {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OpenAiClient {
    /// Create a client from config. Fails with a config error when no API key is set.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let client = build_client(config)?;

        Ok(Self {
            client,
            base_url: config.openai_base_url().trim_end_matches('/').to_string(),
            model: config.openai_completion_model().to_string(),
        })
    }

    /// Ask the upstream API to complete `prompt` and return the generated text.
    pub async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let url = format!("{}/completions", self.base_url);

        debug!("Requesting completion from {url} with model {}", self.model);

        let response = self
            .client
            .post(&url)
            .json(&CompletionRequest {
                model: &self.model,
                prompt,
            })
            .send()
            .await
            .map_err(|e| {
                warn!("Failed to send completion request: {e:?}");
                Error {
                    source: Some(Box::new(e)),
                    error_kind: DomainErrorKind::External(ExternalErrorKind::Network),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("Completion API returned {status}: {error_text}");
            return Err(Error::upstream(format!(
                "Completion API returned {status}"
            )));
        }

        let completion: CompletionResponse = response.json().await.map_err(|e| {
            warn!("Failed to parse completion response: {e:?}");
            Error {
                source: Some(Box::new(e)),
                error_kind: DomainErrorKind::External(ExternalErrorKind::Other(
                    "Invalid response from completion API".to_string(),
                )),
            }
        })?;

        completion.into_text().ok_or_else(|| {
            warn!("Completion response carried no choice text");
            Error::upstream("Unexpected response format from completion API")
        })
    }
}

/// Build HTTP client with bearer authentication
fn build_client(config: &Config) -> Result<reqwest::Client, Error> {
    let headers = build_auth_headers(config)?;

    Ok(reqwest::Client::builder()
        .use_rustls_tls()
        .default_headers(headers)
        .build()?)
}

fn build_auth_headers(config: &Config) -> Result<reqwest::header::HeaderMap, Error> {
    let api_key = config.openai_api_key().ok_or_else(|| {
        warn!("OPENAI_API_KEY is not set");
        Error::config()
    })?;

    let mut headers = reqwest::header::HeaderMap::new();
    let mut auth_header = reqwest::header::HeaderValue::from_str(&format!("Bearer {api_key}"))
        .map_err(|err| {
            warn!("Failed to create authorization header value: {err:?}");
            Error {
                source: Some(Box::new(err)),
                error_kind: DomainErrorKind::Internal(InternalErrorKind::Other(
                    "Invalid API key format".to_string(),
                )),
            }
        })?;
    auth_header.set_sensitive(true);
    headers.insert(reqwest::header::AUTHORIZATION, auth_header);

    Ok(headers)
}
