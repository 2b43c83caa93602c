//! Wire types for chat-completion requests and streamed response chunks.
//!
//! Field names follow the upstream streaming API so that existing client
//! libraries can decode the simulated stream unchanged.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatCompletionMessage>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionMessage {
    pub role: String,
    #[serde(default)]
    pub content: String,
}

/// One `data:` frame of a streamed chat completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: String,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatCompletionStreamChoice>,
    pub system_fingerprint: String,
    pub prompt_annotations: Vec<PromptAnnotation>,
    pub prompt_filter_results: Vec<PromptFilterResult>,
    pub usage: Usage,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionStreamChoice {
    pub index: usize,
    pub delta: ChatCompletionStreamChoiceDelta,
    pub finish_reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionStreamChoiceDelta {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub role: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptAnnotation {
    pub prompt_index: usize,
    pub content_filter_results: ContentFilterResults,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptFilterResult {
    pub index: usize,
    pub content_filter_results: ContentFilterResults,
}

/// Content-safety verdicts, one per category.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentFilterResults {
    pub hate: FilterVerdict,
    pub self_harm: FilterVerdict,
    pub sexual: FilterVerdict,
    pub violence: FilterVerdict,
}

/// Severity is never filled in by the simulator, so it is left out of the JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterVerdict {
    pub filtered: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub severity: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
