use serde::{Deserialize, Serialize};

use crate::types::Content;

/// Body of a `generateContent` / `streamGenerateContent` request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far, oldest first, ending with the newest user turn.
    pub contents: Vec<Content>,
}

impl GenerateContentRequest {
    /// Create a request for the given conversation.
    pub fn new(contents: Vec<Content>) -> Self {
        Self { contents }
    }
}

/// One chunk of a streamed response, or the whole of a unary one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// Candidate answers; chat requests produce at most one.
    #[serde(default)]
    pub candidates: Vec<Candidate>,

    /// Present when the prompt itself was blocked.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt_feedback: Option<PromptFeedback>,

    /// Token accounting, usually on the final chunk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,

    /// The concrete model version that served the request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_version: Option<String>,
}

impl GenerateContentResponse {
    /// The answer text carried by this chunk.
    ///
    /// Concatenates the text parts of the first candidate.  Returns `None`
    /// when there is no candidate or the candidate carries no text, which is
    /// how the final bookkeeping chunk of a stream usually looks.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text = content.text();
        if text.is_empty() { None } else { Some(text) }
    }
}

/// A candidate answer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// Generated content, absent when generation was stopped before any output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why generation stopped, e.g. `STOP`, `MAX_TOKENS`, `SAFETY`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<String>,

    /// Position of this candidate in the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<u32>,
}

/// Feedback about the prompt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    /// Set when the prompt was refused.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_reason: Option<String>,
}

/// Token counts for a request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens in the prompt.
    #[serde(default)]
    pub prompt_token_count: u32,

    /// Tokens across generated candidates.
    #[serde(default)]
    pub candidates_token_count: u32,

    /// Prompt plus candidates (plus any reasoning tokens).
    #[serde(default)]
    pub total_token_count: u32,
}

/// The `error` object Google APIs return on failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoogleError {
    /// HTTP status code.
    #[serde(default)]
    pub code: u16,

    /// Human-readable error message.
    #[serde(default)]
    pub message: String,

    /// Canonical status string, e.g. `INVALID_ARGUMENT`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Envelope around [`GoogleError`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoogleErrorResponse {
    /// The error itself.
    pub error: GoogleError,
}
