//! Logging hook for Gemini client operations.
//!
//! This module provides the [`ClientLogger`] trait that allows callers to
//! capture the traffic passing through the [`Gemini`](crate::Gemini) client.

use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

/// A trait for logging Gemini client operations.
///
/// # Example
///
/// ```rust,ignore
/// use geminichat::{ClientLogger, GenerateContentRequest, GenerateContentResponse, Model};
///
/// struct StderrLogger;
///
/// impl ClientLogger for StderrLogger {
///     fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
///         eprintln!("-> {model}: {} turns", request.contents.len());
///     }
///
///     fn log_stream_chunk(&self, chunk: &GenerateContentResponse) {
///         eprintln!("<- {:?}", chunk.text());
///     }
/// }
/// ```
pub trait ClientLogger: Send + Sync {
    /// Called once per request, before it is sent.
    fn log_request(&self, model: &Model, request: &GenerateContentRequest);

    /// Called for each chunk parsed from a streamed response.
    fn log_stream_chunk(&self, chunk: &GenerateContentResponse);
}

/// A [`ClientLogger`] that forwards to `tracing` at debug/trace level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl ClientLogger for TracingLogger {
    fn log_request(&self, model: &Model, request: &GenerateContentRequest) {
        tracing::debug!(%model, turns = request.contents.len(), "sending generate request");
    }

    fn log_stream_chunk(&self, chunk: &GenerateContentResponse) {
        let finish_reason = chunk
            .candidates
            .first()
            .and_then(|candidate| candidate.finish_reason.as_deref());
        tracing::trace!(
            text_len = chunk.text().map(|text| text.len()).unwrap_or(0),
            finish_reason,
            "received stream chunk"
        );
    }
}
