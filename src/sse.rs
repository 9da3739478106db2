//! Server-Sent Events (SSE) processing for streaming responses.
//!
//! `streamGenerateContent?alt=sse` answers with one `data:` event per
//! [`GenerateContentResponse`] chunk.  This module turns the raw byte stream
//! of such a response into a stream of parsed chunks, buffering events that
//! arrive split across network reads.

use bytes::Bytes;
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;

use crate::observability::{STREAM_BYTES, STREAM_CHUNKS, STREAM_ERRORS};
use crate::types::{GenerateContentResponse, GoogleErrorResponse};
use crate::{Error, Result};

/// What a single `data:` payload may contain.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    Error(GoogleErrorResponse),
    Chunk(GenerateContentResponse),
}

/// Process a stream of bytes into a stream of response chunks.
///
/// Events without data (keep-alives, comments) are skipped.  An error object
/// delivered in-band is surfaced as an `Err` item, as are malformed events;
/// the stream keeps going after either so the caller decides when to stop.
pub fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<GenerateContentResponse>> + Send
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + Send + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result.map_err(|e| Error::transport(format!("response stream broke: {e}"), e))
    });

    let buffer = EventBuffer::default();

    stream::unfold((stream, buffer), move |(mut stream, mut buffer)| async move {
        loop {
            if let Some(event) = buffer.next_event() {
                match parse_event(&event) {
                    Some(item) => {
                        if item.is_ok() {
                            STREAM_CHUNKS.click();
                        } else {
                            STREAM_ERRORS.click();
                        }
                        return Some((item, (stream, buffer)));
                    }
                    None => continue,
                }
            }

            match stream.next().await {
                Some(Ok(bytes)) => {
                    STREAM_BYTES.count(bytes.len() as u64);
                    buffer.extend(&bytes);
                }
                Some(Err(e)) => {
                    STREAM_ERRORS.click();
                    return Some((Err(e), (stream, buffer)));
                }
                None => {
                    // A final event may arrive without its trailing blank line.
                    let event = buffer.take_rest();
                    return parse_event(&event).map(|item| (item, (stream, buffer)));
                }
            }
        }
    })
}

/// Raw bytes not yet split into events.
///
/// `scanned` marks how far the buffer is known to hold no blank line, so
/// an event that trickles in over many reads is scanned once.
#[derive(Debug, Default)]
struct EventBuffer {
    bytes: Vec<u8>,
    scanned: usize,
}

impl EventBuffer {
    fn extend(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Remove and return the next complete event, without its terminator.
    fn next_event(&mut self) -> Option<Vec<u8>> {
        // A terminator may straddle the previous end of the buffer.
        let from = self.scanned.saturating_sub(3);
        match event_boundary(&self.bytes, from) {
            Some((end, rest)) => {
                let event = self.bytes.drain(..rest).take(end).collect();
                self.scanned = 0;
                Some(event)
            }
            None => {
                self.scanned = self.bytes.len();
                None
            }
        }
    }

    fn take_rest(&mut self) -> Vec<u8> {
        self.scanned = 0;
        std::mem::take(&mut self.bytes)
    }
}

/// Locate the first blank line in `buffer` at or after `from`.
///
/// Returns the length of the event before it and the offset where the next
/// event starts.
fn event_boundary(buffer: &[u8], from: usize) -> Option<(usize, usize)> {
    (from..buffer.len()).find_map(|i| {
        let tail = &buffer[i..];
        if tail.starts_with(b"\r\n\r\n") {
            Some((i, i + 4))
        } else if tail.starts_with(b"\n\n") {
            Some((i, i + 2))
        } else {
            None
        }
    })
}

/// Parse one event.  `None` means the event carried nothing to report.
fn parse_event(event: &[u8]) -> Option<Result<GenerateContentResponse>> {
    let text = match std::str::from_utf8(event) {
        Ok(text) => text,
        Err(e) => return Some(Err(e.into())),
    };

    let mut data: Option<String> = None;
    for line in text.lines() {
        if line.starts_with(':') {
            continue;
        }
        if let Some(value) = line.strip_prefix("data:") {
            let value = value.strip_prefix(' ').unwrap_or(value);
            match data.as_mut() {
                Some(data) => {
                    data.push('\n');
                    data.push_str(value);
                }
                None => data = Some(value.to_string()),
            }
        }
    }

    let data = data?;
    let data = data.trim();
    if data.is_empty() || data == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<Payload>(data) {
        Ok(Payload::Chunk(chunk)) => Some(Ok(chunk)),
        Ok(Payload::Error(GoogleErrorResponse { error })) => Some(Err(Error::api(
            error.code,
            error.status,
            error.message,
            None,
        ))),
        Err(e) => Some(Err(e.into())),
    }
}
