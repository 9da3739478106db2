//! The seam between the chat driver and whatever produces answer text.
//!
//! The driver only needs "given the conversation, give me a stream of text
//! fragments".  [`Gemini`] provides that over HTTP; tests provide scripted
//! fragments.

use std::fmt;

use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};

use crate::client::Gemini;
use crate::types::{CHAT_MODEL, Content, GenerateContentRequest};

/// A lazy, finite, non-restartable sequence of answer fragments.
pub type FragmentStream<E> = BoxStream<'static, Result<String, E>>;

/// Produces a streamed answer for a conversation.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// The failure type.  The driver only ever displays it.
    type Error: fmt::Display + Send + 'static;

    /// Start generating a reply to `contents`.
    ///
    /// Concatenating the yielded fragments in order gives the full reply.
    async fn generate(&self, contents: Vec<Content>)
    -> Result<FragmentStream<Self::Error>, Self::Error>;
}

#[async_trait]
impl TextGenerator for Gemini {
    type Error = crate::Error;

    async fn generate(
        &self,
        contents: Vec<Content>,
    ) -> Result<FragmentStream<Self::Error>, Self::Error> {
        let request = GenerateContentRequest::new(contents);
        let chunks = self.stream_generate_content(&CHAT_MODEL, &request).await?;
        let fragments = chunks.filter_map(|item| async move {
            match item {
                Ok(chunk) => chunk.text().map(Ok),
                Err(err) => Some(Err(err)),
            }
        });
        Ok(fragments.boxed())
    }
}
