//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which owns one session's
//! transcript and runs the request/response cycle for each user input.

use std::time::Instant;

use futures::StreamExt;

use crate::chat::accumulator::StreamAccumulator;
use crate::chat::transcript::{ChatMessage, Transcript};
use crate::generator::TextGenerator;
use crate::observability::{CHAT_FRAGMENTS, CHAT_TURN_DURATION, CHAT_TURN_ERRORS, CHAT_TURNS};
use crate::render::Renderer;

/// A chat session that owns the transcript and drives the generator.
///
/// Create one per interactive session and drop it when the session ends.
/// Turns are serialized by `&mut self`: a session never runs two turns at
/// once.
pub struct ChatSession<G: TextGenerator> {
    generator: G,
    transcript: Transcript,
}

impl<G: TextGenerator> ChatSession<G> {
    /// Creates a new, empty chat session.
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            transcript: Transcript::new(),
        }
    }

    /// Runs one turn for `text`.
    ///
    /// This method:
    /// 1. Appends the user message and renders it
    /// 2. Sends the whole transcript to the generator
    /// 3. Renders the growing answer, with a cursor, after each fragment
    /// 4. Renders the final answer and appends it to the transcript
    ///
    /// Any failure while starting or consuming the stream is rendered as
    /// `Error: <message>` and recorded as the assistant's reply, so exactly
    /// one assistant message is appended per call.  Nothing is retried.
    pub async fn handle_user_input(&mut self, text: &str, renderer: &mut dyn Renderer) {
        CHAT_TURNS.click();
        let start = Instant::now();

        self.transcript.push(ChatMessage::user(text));
        if let Some(message) = self.transcript.last() {
            renderer.render_message(message);
        }
        renderer.render_message_count(self.transcript.len());

        let reply = match self.stream_reply(renderer).await {
            Ok(reply) => {
                renderer.render_final(&reply);
                reply
            }
            Err(err) => {
                CHAT_TURN_ERRORS.click();
                tracing::warn!(error = %err, "generation failed");
                let reply = format!("Error: {err}");
                renderer.render_error(&reply);
                reply
            }
        };

        self.transcript.push(ChatMessage::assistant(reply));
        renderer.render_message_count(self.transcript.len());
        CHAT_TURN_DURATION.add(start.elapsed().as_secs_f64());
    }

    async fn stream_reply(&self, renderer: &mut dyn Renderer) -> Result<String, G::Error> {
        let contents = self.transcript.to_contents();
        tracing::debug!(turns = contents.len(), "requesting reply");
        let mut fragments = self.generator.generate(contents).await?;

        let mut accumulator = StreamAccumulator::new();
        while let Some(fragment) = fragments.next().await {
            if accumulator.push(&fragment?) {
                CHAT_FRAGMENTS.click();
                renderer.render_partial(&accumulator.with_cursor());
            }
        }
        tracing::debug!(fragments = accumulator.fragments(), "reply complete");
        Ok(accumulator.finish())
    }

    /// Clears the conversation history and redraws the whole page.
    pub fn clear(&mut self, renderer: &mut dyn Renderer) {
        self.transcript.clear();
        renderer.render_page(self.transcript.messages());
    }

    /// Returns the messages in conversational order.
    pub fn messages(&self) -> &[ChatMessage] {
        self.transcript.messages()
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.transcript.len()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::fmt;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use futures::stream;

    use super::*;
    use crate::chat::ChatRole;
    use crate::generator::FragmentStream;
    use crate::types::{Content, ContentRole};

    #[derive(Debug, Clone, PartialEq)]
    struct ScriptError(String);

    impl fmt::Display for ScriptError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    enum Reply {
        Fragments(Vec<&'static str>),
        FailToStart(&'static str),
        FailAfter(Vec<&'static str>, &'static str),
    }

    /// Plays back one scripted reply per call and records every request.
    #[derive(Default)]
    struct ScriptedGenerator {
        replies: Mutex<VecDeque<Reply>>,
        requests: Mutex<Vec<Vec<Content>>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Reply>) -> Self {
            Self {
                replies: Mutex::new(replies.into()),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn requests(&self) -> Vec<Vec<Content>> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        type Error = ScriptError;

        async fn generate(
            &self,
            contents: Vec<Content>,
        ) -> Result<FragmentStream<ScriptError>, ScriptError> {
            self.requests.lock().unwrap().push(contents);
            let reply = self
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(Reply::Fragments(vec!["ok"]));
            match reply {
                Reply::Fragments(fragments) => Ok(stream::iter(
                    fragments.into_iter().map(|f| Ok(f.to_string())),
                )
                .boxed()),
                Reply::FailToStart(message) => Err(ScriptError(message.to_string())),
                Reply::FailAfter(fragments, message) => {
                    let items = fragments
                        .into_iter()
                        .map(|f| Ok(f.to_string()))
                        .chain(std::iter::once(Err(ScriptError(message.to_string()))));
                    Ok(stream::iter(items).boxed())
                }
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Event {
        Page(usize),
        Message(ChatRole, String),
        Partial(String),
        Final(String),
        Error(String),
        Count(usize),
    }

    #[derive(Default)]
    struct RecordingRenderer {
        events: Vec<Event>,
    }

    impl Renderer for RecordingRenderer {
        fn render_page(&mut self, messages: &[ChatMessage]) {
            self.events.push(Event::Page(messages.len()));
        }

        fn render_message(&mut self, message: &ChatMessage) {
            self.events.push(Event::Message(
                message.role(),
                message.content().to_string(),
            ));
        }

        fn render_partial(&mut self, text: &str) {
            self.events.push(Event::Partial(text.to_string()));
        }

        fn render_final(&mut self, text: &str) {
            self.events.push(Event::Final(text.to_string()));
        }

        fn render_error(&mut self, error: &str) {
            self.events.push(Event::Error(error.to_string()));
        }

        fn render_message_count(&mut self, count: usize) {
            self.events.push(Event::Count(count));
        }
    }

    fn contents_of(session: &ChatSession<ScriptedGenerator>) -> Vec<(ChatRole, String)> {
        session
            .messages()
            .iter()
            .map(|m| (m.role(), m.content().to_string()))
            .collect()
    }

    #[tokio::test]
    async fn hi_scenario() {
        let generator = ScriptedGenerator::new(vec![Reply::Fragments(vec!["Hello", "!"])]);
        let mut session = ChatSession::new(generator);
        let mut renderer = RecordingRenderer::default();

        session.handle_user_input("Hi", &mut renderer).await;

        assert_eq!(
            contents_of(&session),
            vec![
                (ChatRole::User, "Hi".to_string()),
                (ChatRole::Assistant, "Hello!".to_string()),
            ]
        );
        assert_eq!(
            renderer.events,
            vec![
                Event::Message(ChatRole::User, "Hi".to_string()),
                Event::Count(1),
                Event::Partial("Hello▌".to_string()),
                Event::Partial("Hello!▌".to_string()),
                Event::Final("Hello!".to_string()),
                Event::Count(2),
            ]
        );
    }

    #[tokio::test]
    async fn fragments_concatenate_and_empty_ones_are_ignored() {
        let generator =
            ScriptedGenerator::new(vec![Reply::Fragments(vec!["Hel", "", "lo", " world"])]);
        let mut session = ChatSession::new(generator);
        let mut renderer = RecordingRenderer::default();

        session.handle_user_input("greet", &mut renderer).await;

        assert_eq!(session.messages()[1].content(), "Hello world");
        let partials = renderer
            .events
            .iter()
            .filter(|e| matches!(e, Event::Partial(_)))
            .count();
        assert_eq!(partials, 3);
    }

    #[tokio::test]
    async fn n_successful_turns_give_2n_messages_in_order() {
        let generator = ScriptedGenerator::new(vec![
            Reply::Fragments(vec!["one"]),
            Reply::Fragments(vec!["two"]),
            Reply::Fragments(vec!["thr", "ee"]),
        ]);
        let mut session = ChatSession::new(generator);
        let mut renderer = RecordingRenderer::default();

        for input in ["a", "b", "c"] {
            session.handle_user_input(input, &mut renderer).await;
        }

        assert_eq!(session.message_count(), 6);
        assert_eq!(
            contents_of(&session),
            vec![
                (ChatRole::User, "a".to_string()),
                (ChatRole::Assistant, "one".to_string()),
                (ChatRole::User, "b".to_string()),
                (ChatRole::Assistant, "two".to_string()),
                (ChatRole::User, "c".to_string()),
                (ChatRole::Assistant, "three".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn failure_to_start_becomes_error_reply() {
        let generator = ScriptedGenerator::new(vec![Reply::FailToStart("rate limited")]);
        let mut session = ChatSession::new(generator);
        let mut renderer = RecordingRenderer::default();

        session.handle_user_input("Hi", &mut renderer).await;

        assert_eq!(session.message_count(), 2);
        assert_eq!(session.messages()[1].role(), ChatRole::Assistant);
        assert_eq!(session.messages()[1].content(), "Error: rate limited");
        assert!(
            renderer
                .events
                .contains(&Event::Error("Error: rate limited".to_string()))
        );
        assert!(!renderer.events.iter().any(|e| matches!(e, Event::Final(_))));
    }

    #[tokio::test]
    async fn mid_stream_failure_discards_partial_text() {
        let generator =
            ScriptedGenerator::new(vec![Reply::FailAfter(vec!["Hal", "f"], "connection reset")]);
        let mut session = ChatSession::new(generator);
        let mut renderer = RecordingRenderer::default();

        session.handle_user_input("Hi", &mut renderer).await;

        assert_eq!(session.message_count(), 2);
        assert_eq!(session.messages()[1].content(), "Error: connection reset");
        assert_eq!(
            renderer.events.last(),
            Some(&Event::Count(2)),
        );
    }

    #[tokio::test]
    async fn error_reply_is_sent_as_model_turn_next_time() {
        let generator = ScriptedGenerator::new(vec![
            Reply::FailToStart("rate limited"),
            Reply::Fragments(vec!["fine"]),
        ]);
        let mut session = ChatSession::new(generator);
        let mut renderer = RecordingRenderer::default();

        session.handle_user_input("first", &mut renderer).await;
        session.handle_user_input("second", &mut renderer).await;

        let requests = session.generator.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0], vec![Content::user("first")]);
        assert_eq!(
            requests[1],
            vec![
                Content::user("first"),
                Content::model("Error: rate limited"),
                Content::user("second"),
            ]
        );
    }

    #[tokio::test]
    async fn prior_assistant_turns_are_sent_as_model() {
        let generator = ScriptedGenerator::new(vec![
            Reply::Fragments(vec!["x"]),
            Reply::Fragments(vec!["y"]),
            Reply::Fragments(vec!["z"]),
        ]);
        let mut session = ChatSession::new(generator);
        let mut renderer = RecordingRenderer::default();

        for input in ["1", "2", "3"] {
            session.handle_user_input(input, &mut renderer).await;
        }

        for request in session.generator.requests() {
            for (i, content) in request.iter().enumerate() {
                let expected = if i % 2 == 0 {
                    ContentRole::User
                } else {
                    ContentRole::Model
                };
                assert_eq!(content.role, Some(expected));
            }
            let json = serde_json::to_string(&request).unwrap();
            assert!(!json.contains("assistant"));
        }
    }

    #[tokio::test]
    async fn empty_stream_commits_empty_reply() {
        let generator = ScriptedGenerator::new(vec![Reply::Fragments(vec![])]);
        let mut session = ChatSession::new(generator);
        let mut renderer = RecordingRenderer::default();

        session.handle_user_input("Hi", &mut renderer).await;

        assert_eq!(session.message_count(), 2);
        assert_eq!(session.messages()[1].content(), "");
        assert!(renderer.events.contains(&Event::Final(String::new())));
    }

    #[tokio::test]
    async fn clear_after_turn_redraws_empty_page() {
        let generator = ScriptedGenerator::new(vec![Reply::Fragments(vec!["ok"])]);
        let mut session = ChatSession::new(generator);
        let mut renderer = RecordingRenderer::default();

        session.handle_user_input("A", &mut renderer).await;
        assert_eq!(session.message_count(), 2);

        session.clear(&mut renderer);
        assert!(session.messages().is_empty());
        assert_eq!(renderer.events.last(), Some(&Event::Page(0)));
    }

    #[test]
    fn clear_on_empty_session_is_harmless() {
        let mut session = ChatSession::new(ScriptedGenerator::default());
        let mut renderer = RecordingRenderer::default();

        session.clear(&mut renderer);
        session.clear(&mut renderer);

        assert_eq!(session.message_count(), 0);
        assert_eq!(renderer.events, vec![Event::Page(0), Event::Page(0)]);
    }
}
