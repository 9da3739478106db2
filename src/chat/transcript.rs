//! The session transcript: an append-only list of chat messages.

use serde::{Deserialize, Serialize};

use crate::types::{Content, ContentRole};

/// Who wrote a [`ChatMessage`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    /// The person chatting.
    User,

    /// The model, or an error reported in its place.
    Assistant,
}

impl ChatRole {
    /// The role label the Gemini API expects for this author.
    pub fn content_role(self) -> ContentRole {
        match self {
            ChatRole::User => ContentRole::User,
            ChatRole::Assistant => ContentRole::Model,
        }
    }

    /// Label shown next to messages in a UI.
    pub fn label(self) -> &'static str {
        match self {
            ChatRole::User => "You",
            ChatRole::Assistant => "Gemini",
        }
    }
}

/// One entry of the transcript.  Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    role: ChatRole,
    content: String,
}

impl ChatMessage {
    /// Create a message.
    pub fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    /// Create a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    /// Create an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    /// The author.
    pub fn role(&self) -> ChatRole {
        self.role
    }

    /// The text.
    pub fn content(&self) -> &str {
        &self.content
    }

    /// This message in request form.
    pub fn to_content(&self) -> Content {
        Content::new(self.role.content_role(), self.content.clone())
    }
}

/// Ordered chat history for one session.
///
/// Insertion order is conversational order.  The only mutations are
/// [`push`](Transcript::push) and [`clear`](Transcript::clear); turn order
/// is not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// An empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message.
    pub fn push(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// Drop every message.
    pub fn clear(&mut self) {
        self.messages = Vec::new();
    }

    /// All messages, oldest first.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The newest message.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when there are no messages.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// The whole history in request form.
    pub fn to_contents(&self) -> Vec<Content> {
        self.messages.iter().map(ChatMessage::to_content).collect()
    }
}
