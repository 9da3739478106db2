//! Render events pushed to the browser.
//!
//! The page cannot be redrawn from the server, so [`EventRenderer`] turns
//! each renderer call into a [`RenderEvent`] and the page script applies it.
//! Markdown is rendered here so the page only swaps in HTML.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::chat::{ChatMessage, ChatRole, Renderer};
use crate::markdown::to_html;

/// A transcript entry as the page shows it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageView {
    /// Who wrote it.
    pub role: ChatRole,
    /// The markdown source.
    pub content: String,
    /// `content` rendered to HTML.
    pub html: String,
}

impl From<&ChatMessage> for MessageView {
    fn from(message: &ChatMessage) -> Self {
        Self {
            role: message.role(),
            content: message.content().to_string(),
            html: to_html(message.content()),
        }
    }
}

/// One rendering instruction for the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RenderEvent {
    /// Redraw the whole message list.
    Page {
        /// Every message, oldest first.
        messages: Vec<MessageView>,
    },
    /// Append a finished message.
    Message {
        /// The message.
        message: MessageView,
    },
    /// Replace the pending answer with this partial text (cursor included).
    Partial {
        /// The text.
        text: String,
        /// `text` rendered to HTML.
        html: String,
    },
    /// Replace the pending answer with the finished text.
    Final {
        /// The text.
        text: String,
        /// `text` rendered to HTML.
        html: String,
    },
    /// Replace the pending answer with an error.
    Error {
        /// The full `Error: ...` string.
        text: String,
    },
    /// Update the sidebar counter.
    Count {
        /// Messages in the transcript.
        count: usize,
    },
}

impl RenderEvent {
    /// The SSE `event:` name for this event.
    pub fn name(&self) -> &'static str {
        match self {
            RenderEvent::Page { .. } => "page",
            RenderEvent::Message { .. } => "message",
            RenderEvent::Partial { .. } => "partial",
            RenderEvent::Final { .. } => "final",
            RenderEvent::Error { .. } => "error",
            RenderEvent::Count { .. } => "count",
        }
    }
}

/// A [`Renderer`] that forwards every call over a channel.
///
/// Sending never fails the turn: if the browser has gone away the events are
/// dropped and the transcript is still updated.
pub struct EventRenderer {
    tx: mpsc::UnboundedSender<RenderEvent>,
}

impl EventRenderer {
    /// Create a renderer and the receiving end of its events.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<RenderEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&mut self, event: RenderEvent) {
        if self.tx.send(event).is_err() {
            tracing::trace!("render event dropped; receiver closed");
        }
    }
}

impl Renderer for EventRenderer {
    fn render_page(&mut self, messages: &[ChatMessage]) {
        self.send(RenderEvent::Page {
            messages: messages.iter().map(MessageView::from).collect(),
        });
    }

    fn render_message(&mut self, message: &ChatMessage) {
        self.send(RenderEvent::Message {
            message: message.into(),
        });
    }

    fn render_partial(&mut self, text: &str) {
        self.send(RenderEvent::Partial {
            text: text.to_string(),
            html: to_html(text),
        });
    }

    fn render_final(&mut self, text: &str) {
        self.send(RenderEvent::Final {
            text: text.to_string(),
            html: to_html(text),
        });
    }

    fn render_error(&mut self, error: &str) {
        self.send(RenderEvent::Error {
            text: error.to_string(),
        });
    }

    fn render_message_count(&mut self, count: usize) {
        self.send(RenderEvent::Count { count });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn events_serialize_with_type_tag() {
        let event = RenderEvent::Message {
            message: (&ChatMessage::user("Hi *there*")).into(),
        };
        assert_eq!(
            to_value(&event).unwrap(),
            json!({"type": "message", "message": {
                "role": "user",
                "content": "Hi *there*",
                "html": "<p>Hi <em>there</em></p>\n",
            }})
        );
        assert_eq!(
            to_value(RenderEvent::Count { count: 2 }).unwrap(),
            json!({"type": "count", "count": 2})
        );
        assert_eq!(RenderEvent::Count { count: 2 }.name(), "count");
    }

    #[test]
    fn renderer_forwards_in_order() {
        let (mut renderer, mut rx) = EventRenderer::channel();
        renderer.render_partial("He▌");
        renderer.render_final("Hey");
        renderer.render_message_count(2);
        drop(renderer);

        let mut events = Vec::new();
        while let Ok(event) = rx.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![
                RenderEvent::Partial {
                    text: "He▌".to_string(),
                    html: "<p>He▌</p>\n".to_string(),
                },
                RenderEvent::Final {
                    text: "Hey".to_string(),
                    html: "<p>Hey</p>\n".to_string(),
                },
                RenderEvent::Count { count: 2 },
            ]
        );
    }

    #[test]
    fn closed_receiver_is_ignored() {
        let (mut renderer, rx) = EventRenderer::channel();
        drop(rx);
        renderer.render_error("Error: gone");
    }
}
