//! Chat sessions against a streaming text generator.
//!
//! This module holds everything the front ends share:
//!
//! - [`transcript`]: the per-session message list
//! - [`accumulator`]: the per-turn buffer for streamed fragments
//! - [`session`]: the driver that runs one turn per user input
//! - [`commands`]: slash commands for the terminal front end
//! - [`config`]: command-line arguments for the terminal front end

mod accumulator;
mod commands;
mod config;
mod session;
mod transcript;

pub use crate::render::{CURSOR, PlainTextRenderer, Renderer};
pub use accumulator::StreamAccumulator;
pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig};
pub use session::ChatSession;
pub use transcript::{ChatMessage, ChatRole, Transcript};

/// Heading shown at the top of every front end.
pub const PAGE_TITLE: &str = "🤖 Gemini Chatbot";

/// Sub-heading shown under the title.
pub const PAGE_CAPTION: &str = "Powered by Google Gemini AI";

/// Placeholder for the message input.
pub const INPUT_PLACEHOLDER: &str = "Type your message here...";

/// Static text for the about box.
pub const ABOUT_TEXT: &str = "This chatbot uses Google's Gemini AI model to provide \
intelligent responses. Your conversation history is maintained within this session.";
