// Public modules
pub mod chat;
pub mod client;
pub mod client_logger;
pub mod error;
pub mod generator;
pub mod logging;
pub mod markdown;
pub mod observability;
pub mod render;
pub mod sse;
pub mod types;
pub mod web;

// Re-exports
pub use client::Gemini;
pub use client_logger::{ClientLogger, TracingLogger};
pub use error::{Error, Result};
pub use generator::{FragmentStream, TextGenerator};
pub use types::*;
