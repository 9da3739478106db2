// Public modules
pub mod content;
pub mod generate_content;
pub mod model;

// Re-exports
pub use content::{Content, ContentRole, Part};
pub use generate_content::{
    Candidate, GenerateContentRequest, GenerateContentResponse, GoogleError, GoogleErrorResponse,
    PromptFeedback, UsageMetadata,
};
pub use model::{CHAT_MODEL, KnownModel, Model};
