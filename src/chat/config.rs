//! Configuration types for the terminal chat.
//!
//! This module provides CLI argument parsing via `arrrg` and the resolved
//! configuration it produces.  The model and credential are deliberately not
//! configurable here: the model is fixed and the key comes from the
//! environment.

use arrrg_derive::CommandLine;

/// Command-line arguments for the geminichat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Resolved configuration for the terminal chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatConfig {
    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,
}

impl ChatConfig {
    /// Creates a new ChatConfig with colors enabled.
    pub fn new() -> Self {
        Self { use_color: true }
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        ChatConfig {
            use_color: !args.no_color,
        }
    }
}
