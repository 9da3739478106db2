//! Slash command parsing for the terminal chat.
//!
//! Lines that start with `/` control the session instead of being sent to
//! the model.

/// A parsed chat command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Clear the conversation history.
    Clear,

    /// Show the about text and message count.
    About,

    /// Show help.
    Help,

    /// Exit.
    Quit,

    /// Unknown command or bad arguments; the payload explains which.
    Invalid(String),
}

/// Parse a line of input as a command.
///
/// Returns `None` when the line is an ordinary message.
pub fn parse_command(input: &str) -> Option<ChatCommand> {
    let input = input.trim();
    let rest = input.strip_prefix('/')?;

    let mut parts = rest.splitn(2, ' ');
    let command = parts.next()?.to_lowercase();
    let argument = parts.next().map(str::trim).filter(|s| !s.is_empty());

    let result = match command.as_str() {
        "clear" | "reset" => no_argument(ChatCommand::Clear, &command, argument),
        "about" | "info" => no_argument(ChatCommand::About, &command, argument),
        "help" | "?" => ChatCommand::Help,
        "quit" | "exit" | "q" => ChatCommand::Quit,
        _ => ChatCommand::Invalid(format!("Unknown command: /{command}")),
    };

    Some(result)
}

fn no_argument(command: ChatCommand, name: &str, argument: Option<&str>) -> ChatCommand {
    match argument {
        Some(_) => ChatCommand::Invalid(format!("/{name} takes no arguments")),
        None => command,
    }
}

/// Help text listing the available commands.
pub fn help_text() -> &'static str {
    "/clear  - Clear the conversation\n\
     /about  - Show information about this chat and the message count\n\
     /help   - Show this help\n\
     /quit   - Exit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_not_a_command() {
        assert_eq!(parse_command("hello"), None);
        assert_eq!(parse_command("what is 1/2?"), None);
    }

    #[test]
    fn parse_known_commands() {
        assert_eq!(parse_command("/clear"), Some(ChatCommand::Clear));
        assert_eq!(parse_command("  /CLEAR  "), Some(ChatCommand::Clear));
        assert_eq!(parse_command("/about"), Some(ChatCommand::About));
        assert_eq!(parse_command("/?"), Some(ChatCommand::Help));
        assert_eq!(parse_command("/exit"), Some(ChatCommand::Quit));
        assert_eq!(parse_command("/q"), Some(ChatCommand::Quit));
    }

    #[test]
    fn parse_invalid_commands() {
        assert_eq!(
            parse_command("/model gemini-2.5-pro"),
            Some(ChatCommand::Invalid("Unknown command: /model".to_string()))
        );
        assert_eq!(
            parse_command("/clear everything"),
            Some(ChatCommand::Invalid("/clear takes no arguments".to_string()))
        );
    }

    #[test]
    fn help_mentions_every_command() {
        let help = help_text();
        for name in ["/clear", "/about", "/help", "/quit"] {
            assert!(help.contains(name), "missing {name}");
        }
    }
}
