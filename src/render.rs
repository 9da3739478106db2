//! Output rendering for chat sessions.
//!
//! The chat driver never draws anything itself.  It calls a [`Renderer`]
//! after every change it makes, and the renderer decides what that looks
//! like: ANSI text in a terminal, or events pushed to a browser.

use std::io::{self, Stdout, Write};

use termimad::MadSkin;
use termimad::crossterm::terminal;

use crate::chat::{ABOUT_TEXT, ChatMessage, ChatRole, PAGE_CAPTION, PAGE_TITLE};
use crate::markdown::{terminal_skin, to_terminal};

/// Glyph appended to a partial answer while it is still streaming.
pub const CURSOR: &str = "▌";

/// ANSI escape code for bold text (used for role labels).
const ANSI_BOLD: &str = "\x1b[1m";

/// ANSI escape code for dim text (used for captions and the counter).
const ANSI_DIM: &str = "\x1b[2m";

/// ANSI escape code to reset all styling.
const ANSI_RESET: &str = "\x1b[0m";

/// ANSI escape code for cyan text (used for the model label).
const ANSI_CYAN: &str = "\x1b[36m";

/// ANSI escape code for red text (used for errors).
const ANSI_RED: &str = "\x1b[31m";

/// Clear the screen and home the cursor.
const ANSI_CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Move up one line and erase it.
const ANSI_ERASE_PREVIOUS_LINE: &str = "\x1b[1A\x1b[2K\r";

/// Erase from the cursor to the end of the screen.
const ANSI_ERASE_BELOW: &str = "\x1b[J";

/// Width assumed when the terminal size is unknown.
const FALLBACK_WIDTH: usize = 80;

/// Trait for rendering a chat session.
pub trait Renderer: Send {
    /// Redraw everything from scratch: header, every message, and the counter.
    fn render_page(&mut self, messages: &[ChatMessage]);

    /// Show a message that was just added to the transcript.
    fn render_message(&mut self, message: &ChatMessage);

    /// Show the answer streamed so far.
    ///
    /// `text` is the full partial answer with [`CURSOR`] appended, not a delta.
    fn render_partial(&mut self, text: &str);

    /// Replace the partial answer with the finished one.
    fn render_final(&mut self, text: &str);

    /// Show a failed generation.  `error` is the full `Error: ...` string.
    fn render_error(&mut self, error: &str);

    /// The transcript length changed.
    fn render_message_count(&mut self, count: usize);
}

/// Terminal renderer with optional ANSI styling.
///
/// Partial answers are drawn in place as raw text: only the new suffix is
/// printed and the cursor glyph is erased with a backspace before each
/// update.  With colors on, the finished answer replaces the raw text with
/// its markdown rendering.
pub struct PlainTextRenderer {
    stdout: Stdout,
    use_color: bool,
    skin: MadSkin,
    /// Bytes of the current answer already on screen, if one is streaming.
    streamed: Option<usize>,
    cursor_shown: bool,
    /// A user message was shown and its reply has not finished yet.
    turn_open: bool,
}

impl PlainTextRenderer {
    /// Creates a new PlainTextRenderer with ANSI colors enabled.
    pub fn new() -> Self {
        Self::with_color(true)
    }

    /// Creates a new PlainTextRenderer with specified color setting.
    pub fn with_color(use_color: bool) -> Self {
        Self {
            stdout: io::stdout(),
            use_color,
            skin: terminal_skin(use_color),
            streamed: None,
            cursor_shown: false,
            turn_open: false,
        }
    }

    /// Flushes stdout to ensure immediate display of streamed content.
    fn flush(&mut self) {
        let _ = self.stdout.flush();
    }

    fn style(&self, code: &'static str) -> &'static str {
        if self.use_color { code } else { "" }
    }

    fn width() -> usize {
        terminal::size()
            .map(|(cols, _)| usize::from(cols))
            .ok()
            .filter(|cols| *cols > 0)
            .unwrap_or(FALLBACK_WIDTH)
    }

    fn print_label(&mut self, role: ChatRole) {
        let color = match role {
            ChatRole::User => self.style(ANSI_BOLD),
            ChatRole::Assistant => self.style(ANSI_CYAN),
        };
        let reset = self.style(ANSI_RESET);
        println!("{color}{}:{reset}", role.label());
    }

    fn print_markdown(&mut self, text: &str) {
        print!("{}", to_terminal(&self.skin, text, Self::width()));
    }

    fn erase_cursor(&mut self) {
        if self.cursor_shown {
            print!("\x08 \x08");
            self.cursor_shown = false;
        }
    }

    /// Print whatever part of `text` is not on screen yet.
    fn print_suffix(&mut self, text: &str) {
        if self.streamed.is_none() {
            self.print_label(ChatRole::Assistant);
            self.streamed = Some(0);
        }
        let shown = self.streamed.unwrap_or(0);
        if let Some(suffix) = text.get(shown..) {
            print!("{suffix}");
        }
        self.streamed = Some(text.len());
    }

    fn print_counter(&mut self, count: usize) {
        let dim = self.style(ANSI_DIM);
        let reset = self.style(ANSI_RESET);
        println!("{dim}Messages: {count}{reset}");
    }

    fn print_header(&mut self) {
        let bold = self.style(ANSI_BOLD);
        let dim = self.style(ANSI_DIM);
        let reset = self.style(ANSI_RESET);
        println!("{bold}{PAGE_TITLE}{reset}");
        println!("{dim}{PAGE_CAPTION}{reset}");
        println!();
    }

    /// Print the static about text and the message counter.
    pub fn render_about(&mut self, count: usize) {
        println!("{ABOUT_TEXT}");
        self.print_counter(count);
        self.flush();
    }

    /// Print a short informational line.
    pub fn print_info(&mut self, info: &str) {
        println!("{info}");
        self.flush();
    }

    /// Print a problem that is not part of the conversation.
    pub fn print_error(&mut self, error: &str) {
        let red = self.style(ANSI_RED);
        let reset = self.style(ANSI_RESET);
        eprintln!("{red}{error}{reset}");
    }
}

impl Default for PlainTextRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for PlainTextRenderer {
    fn render_page(&mut self, messages: &[ChatMessage]) {
        if self.use_color {
            print!("{ANSI_CLEAR_SCREEN}");
        }
        self.streamed = None;
        self.cursor_shown = false;
        self.turn_open = false;
        self.print_header();
        for message in messages {
            self.print_label(message.role());
            self.print_markdown(message.content());
        }
        self.print_counter(messages.len());
        self.flush();
    }

    fn render_message(&mut self, message: &ChatMessage) {
        if message.role() == ChatRole::User {
            // The line editor already echoed the input; restyle it in place.
            if self.use_color {
                print!("{ANSI_ERASE_PREVIOUS_LINE}");
            }
            self.turn_open = true;
        }
        self.print_label(message.role());
        self.print_markdown(message.content());
        self.flush();
    }

    fn render_partial(&mut self, text: &str) {
        let text = text.strip_suffix(CURSOR).unwrap_or(text);
        self.erase_cursor();
        self.print_suffix(text);
        print!("{CURSOR}");
        self.cursor_shown = true;
        self.flush();
    }

    fn render_final(&mut self, text: &str) {
        self.erase_cursor();
        match self.streamed.take() {
            Some(_) if self.use_color => {
                let rows = display_rows(text, Self::width());
                if rows > 1 {
                    print!("\x1b[{}A", rows - 1);
                }
                print!("\r{ANSI_ERASE_BELOW}");
                self.print_markdown(text);
            }
            Some(shown) => {
                if let Some(suffix) = text.get(shown..) {
                    print!("{suffix}");
                }
                println!();
            }
            None => {
                self.print_label(ChatRole::Assistant);
                self.print_markdown(text);
            }
        }
        self.turn_open = false;
        self.flush();
    }

    fn render_error(&mut self, error: &str) {
        self.erase_cursor();
        if self.streamed.take().is_some() {
            println!();
        } else {
            self.print_label(ChatRole::Assistant);
        }
        let red = self.style(ANSI_RED);
        let reset = self.style(ANSI_RESET);
        println!("{red}{error}{reset}");
        self.turn_open = false;
        self.flush();
    }

    fn render_message_count(&mut self, count: usize) {
        // Mid-turn counts would land between the question and the answer.
        if !self.turn_open {
            self.print_counter(count);
            self.flush();
        }
    }
}

/// Screen rows `text` occupies when printed from column 0 of a terminal
/// `width` columns wide.
fn display_rows(text: &str, width: usize) -> usize {
    let width = width.max(1);
    text.split('\n')
        .map(|line| line.chars().count().div_ceil(width).max(1))
        .sum()
}
