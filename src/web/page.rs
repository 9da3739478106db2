//! The single chat page.

use crate::chat::{ABOUT_TEXT, INPUT_PLACEHOLDER, PAGE_CAPTION, PAGE_TITLE};

const TEMPLATE: &str = include_str!("index.html");

/// The page served at `/`, with the shared captions filled in.
pub fn render_index() -> String {
    TEMPLATE
        .replace("{{TITLE}}", &escape_html(PAGE_TITLE))
        .replace("{{CAPTION}}", &escape_html(PAGE_CAPTION))
        .replace("{{PLACEHOLDER}}", &escape_html(INPUT_PLACEHOLDER))
        .replace("{{ABOUT}}", &escape_html(ABOUT_TEXT))
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
