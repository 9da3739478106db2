//! Markdown rendering for chat messages.
//!
//! Messages are markdown.  The browser gets HTML; the terminal gets text
//! styled by a `termimad` skin.

use pulldown_cmark::{Event, Options, Parser, html};
use termimad::{FmtText, MadSkin};

/// Render `markdown` as an HTML fragment.
///
/// Raw HTML in the source is escaped rather than passed through, since both
/// the model's replies and the user's input end up in the page.
pub fn to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let parser = Parser::new_ext(markdown, options).map(|event| match event {
        Event::Html(raw) | Event::InlineHtml(raw) => Event::Text(raw),
        other => other,
    });
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

/// The skin used for terminal output.
pub fn terminal_skin(use_color: bool) -> MadSkin {
    if use_color {
        MadSkin::default()
    } else {
        MadSkin::no_style()
    }
}

/// Lay `markdown` out for a terminal `width` columns wide.
pub fn to_terminal<'k, 's>(skin: &'k MadSkin, markdown: &'s str, width: usize) -> FmtText<'k, 's> {
    FmtText::from(skin, markdown, Some(width))
}
