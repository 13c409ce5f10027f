//! Markdown to HTML rendering.
//!
//! The renderer follows GitHub-flavoured conventions: tables, strikethrough
//! and task lists are enabled and a single newline inside a paragraph is
//! rendered as a line break. Headings do not get generated ids.

use pulldown_cmark::{html, Event, Options, Parser};

fn options() -> Options {
    Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
}

/// Render markdown `text` to an HTML fragment.
pub fn render_markdown(text: &str) -> String {
    let parser = Parser::new_ext(text, options()).map(|ev| match ev {
        Event::SoftBreak => Event::HardBreak,
        other => other,
    });
    let mut out = String::with_capacity(text.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_have_no_ids() {
        let html = render_markdown("# Title");
        assert_eq!(html.trim(), "<h1>Title</h1>");
    }

    #[test]
    fn single_newlines_become_breaks() {
        let html = render_markdown("first\nsecond");
        assert!(html.contains("first<br />"), "{}", html);
    }

    #[test]
    fn gfm_extensions_are_enabled() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~old~~\n\n- [x] done\n");
        assert!(html.contains("<table>"));
        assert!(html.contains("<del>old</del>"));
        assert!(html.contains("checkbox"));
    }
}
