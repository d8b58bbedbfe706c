use pulldown_cmark::{Options, Parser, html};

use super::MarkdownRenderer;

/// CommonMark rendering via pulldown-cmark.
#[derive(Debug, Default, Clone, Copy)]
pub struct CmarkRenderer;

impl MarkdownRenderer for CmarkRenderer {
    fn render(&self, text: &str, inline: bool) -> String {
        let mut options = Options::empty();
        options.insert(Options::ENABLE_TABLES);
        options.insert(Options::ENABLE_STRIKETHROUGH);

        let mut out = String::new();
        html::push_html(&mut out, Parser::new_ext(text, options));
        let out = out.trim();

        if inline {
            strip_paragraph(out).to_string()
        } else {
            out.to_string()
        }
    }
}

/// Plain-text fallback used when Markdown is switched off.
#[derive(Debug, Default, Clone, Copy)]
pub struct EscapedText;

impl MarkdownRenderer for EscapedText {
    fn render(&self, text: &str, _inline: bool) -> String {
        html_escape::encode_text(text.trim()).into_owned()
    }
}

/// Remove the `<p>` wrapper when the fragment is a single paragraph.
fn strip_paragraph(html: &str) -> &str {
    match html
        .strip_prefix("<p>")
        .and_then(|rest| rest.strip_suffix("</p>"))
    {
        Some(inner) if !inner.contains("<p>") => inner,
        _ => html,
    }
}
