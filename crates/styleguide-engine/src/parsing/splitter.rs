use regex::Regex;
use std::sync::OnceLock;

use super::{BlockExtractor, RawBlock};

static KSS_MARKER: OnceLock<Regex> = OnceLock::new();

/// Does this stripped comment text carry a `Styleguide` reference line?
pub fn is_kss_comment(text: &str) -> bool {
    KSS_MARKER
        .get_or_init(|| Regex::new(r"(?im)^\s*styleguide\b").expect("Invalid KSS marker regex"))
        .is_match(text)
}

/// Line-based splitter for stylesheet sources.
///
/// Comments are recognised only when they start a line, so `//` inside
/// `url(http://...)` or a trailing `/* note */` stays part of the code.
#[derive(Debug, Default, Clone, Copy)]
pub struct KssSplitter;

impl BlockExtractor for KssSplitter {
    fn extract(&self, contents: &str, syntax: &str) -> Vec<RawBlock> {
        let mut builder = SplitBuilder::new(supports_line_comments(syntax));
        for line in contents.split_inclusive('\n') {
            builder.push(line);
        }
        builder.finish()
    }
}

/// Plain CSS has no `//` comments.
fn supports_line_comments(syntax: &str) -> bool {
    !syntax.eq_ignore_ascii_case("css")
}

#[derive(Debug)]
enum CommentState {
    None,
    Line(Vec<String>),
    Block(Vec<String>),
}

struct OpenBlock {
    kss: String,
    code: String,
}

struct SplitBuilder {
    line_comments: bool,
    comment: CommentState,
    current: Option<OpenBlock>,
    out: Vec<RawBlock>,
}

impl SplitBuilder {
    fn new(line_comments: bool) -> Self {
        Self {
            line_comments,
            comment: CommentState::None,
            current: None,
            out: vec![],
        }
    }

    fn push(&mut self, line: &str) {
        if let CommentState::Block(lines) = &mut self.comment {
            lines.push(line.to_string());
            if line.contains("*/") {
                self.flush_comment();
            }
            return;
        }

        let trimmed = line.trim_start();
        if self.line_comments && trimmed.starts_with("//") {
            if let CommentState::Line(lines) = &mut self.comment {
                lines.push(line.to_string());
            } else {
                self.comment = CommentState::Line(vec![line.to_string()]);
            }
            return;
        }

        // Any other line ends a run of `//` comments
        self.flush_comment();

        if let Some(rest) = trimmed.strip_prefix("/*") {
            self.comment = CommentState::Block(vec![line.to_string()]);
            if rest.contains("*/") {
                self.flush_comment();
            }
            return;
        }

        self.push_code(line);
    }

    fn finish(mut self) -> Vec<RawBlock> {
        // EOF flush, an unterminated block comment included
        self.flush_comment();
        self.close_block();
        self.out
    }

    fn push_code(&mut self, text: &str) {
        if let Some(block) = &mut self.current {
            block.code.push_str(text);
        }
    }

    fn flush_comment(&mut self) {
        let (lines, text) = match std::mem::replace(&mut self.comment, CommentState::None) {
            CommentState::None => return,
            CommentState::Line(lines) => {
                let text = strip_line_comment(&lines);
                (lines, text)
            }
            CommentState::Block(lines) => {
                let text = strip_block_comment(&lines.concat());
                (lines, text)
            }
        };

        if is_kss_comment(&text) {
            self.close_block();
            self.current = Some(OpenBlock {
                kss: text,
                code: String::new(),
            });
        } else {
            // Ordinary comments belong to the surrounding code verbatim
            self.push_code(&lines.concat());
        }
    }

    fn close_block(&mut self) {
        if let Some(block) = self.current.take() {
            let code = if block.code.trim().is_empty() {
                None
            } else {
                Some(block.code)
            };
            self.out.push(RawBlock {
                kss: block.kss,
                code,
            });
        }
    }
}

fn strip_line_comment(lines: &[String]) -> String {
    let body: Vec<&str> = lines
        .iter()
        .map(|line| {
            let text = line.trim_start();
            let text = text.strip_prefix("//").unwrap_or(text);
            let text = text.strip_prefix('/').unwrap_or(text);
            text.strip_prefix(' ').unwrap_or(text).trim_end()
        })
        .collect();
    dedent(&body)
}

fn strip_block_comment(raw: &str) -> String {
    let start = raw.find("/*").map(|i| i + 2).unwrap_or(0);
    // Only stars glued to the opener (`/**`) belong to it
    let inner = raw[start..].trim_start_matches('*');
    let inner = match inner.find("*/") {
        Some(end) => &inner[..end],
        None => inner,
    };

    let mut lines = inner.lines();
    let first = lines.next().unwrap_or_default().trim();
    let rest: Vec<&str> = lines.collect();

    // A ` * ` gutter runs down every non-blank line after the opener
    let gutter = rest
        .iter()
        .filter(|line| !line.trim().is_empty())
        .all(|line| line.trim_start().starts_with('*'));

    let body: Vec<&str> = std::iter::once(first)
        .chain(rest.iter().copied().map(|line| {
            match line.trim_start().strip_prefix('*') {
                Some(text) if gutter => text.strip_prefix(' ').unwrap_or(text).trim_end(),
                _ => line.trim_end(),
            }
        }))
        .collect();
    dedent(&body)
}

/// Drop surrounding blank lines and the indentation every line shares.
fn dedent(lines: &[&str]) -> String {
    let first = lines.iter().position(|l| !l.trim().is_empty());
    let last = lines.iter().rposition(|l| !l.trim().is_empty());
    let (Some(first), Some(last)) = (first, last) else {
        return String::new();
    };
    let lines = &lines[first..=last];

    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| l.len() - l.trim_start().len())
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                l.get(indent..).unwrap_or_else(|| l.trim_start())
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
