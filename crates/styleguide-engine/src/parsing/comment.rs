use regex::Regex;
use std::sync::OnceLock;

use super::{CommentParser, ParseError};
use crate::models::ParseOptions;

/// Structured fields of one KSS section, before Markdown rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedSection {
    pub header: String,
    pub description: String,
    pub modifiers: Vec<ParsedModifier>,
    pub deprecated: bool,
    pub experimental: bool,
    pub reference: String,
    pub markup: Option<String>,
    pub weight: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedModifier {
    pub name: String,
    pub description: String,
}

/// Parser for the KSS comment convention:
///
/// ```text
/// Buttons
///
/// Description in *Markdown*.
///
/// :hover    - Highlighted on hover
/// .disabled - Not clickable
///
/// Markup: <button class="btn {$modifiers}">Go</button>
///
/// Weight: -1
///
/// Styleguide Forms - Buttons
/// ```
///
/// Every `Styleguide` paragraph closes a section made of the paragraphs
/// before it, so one comment can hold several sections.
#[derive(Debug, Default, Clone, Copy)]
pub struct KssCommentParser;

struct Patterns {
    reference: Regex,
    markup: Regex,
    weight: Regex,
    flag: Regex,
    modifier: Regex,
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| Patterns {
        reference: Regex::new(r"(?i)^\s*styleguide\b:?\s*(.*?)\s*$").expect("Invalid reference regex"),
        markup: Regex::new(r"(?i)^\s*markup:\s*(.*)$").expect("Invalid markup regex"),
        weight: Regex::new(r"(?i)^\s*weight:\s*(.*?)\s*$").expect("Invalid weight regex"),
        flag: Regex::new(r"(?is)^\s*(deprecated|experimental):\s*(.*)$").expect("Invalid flag regex"),
        modifier: Regex::new(r"^\s*([.:]\S+)\s+-\s+(.*)$").expect("Invalid modifier regex"),
    })
}

impl CommentParser for KssCommentParser {
    fn parse(&self, text: &str, _options: &ParseOptions) -> Result<Vec<ParsedSection>, ParseError> {
        let mut sections = Vec::new();
        let mut pending: Vec<Vec<&str>> = Vec::new();

        for paragraph in paragraphs(text) {
            match reference_of(&paragraph) {
                Some(reference) => {
                    let reference = reference?;
                    let body = std::mem::take(&mut pending);
                    sections.push(build_section(&body, reference)?);
                }
                None => pending.push(paragraph),
            }
        }

        Ok(sections)
    }
}

/// Non-blank line runs.
fn paragraphs(text: &str) -> Vec<Vec<&str>> {
    let mut out = Vec::new();
    let mut current = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                out.push(std::mem::take(&mut current));
            }
        } else {
            current.push(line.trim_end());
        }
    }
    if !current.is_empty() {
        out.push(current);
    }
    out
}

fn reference_of(paragraph: &[&str]) -> Option<Result<String, ParseError>> {
    let caps = patterns().reference.captures(paragraph.first()?)?;
    let reference = caps[1].trim_end_matches('.').trim();
    if reference.is_empty() {
        Some(Err(ParseError::MissingReference))
    } else {
        Some(Ok(reference.to_string()))
    }
}

fn build_section(body: &[Vec<&str>], reference: String) -> Result<ParsedSection, ParseError> {
    let mut section = ParsedSection {
        reference,
        ..ParsedSection::default()
    };
    let Some((header, rest)) = body.split_first() else {
        return Ok(section);
    };

    let header = apply_flags(&mut section, &header.join("\n"));
    section.header = header.trim().to_string();

    let mut description = Vec::new();
    let p = patterns();
    for paragraph in rest {
        let first = paragraph[0];

        if let Some(caps) = p.markup.captures(first) {
            let markup = std::iter::once(&caps[1])
                .chain(paragraph[1..].iter().copied())
                .collect::<Vec<_>>()
                .join("\n");
            let markup = markup.trim();
            section.markup = (!markup.is_empty()).then(|| markup.to_string());
        } else if let Some(caps) = p.weight.captures(first) {
            section.weight = parse_weight(&caps[1])?;
        } else if p.modifier.is_match(first) {
            section.modifiers.extend(parse_modifiers(paragraph));
        } else {
            let text = paragraph.join("\n");
            let text = apply_flags(&mut section, &text);
            if !text.trim().is_empty() {
                description.push(text.trim().to_string());
            }
        }
    }
    section.description = description.join("\n\n");

    Ok(section)
}

/// Set `deprecated`/`experimental` from a leading `Deprecated:` style prefix,
/// returning the text without it.
fn apply_flags(section: &mut ParsedSection, text: &str) -> String {
    match patterns().flag.captures(text) {
        Some(caps) => {
            if caps[1].eq_ignore_ascii_case("deprecated") {
                section.deprecated = true;
            } else {
                section.experimental = true;
            }
            let prefix_end = caps.get(2).map_or(text.len(), |m| m.start());
            text[prefix_end..].to_string()
        }
        None => text.to_string(),
    }
}

pub fn parse_weight(value: &str) -> Result<i32, ParseError> {
    value
        .trim()
        .parse()
        .map_err(|_| ParseError::InvalidWeight {
            value: value.trim().to_string(),
        })
}

fn parse_modifiers(paragraph: &[&str]) -> Vec<ParsedModifier> {
    let mut modifiers: Vec<ParsedModifier> = Vec::new();
    for line in paragraph {
        if let Some(caps) = patterns().modifier.captures(line) {
            modifiers.push(ParsedModifier {
                name: caps[1].to_string(),
                description: caps[2].trim().to_string(),
            });
        } else if let Some(last) = modifiers.last_mut() {
            last.description.push(' ');
            last.description.push_str(line.trim());
        }
    }
    modifiers
}
