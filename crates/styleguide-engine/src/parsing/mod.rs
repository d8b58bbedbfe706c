//! Collaborators that turn stylesheet text into structured section data.
//!
//! Each stage sits behind a trait so the pipeline can be wired with other
//! implementations; the defaults handle KSS comments in CSS, SCSS, Less, Sass
//! and Stylus sources.

pub mod comment;
pub mod error;
pub mod markdown;
pub mod params;
pub mod splitter;

pub use comment::{KssCommentParser, ParsedModifier, ParsedSection};
pub use error::ParseError;
pub use markdown::{CmarkRenderer, EscapedText};
pub use params::PrefixedParams;
pub use splitter::KssSplitter;

use crate::models::ParseOptions;

/// A KSS comment with the stylesheet code that follows it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBlock {
    /// Comment text with comment markers stripped.
    pub kss: String,
    /// Source text between this comment and the next KSS comment.
    pub code: Option<String>,
}

/// Splits file contents into KSS blocks.
pub trait BlockExtractor: Send + Sync {
    fn extract(&self, contents: &str, syntax: &str) -> Vec<RawBlock>;
}

/// Parses sanitized comment text into zero or more structured sections.
pub trait CommentParser: Send + Sync {
    fn parse(&self, text: &str, options: &ParseOptions) -> Result<Vec<ParsedSection>, ParseError>;
}

/// Finds non-standard `key: value` parameters embedded in a comment.
pub trait ParamExtractor: Send + Sync {
    /// Parameters in the order they appear; later entries win on merge.
    fn extract(&self, text: &str) -> Vec<(String, String)>;

    /// The text with every parameter removed.
    fn strip(&self, text: &str) -> String;
}

/// Renders Markdown text to an HTML fragment.
pub trait MarkdownRenderer: Send + Sync {
    /// With `inline` set, a single wrapping `<p>` is dropped.
    fn render(&self, text: &str, inline: bool) -> String;
}
