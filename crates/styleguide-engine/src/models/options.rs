use serde::{Deserialize, Serialize};

pub const DEFAULT_PARAM_PREFIX: &str = "sg-";

/// Options shared by every block of a build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Render header and descriptions as Markdown; when off they are HTML-escaped text
    pub markdown: bool,
    /// Reserved prefix marking auxiliary `key: value` parameters in a comment
    pub param_prefix: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            markdown: true,
            param_prefix: DEFAULT_PARAM_PREFIX.to_string(),
        }
    }
}
