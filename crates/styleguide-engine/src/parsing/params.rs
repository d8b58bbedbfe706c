use super::ParamExtractor;
use crate::models::DEFAULT_PARAM_PREFIX;

/// Extracts `sg-name: value` style parameters.
///
/// A parameter runs from its `<prefix><name>:` line over the following lines
/// until a blank line or the next parameter:
///
/// ```text
/// sg-wrapper:
/// <div class="panel">
///   <sg-wrapper-content/>
/// </div>
/// ```
#[derive(Debug, Clone)]
pub struct PrefixedParams {
    prefix: String,
}

impl PrefixedParams {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Name and inline value if `line` opens a parameter.
    fn opening<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let rest = line.trim_start().strip_prefix(self.prefix.as_str())?;
        let (name, value) = rest.split_once(':')?;
        let valid = !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        valid.then_some((name, value))
    }

    /// Walk `text`, calling `on_param` for each parameter and `on_line` for
    /// every line that belongs to none.
    fn scan<'a>(
        &self,
        text: &'a str,
        mut on_param: impl FnMut(&'a str, Vec<&'a str>),
        mut on_line: impl FnMut(&'a str),
    ) {
        let mut open: Option<(&str, Vec<&str>)> = None;

        for line in text.lines() {
            if let Some((name, value)) = self.opening(line) {
                if let Some((name, lines)) = open.take() {
                    on_param(name, lines);
                }
                open = Some((name, vec![value]));
                continue;
            }

            let Some((_, lines)) = open.as_mut() else {
                on_line(line);
                continue;
            };
            if line.trim().is_empty() {
                if let Some((name, lines)) = open.take() {
                    on_param(name, lines);
                }
                on_line(line);
            } else {
                lines.push(line);
            }
        }

        if let Some((name, lines)) = open {
            on_param(name, lines);
        }
    }
}

impl Default for PrefixedParams {
    fn default() -> Self {
        Self::new(DEFAULT_PARAM_PREFIX)
    }
}

impl ParamExtractor for PrefixedParams {
    fn extract(&self, text: &str) -> Vec<(String, String)> {
        let mut params = Vec::new();
        self.scan(
            text,
            |name, lines| params.push((name.to_string(), lines.join("\n").trim().to_string())),
            |_| {},
        );
        params
    }

    fn strip(&self, text: &str) -> String {
        let mut kept = Vec::new();
        self.scan(text, |_, _| {}, |line| kept.push(line));
        kept.join("\n")
    }
}
