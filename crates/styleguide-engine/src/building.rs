use crate::models::{Modifier, ParseOptions, Section};
use crate::parsing::comment::parse_weight;
use crate::parsing::{
    CommentParser, MarkdownRenderer, ParamExtractor, ParseError, ParsedSection, RawBlock,
};

/// Turns one raw comment block into a normalized [`Section`].
///
/// Holds only shared references, so one builder can be used from many
/// threads at once.
#[derive(Clone, Copy)]
pub struct SectionBuilder<'a> {
    options: &'a ParseOptions,
    parser: &'a dyn CommentParser,
    params: &'a dyn ParamExtractor,
    markdown: &'a dyn MarkdownRenderer,
}

impl<'a> SectionBuilder<'a> {
    pub fn new(
        options: &'a ParseOptions,
        parser: &'a dyn CommentParser,
        params: &'a dyn ParamExtractor,
        markdown: &'a dyn MarkdownRenderer,
    ) -> Self {
        Self {
            options,
            parser,
            params,
            markdown,
        }
    }

    /// Build the section for `block`.
    ///
    /// Returns `Ok(None)` when the comment holds no section. When it holds
    /// several, only the first is kept and a warning is logged.
    pub fn build(&self, block: &RawBlock) -> Result<Option<Section>, ParseError> {
        let text = self.sanitize(&block.kss);
        let parsed = self.parser.parse(&text, self.options)?;

        if parsed.len() > 1 {
            log::warn!(
                "Comment block declared {} sections ({}); keeping only '{}'",
                parsed.len(),
                parsed
                    .iter()
                    .map(|p| p.reference.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
                parsed[0].reference
            );
        }
        let Some(parsed) = parsed.into_iter().next() else {
            return Ok(None);
        };

        let mut section = self.normalize(parsed);

        if let Some(code) = &block.code {
            let css = code.trim_matches(['\r', '\n']);
            if !css.is_empty() {
                section.css = Some(css.to_string());
            }
        }

        for (name, value) in self.params.extract(&block.kss) {
            apply_param(&mut section, &name, value)?;
        }

        Ok(Some(section))
    }

    /// Normalize line endings and drop the auxiliary parameters the comment
    /// parser would otherwise read as description text.
    pub fn sanitize(&self, text: &str) -> String {
        let text = text.replace("\r\n", "\n").replace('\r', "\n").replace('\t', "    ");
        self.params
            .strip(&text)
            .lines()
            .map(str::trim_end)
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }

    fn normalize(&self, parsed: ParsedSection) -> Section {
        let modifiers = parsed
            .modifiers
            .iter()
            .enumerate()
            .map(|(index, modifier)| {
                let class_name = Modifier::class_name_for(&modifier.name);
                Modifier {
                    id: index + 1,
                    name: modifier.name.clone(),
                    description: self.markdown.render(&modifier.description, true),
                    markup: Modifier::markup_for(parsed.markup.as_deref(), &class_name),
                    class_name,
                }
            })
            .collect();

        Section {
            header: self.markdown.render(&parsed.header, true),
            description: self.markdown.render(&parsed.description, false),
            modifiers,
            deprecated: parsed.deprecated,
            experimental: parsed.experimental,
            reference: parsed.reference,
            weight: parsed.weight,
            markup: parsed.markup,
            ..Section::default()
        }
    }
}

/// Serialized `Section` keys filled in by the pipeline rather than the author.
const COMPUTED_FIELDS: &[&str] = &["modifiers", "stringReference", "file", "syntax"];

/// Merge one auxiliary parameter onto `section`. Standard field names
/// overwrite the parsed value; anything else is kept as an extra parameter.
fn apply_param(section: &mut Section, name: &str, value: String) -> Result<(), ParseError> {
    match name {
        _ if COMPUTED_FIELDS.contains(&name) => {
            log::warn!(
                "Ignoring parameter '{name}' on '{}': the field is computed",
                section.reference
            );
        }
        "header" => section.header = value,
        "description" => section.description = value,
        "reference" => section.reference = value,
        "markup" => section.markup = Some(value),
        "css" => section.css = Some(value),
        "weight" => section.weight = parse_weight(&value)?,
        "deprecated" => section.deprecated = parse_flag(name, &value)?,
        "experimental" => section.experimental = parse_flag(name, &value)?,
        _ => {
            section.params.insert(name.to_string(), value);
        }
    }
    Ok(())
}

fn parse_flag(name: &str, value: &str) -> Result<bool, ParseError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "true" | "yes" => Ok(true),
        "false" | "no" => Ok(false),
        _ => Err(ParseError::InvalidFlag {
            name: name.to_string(),
            value: value.trim().to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::{CmarkRenderer, EscapedText, KssCommentParser, PrefixedParams};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    fn build_with(
        renderer: &dyn MarkdownRenderer,
        kss: &str,
        code: Option<&str>,
    ) -> Result<Option<Section>, ParseError> {
        let options = ParseOptions::default();
        let params = PrefixedParams::default();
        let builder = SectionBuilder::new(&options, &KssCommentParser, &params, renderer);
        builder.build(&RawBlock {
            kss: kss.to_string(),
            code: code.map(str::to_string),
        })
    }

    fn build(kss: &str, code: Option<&str>) -> Result<Option<Section>, ParseError> {
        build_with(&CmarkRenderer, kss, code)
    }

    #[test]
    fn test_builds_normalized_section() {
        let kss = "\
*Primary* button

Use for the main action.

.large  - Bigger
:hover  - Hovered

Markup: <a class=\"btn {$modifiers}\">Go</a>

Styleguide Forms - Buttons";

        let section = build(kss, Some("\n\n.btn { color: red; }\n\n")).unwrap().unwrap();

        assert_eq!(section.header, "<em>Primary</em> button");
        assert_eq!(section.description, "<p>Use for the main action.</p>");
        assert_eq!(section.reference, "Forms - Buttons");
        assert_eq!(section.css.as_deref(), Some(".btn { color: red; }"));
        assert_eq!(section.string_reference, None);
        assert_eq!(section.file, "");

        let modifiers: Vec<_> = section
            .modifiers
            .iter()
            .map(|m| (m.id, m.class_name.as_str(), m.markup.as_deref()))
            .collect();
        assert_eq!(
            modifiers,
            vec![
                (1, "large", Some("<a class=\"btn large\">Go</a>")),
                (2, "pseudo-class-hover", Some("<a class=\"btn pseudo-class-hover\">Go</a>")),
            ]
        );
        assert_eq!(section.modifiers[0].description, "Bigger");
    }

    #[test]
    fn test_comment_without_reference_builds_nothing() {
        assert_eq!(build("Just a note", None).unwrap(), None);
    }

    /// Collects every warning logged while the test binary runs.
    struct CapturingLogger;

    static WARNINGS: Mutex<Vec<String>> = Mutex::new(Vec::new());
    static LOGGER: CapturingLogger = CapturingLogger;

    impl log::Log for CapturingLogger {
        fn enabled(&self, metadata: &log::Metadata) -> bool {
            metadata.level() <= log::Level::Warn
        }

        fn log(&self, record: &log::Record) {
            if self.enabled(record.metadata()) {
                WARNINGS.lock().unwrap().push(record.args().to_string());
            }
        }

        fn flush(&self) {}
    }

    fn capture_warnings() {
        // Another test may have installed it already
        let _ = log::set_logger(&LOGGER);
        log::set_max_level(log::LevelFilter::Warn);
    }

    fn warned(fragment: &str) -> bool {
        WARNINGS.lock().unwrap().iter().any(|w| w.contains(fragment))
    }

    #[test]
    fn test_only_first_of_several_sections_is_kept() {
        capture_warnings();

        let section = build("One\n\nStyleguide Multi.One\n\nTwo\n\nStyleguide Multi.Two", None)
            .unwrap()
            .unwrap();

        assert_eq!(section.header, "One");
        assert_eq!(section.reference, "Multi.One");
        assert!(warned(
            "declared 2 sections (Multi.One, Multi.Two); keeping only 'Multi.One'"
        ));
    }

    #[test]
    fn test_computed_fields_cannot_be_set_by_params() {
        capture_warnings();
        let kss = "\
Alert

sg-stringReference: Injected
sg-file: other.scss
sg-syntax: less
sg-modifiers: .x
sg-theme: dark

Styleguide 4.1";

        let section = build(kss, None).unwrap().unwrap();

        assert_eq!(section.string_reference, None);
        assert_eq!(section.file, "");
        assert_eq!(section.syntax, "");
        assert!(section.modifiers.is_empty());
        assert_eq!(section.params.keys().collect::<Vec<_>>(), vec!["theme"]);
        assert!(warned("Ignoring parameter 'stringReference' on '4.1'"));

        let json = serde_json::to_string(&section).unwrap();
        assert_eq!(json.matches("\"file\"").count(), 1);
        assert!(!json.contains("stringReference"));
    }

    #[test]
    fn test_params_override_standard_fields_and_keep_extras() {
        let kss = "\
Panel

sg-weight: 5
sg-header: Custom panel
sg-css: .panel {}
sg-wrapper:
<div class=\"wrap\">
</div>

Styleguide 4";

        let section = build(kss, Some(".ignored {}")).unwrap().unwrap();

        assert_eq!(section.weight, 5);
        assert_eq!(section.header, "Custom panel");
        assert_eq!(section.css.as_deref(), Some(".panel {}"));
        assert_eq!(
            section.params.get("wrapper").map(String::as_str),
            Some("<div class=\"wrap\">\n</div>")
        );
        // Parameter lines never leak into the description
        assert_eq!(section.description, "");
    }

    #[test]
    fn test_invalid_param_values_fail_the_block() {
        assert_eq!(
            build("A\n\nsg-weight: lots\n\nStyleguide 1", None),
            Err(ParseError::InvalidWeight {
                value: "lots".to_string()
            })
        );
        assert_eq!(
            build("A\n\nsg-deprecated: maybe\n\nStyleguide 1", None),
            Err(ParseError::InvalidFlag {
                name: "deprecated".to_string(),
                value: "maybe".to_string()
            })
        );
    }

    #[test]
    fn test_parser_errors_propagate() {
        assert_eq!(build("A\n\nStyleguide", None), Err(ParseError::MissingReference));
    }

    #[test]
    fn test_whitespace_only_code_is_not_css() {
        let section = build("A\n\nStyleguide 1", Some("\n\n")).unwrap().unwrap();
        assert_eq!(section.css, None);
    }

    #[test]
    fn test_sanitize_normalizes_line_endings() {
        let section = build("Title\r\n\r\nBody\tline\r\n\r\nStyleguide 1\r\n", None)
            .unwrap()
            .unwrap();

        assert_eq!(section.header, "Title");
        assert_eq!(section.description, "<p>Body    line</p>");
    }

    #[test]
    fn test_plain_text_rendering_escapes_html() {
        let section = build_with(&EscapedText, "<b>Bold</b>\n\nStyleguide 1", None)
            .unwrap()
            .unwrap();

        assert_eq!(section.header, "&lt;b&gt;Bold&lt;/b&gt;");
    }
}
