use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One documented component extracted from a KSS comment block.
///
/// Serializes to the record consumed by the site generator: camelCase keys,
/// absent optionals omitted, extra `sg-` parameters flattened alongside the
/// standard fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub header: String,
    pub description: String,
    pub modifiers: Vec<Modifier>,
    pub deprecated: bool,
    pub experimental: bool,
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub string_reference: Option<String>,
    #[serde(default)]
    pub weight: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css: Option<String>,
    #[serde(default)]
    pub file: String,
    #[serde(default)]
    pub syntax: String,
    #[serde(flatten)]
    pub params: BTreeMap<String, String>,
}

/// A named variant of a section's markup, e.g. `:hover` or `.disabled`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Modifier {
    /// 1-based position within the owning section
    pub id: usize,
    pub name: String,
    pub description: String,
    pub class_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markup: Option<String>,
}

impl Modifier {
    /// Derive the CSS class list a modifier name stands for.
    ///
    /// `.primary.large` becomes `primary large`, `:hover` becomes
    /// `pseudo-class-hover`.
    pub fn class_name_for(name: &str) -> String {
        name.replace('.', " ")
            .replace(':', " pseudo-class-")
            .trim()
            .to_string()
    }

    /// Section markup with every `{$modifiers}` placeholder filled in.
    pub fn markup_for(section_markup: Option<&str>, class_name: &str) -> Option<String> {
        section_markup.map(|markup| markup.replace("{$modifiers}", class_name))
    }
}

impl Section {
    /// Whether `reference` is already a manual numeric reference such as `2.1`
    /// or `4-3`, which resolution leaves untouched.
    pub fn has_numeric_reference(&self) -> bool {
        is_numeric_reference(&self.reference)
    }
}

pub fn is_numeric_reference(reference: &str) -> bool {
    reference
        .chars()
        .all(|c| c.is_ascii_digit() || c == '.' || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_class_name_from_modifier_names() {
        assert_eq!(Modifier::class_name_for(".disabled"), "disabled");
        assert_eq!(Modifier::class_name_for(".primary.large"), "primary large");
        assert_eq!(Modifier::class_name_for(":hover"), "pseudo-class-hover");
        assert_eq!(
            Modifier::class_name_for(".btn:focus"),
            "btn pseudo-class-focus"
        );
    }

    #[test]
    fn test_modifier_markup_replaces_placeholder() {
        let markup = Modifier::markup_for(Some(r#"<a class="btn {$modifiers}">x</a>"#), "primary");
        assert_eq!(markup.as_deref(), Some(r#"<a class="btn primary">x</a>"#));
        assert_eq!(Modifier::markup_for(None, "primary"), None);
    }

    #[test]
    fn test_numeric_reference_detection() {
        assert!(is_numeric_reference("2.1"));
        assert!(is_numeric_reference("4-3"));
        assert!(!is_numeric_reference("Forms - Buttons"));
        assert!(!is_numeric_reference("1.a"));
    }

    #[test]
    fn test_serializes_camel_case_and_flattened_params() {
        let mut section = Section {
            header: "Buttons".to_string(),
            reference: "1.1".to_string(),
            string_reference: Some("Forms.Buttons".to_string()),
            modifiers: vec![Modifier {
                id: 1,
                name: ":hover".to_string(),
                description: "Hovered".to_string(),
                class_name: "pseudo-class-hover".to_string(),
                markup: None,
            }],
            ..Section::default()
        };
        section
            .params
            .insert("wrapper".to_string(), "<div></div>".to_string());

        let json = serde_json::to_value(&section).unwrap();

        assert_eq!(json["stringReference"], "Forms.Buttons");
        assert_eq!(json["modifiers"][0]["className"], "pseudo-class-hover");
        assert_eq!(json["wrapper"], "<div></div>");
        assert!(json.get("markup").is_none());
        assert!(json.get("css").is_none());
    }
}
