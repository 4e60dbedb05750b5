//! Extend-Tag Detector
//!
//! Finds the `<extend from="..." />` directive that declares a component's base.

use lazy_static::lazy_static;
use regex::Regex;

use crate::attributes::{parse_attributes, AttrValue, Attributes};

lazy_static! {
    /// Self-closing `<extend ... />` or a pair with an immediate `</extend>`.
    static ref EXTEND_TAG_REGEX: Regex =
        Regex::new(r"(?i)<\s*extend\s+(.*?)\s*/?>(?:\s*<\s*/\s*extend\s*>)?").unwrap();
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExtendDirective {
    /// The full matched text, removed from the source before scanning.
    pub statement: String,
    pub attributes: Attributes,
}

impl ExtendDirective {
    /// The relative path of the base component, when the directive names one.
    pub fn from(&self) -> Option<&str> {
        self.attributes
            .get("from")
            .and_then(AttrValue::as_text)
            .filter(|from| !from.is_empty())
    }
}

/// Whether a source extends a base component.
#[derive(Debug, Clone, PartialEq)]
pub enum Extension {
    NotExtended,
    Extends(ExtendDirective),
}

impl Extension {
    /// Only a directive with a usable `from` triggers extension.
    pub fn detect(source: &str) -> Self {
        match find_extend_tag(source) {
            Some(directive) if directive.from().is_some() => Extension::Extends(directive),
            _ => Extension::NotExtended,
        }
    }
}

/// Returns the first `<extend>` tag of a source.
pub fn find_extend_tag(source: &str) -> Option<ExtendDirective> {
    let caps = EXTEND_TAG_REGEX.captures(source)?;
    let raw_attributes = caps.get(1).map_or("", |m| m.as_str());
    Some(ExtendDirective {
        statement: caps[0].to_string(),
        attributes: parse_attributes(raw_attributes),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_self_closing_directive() {
        let source = "<extend from=\"./base.svelte\" html />\n<div></div>";
        let directive = find_extend_tag(source).unwrap();
        assert_eq!(directive.statement, r#"<extend from="./base.svelte" html />"#);
        assert_eq!(directive.from(), Some("./base.svelte"));
        assert_eq!(directive.attributes.get("html"), Some(&AttrValue::Bool(true)));
    }

    #[test]
    fn test_paired_directive_case_insensitive() {
        let source = "<EXTEND from='../Base.svelte' html=\"before\"></Extend>";
        let directive = find_extend_tag(source).unwrap();
        assert_eq!(directive.statement, source);
        assert_eq!(directive.from(), Some("../Base.svelte"));
        assert_eq!(
            directive.attributes.get("html"),
            Some(&AttrValue::Text("before".into()))
        );
    }

    #[test]
    fn test_directive_without_from_does_not_extend() {
        assert_eq!(Extension::detect("<extend html />"), Extension::NotExtended);
        assert_eq!(Extension::detect("<extend from />"), Extension::NotExtended);
        assert_eq!(Extension::detect("<div></div>"), Extension::NotExtended);
        assert!(find_extend_tag("<extend html />").is_some());
    }

    #[test]
    fn test_detect_extends() {
        match Extension::detect("<extend from=\"./a.svelte\"/>") {
            Extension::Extends(directive) => assert_eq!(directive.from(), Some("./a.svelte")),
            Extension::NotExtended => panic!("expected a directive"),
        }
    }
}
