//! Tag attribute parsing.
//!
//! Attribute values are either booleans or trimmed strings. Valueless attributes
//! become `true`, and the strings `"true"`/`"false"` (any casing) are coerced to
//! real booleans at the parse boundary.

use lazy_static::lazy_static;
use regex::Regex;
use std::fmt;

lazy_static! {
    /// `name`, `name="value"` or `name='value'`
    static ref ATTR_REGEX: Regex =
        Regex::new(r#"([\w-]+)(?:\s*=\s*['"](.*?)['"]|\s*|$)"#).unwrap();
}

/// Key the pipeline reserves for block merge policies. Never rendered.
pub const EXTEND_ATTRIBUTE: &str = "extend";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    Bool(bool),
    Text(String),
}

impl AttrValue {
    /// JS-style truthiness: `false` and the empty string are falsy.
    pub fn is_truthy(&self) -> bool {
        match self {
            AttrValue::Bool(value) => *value,
            AttrValue::Text(value) => !value.is_empty(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttrValue::Text(value) => Some(value),
            AttrValue::Bool(_) => None,
        }
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Bool(value) => write!(f, "{}", value),
            AttrValue::Text(value) => f.write_str(value),
        }
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

/// Insertion-ordered attribute map.
///
/// Re-inserting an existing key replaces the value but keeps the key's original
/// position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes(Vec<(String, AttrValue)>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&AttrValue> {
        self.0.iter().find(|(key, _)| key == name).map(|(_, value)| value)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        let name = name.into();
        let value = value.into();
        match self.0.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AttrValue> {
        let index = self.0.iter().position(|(key, _)| key == name)?;
        Some(self.0.remove(index).1)
    }

    /// Applies `other` on top of `self`; `other`'s values win.
    pub fn overlay(&mut self, other: &Attributes) {
        for (name, value) in other.iter() {
            self.insert(name.clone(), value.clone());
        }
    }

    /// Copy without the keys reserved by the pipeline.
    pub fn cleaned(&self) -> Attributes {
        let mut result = self.clone();
        result.remove(EXTEND_ATTRIBUTE);
        result
    }

    /// Whether the attribute exists and is truthy.
    pub fn is_set(&self, name: &str) -> bool {
        self.get(name).is_some_and(AttrValue::is_truthy)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(String, AttrValue)> {
        self.0.iter()
    }

    /// Renders as the inside of an HTML tag, with a leading space when non-empty.
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|(name, value)| match value {
                AttrValue::Bool(true) => format!(" {}", name),
                other => format!(" {}=\"{}\"", name, other),
            })
            .collect()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (name, value) in iter {
            attributes.insert(name, value);
        }
        attributes
    }
}

/// Parses the raw attribute text of a tag.
///
/// ```
/// use svelte_extend_native::{parse_attributes, AttrValue};
///
/// let attrs = parse_attributes(r#"from="./base.svelte" html"#);
/// assert_eq!(attrs.get("from"), Some(&AttrValue::Text("./base.svelte".into())));
/// assert_eq!(attrs.get("html"), Some(&AttrValue::Bool(true)));
/// ```
pub fn parse_attributes(raw: &str) -> Attributes {
    let mut attributes = Attributes::new();
    for caps in ATTR_REGEX.captures_iter(raw) {
        let Some(name) = caps.get(1) else {
            continue;
        };
        let value = match caps.get(2).map(|m| m.as_str()) {
            Some(raw_value) if !raw_value.is_empty() => coerce_value(raw_value.trim()),
            _ => AttrValue::Bool(true),
        };
        attributes.insert(name.as_str().trim(), value);
    }
    attributes
}

fn coerce_value(value: &str) -> AttrValue {
    if value.eq_ignore_ascii_case("true") {
        AttrValue::Bool(true)
    } else if value.eq_ignore_ascii_case("false") {
        AttrValue::Bool(false)
    } else {
        AttrValue::Text(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mixed_attributes() {
        let attrs = parse_attributes(r#"context="module" lang='ts' global"#);
        assert_eq!(attrs.len(), 3);
        assert_eq!(attrs.get("context"), Some(&AttrValue::Text("module".into())));
        assert_eq!(attrs.get("lang"), Some(&AttrValue::Text("ts".into())));
        assert_eq!(attrs.get("global"), Some(&AttrValue::Bool(true)));
    }

    #[test]
    fn test_boolean_coercion() {
        let attrs = parse_attributes(r#"html="FALSE" extend="True" position=" before ""#);
        assert_eq!(attrs.get("html"), Some(&AttrValue::Bool(false)));
        assert_eq!(attrs.get("extend"), Some(&AttrValue::Bool(true)));
        assert_eq!(attrs.get("position"), Some(&AttrValue::Text("before".into())));
    }

    #[test]
    fn test_overlay_keeps_first_position() {
        let mut base: Attributes = [("a", "1"), ("b", "2")].into_iter().collect();
        let top: Attributes = [("c", "3"), ("a", "9")].into_iter().collect();
        base.overlay(&top);
        let keys: Vec<&str> = base.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(base.get("a"), Some(&AttrValue::Text("9".into())));
    }

    #[test]
    fn test_cleaned_drops_extend() {
        let attrs = parse_attributes(r#"extend="before" lang="ts""#);
        let cleaned = attrs.cleaned();
        assert!(!cleaned.contains(EXTEND_ATTRIBUTE));
        assert!(cleaned.contains("lang"));
    }

    #[test]
    fn test_render() {
        let attrs = parse_attributes(r#"context="module" global scoped="false""#);
        assert_eq!(attrs.render(), r#" context="module" global scoped="false""#);
        assert_eq!(Attributes::new().render(), "");
    }

    #[test]
    fn test_truthiness() {
        assert!(AttrValue::Text("after".into()).is_truthy());
        assert!(!AttrValue::Text(String::new()).is_truthy());
        assert!(!AttrValue::Bool(false).is_truthy());
    }
}
