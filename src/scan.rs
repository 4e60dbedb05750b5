//! Component Scanner
//!
//! Splits a component source into markup and script/style blocks with a line
//! oriented tag matcher. This is deliberately not an HTML parser: the script
//! and style bodies may contain anything the component language allows, so
//! the scanner only looks for `<script>`/`<style>` boundaries, one per line.

use lazy_static::lazy_static;
use regex::Regex;

use crate::attributes::{parse_attributes, Attributes};
use crate::error::{ExtendError, Result};

lazy_static! {
    /// Opening or closing `script`/`style` tag.
    static ref BLOCK_TAG_REGEX: Regex =
        Regex::new(r"(?i)<\s*(/\s*)?(script|style)(.*?)>").unwrap();
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagName {
    Script,
    Style,
}

impl TagName {
    fn from_match(name: &str) -> Self {
        if name.eq_ignore_ascii_case("script") {
            TagName::Script
        } else {
            TagName::Style
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TagName::Script => "script",
            TagName::Style => "style",
        }
    }
}

/// A script/style tag found on a line.
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    /// The full matched text of the tag.
    pub statement: String,
    pub name: TagName,
    pub closing: bool,
    pub attributes: Attributes,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScannedBlock {
    pub tag: Tag,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    pub markup: String,
    pub scripts: Vec<ScannedBlock>,
    pub styles: Vec<ScannedBlock>,
}

/// Finds the script/style tag on a line, if any.
///
/// Fails when the line holds more than one of them.
pub fn find_block_tag(line: &str, line_number: usize, filepath: &str) -> Result<Option<Tag>> {
    let mut matches = BLOCK_TAG_REGEX.captures_iter(line);
    let Some(caps) = matches.next() else {
        return Ok(None);
    };

    if matches.next().is_some() {
        return Err(ExtendError::InputShape {
            file: filepath.to_string(),
            line: line_number,
            code: line.to_string(),
        });
    }

    let raw_attributes = caps.get(3).map_or("", |m| m.as_str());
    Ok(Some(Tag {
        statement: caps[0].to_string(),
        name: TagName::from_match(&caps[2]),
        closing: caps.get(1).is_some(),
        attributes: parse_attributes(raw_attributes),
    }))
}

/// Per-tag counters for same-name tags opened inside an open block.
///
/// A matching closing tag decrements the counter instead of closing the block,
/// which keeps things like `'<style>...</style>'` string literals inside a
/// script from ending it early. Only one level of this is reliable.
#[derive(Debug, Default)]
struct NestedCounters {
    script: usize,
    style: usize,
}

impl NestedCounters {
    fn get(&self, name: TagName) -> usize {
        match name {
            TagName::Script => self.script,
            TagName::Style => self.style,
        }
    }

    fn get_mut(&mut self, name: TagName) -> &mut usize {
        match name {
            TagName::Script => &mut self.script,
            TagName::Style => &mut self.style,
        }
    }
}

/// Scans a component source.
pub fn scan(source: &str, filepath: &str) -> Result<ScanResult> {
    let mut result = ScanResult::default();
    let mut markup_lines: Vec<String> = Vec::new();
    let mut current_lines: Vec<&str> = Vec::new();
    let mut open_tag: Option<Tag> = None;
    let mut nested = NestedCounters::default();

    for (index, line) in source.split('\n').enumerate() {
        let Some(tag) = find_block_tag(line, index + 1, filepath)? else {
            current_lines.push(line);
            continue;
        };

        let rest = line.replacen(&tag.statement, "", 1);
        let rest = rest.trim();
        let markup_eligible = match &open_tag {
            None => true,
            Some(open) if open.name == tag.name => tag.closing && nested.get(tag.name) == 0,
            Some(_) => true,
        };
        if open_tag.is_none() {
            markup_lines.extend(current_lines.drain(..).map(str::to_string));
        }
        if !rest.is_empty() && markup_eligible {
            markup_lines.push(rest.to_string());
        }

        match open_tag.take() {
            Some(open) if open.name == tag.name && tag.closing => {
                let counter = nested.get_mut(tag.name);
                if *counter > 0 {
                    *counter -= 1;
                    current_lines.push(line);
                    open_tag = Some(open);
                } else {
                    let block = ScannedBlock {
                        content: current_lines.join("\n"),
                        tag: open,
                    };
                    match block.tag.name {
                        TagName::Script => result.scripts.push(block),
                        TagName::Style => result.styles.push(block),
                    }
                    current_lines.clear();
                }
            }
            Some(open) => {
                if open.name == tag.name {
                    *nested.get_mut(tag.name) += 1;
                }
                current_lines.push(line);
                open_tag = Some(open);
            }
            None => open_tag = Some(tag),
        }
    }

    markup_lines.extend(current_lines.into_iter().map(str::to_string));

    result.markup = markup_lines
        .into_iter()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::AttrValue;

    #[test]
    fn test_find_block_tag_opening() {
        let tag = find_block_tag(r#"  <script context="module">"#, 1, "a.svelte")
            .unwrap()
            .unwrap();
        assert_eq!(tag.name, TagName::Script);
        assert!(!tag.closing);
        assert_eq!(
            tag.attributes.get("context"),
            Some(&AttrValue::Text("module".into()))
        );
    }

    #[test]
    fn test_find_block_tag_closing_uppercase() {
        let tag = find_block_tag("</ STYLE>", 1, "a.svelte").unwrap().unwrap();
        assert_eq!(tag.name, TagName::Style);
        assert!(tag.closing);
    }

    #[test]
    fn test_find_block_tag_none() {
        assert!(find_block_tag("<div>hi</div>", 1, "a.svelte").unwrap().is_none());
    }
}
