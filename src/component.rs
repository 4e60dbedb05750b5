//! Component Model
//!
//! In-memory representation of one component file: its markup, its script,
//! module script and style blocks, and (once the chain is resolved) the base
//! component it extends.

use crate::attributes::{AttrValue, Attributes};
use crate::error::{ExtendError, Result};
use crate::paths::dirname;
use crate::scan::{scan, ScanResult};

/// The body of one script or style block and its tag attributes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segment {
    pub content: String,
    pub attributes: Attributes,
}

impl Segment {
    pub fn new(content: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            content: content.into(),
            attributes,
        }
    }

    /// Collapses a list of blocks into one: contents joined by newlines,
    /// attributes overlaid left to right.
    pub fn merged(segments: &[Segment]) -> Segment {
        match segments {
            [] => Segment::default(),
            [single] => single.clone(),
            _ => {
                let mut attributes = Attributes::new();
                for segment in segments {
                    attributes.overlay(&segment.attributes);
                }
                let content = segments
                    .iter()
                    .map(|segment| segment.content.as_str())
                    .collect::<Vec<_>>()
                    .join("\n");
                Segment {
                    content,
                    attributes,
                }
            }
        }
    }

    fn render(&self, name: &str) -> String {
        format!(
            "<{name}{}>\n{}\n</{name}>",
            self.attributes.render(),
            self.content
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentModel {
    filepath: String,
    directory: String,
    markup: String,
    scripts: Vec<Segment>,
    module_scripts: Vec<Segment>,
    styles: Vec<Segment>,
    base_component: Option<Box<ComponentModel>>,
    extend_attributes: Attributes,
}

impl ComponentModel {
    pub fn new(filepath: impl Into<String>) -> Self {
        let filepath = filepath.into();
        let directory = dirname(&filepath);
        Self {
            filepath,
            directory,
            ..Default::default()
        }
    }

    /// Builds a model from the result of scanning its source.
    pub fn from_scan(filepath: impl Into<String>, scanned: ScanResult) -> Self {
        let mut model = Self::new(filepath);
        model.add_markup(&scanned.markup);
        for block in scanned.scripts {
            model.add_script(block.content, block.tag.attributes);
        }
        for block in scanned.styles {
            model.add_style(block.content, block.tag.attributes);
        }
        model
    }

    /// Scans `source` and builds its model.
    pub fn from_source(source: &str, filepath: impl Into<String>) -> Result<Self> {
        let filepath = filepath.into();
        let scanned = scan(source, &filepath)?;
        Ok(Self::from_scan(filepath, scanned))
    }

    /// Links the base component this one extends. A component has at most one.
    pub fn add_base_component(
        &mut self,
        base: ComponentModel,
        extend_attributes: Attributes,
    ) -> Result<()> {
        if self.base_component.is_some() {
            return Err(ExtendError::InvalidLink {
                file: self.filepath.clone(),
            });
        }
        self.base_component = Some(Box::new(base));
        self.extend_attributes = extend_attributes;
        Ok(())
    }

    pub fn add_markup(&mut self, content: &str) {
        if self.markup.is_empty() {
            self.markup = content.to_string();
        } else {
            self.markup.push('\n');
            self.markup.push_str(content);
        }
    }

    /// Scripts with `context="module"` go to the module list.
    pub fn add_script(&mut self, content: impl Into<String>, attributes: Attributes) {
        let is_module = attributes.get("context").and_then(AttrValue::as_text) == Some("module");
        let segment = Segment::new(content, attributes);
        if is_module {
            self.module_scripts.push(segment);
        } else {
            self.scripts.push(segment);
        }
    }

    pub fn add_style(&mut self, content: impl Into<String>, attributes: Attributes) {
        self.styles.push(Segment::new(content, attributes));
    }

    pub fn filepath(&self) -> &str {
        &self.filepath
    }

    pub fn directory(&self) -> &str {
        &self.directory
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn base_component(&self) -> Option<&ComponentModel> {
        self.base_component.as_deref()
    }

    pub fn has_base_component(&self) -> bool {
        self.base_component.is_some()
    }

    /// Detaches the base component, leaving the link empty.
    pub fn take_base_component(&mut self) -> Option<ComponentModel> {
        self.base_component.take().map(|base| *base)
    }

    pub fn extend_attributes(&self) -> &Attributes {
        &self.extend_attributes
    }

    pub fn scripts(&self) -> &[Segment] {
        &self.scripts
    }

    pub fn module_scripts(&self) -> &[Segment] {
        &self.module_scripts
    }

    pub fn styles(&self) -> &[Segment] {
        &self.styles
    }

    pub fn has_scripts(&self) -> bool {
        !self.scripts.is_empty()
    }

    pub fn has_module_scripts(&self) -> bool {
        !self.module_scripts.is_empty()
    }

    pub fn has_styles(&self) -> bool {
        !self.styles.is_empty()
    }

    pub fn script(&self) -> Segment {
        Segment::merged(&self.scripts)
    }

    pub fn module_script(&self) -> Segment {
        Segment::merged(&self.module_scripts)
    }

    pub fn style(&self) -> Segment {
        Segment::merged(&self.styles)
    }

    /// Renders the component back to source: module script, script, style, then markup.
    pub fn render(&self) -> String {
        let mut parts = Vec::new();
        let blocks = [
            (self.has_module_scripts(), self.module_script(), "script"),
            (self.has_scripts(), self.script(), "script"),
            (self.has_styles(), self.style(), "style"),
        ];
        for (present, segment, name) in blocks {
            if present && !segment.content.trim().is_empty() {
                parts.push(segment.render(name));
            }
        }
        if !self.markup.is_empty() {
            parts.push(self.markup.clone());
        }
        parts.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::parse_attributes;

    #[test]
    fn test_directory_is_derived() {
        let model = ComponentModel::new("/app/components/Button.svelte");
        assert_eq!(model.directory(), "/app/components");
    }

    #[test]
    fn test_module_scripts_are_separated() {
        let mut model = ComponentModel::new("a.svelte");
        model.add_script("export const prerender = true;", parse_attributes(r#"context="module""#));
        model.add_script("let count = 0;", Attributes::new());
        assert_eq!(model.module_scripts().len(), 1);
        assert_eq!(model.scripts().len(), 1);
    }

    #[test]
    fn test_merged_view_overlays_attributes() {
        let mut model = ComponentModel::new("a.svelte");
        model.add_style("a { color: red; }", parse_attributes(r#"lang="scss" id="one""#));
        model.add_style("b { color: blue; }", parse_attributes(r#"id="two""#));
        let style = model.style();
        assert_eq!(style.content, "a { color: red; }\nb { color: blue; }");
        assert_eq!(style.attributes.get("lang"), Some(&AttrValue::Text("scss".into())));
        assert_eq!(style.attributes.get("id"), Some(&AttrValue::Text("two".into())));
    }

    #[test]
    fn test_empty_merged_view() {
        let model = ComponentModel::new("a.svelte");
        assert_eq!(model.script(), Segment::default());
    }

    #[test]
    fn test_base_can_only_be_linked_once() {
        let mut model = ComponentModel::new("/a/target.svelte");
        model
            .add_base_component(ComponentModel::new("/a/base.svelte"), Attributes::new())
            .unwrap();
        let err = model
            .add_base_component(ComponentModel::new("/a/other.svelte"), Attributes::new())
            .unwrap_err();
        assert!(matches!(err, ExtendError::InvalidLink { .. }));
        assert_eq!(model.base_component().unwrap().filepath(), "/a/base.svelte");
    }

    #[test]
    fn test_markup_accumulates() {
        let mut model = ComponentModel::new("a.svelte");
        model.add_markup("<h1>one</h1>");
        model.add_markup("<p>two</p>");
        assert_eq!(model.markup(), "<h1>one</h1>\n<p>two</p>");
    }

    #[test]
    fn test_render_order() {
        let mut model = ComponentModel::new("a.svelte");
        model.add_markup("<p>hi</p>");
        model.add_style("p { margin: 0; }", Attributes::new());
        model.add_script("let a = 1;", Attributes::new());
        model.add_script("export const x = 1;", parse_attributes(r#"context="module""#));
        assert_eq!(
            model.render(),
            "<script context=\"module\">\nexport const x = 1;\n</script>\n\
             <script>\nlet a = 1;\n</script>\n\
             <style>\np { margin: 0; }\n</style>\n\
             <p>hi</p>"
        );
    }
}
