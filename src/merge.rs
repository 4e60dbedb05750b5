//! Merge Engine
//!
//! Folds a linked chain of components, outermost base first, into a single
//! renderable component. Each step builds a fresh model from a flattened base
//! and the component that extends it.

use crate::attributes::{AttrValue, Attributes, EXTEND_ATTRIBUTE};
use crate::component::{ComponentModel, Segment};
use crate::error::{ExtendError, Result};
use crate::js_merge::{merge_code_with, source_type_for_lang};
use crate::paths::{join, relative, update_css_paths, update_js_paths, update_markup_paths};

/// Where the base content goes relative to the extending content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePosition {
    Before,
    After,
}

impl MergePosition {
    /// Reads an `html`/`extend` attribute value.
    ///
    /// Absent or falsy means no merge; `"before"` puts the extending content
    /// first; anything else truthy is `After`.
    pub fn from_attribute(value: Option<&AttrValue>) -> Option<Self> {
        match value {
            Some(value) if value.is_truthy() => match value.as_text() {
                Some(text) if text.eq_ignore_ascii_case("before") => Some(MergePosition::Before),
                _ => Some(MergePosition::After),
            },
            _ => None,
        }
    }

    fn concat(self, base: &str, target: &str) -> String {
        match self {
            MergePosition::After => format!("{}\n{}", base, target),
            MergePosition::Before => format!("{}\n{}", target, base),
        }
    }
}

/// Flattens a resolved chain. `max_depth` of `0` means no limit.
pub fn generate(model: ComponentModel, max_depth: usize) -> Result<ComponentModel> {
    generate_at(model, max_depth, 1)
}

fn generate_at(
    mut model: ComponentModel,
    max_depth: usize,
    depth: usize,
) -> Result<ComponentModel> {
    let Some(base) = model.take_base_component() else {
        return Ok(model);
    };

    let next_depth = depth + 1;
    if max_depth != 0 && next_depth > max_depth {
        return Err(ExtendError::DepthExceeded {
            file: model.filepath().to_string(),
            max_depth,
        });
    }

    let base = generate_at(base, max_depth, next_depth)?;
    combine(&base, &model)
}

/// Relative path from the target's directory to the base's directory.
pub fn directory_delta(base_directory: &str, target_directory: &str) -> String {
    let to_base = relative(target_directory, base_directory);
    let absolute = join(target_directory, &to_base);
    relative(target_directory, &absolute)
}

/// Merges one base component into the component that extends it.
pub fn combine(base: &ComponentModel, target: &ComponentModel) -> Result<ComponentModel> {
    tracing::debug!(base = base.filepath(), target = target.filepath(), "merging component");
    let directory = directory_delta(base.directory(), target.directory());
    let mut result = ComponentModel::new(target.filepath());

    result.add_markup(&merge_markup(base, target, &directory));

    let mut module_script = merge_script(
        &base.module_script(),
        &target.module_script(),
        target.has_module_scripts(),
        &directory,
    )?;
    module_script.attributes.insert("context", "module");
    if !module_script.content.is_empty() {
        result.add_script(module_script.content, module_script.attributes);
    }

    let script = merge_script(&base.script(), &target.script(), target.has_scripts(), &directory)?;
    if !script.content.is_empty() {
        result.add_script(script.content, script.attributes);
    }

    let style = merge_style(base, target, &directory);
    if !style.content.is_empty() {
        result.add_style(style.content, style.attributes);
    }

    Ok(result)
}

fn merge_markup(base: &ComponentModel, target: &ComponentModel, directory: &str) -> String {
    let merged = match MergePosition::from_attribute(target.extend_attributes().get("html")) {
        None => target.markup().to_string(),
        Some(position) => {
            let base_markup = update_markup_paths(base.markup(), directory);
            position.concat(&base_markup, target.markup())
        }
    };
    clean_text_block(&merged)
}

/// Script and module script policy: the target's block replaces the base's,
/// unless it is flagged with `extend`, in which case both are merged at the
/// declaration level.
fn merge_script(
    base: &Segment,
    target: &Segment,
    target_has_script: bool,
    directory: &str,
) -> Result<Segment> {
    let (attributes, content) = if !target_has_script {
        (base.attributes.clone(), update_js_paths(&base.content, directory))
    } else if target.attributes.is_set(EXTEND_ATTRIBUTE) {
        let mut attributes = base.attributes.clone();
        attributes.overlay(&target.attributes);
        let content = if base.content.is_empty() {
            target.content.clone()
        } else {
            let lang = attributes.get("lang").and_then(AttrValue::as_text);
            merge_code_with(
                &update_js_paths(&base.content, directory),
                &target.content,
                source_type_for_lang(lang),
            )?
        };
        (attributes, content)
    } else {
        (target.attributes.clone(), target.content.clone())
    };

    Ok(Segment::new(clean_text_block(&content), attributes.cleaned()))
}

/// Style policy: like scripts, but flagged blocks are concatenated in the
/// position the `extend` attribute asks for.
fn merge_style(base: &ComponentModel, target: &ComponentModel, directory: &str) -> Segment {
    let base_style = base.style();
    let target_style = target.style();

    let (attributes, content) = if !target.has_styles() {
        (
            base_style.attributes.clone(),
            update_css_paths(&base_style.content, directory),
        )
    } else {
        match MergePosition::from_attribute(target_style.attributes.get(EXTEND_ATTRIBUTE)) {
            None => (target_style.attributes.clone(), target_style.content.clone()),
            Some(position) => {
                let mut attributes: Attributes = base_style.attributes.clone();
                attributes.overlay(&target_style.attributes);
                let base_content = update_css_paths(&base_style.content, directory);
                (attributes, position.concat(&base_content, &target_style.content))
            }
        }
    };

    Segment::new(clean_text_block(&content), attributes.cleaned())
}

/// Drops one leading and one trailing newline; blank blocks become empty.
pub fn clean_text_block(text: &str) -> String {
    let text = text.strip_prefix('\n').unwrap_or(text);
    let text = text.strip_suffix('\n').unwrap_or(text);
    if text.trim().is_empty() {
        String::new()
    } else {
        text.to_string()
    }
}
