//! Component discovery
//!
//! Walks a directory for component files and reports which of them extend
//! another component.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::directive::Extension;
use crate::options::FileFilter;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveredComponent {
    pub path: String,
    /// The `from` reference of the component's extend directive.
    pub extends: Option<String>,
}

/// Discover all components in a directory, sorted by path.
pub fn discover_components(dir: &Path, filter: &FileFilter) -> Vec<DiscoveredComponent> {
    let mut components: Vec<DiscoveredComponent> = find_component_files(dir, filter)
        .into_iter()
        .filter_map(|path| inspect_component(&path))
        .collect();
    components.sort_by(|a, b| a.path.cmp(&b.path));
    components
}

fn find_component_files(dir: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| filter.matches(&path.to_string_lossy().replace('\\', "/")))
        .collect()
}

fn inspect_component(path: &Path) -> Option<DiscoveredComponent> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "skipping unreadable component");
            return None;
        }
    };

    let extends = match Extension::detect(&source) {
        Extension::Extends(directive) => directive.from().map(str::to_string),
        Extension::NotExtended => None,
    };

    Some(DiscoveredComponent {
        path: path.to_string_lossy().replace('\\', "/"),
        extends,
    })
}
