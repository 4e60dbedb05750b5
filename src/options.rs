//! Extension options, as handed over by bundler plugins.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{ExtendError, Result};

lazy_static! {
    /// A component file, optionally followed by a bundler query string.
    static ref COMPONENT_FILE_REGEX: Regex = Regex::new(r"(?i)\.svelte(?:$|\?)").unwrap();
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtendOptions {
    /// Longest allowed chain of components; `0` means no limit.
    pub allowed_max_depth: usize,
    /// Path patterns a file must match (any of them) to be processed.
    pub include: Vec<String>,
    /// Path patterns that exclude a file from processing.
    pub exclude: Vec<String>,
}

impl ExtendOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| ExtendError::InvalidOptions(e.to_string()))
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.allowed_max_depth = max_depth;
        self
    }

    /// Compiles the include/exclude patterns.
    pub fn filter(&self) -> Result<FileFilter> {
        Ok(FileFilter {
            include: compile_patterns(&self.include)?,
            exclude: compile_patterns(&self.exclude)?,
        })
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(pattern).map_err(|e| {
                ExtendError::InvalidOptions(format!("pattern '{}': {}", pattern, e))
            })
        })
        .collect()
}

/// Decides which files go through the extension pipeline.
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl FileFilter {
    pub fn matches(&self, path: &str) -> bool {
        if !COMPONENT_FILE_REGEX.is_match(path) {
            return false;
        }
        let included = self.include.is_empty() || self.include.iter().any(|re| re.is_match(path));
        included && !self.exclude.iter().any(|re| re.is_match(path))
    }
}
