//! Top-level extension pipeline: resolve the chain, flatten it, render it.

use std::path::Path;

use crate::error::Result;
use crate::loader::{FileLoader, FsLoader};
use crate::merge::generate;
use crate::options::{ExtendOptions, FileFilter};
use crate::resolve::ChainResolver;

pub struct Extender<L> {
    resolver: ChainResolver<L>,
    options: ExtendOptions,
    filter: FileFilter,
}

impl<L: FileLoader> Extender<L> {
    /// Fails when the include/exclude patterns do not compile.
    pub fn new(loader: L, options: ExtendOptions) -> Result<Self> {
        let filter = options.filter()?;
        Ok(Self {
            resolver: ChainResolver::new(loader),
            options,
            filter,
        })
    }

    pub fn options(&self) -> &ExtendOptions {
        &self.options
    }

    /// Returns the merged component, or `source` untouched when it does not
    /// extend anything.
    pub fn extend(&self, source: &str, filepath: &str) -> Result<String> {
        let max_depth = self.options.allowed_max_depth;
        match self.resolver.resolve(source, filepath, max_depth)? {
            None => Ok(source.to_string()),
            Some(chain) => {
                tracing::debug!(file = filepath, "extending component");
                Ok(generate(chain, max_depth)?.render())
            }
        }
    }

    pub fn extend_file(&self, filepath: &str) -> Result<String> {
        let source = self.resolver.loader().read_text(Path::new(filepath))?;
        self.extend(&source, filepath)
    }

    /// Like [`Extender::extend`], but `None` for files the filter rejects.
    pub fn process(&self, source: &str, filepath: &str) -> Result<Option<String>> {
        if !self.filter.matches(filepath) {
            return Ok(None);
        }
        self.extend(source, filepath).map(Some)
    }
}

/// Extends a component against the local filesystem.
pub fn extend(source: &str, filepath: &str, max_depth: usize) -> Result<String> {
    let options = ExtendOptions::default().with_max_depth(max_depth);
    Extender::new(FsLoader, options)?.extend(source, filepath)
}
