//! Chain Resolver
//!
//! Follows `<extend from="...">` directives from a component back to its
//! ultimate base, loading one file per hop, and links the scanned models into
//! a chain. Linking only: flattening is the merge engine's job.

use std::path::Path;

use crate::component::ComponentModel;
use crate::directive::{ExtendDirective, Extension};
use crate::error::{ExtendError, Result};
use crate::loader::FileLoader;
use crate::paths::{dirname, join};

pub struct ChainResolver<L> {
    loader: L,
}

impl<L: FileLoader> ChainResolver<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Resolves the chain of a component given its contents.
    ///
    /// Returns `None` when the component does not extend anything, in which
    /// case the original contents should be used as they are. A `max_depth`
    /// of `0` means no limit.
    pub fn resolve(
        &self,
        contents: &str,
        filepath: &str,
        max_depth: usize,
    ) -> Result<Option<ComponentModel>> {
        match Extension::detect(contents) {
            Extension::NotExtended => Ok(None),
            Extension::Extends(directive) => self
                .resolve_directive(contents, filepath, max_depth, 1, &directive)
                .map(Some),
        }
    }

    /// Same as [`ChainResolver::resolve`], loading the component first.
    pub fn resolve_from_path(
        &self,
        filepath: &str,
        max_depth: usize,
    ) -> Result<Option<ComponentModel>> {
        let contents = self.loader.read_text(Path::new(filepath))?;
        self.resolve(&contents, filepath, max_depth)
    }

    fn resolve_directive(
        &self,
        contents: &str,
        filepath: &str,
        max_depth: usize,
        depth: usize,
        directive: &ExtendDirective,
    ) -> Result<ComponentModel> {
        let from = directive.from().unwrap_or_default();
        let next_depth = depth + 1;
        if max_depth != 0 && next_depth > max_depth {
            return Err(ExtendError::DepthExceeded {
                file: filepath.to_string(),
                max_depth,
            });
        }

        let base_path = join(&dirname(filepath), from);
        if !self.loader.exists(Path::new(&base_path)) {
            return Err(ExtendError::MissingBaseFile {
                from: from.to_string(),
                file: filepath.to_string(),
            });
        }

        tracing::debug!(
            file = filepath,
            base = %base_path,
            depth = next_depth,
            "resolving base component"
        );
        let base = self.load_component(&base_path, max_depth, next_depth)?;

        let own_source = contents.replacen(&directive.statement, "", 1);
        let mut component = ComponentModel::from_source(&own_source, filepath)?;
        component.add_base_component(base, directive.attributes.clone())?;
        Ok(component)
    }

    fn load_component(
        &self,
        filepath: &str,
        max_depth: usize,
        depth: usize,
    ) -> Result<ComponentModel> {
        let contents = self.loader.read_text(Path::new(filepath))?;
        match Extension::detect(&contents) {
            Extension::Extends(directive) => {
                self.resolve_directive(&contents, filepath, max_depth, depth, &directive)
            }
            Extension::NotExtended => ComponentModel::from_source(&contents, filepath),
        }
    }
}
